//! Career advisor features backed by the remote completion service.

pub mod chat;
pub mod handlers;
pub mod prompts;
pub mod roadmap;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{ChatCompletion, CompletionRequest, LlmError};

    /// Records requests and answers with a fixed reply.
    pub struct StubLlm {
        reply: Result<String, fn() -> LlmError>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl StubLlm {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(make: fn() -> LlmError) -> Self {
            Self {
                reply: Err(make),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletion for StubLlm {
        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.requests.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }
}
