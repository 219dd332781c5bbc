// Shared prompt fragments. Each feature that calls the LLM keeps its own
// prompts.rs next to it; only cross-cutting fragments live here.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appends the JSON-only fragment to a feature's system prompt.
pub fn json_only(system: &str) -> String {
    format!("{system} {JSON_ONLY_SYSTEM}")
}
