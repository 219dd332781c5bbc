//! Text similarity: tokenizer, stop words, and the TF-IDF vectorizer used to
//! score résumés against job descriptions.

pub mod stop_words;
pub mod tfidf;
pub mod tokenizer;

pub use tfidf::{cosine_similarity, match_percentage, SparseVector, TfidfParams, TfidfVectorizer};
