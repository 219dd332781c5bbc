pub mod advisor;
pub mod artifacts;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod inference;
pub mod llm_client;
pub mod ml;
pub mod models;
pub mod routes;
pub mod state;
pub mod training;
