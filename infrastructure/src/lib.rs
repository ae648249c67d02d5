pub mod config;
pub mod embedder;
pub mod error;
pub mod finance_db;
pub mod ollama_client;
pub mod reference_data;
pub mod search;
pub mod vector_index;
