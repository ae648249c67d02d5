use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use tracing::warn;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_CHAT_MODEL: &str = "qwen2.5:7b-instruct";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
const DEFAULT_DB_PATH: &str = "data/personal_finance.db";
const DEFAULT_EXAMPLES_PATH: &str = "data/query_db.csv";
const DEFAULT_RETRIEVER_TOP_K: usize = 4;
const DEFAULT_SQL_TOP_K: usize = 10;
const DEFAULT_MAX_ITERATIONS: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub ollama_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub db_path: PathBuf,
    pub examples_path: PathBuf,
    /// Hits returned by each retrieval tool.
    pub retriever_top_k: usize,
    /// Row limit the agent is told to apply to its queries.
    pub sql_top_k: usize,
    pub max_iterations: usize,
}

impl Config {
    /// Read settings from the environment, honouring a `.env` file.
    pub fn load() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: usize| match lookup(key) {
            None => default,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(key, value = %raw, default, "ignoring unparseable setting");
                default
            }),
        };

        Self {
            ollama_base_url: string("OLLAMA_BASE_URL", DEFAULT_BASE_URL),
            chat_model: string("FINANCE_CHAT_MODEL", DEFAULT_CHAT_MODEL),
            embedding_model: string("FINANCE_EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            db_path: PathBuf::from(string("FINANCE_DB_PATH", DEFAULT_DB_PATH)),
            examples_path: PathBuf::from(string("FINANCE_EXAMPLES_CSV", DEFAULT_EXAMPLES_PATH)),
            retriever_top_k: number("FINANCE_RETRIEVER_TOP_K", DEFAULT_RETRIEVER_TOP_K),
            sql_top_k: number("FINANCE_SQL_TOP_K", DEFAULT_SQL_TOP_K),
            max_iterations: number("FINANCE_MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS),
        }
    }
}
