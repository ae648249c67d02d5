use thiserror::Error;

/// Errors raised while talking to the database, the model server or the disk.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ollama API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("reference file is missing required column `{0}`")]
    MissingColumn(String),

    #[error("cannot build index `{0}` from zero documents")]
    EmptyIndex(String),

    #[error("embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("unknown table(s): {0}")]
    UnknownTables(String),
}

pub type InfraResult<T> = std::result::Result<T, InfraError>;
