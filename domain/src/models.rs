use serde::{Deserialize, Serialize};

/// A known-correct SQL query for a natural-language question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub question: String,
    pub sql: String,
}

/// Text to be embedded, with optional payload carried into search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDocument {
    pub text: String,
    pub metadata: Option<String>,
}

impl IndexDocument {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: None,
        }
    }
}

impl From<&ExamplePair> for IndexDocument {
    fn from(pair: &ExamplePair) -> Self {
        Self {
            text: pair.question.clone(),
            metadata: Some(pair.sql.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub text: String,
    pub metadata: Option<String>,
    pub score: f32,
}
