//! Fixtures shared by the integration tests.

use domain::models::ExamplePair;
use domain::ports::{ChatModel, EmbeddingModel};
use domain::session::Message;
use domain::tool_descriptor::ToolDescriptor;
use rusqlite::{params, Connection};
use shared::types::Result;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const BUCKETS: usize = 512;

/// Deterministic bag-of-words embedding: each lowercase token lands in a hashed bucket.
#[derive(Clone, Default)]
pub struct HashEmbeddings {
    calls: Arc<AtomicUsize>,
}

impl HashEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn vector(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; BUCKETS];
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            vector[(hasher.finish() as usize) % BUCKETS] += 1.0;
        }
        vector
    }
}

impl EmbeddingModel for HashEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vector(text))
    }
}

/// Chat model that replays canned replies and records every transcript it receives.
#[derive(Clone, Default)]
pub struct ScriptedChat {
    replies: Arc<Mutex<VecDeque<Message>>>,
    transcripts: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedChat {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            transcripts: Arc::default(),
        }
    }

    pub fn transcripts(&self) -> Vec<Vec<Message>> {
        self.transcripts.lock().unwrap().clone()
    }

    /// Tool results sent back in the last transcript, by tool name.
    pub fn tool_outputs(&self) -> Vec<(String, String)> {
        self.transcripts()
            .last()
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(|m| m.tool_name.clone().map(|name| (name, m.content.clone())))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl ChatModel for ScriptedChat {
    async fn chat(&self, messages: &[Message], _tools: &[ToolDescriptor]) -> Result<Message> {
        self.transcripts.lock().unwrap().push(messages.to_vec());
        let next = self.replies.lock().unwrap().pop_front();
        next.ok_or_else(|| anyhow::anyhow!("scripted chat ran out of replies"))
    }
}

/// A transaction row: category, merchant, amount.
pub type Row<'a> = (Option<&'a str>, Option<&'a str>, f64);

/// Write a finance database with a `transactions` table to `dir`.
pub fn finance_db_file(dir: &Path, rows: &[Row<'_>]) -> PathBuf {
    let path = dir.join("personal_finance.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE transactions (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL DEFAULT '2024-01-01',
            amount REAL NOT NULL,
            category TEXT,
            merchant_name TEXT
        );",
    )
    .unwrap();
    for (category, merchant, amount) in rows {
        conn.execute(
            "INSERT INTO transactions (amount, category, merchant_name) VALUES (?1, ?2, ?3)",
            params![amount, category, merchant],
        )
        .unwrap();
    }
    path
}

/// Write a reference CSV with the two required columns to `dir`.
pub fn examples_csv_file(dir: &Path, pairs: &[ExamplePair]) -> PathBuf {
    let path = dir.join("query_db.csv");
    let mut body = String::from("user_query,SQL_query\n");
    for pair in pairs {
        body.push_str(&format!("{},{}\n", quote(&pair.question), quote(&pair.sql)));
    }
    std::fs::write(&path, body).unwrap();
    path
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn food_example() -> ExamplePair {
    ExamplePair {
        question: "How much did I spend on food?".to_string(),
        sql: "SELECT SUM(amount) FROM transactions WHERE category='food'".to_string(),
    }
}
