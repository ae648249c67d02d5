use crate::error::{InfraError, InfraResult};
use domain::models::ExamplePair;
use std::io::Read;
use std::path::Path;
use tracing::info;

pub const QUESTION_COLUMN: &str = "user_query";
pub const SQL_COLUMN: &str = "SQL_query";

/// Load question/SQL pairs from a CSV file with a header row.
pub fn load_example_pairs(path: impl AsRef<Path>) -> InfraResult<Vec<ExamplePair>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let pairs = read_example_pairs(file)?;
    info!(path = %path.display(), pairs = pairs.len(), "loaded example queries");
    Ok(pairs)
}

/// Parse question/SQL pairs. Columns other than the two required ones are ignored.
pub fn read_example_pairs(input: impl Read) -> InfraResult<Vec<ExamplePair>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(input);
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| InfraError::MissingColumn(name.to_string()))
    };
    let question_idx = column(QUESTION_COLUMN)?;
    let sql_idx = column(SQL_COLUMN)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        pairs.push(ExamplePair {
            question: field(question_idx),
            sql: field(sql_idx),
        });
    }
    Ok(pairs)
}
