use crate::error::{InfraError, InfraResult};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Longest cell value shown to the model.
const MAX_CELL_CHARS: usize = 100;
/// Rows returned by a single agent query before truncation.
const MAX_RESULT_ROWS: usize = 100;
/// Sample rows shown per table in schema descriptions.
const SAMPLE_ROWS: usize = 3;

/// Rows returned by an ad-hoc query, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub truncated: bool,
}

impl QueryOutput {
    /// Header line followed by one tab-separated line per row.
    pub fn to_text(&self) -> String {
        if self.rows.is_empty() {
            return format!("{}\n(no rows)", self.columns.join("\t"));
        }
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.columns.join("\t"));
        for row in &self.rows {
            lines.push(row.join("\t"));
        }
        if self.truncated {
            lines.push(format!("(truncated to {MAX_RESULT_ROWS} rows)"));
        }
        lines.join("\n")
    }
}

/// Read-only handle on the personal finance database.
pub struct FinanceDb {
    conn: Mutex<Connection>,
}

impl FinanceDb {
    /// Open an existing SQLite file without write access.
    pub fn open_read_only(db_path: impl AsRef<Path>) -> InfraResult<Self> {
        let db_path = db_path.as_ref();
        if !db_path.exists() {
            return Err(InfraError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("database file {} does not exist", db_path.display()),
            )));
        }
        let conn = Connection::open_with_flags(db_path, read_only_flags())?;
        info!(path = %db_path.display(), "opened finance database");
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// First column of every row of `sql`; `NULL` becomes `None`.
    pub fn column_values(&self, sql: &str) -> InfraResult<Vec<Option<String>>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            values.push(match row.get_ref(0)? {
                ValueRef::Null => None,
                other => Some(render_value(other)),
            });
        }
        debug!(sql, rows = values.len(), "fetched column values");
        Ok(values)
    }

    pub fn list_tables(&self) -> InfraResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// `CREATE` statement plus a few sample rows for each named table.
    pub fn table_info(&self, table_names: &[&str]) -> InfraResult<String> {
        let known = self.list_tables()?;
        let unknown: Vec<&str> = table_names
            .iter()
            .copied()
            .filter(|name| !known.iter().any(|k| k == name))
            .collect();
        if !unknown.is_empty() {
            return Err(InfraError::UnknownTables(unknown.join(", ")));
        }

        let conn = self.conn();
        let mut sections = Vec::with_capacity(table_names.len());
        for name in table_names {
            let create: String = conn.query_row(
                "SELECT sql FROM sqlite_master WHERE name = ?1",
                [name],
                |row| row.get(0),
            )?;
            let sample = sample_rows(&conn, name)?;
            sections.push(format!(
                "{}\n\n/*\n{} rows from {} table:\n{}\n*/",
                create.trim(),
                SAMPLE_ROWS,
                name,
                sample.to_text()
            ));
        }
        Ok(sections.join("\n\n"))
    }

    /// Run one statement on the read-only connection.
    pub fn run_query(&self, sql: &str) -> InfraResult<QueryOutput> {
        let conn = self.conn();
        collect_rows(&conn, sql, MAX_RESULT_ROWS)
    }
}

/// Plain read-only open; the path is never parsed as a `file:` URI.
fn read_only_flags() -> OpenFlags {
    OpenFlags::SQLITE_OPEN_READ_ONLY
}

fn sample_rows(conn: &Connection, table: &str) -> InfraResult<QueryOutput> {
    let sql = format!(
        "SELECT * FROM \"{}\" LIMIT {SAMPLE_ROWS}",
        table.replace('"', "\"\"")
    );
    collect_rows(conn, &sql, SAMPLE_ROWS)
}

fn collect_rows(conn: &Connection, sql: &str, max_rows: usize) -> InfraResult<QueryOutput> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    let mut truncated = false;
    while let Some(row) = rows.next()? {
        if out.len() == max_rows {
            truncated = true;
            break;
        }
        let mut cells = Vec::with_capacity(width);
        for i in 0..width {
            cells.push(truncate_cell(render_value(row.get_ref(i)?)));
        }
        out.push(cells);
    }
    Ok(QueryOutput {
        columns,
        rows: out,
        truncated,
    })
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn truncate_cell(value: String) -> String {
    if value.chars().count() <= MAX_CELL_CHARS {
        return value;
    }
    let mut cut: String = value.chars().take(MAX_CELL_CHARS).collect();
    cut.push_str("...");
    cut
}
