use crate::tools::{string_arg, Tool};
use async_trait::async_trait;
use domain::ports::ChatModel;
use domain::prompts::{
    query_checker_prompt, LIST_TABLES_TOOL_DESCRIPTION, LIST_TABLES_TOOL_NAME,
    QUERY_CHECKER_TOOL_DESCRIPTION, QUERY_CHECKER_TOOL_NAME, QUERY_TOOL_DESCRIPTION,
    QUERY_TOOL_NAME, SCHEMA_TOOL_DESCRIPTION, SCHEMA_TOOL_NAME,
};
use domain::session::Message;
use domain::tool_descriptor::ToolDescriptor;
use infrastructure::finance_db::FinanceDb;
use serde_json::Value;
use shared::types::Result;
use std::sync::Arc;
use tracing::debug;

pub const DIALECT: &str = "SQLite";

/// The four database tools offered to the agent alongside the retrievers.
pub fn sql_toolkit<M: ChatModel + 'static>(db: Arc<FinanceDb>, model: M) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(QueryTool::new(db.clone())),
        Box::new(SchemaTool::new(db.clone())),
        Box::new(ListTablesTool::new(db)),
        Box::new(QueryCheckerTool::new(model)),
    ]
}

pub struct ListTablesTool {
    descriptor: ToolDescriptor,
    db: Arc<FinanceDb>,
}

impl ListTablesTool {
    pub fn new(db: Arc<FinanceDb>) -> Self {
        Self {
            descriptor: ToolDescriptor::without_args(
                LIST_TABLES_TOOL_NAME,
                LIST_TABLES_TOOL_DESCRIPTION,
            ),
            db,
        }
    }
}

#[async_trait]
impl Tool for ListTablesTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, _arguments: &Value) -> Result<String> {
        Ok(self.db.list_tables()?.join(", "))
    }
}

pub struct SchemaTool {
    descriptor: ToolDescriptor,
    db: Arc<FinanceDb>,
}

impl SchemaTool {
    pub fn new(db: Arc<FinanceDb>) -> Self {
        Self {
            descriptor: ToolDescriptor::with_string_arg(
                SCHEMA_TOOL_NAME,
                SCHEMA_TOOL_DESCRIPTION,
                "table_names",
                "A comma-separated list of the table names for which to return the schema. Example input: 'table1, table2, table3'",
            ),
            db,
        }
    }
}

#[async_trait]
impl Tool for SchemaTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, arguments: &Value) -> Result<String> {
        let raw = string_arg(self.name(), arguments, "table_names")?;
        let tables: Vec<&str> = raw
            .split(',')
            .map(|t| t.trim().trim_matches('\'').trim_matches('"'))
            .filter(|t| !t.is_empty())
            .collect();
        if tables.is_empty() {
            return Ok("Error: no table names given".to_string());
        }
        // Reported back as text so the model can pick real tables next time.
        Ok(match self.db.table_info(&tables) {
            Ok(info) => info,
            Err(err) => format!("Error: {err}"),
        })
    }
}

pub struct QueryTool {
    descriptor: ToolDescriptor,
    db: Arc<FinanceDb>,
}

impl QueryTool {
    pub fn new(db: Arc<FinanceDb>) -> Self {
        Self {
            descriptor: ToolDescriptor::with_string_arg(
                QUERY_TOOL_NAME,
                QUERY_TOOL_DESCRIPTION,
                "query",
                "A detailed and correct SQL query.",
            ),
            db,
        }
    }
}

#[async_trait]
impl Tool for QueryTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, arguments: &Value) -> Result<String> {
        let query = string_arg(self.name(), arguments, "query")?;
        let query = strip_code_fence(&query);
        debug!(sql = %query, "running agent query");
        Ok(match self.db.run_query(query) {
            Ok(output) => output.to_text(),
            Err(err) => format!("Error: {err}"),
        })
    }
}

pub struct QueryCheckerTool<M> {
    descriptor: ToolDescriptor,
    model: M,
}

impl<M: ChatModel> QueryCheckerTool<M> {
    pub fn new(model: M) -> Self {
        Self {
            descriptor: ToolDescriptor::with_string_arg(
                QUERY_CHECKER_TOOL_NAME,
                QUERY_CHECKER_TOOL_DESCRIPTION,
                "query",
                "A detailed and SQL query to be checked.",
            ),
            model,
        }
    }
}

#[async_trait]
impl<M: ChatModel + 'static> Tool for QueryCheckerTool<M> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, arguments: &Value) -> Result<String> {
        let query = string_arg(self.name(), arguments, "query")?;
        let prompt = query_checker_prompt(DIALECT, &query);
        let reply = self.model.chat(&[Message::user(prompt)], &[]).await?;
        Ok(strip_code_fence(&reply.content).to_string())
    }
}

/// Models like to wrap SQL in markdown fences.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("sql").or_else(|| inner.strip_prefix("SQL")).unwrap_or(inner);
    inner.trim()
}
