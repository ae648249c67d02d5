use crate::tools::{string_arg, Tool};
use async_trait::async_trait;
use domain::models::SearchHit;
use domain::ports::EmbeddingModel;
use domain::prompts::{
    NAME_SEARCH_TOOL_DESCRIPTION, NAME_SEARCH_TOOL_NAME, SQL_EXAMPLES_TOOL_DESCRIPTION,
    SQL_EXAMPLES_TOOL_NAME,
};
use domain::tool_descriptor::ToolDescriptor;
use infrastructure::vector_index::VectorIndex;
use serde_json::Value;
use shared::types::Result;
use std::sync::Arc;
use tracing::debug;

const QUERY_ARG: &str = "query";

type Render = fn(&[SearchHit]) -> String;

/// Nearest-neighbour lookup over one vector index, exposed as an agent tool.
pub struct RetrieverTool<E> {
    descriptor: ToolDescriptor,
    index: Arc<VectorIndex>,
    embeddings: E,
    top_k: usize,
    render: Render,
}

impl<E: EmbeddingModel> RetrieverTool<E> {
    pub fn new(
        descriptor: ToolDescriptor,
        index: Arc<VectorIndex>,
        embeddings: E,
        top_k: usize,
        render: Render,
    ) -> Self {
        Self {
            descriptor,
            index,
            embeddings,
            top_k: top_k.max(1),
            render,
        }
    }

    /// `sql_get_similar_examples`: example questions together with their SQL.
    pub fn sql_examples(index: Arc<VectorIndex>, embeddings: E, top_k: usize) -> Self {
        Self::new(
            ToolDescriptor::with_string_arg(
                SQL_EXAMPLES_TOOL_NAME,
                SQL_EXAMPLES_TOOL_DESCRIPTION,
                QUERY_ARG,
                "The user question",
            ),
            index,
            embeddings,
            top_k,
            render_examples,
        )
    }

    /// `name_search`: how categories and merchants are spelled in the data.
    pub fn name_search(index: Arc<VectorIndex>, embeddings: E, top_k: usize) -> Self {
        Self::new(
            ToolDescriptor::with_string_arg(
                NAME_SEARCH_TOOL_NAME,
                NAME_SEARCH_TOOL_DESCRIPTION,
                QUERY_ARG,
                "The name or phrase to look up",
            ),
            index,
            embeddings,
            top_k,
            render_texts,
        )
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchHit>> {
        let vector = self.embeddings.embed(query).await?;
        Ok(self.index.search(&vector, self.top_k)?)
    }
}

#[async_trait]
impl<E: EmbeddingModel + 'static> Tool for RetrieverTool<E> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn call(&self, arguments: &Value) -> Result<String> {
        let query = string_arg(self.name(), arguments, QUERY_ARG)?;
        let hits = self.retrieve(&query).await?;
        debug!(tool = %self.descriptor.name, query = %query, hits = hits.len(), "retrieved");
        Ok((self.render)(&hits))
    }
}

pub fn render_examples(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| match &hit.metadata {
            Some(sql) => format!("Question: {}\nSQL: {}", hit.text, sql),
            None => format!("Question: {}", hit.text),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_texts(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| hit.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
