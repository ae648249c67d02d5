use anyhow::Context;
use domain::models::{ExamplePair, IndexDocument};
use domain::ports::EmbeddingModel;
use domain::text::clean_name;
use infrastructure::embedder::Embedder;
use infrastructure::finance_db::FinanceDb;
use infrastructure::vector_index::VectorIndex;
use shared::types::Result;
use shared::utils::unique_preserving_order;
use std::sync::Arc;
use tracing::info;

pub const CATEGORY_QUERY: &str = "SELECT category FROM transactions";
pub const MERCHANT_QUERY: &str = "SELECT merchant_name FROM transactions";

pub const EXAMPLES_INDEX: &str = "sql_examples";
pub const NAMES_INDEX: &str = "names";

/// The two similarity indexes the agent's retrieval tools search.
#[derive(Clone)]
pub struct KnowledgeBase {
    pub examples: Arc<VectorIndex>,
    pub names: Arc<VectorIndex>,
}

/// Cleaned category names followed by cleaned merchant names, in row order.
///
/// `NULL`s and values that are empty once cleaned are dropped. Repeats are kept.
pub fn extract_names(db: &FinanceDb) -> Result<Vec<String>> {
    let mut names = clean_values(
        db.column_values(CATEGORY_QUERY)
            .context("failed to read transaction categories")?,
    );
    names.extend(clean_values(
        db.column_values(MERCHANT_QUERY)
            .context("failed to read merchant names")?,
    ));
    Ok(names)
}

pub fn clean_values(values: Vec<Option<String>>) -> Vec<String> {
    values
        .into_iter()
        .flatten()
        .map(|value| clean_name(&value))
        .filter(|value| !value.is_empty())
        .collect()
}

pub struct RagService<E> {
    embedder: Embedder<E>,
}

impl<E: EmbeddingModel> RagService<E> {
    pub fn new(embeddings: E) -> Self {
        Self {
            embedder: Embedder::new(embeddings),
        }
    }

    pub fn embeddings(&self) -> &E {
        self.embedder.model()
    }

    /// Index keyed by example question, carrying the SQL as metadata.
    pub async fn build_example_index(&self, pairs: &[ExamplePair]) -> Result<VectorIndex> {
        let documents: Vec<IndexDocument> = pairs.iter().map(IndexDocument::from).collect();
        VectorIndex::from_documents(EXAMPLES_INDEX, &documents, &self.embedder)
            .await
            .context("failed to build the example query index")
    }

    /// Index over distinct names; each name is embedded once.
    pub async fn build_name_index(&self, names: &[String]) -> Result<VectorIndex> {
        let documents: Vec<IndexDocument> = unique_preserving_order(names)
            .into_iter()
            .map(IndexDocument::plain)
            .collect();
        VectorIndex::from_documents(NAMES_INDEX, &documents, &self.embedder)
            .await
            .context("failed to build the category/merchant name index")
    }

    pub async fn build_knowledge_base(
        &self,
        pairs: &[ExamplePair],
        names: &[String],
    ) -> Result<KnowledgeBase> {
        let examples = self.build_example_index(pairs).await?;
        let names_index = self.build_name_index(names).await?;
        info!(
            examples = examples.len(),
            names = names_index.len(),
            "knowledge base ready"
        );
        Ok(KnowledgeBase {
            examples: Arc::new(examples),
            names: Arc::new(names_index),
        })
    }
}
