use crate::embedder::Embedder;
use crate::error::{InfraError, InfraResult};
use crate::search::SearchEngine;
use domain::models::{Embedding, IndexDocument, SearchHit};
use domain::ports::EmbeddingModel;
use shared::types::Result;
use tracing::info;

/// In-memory similarity index. Built once, read-only afterwards.
#[derive(Debug)]
pub struct VectorIndex {
    name: String,
    dimension: usize,
    entries: Vec<Embedding>,
}

impl VectorIndex {
    /// Build from already embedded entries.
    ///
    /// Zero entries is an error rather than an index that silently never matches.
    pub fn build(name: impl Into<String>, entries: Vec<Embedding>) -> InfraResult<Self> {
        let name = name.into();
        let Some(first) = entries.first() else {
            return Err(InfraError::EmptyIndex(name));
        };
        let dimension = first.vector.len();
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimension) {
            return Err(InfraError::DimensionMismatch {
                expected: dimension,
                found: bad.vector.len(),
            });
        }
        Ok(Self {
            name,
            dimension,
            entries,
        })
    }

    /// Embed `documents` and build the index from them.
    pub async fn from_documents<E: EmbeddingModel>(
        name: impl Into<String>,
        documents: &[IndexDocument],
        embedder: &Embedder<E>,
    ) -> Result<Self> {
        let name = name.into();
        if documents.is_empty() {
            return Err(InfraError::EmptyIndex(name).into());
        }
        let entries = embedder.generate_embeddings(documents).await?;
        let index = Self::build(name, entries)?;
        info!(
            index = %index.name,
            entries = index.len(),
            dimension = index.dimension,
            "vector index built"
        );
        Ok(index)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, query: &[f32], top_k: usize) -> InfraResult<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(InfraError::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }
        Ok(SearchEngine::find_nearest(query, &self.entries, top_k))
    }
}
