use domain::models::{Embedding, IndexDocument};
use domain::ports::EmbeddingModel;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::types::Result;
use tracing::debug;

const BATCH_SIZE: usize = 32;
const MAX_IN_FLIGHT: usize = 8;

/// Embeds documents through any [`EmbeddingModel`], keeping input order.
pub struct Embedder<E> {
    model: E,
}

impl<E: EmbeddingModel> Embedder<E> {
    pub fn new(model: E) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &E {
        &self.model
    }

    pub async fn generate_embeddings(&self, inputs: &[IndexDocument]) -> Result<Vec<Embedding>> {
        let mut embeddings = Vec::with_capacity(inputs.len());

        for chunk in inputs.chunks(BATCH_SIZE) {
            debug!(count = chunk.len(), "generating embeddings");
            let batch_embeddings = self.generate_batch_embeddings(chunk).await?;
            embeddings.extend(batch_embeddings);
        }
        Ok(embeddings)
    }

    async fn generate_batch_embeddings(&self, inputs: &[IndexDocument]) -> Result<Vec<Embedding>> {
        stream::iter(inputs)
            .map(|input| async move {
                let vector = self.model.embed(&input.text).await?;
                Ok(Embedding {
                    text: input.text.clone(),
                    vector,
                    metadata: input.metadata.clone(),
                }) as Result<Embedding>
            })
            .buffered(MAX_IN_FLIGHT)
            .try_collect()
            .await
    }
}
