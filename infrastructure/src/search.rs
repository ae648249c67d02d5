use domain::models::{Embedding, SearchHit};
use rayon::prelude::*;

pub struct SearchEngine;

impl SearchEngine {
    /// Cosine similarity; 0.0 when either vector has zero length.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot_product / (norm_a * norm_b)
    }

    /// Best `top_k` matches, highest score first. Equal scores keep insertion order.
    pub fn find_nearest(
        query_embedding: &[f32],
        embeddings: &[Embedding],
        top_k: usize,
    ) -> Vec<SearchHit> {
        let mut similarities: Vec<(usize, f32)> = embeddings
            .par_iter()
            .enumerate()
            .map(|(i, emb)| (i, Self::cosine_similarity(query_embedding, &emb.vector)))
            .collect();

        similarities.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        similarities
            .into_iter()
            .take(top_k)
            .map(|(i, score)| SearchHit {
                text: embeddings[i].text.clone(),
                metadata: embeddings[i].metadata.clone(),
                score,
            })
            .collect()
    }
}
