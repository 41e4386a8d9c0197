//! Vector index — embedding-similarity retrieval over a [`Corpus`].
//!
//! DESIGN
//! ======
//! Every document is embedded once when the index is built, in batches of
//! `batch_size` texts per request. Vectors are stored at unit length, so the
//! cosine similarity against a query is a plain dot product. `nearest` always
//! returns up to `k` positions, best first, even when similarity is low; the
//! model is told to say so when the context does not cover the question.
//! Equal scores keep corpus order.

use tracing::info;

use super::corpus::Corpus;
use crate::llm::Embedder;
use crate::llm::types::LlmError;

#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    /// Unit-length rows, one per corpus position.
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every document of `corpus`.
    ///
    /// # Errors
    ///
    /// Returns the first embedding failure, or a parse error when the
    /// embedder returns the wrong number of vectors or vectors of differing
    /// lengths.
    pub async fn build(corpus: &Corpus, embedder: &dyn Embedder, batch_size: usize) -> Result<Self, LlmError> {
        let texts: Vec<String> = corpus.texts().map(str::to_owned).collect();
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(batch_size.max(1)) {
            vectors.extend(embedder.embed(batch).await?);
            info!(embedded = vectors.len(), total = texts.len(), "index: embedding corpus");
        }
        if vectors.len() != texts.len() {
            return Err(LlmError::Parse(format!(
                "embedder returned {} vectors for {} documents",
                vectors.len(),
                texts.len()
            )));
        }
        Self::from_vectors(vectors)
    }

    /// Index pre-computed vectors, one per corpus position.
    ///
    /// # Errors
    ///
    /// Returns a parse error when the vectors differ in length.
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self, LlmError> {
        let dimension = vectors.first().map_or(0, Vec::len);
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(LlmError::Parse(format!(
                "embedding has {} dimensions, expected {dimension}",
                bad.len()
            )));
        }
        let vectors = vectors.into_iter().map(unit).collect();
        Ok(Self { vectors, dimension })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Corpus positions of the `k` vectors most similar to `query`, best first.
    #[must_use]
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<usize> {
        let query = unit(query.to_vec());
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx, dot(v, &query)))
            .collect();

        // Stable sort keeps corpus order among equal scores.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.into_iter().take(k).map(|(idx, _)| idx).collect()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scale to unit length. A zero vector stays zero and scores 0 against anything.
fn unit(mut v: Vec<f32>) -> Vec<f32> {
    let norm = dot(&v, &v).sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
