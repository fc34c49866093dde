//! Exact inner-product similarity index
//!
//! Vectors are stored row-major in one flat buffer and re-normalized on
//! insert, so inner product equals cosine similarity. Search is brute force:
//! O(n·d) per query, which is fine for a catalog of tens of thousands of games.

use crate::errors::{AgentError, Result};
use crate::steamdb::embedder::l2_normalize;
use std::cmp::Ordering;

/// One search result: position in the catalog and its similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub position: usize,
    pub score: f32,
}

/// Read-only similarity index
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl SimilarityIndex {
    /// Build index from per-record vectors, preserving their order
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        let mut data = Vec::with_capacity(dimension * vectors.len());

        for (position, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(AgentError::DataLoadError(format!(
                    "Embedding {} has dimension {}, expected {}",
                    position,
                    vector.len(),
                    dimension
                )));
            }
            let start = data.len();
            data.extend_from_slice(vector);
            l2_normalize(&mut data[start..]);
        }

        Ok(Self { dimension, data })
    }

    /// Number of indexed vectors
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Normalized vector stored at `position`
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        let start = position.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// Top-k neighbors by inner product.
    ///
    /// Scores are non-increasing; equal scores keep catalog order. `k` larger
    /// than the index is clipped.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(AgentError::EmbeddingServiceError(format!(
                "Query embedding has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut query = query.to_vec();
        l2_normalize(&mut query);

        let mut scored: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(position, row)| Neighbor {
                position,
                score: dot(row, &query),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        scored.truncate(k.min(self.len()));
        Ok(scored)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
