use serde::Serialize;
use tracing::debug;

use crate::error::{RagError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Hit {
    pub index: usize,
    pub distance: f32,
}

/// Exhaustive L2 index. Vectors are stored row-major in one buffer; row `i`
/// belongs to chunk `i`. Built in one batch and never appended to.
#[derive(Clone, Debug, Default)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn build(vectors: &[Vec<f32>]) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Ok(Self::default());
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(RagError::Embedding("vectors have zero dimension".to_string()));
        }

        let mut data = Vec::with_capacity(dimension * vectors.len());
        for vector in vectors {
            if vector.len() != dimension {
                return Err(RagError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            ensure_finite(vector)?;
            data.extend_from_slice(vector);
        }

        debug!(vectors = vectors.len(), dimension, "built flat index");
        Ok(Self { dimension, data })
    }

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

    /// Returns up to `k` hits, nearest first. Ties keep insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>> {
        if self.is_empty() {
            return Err(RagError::EmptyIndex);
        }
        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        ensure_finite(query)?;

        let mut hits: Vec<Hit> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(index, row)| Hit {
                index,
                distance: squared_l2(row, query),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);
        for hit in &mut hits {
            hit.distance = hit.distance.sqrt();
        }
        Ok(hits)
    }
}

fn ensure_finite(vector: &[f32]) -> Result<()> {
    if vector.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(RagError::Embedding("vector contains a non-finite value".to_string()))
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
