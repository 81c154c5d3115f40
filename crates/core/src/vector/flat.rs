//! Exact (brute-force) nearest neighbor index.
//!
//! Vectors are stored contiguously in row-major order; position `i` occupies
//! `vectors[i * dimension..(i + 1) * dimension]` and lines up with the
//! metadata sidecar written next to the index.

use crate::config;
use crate::persistence;
use crate::ranking::top_k;
use crate::vector::distance::DistanceMetric;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

/// Flat index over fixed-dimension embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    metric: DistanceMetric,
    vectors: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize, metric: DistanceMetric) -> Self {
        Self {
            dimension,
            metric,
            vectors: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.vectors.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a vector; returns its position.
    pub fn add(&mut self, vector: &[f32]) -> Result<u32, String> {
        self.check_query(vector)?;
        let position = self.len() as u32;
        self.vectors.extend_from_slice(vector);
        Ok(position)
    }

    /// The `k` nearest positions to `query` as `(position, distance)`, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u32, f32)>, String> {
        self.check_query(query)?;
        let candidates = self
            .vectors
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(i, v)| (i as u32, -self.metric.distance(query, v)));
        Ok(top_k(candidates, k)
            .into_iter()
            .map(|(i, neg)| (i, -neg))
            .collect())
    }

    fn check_query(&self, vector: &[f32]) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("index has zero dimension".into());
        }
        if vector.len() != self.dimension {
            return Err(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                vector.len()
            ));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err("embedding contains NaN or Inf".into());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 || self.dimension > config::MAX_DIMENSION {
            return Err(format!(
                "dimension {} outside 1-{}",
                self.dimension,
                config::MAX_DIMENSION
            ));
        }
        if self.vectors.len() % self.dimension != 0 {
            return Err(format!(
                "vector storage of {} floats is not a multiple of dimension {}",
                self.vectors.len(),
                self.dimension
            ));
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        persistence::save_artifact(self, path)
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let index: Self = persistence::load_artifact(path)?;
        index.validate().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("dense index validation failed: {}", e),
            )
        })?;
        tracing::info!(
            "Loaded dense index ({} vectors, dimension {}, {:?})",
            index.len(),
            index.dimension,
            index.metric
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> FlatIndex {
        let mut idx = FlatIndex::new(2, DistanceMetric::Euclidean);
        for v in [[0.0f32, 0.0], [1.0, 0.0], [5.0, 5.0], [0.0, 2.0]] {
            idx.add(&v).unwrap();
        }
        idx
    }

    #[test]
    fn test_nearest_first() {
        let idx = build();
        let results = idx.search(&[0.9, 0.1], 3).unwrap();
        let ids: Vec<u32> = results.iter().map(|&(i, _)| i).collect();
        assert_eq!(ids, vec![1, 0, 3]);
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!((results[0].1 - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_k_larger_than_index() {
        let idx = build();
        assert_eq!(idx.search(&[0.0, 0.0], 100).unwrap().len(), 4);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut idx = build();
        assert!(idx.search(&[1.0, 2.0, 3.0], 1).is_err());
        assert!(idx.add(&[1.0]).is_err());
        assert!(idx.search(&[f32::NAN, 0.0], 1).is_err());
    }

    #[test]
    fn test_cosine_metric() {
        let mut idx = FlatIndex::new(2, DistanceMetric::Cosine);
        idx.add(&[1.0, 0.0]).unwrap();
        idx.add(&[0.0, 1.0]).unwrap();
        let results = idx.search(&[0.0, 3.0], 1).unwrap();
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dense_index.bin");
        let idx = build();
        idx.save(&path).unwrap();
        let loaded = FlatIndex::load(&path).unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.dimension(), 2);
        assert_eq!(loaded.search(&[5.0, 4.0], 1).unwrap()[0].0, 2);
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let idx = FlatIndex::new(0, DistanceMetric::Euclidean);
        assert!(idx.validate().is_err());
    }
}
