//! Distance metrics for dense vector search.
//!
//! All metrics return a distance where **lower is better** (more similar).

use serde::{Deserialize, Serialize};

/// Distance metric used for vector similarity computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Squared Euclidean distance (L2²). Range: \[0, ∞).
    #[default]
    Euclidean,
    /// Cosine distance: `1 - cosine_similarity`. Range: \[0, 2\].
    Cosine,
    /// Negative dot product: `-dot(a, b)`. Lower = higher similarity.
    DotProduct,
}

impl DistanceMetric {
    /// Exact f32-vs-f32 distance. Both slices must have the same length.
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
            DistanceMetric::Cosine => {
                let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
                for (x, y) in a.iter().zip(b) {
                    dot += x * y;
                    na += x * x;
                    nb += y * y;
                }
                let denom = (na * nb).sqrt();
                if denom == 0.0 {
                    1.0
                } else {
                    1.0 - dot / denom
                }
            }
            DistanceMetric::DotProduct => -a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>(),
        }
    }

    /// Parse a metric name as accepted on the command line.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Some(DistanceMetric::Euclidean),
            "cosine" => Some(DistanceMetric::Cosine),
            "dot" | "dot_product" | "ip" => Some(DistanceMetric::DotProduct),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean() {
        let d = DistanceMetric::Euclidean.distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]);
        assert!((d - 25.0).abs() < 1e-6, "squared euclidean should be 25, got {d}");
    }

    #[test]
    fn test_cosine_orthogonal_and_identical() {
        let d = DistanceMetric::Cosine.distance(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((d - 1.0).abs() < 1e-6);
        let d = DistanceMetric::Cosine.distance(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(DistanceMetric::Cosine.distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[test]
    fn test_dot_product() {
        let d = DistanceMetric::DotProduct.distance(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]);
        assert!((d + 32.0).abs() < 1e-6, "negative dot product should be -32, got {d}");
    }

    #[test]
    fn test_parse() {
        assert_eq!(DistanceMetric::parse("L2"), Some(DistanceMetric::Euclidean));
        assert_eq!(DistanceMetric::parse("ip"), Some(DistanceMetric::DotProduct));
        assert_eq!(DistanceMetric::parse("manhattan"), None);
    }
}
