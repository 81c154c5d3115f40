//! Dense vector search over precomputed document embeddings.

/// Distance metrics: euclidean, cosine and dot product.
pub mod distance;
/// Exact flat index with persisted row-major storage.
pub mod flat;

pub use distance::DistanceMetric;
pub use flat::FlatIndex;
