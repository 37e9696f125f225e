pub use lloyd_core::{bounds, dataset, distance, synthetic};
pub use lloyd_models::k_means;

// Re-export public API
pub use lloyd_core::{Assignments, BoundingBox, Float, KMeansError, Matrix, Result};
pub use lloyd_models::{kmeans, Clustering, KMeans, DEFAULT_ITERATIONS};
