pub mod k_means;

pub use k_means::{kmeans, Clustering, KMeans, DEFAULT_ITERATIONS};
