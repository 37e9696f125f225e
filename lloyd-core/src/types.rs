pub type Float = f64;

/// Dataset or centroid set: one point per row, one feature per column.
pub type Matrix = nalgebra::DMatrix<Float>;

/// Cluster index per point, each in `0..k`.
pub type Assignments = Vec<usize>;
