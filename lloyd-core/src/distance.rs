use crate::{Float, Matrix};

/// Squared Euclidean distance between row `i` of `x` and row `c` of `centroids`.
///
/// Both matrices must have the same number of columns.
pub fn squared_euclidean(x: &Matrix, i: usize, centroids: &Matrix, c: usize) -> Float {
    let mut d2 = 0.0;
    for j in 0..x.ncols() {
        let diff = x[(i, j)] - centroids[(c, j)];
        d2 += diff * diff;
    }
    d2
}

/// Euclidean distance between row `i` of `x` and row `c` of `centroids`.
pub fn euclidean(x: &Matrix, i: usize, centroids: &Matrix, c: usize) -> Float {
    squared_euclidean(x, i, centroids, c).sqrt()
}

/// Index of the centroid closest to row `i` of `x`, with its squared distance.
///
/// Ranking by squared distance gives the same argmin as Euclidean distance
/// without the `sqrt`. Only a strictly smaller distance replaces the current
/// best, so ties resolve to the lowest centroid index.
///
/// # Example
///
/// ```rust
/// use lloyd_core::{distance::nearest, Matrix};
///
/// let x = Matrix::from_row_slice(1, 1, &[1.0]);
/// let centroids = Matrix::from_row_slice(3, 1, &[3.0, -1.0, 5.0]);
///
/// // 3.0 and -1.0 are both 2.0 away, the lower index wins
/// assert_eq!(nearest(&x, 0, &centroids), (0, 4.0));
/// ```
pub fn nearest(x: &Matrix, i: usize, centroids: &Matrix) -> (usize, Float) {
    let mut best_cluster = 0;
    let mut min_dist2 = Float::INFINITY;

    for c in 0..centroids.nrows() {
        let d2 = squared_euclidean(x, i, centroids, c);
        if d2 < min_dist2 {
            min_dist2 = d2;
            best_cluster = c;
        }
    }

    (best_cluster, min_dist2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_euclidean() {
        let x = Matrix::from_row_slice(1, 2, &[0.0, 0.0]);
        let c = Matrix::from_row_slice(1, 2, &[3.0, 4.0]);
        assert_eq!(squared_euclidean(&x, 0, &c, 0), 25.0);
        assert_eq!(euclidean(&x, 0, &c, 0), 5.0);
    }

    #[test]
    fn test_nearest_picks_minimum() {
        let x = Matrix::from_row_slice(2, 2, &[0.0, 0.0, 9.0, 9.0]);
        let c = Matrix::from_row_slice(3, 2, &[10.0, 10.0, 1.0, 0.0, 5.0, 5.0]);
        assert_eq!(nearest(&x, 0, &c), (1, 1.0));
        assert_eq!(nearest(&x, 1, &c), (0, 2.0));
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_index() {
        let x = Matrix::from_row_slice(1, 2, &[0.0, 0.0]);
        let c = Matrix::from_row_slice(3, 2, &[2.0, 2.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(nearest(&x, 0, &c).0, 1);
    }

    #[test]
    fn test_nearest_identical_centroids() {
        let x = Matrix::from_row_slice(1, 1, &[4.0]);
        let c = Matrix::from_row_slice(3, 1, &[4.0, 4.0, 4.0]);
        assert_eq!(nearest(&x, 0, &c), (0, 0.0));
    }
}
