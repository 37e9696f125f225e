use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::dataset::matrix_from_rows;
use crate::{Float, KMeansError, Matrix, Result};

/// Isotropic Gaussian blobs with their ground-truth blob index.
#[derive(Debug, Clone, PartialEq)]
pub struct Blobs {
    /// Sampled points of shape `(centers * per_blob, d)`.
    pub points: Matrix,
    /// `labels[i]` is the index of the center row `i` was drawn around.
    pub labels: Vec<usize>,
}

/// Samples `per_blob` points around each center with standard deviation
/// `std_dev` on every feature, independently.
///
/// Points are generated blob by blob. With `shuffle` set the rows (and their
/// labels) are then permuted together.
///
/// # Errors
///
/// - [`KMeansError::InvalidInput`] if `centers` is empty or ragged,
///   `per_blob == 0`, or `std_dev` is negative or not finite
pub fn gaussian_blobs<R: Rng + ?Sized>(
    centers: &[Vec<Float>],
    std_dev: Float,
    per_blob: usize,
    shuffle: bool,
    rng: &mut R,
) -> Result<Blobs> {
    let means = matrix_from_rows(centers)?;

    if per_blob == 0 {
        return Err(KMeansError::invalid_input("per_blob must be positive"));
    }

    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(KMeansError::invalid_input(format!(
            "std_dev must be finite and non-negative, got {}",
            std_dev
        )));
    }

    let (n_blobs, d) = means.shape();
    let mut rows: Vec<(Vec<Float>, usize)> = Vec::with_capacity(n_blobs * per_blob);

    for b in 0..n_blobs {
        let normals = (0..d)
            .map(|j| Normal::new(means[(b, j)], std_dev))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| KMeansError::invalid_input(format!("std_dev {}: {}", std_dev, e)))?;

        for _ in 0..per_blob {
            let point = normals.iter().map(|normal| normal.sample(rng)).collect();
            rows.push((point, b));
        }
    }

    if shuffle {
        rows.shuffle(rng);
    }

    let labels = rows.iter().map(|(_, b)| *b).collect();
    let points = Matrix::from_fn(rows.len(), d, |i, j| rows[i].0[j]);

    Ok(Blobs { points, labels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn centers() -> Vec<Vec<Float>> {
        vec![vec![0.0, 0.0], vec![50.0, 50.0]]
    }

    #[test]
    fn test_blobs_shape_and_labels() {
        let mut rng = StdRng::seed_from_u64(11);
        let blobs = gaussian_blobs(&centers(), 1.0, 20, false, &mut rng).unwrap();

        assert_eq!(blobs.points.shape(), (40, 2));
        assert_eq!(blobs.labels.len(), 40);
        assert!(blobs.labels[..20].iter().all(|&b| b == 0));
        assert!(blobs.labels[20..].iter().all(|&b| b == 1));
    }

    #[test]
    fn test_blobs_shuffle_keeps_labels_aligned() {
        let mut rng = StdRng::seed_from_u64(5);
        let blobs = gaussian_blobs(&centers(), 0.5, 30, true, &mut rng).unwrap();

        for (i, &b) in blobs.labels.iter().enumerate() {
            let target = if b == 0 { 0.0 } else { 50.0 };
            assert!((blobs.points[(i, 0)] - target).abs() < 10.0);
            assert!((blobs.points[(i, 1)] - target).abs() < 10.0);
        }
        assert_eq!(blobs.labels.iter().filter(|&&b| b == 0).count(), 30);
    }

    #[test]
    fn test_blobs_zero_spread() {
        let mut rng = StdRng::seed_from_u64(1);
        let blobs = gaussian_blobs(&[vec![3.0, -3.0]], 0.0, 4, false, &mut rng).unwrap();
        for i in 0..4 {
            assert_eq!(blobs.points[(i, 0)], 3.0);
            assert_eq!(blobs.points[(i, 1)], -3.0);
        }
    }

    #[test]
    fn test_blobs_invalid_arguments() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(gaussian_blobs(&[], 1.0, 4, false, &mut rng).is_err());
        assert!(gaussian_blobs(&centers(), 1.0, 0, false, &mut rng).is_err());
        assert!(gaussian_blobs(&centers(), -1.0, 4, false, &mut rng).is_err());
        assert!(gaussian_blobs(&centers(), Float::NAN, 4, false, &mut rng).is_err());
    }
}
