use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Float, KMeansError, Matrix, Result};

/// Per-feature extent of a dataset.
///
/// Centroids are drawn from the box
///
/// ```text
/// [low_0, high_0) × [low_1, high_1) × … × [low_{d-1}, high_{d-1})
/// ```
///
/// with every coordinate sampled independently and uniformly. A feature where
/// `low == high` always yields `low`.
///
/// # Errors
///
/// - [`KMeansError::InvalidInput`] from [`of`](BoundingBox::of) if the
///   dataset is empty, or if some feature spans more than `Float::MAX`
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    low: Vec<Float>,
    high: Vec<Float>,
}

impl BoundingBox {
    /// Column-wise minimum and maximum of `x`.
    pub fn of(x: &Matrix) -> Result<Self> {
        let (n, d) = x.shape();
        if n == 0 || d == 0 {
            return Err(KMeansError::invalid_input("cannot bound an empty dataset"));
        }

        let mut low = vec![Float::INFINITY; d];
        let mut high = vec![Float::NEG_INFINITY; d];

        for i in 0..n {
            for j in 0..d {
                let v = x[(i, j)];
                if v < low[j] {
                    low[j] = v;
                }
                if v > high[j] {
                    high[j] = v;
                }
            }
        }

        for j in 0..d {
            if !(high[j] - low[j]).is_finite() {
                return Err(KMeansError::invalid_input(format!(
                    "feature {} has a non-finite extent [{}, {}]",
                    j, low[j], high[j]
                )));
            }
        }

        Ok(Self { low, high })
    }

    /// Number of features.
    pub fn dim(&self) -> usize {
        self.low.len()
    }

    pub fn low(&self) -> &[Float] {
        &self.low
    }

    pub fn high(&self) -> &[Float] {
        &self.high
    }

    /// Overwrites row `row` of `m` with a fresh uniform draw from the box.
    ///
    /// Coordinates are drawn in feature order, one `Float` per feature.
    pub fn sample_into<R: Rng + ?Sized>(&self, m: &mut Matrix, row: usize, rng: &mut R) {
        for j in 0..self.dim() {
            let u: Float = rng.random();
            m[(row, j)] = self.low[j] + (self.high[j] - self.low[j]) * u;
        }
    }

    /// Draws `k` independent points from the box, one per row.
    pub fn sample<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Matrix {
        let mut m = Matrix::zeros(k, self.dim());
        for c in 0..k {
            self.sample_into(&mut m, c, rng);
        }
        m
    }
}
