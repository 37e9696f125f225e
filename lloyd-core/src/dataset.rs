use crate::{Float, KMeansError, Matrix, Result};

/// Builds a dataset matrix from a slice of points.
///
/// Every row becomes one point, so `rows[i][j]` lands at `(i, j)`.
///
/// # Errors
///
/// - [`KMeansError::InvalidInput`] if `rows` is empty, the first row has no
///   features, or the rows do not all share the same length
///
/// # Example
///
/// ```rust
/// use lloyd_core::dataset::matrix_from_rows;
///
/// let x = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(x.shape(), (2, 2));
/// assert_eq!(x[(1, 0)], 3.0);
///
/// assert!(matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
/// ```
pub fn matrix_from_rows(rows: &[Vec<Float>]) -> Result<Matrix> {
    let n = rows.len();
    if n == 0 {
        return Err(KMeansError::invalid_input("dataset has no points"));
    }

    let d = rows[0].len();
    if d == 0 {
        return Err(KMeansError::invalid_input(
            "dataset points have no features",
        ));
    }

    let ragged = rows.iter().enumerate().find(|(_, row)| row.len() != d);
    if let Some((i, row)) = ragged {
        let width = row.len();
        return Err(KMeansError::invalid_input(format!(
            "dataset is ragged: row {i} has {width} features, expected {d}"
        )));
    }

    Ok(Matrix::from_fn(n, d, |i, j| rows[i][j]))
}

/// Checks that `x` is a usable `(n, d)` dataset.
///
/// # Errors
///
/// - [`KMeansError::InvalidInput`] if `x` has zero rows or zero columns, or
///   holds a `NaN` or infinite value
pub fn validate(x: &Matrix) -> Result<()> {
    let (n, d) = x.shape();

    if n == 0 {
        return Err(KMeansError::invalid_input("dataset has no points"));
    }

    if d == 0 {
        return Err(KMeansError::invalid_input(
            "dataset points have no features",
        ));
    }

    for i in 0..n {
        for j in 0..d {
            let v = x[(i, j)];
            if !v.is_finite() {
                return Err(KMeansError::invalid_input(format!(
                    "non-finite value {v} at ({i}, {j})"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_from_rows_layout() {
        let x = matrix_from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), 3);
        assert_eq!(x[(0, 2)], 3.0);
        assert_eq!(x[(1, 0)], 4.0);
    }

    #[test]
    fn test_matrix_from_rows_empty() {
        let result = matrix_from_rows(&[]);
        assert!(matches!(result, Err(KMeansError::InvalidInput { .. })));
    }

    #[test]
    fn test_matrix_from_rows_zero_width() {
        let result = matrix_from_rows(&[vec![], vec![]]);
        assert!(matches!(result, Err(KMeansError::InvalidInput { .. })));
    }

    #[test]
    fn test_matrix_from_rows_ragged() {
        let result = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]]);
        match result {
            Err(KMeansError::InvalidInput { reason }) => assert!(reason.contains("row 2")),
            other => panic!("expected ragged dataset error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_ok() {
        let x = Matrix::from_row_slice(2, 2, &[0.0, 1.0, -3.5, 2.0]);
        assert!(validate(&x).is_ok());
    }

    #[test]
    fn test_validate_empty() {
        assert!(validate(&Matrix::zeros(0, 3)).is_err());
        assert!(validate(&Matrix::zeros(3, 0)).is_err());
    }

    #[test]
    fn test_validate_non_finite() {
        let nan = Matrix::from_row_slice(2, 2, &[0.0, Float::NAN, 1.0, 2.0]);
        assert!(matches!(
            validate(&nan),
            Err(KMeansError::InvalidInput { .. })
        ));

        let inf = Matrix::from_row_slice(1, 2, &[Float::INFINITY, 0.0]);
        assert!(matches!(
            validate(&inf),
            Err(KMeansError::InvalidInput { .. })
        ));
    }
}
