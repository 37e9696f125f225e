use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KMeansError {
    /// Malformed dataset, out-of-range `k`, or a zero iteration budget.
    ///
    /// Raised eagerly, before any centroid is drawn.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Shape or dimensionality mismatch
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Model used before calling `fit`
    #[error("model used before calling fit")]
    NotFitted,
}

impl KMeansError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KMeansError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = KMeansError::invalid_input("k must be positive");
        assert_eq!(err.to_string(), "invalid input: k must be positive");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = KMeansError::ShapeMismatch {
            expected: "2 features".into(),
            got: "3 features".into(),
        };
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected 2 features, got 3 features"
        );
    }
}
