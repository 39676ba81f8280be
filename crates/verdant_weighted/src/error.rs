//! # Weighting Error Types
//!
//! Errors raised while building tables and amounts. Sampling never fails.

use thiserror::Error;

/// Errors that can occur while configuring weighted sampling.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum WeightError {
    /// A table entry was given a weight below zero.
    #[error("negative weight: {0}")]
    NegativeWeight(f64),

    /// A table entry was given a NaN or infinite weight.
    #[error("weight must be finite, got {0}")]
    NonFiniteWeight(f64),

    /// Adding a weight would push the table total past `f64::MAX`.
    #[error("total weight overflows: adding {0}")]
    TotalWeightOverflow(f64),

    /// A variable amount holds a NaN or infinite constant.
    #[error("amount must be finite, got {0}")]
    NonFiniteAmount(f64),

    /// An optional variance/addition chance lies outside `[0, 1]`.
    #[error("chance must be within [0, 1], got {0}")]
    ChanceOutOfRange(f64),
}

/// Result type for weighting operations.
pub type WeightResult<T> = Result<T, WeightError>;

/// Checks that a table weight is usable.
///
/// # Errors
///
/// Returns [`WeightError::NonFiniteWeight`] or [`WeightError::NegativeWeight`].
pub fn check_weight(weight: f64) -> WeightResult<f64> {
    if !weight.is_finite() {
        return Err(WeightError::NonFiniteWeight(weight));
    }
    if weight < 0.0 {
        return Err(WeightError::NegativeWeight(weight));
    }
    Ok(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_weight_is_accepted() {
        assert_eq!(check_weight(0.0), Ok(0.0));
    }

    #[test]
    fn test_rejects_bad_weights() {
        assert_eq!(check_weight(-1.5), Err(WeightError::NegativeWeight(-1.5)));
        assert!(matches!(
            check_weight(f64::NAN),
            Err(WeightError::NonFiniteWeight(_))
        ));
        assert!(matches!(
            check_weight(f64::INFINITY),
            Err(WeightError::NonFiniteWeight(_))
        ));
    }

    #[test]
    fn test_display() {
        let err = WeightError::ChanceOutOfRange(1.5);
        assert_eq!(err.to_string(), "chance must be within [0, 1], got 1.5");
    }
}
