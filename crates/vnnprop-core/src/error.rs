//! Error types for property generation

use thiserror::Error;

/// Errors that can occur while building or writing a robustness property.
///
/// Every variant except [`VnnError::Io`] is raised before the first byte
/// reaches the output sink.
#[derive(Debug, Error)]
pub enum VnnError {
    /// A dimension of the combined region is empty
    #[error("Invalid region: dimension {dim} has lower bound {lower} > upper bound {upper}")]
    InvalidRegion { dim: usize, lower: f64, upper: f64 },

    /// The true label does not name an output class
    #[error("Invalid label: {label} is outside [0, {num_classes})")]
    InvalidLabel { label: usize, num_classes: usize },

    /// The classifier has no output classes
    #[error("Invalid label: number of classes must be positive")]
    NoClasses,

    /// Perturbation budget is negative or not finite
    #[error("Invalid epsilon: {0} (must be finite and non-negative)")]
    InvalidEpsilon(f64),

    /// Prior table does not cover the sample dimensions
    #[error("Prior bounds cover {got} dimensions, sample has {expected}")]
    PriorDimensionMismatch { expected: usize, got: usize },

    /// Join or meet requested without a prior table
    #[error("Region mode '{0}' requires prior bounds")]
    MissingPrior(&'static str),

    /// Lower and upper tables of a batch export differ in length
    #[error("Bounds length mismatch: {lower} lower bounds, {upper} upper bounds")]
    BoundsLengthMismatch { lower: usize, upper: usize },

    /// Samples of a batch have different lengths
    #[error("Sample {index} has {got} dimensions, expected {expected}")]
    RaggedSamples {
        index: usize,
        expected: usize,
        got: usize,
    },

    /// No samples were given to a batch operation
    #[error("No samples given")]
    EmptyBatch,

    /// Sample value outside the global input range (strict mode only)
    #[error("Sample value {value} at dimension {dim} is outside [{lower}, {upper}]")]
    SampleOutOfRange {
        dim: usize,
        value: f64,
        lower: f64,
        upper: f64,
    },

    /// A sample value is NaN or infinite
    #[error("Sample value at dimension {dim} is not finite")]
    NonFiniteSample { dim: usize },

    /// A prior interval endpoint is NaN or infinite
    #[error("Prior bound at dimension {dim} is not finite")]
    NonFinitePrior { dim: usize },

    /// A computed bound is NaN or infinite
    #[error("Bound at dimension {dim} is not finite")]
    NonFiniteBound { dim: usize },

    /// Sink failure, propagated unchanged
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for property generation
pub type Result<T> = std::result::Result<T, VnnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_region_display() {
        let err = VnnError::InvalidRegion {
            dim: 3,
            lower: 0.5,
            upper: 0.2,
        };
        assert_eq!(
            err.to_string(),
            "Invalid region: dimension 3 has lower bound 0.5 > upper bound 0.2"
        );
    }

    #[test]
    fn test_invalid_label_display() {
        let err = VnnError::InvalidLabel {
            label: 10,
            num_classes: 10,
        };
        assert!(err.to_string().contains("10 is outside [0, 10)"));
        assert!(VnnError::NoClasses.to_string().contains("must be positive"));
    }

    #[test]
    fn test_io_error_is_wrapped_unchanged() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: VnnError = io.into();
        match &err {
            VnnError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("expected Io, got {other:?}"),
        }
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_prior_display() {
        assert_eq!(
            VnnError::MissingPrior("meet").to_string(),
            "Region mode 'meet' requires prior bounds"
        );
    }
}
