use thiserror::Error;

/// Everything that can go wrong while building, running or persisting a network.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Malformed layer sizes, hyperparameters, or a persisted record with a bad shape.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A vector's length disagrees with the layer it is fed to or compared against.
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `back_propagate` was called without a forward pass for the current sample.
    #[error("backward pass requires a preceding forward pass on the same sample")]
    StalePassState,

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Fails with `DimensionMismatch` unless `actual == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NetworkError::DimensionMismatch { what, expected, actual })
    }
}
