//! Error types for time-in-range estimation
//!
//! Provides a unified error type for all tir-stats crates.

use thiserror::Error;

/// Core error type for time-in-range operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// A subject carries no observations
    #[error("Subject '{0}' has no observations")]
    EmptySubject(String),

    /// No observation falls inside the estimation window
    #[error("No observations inside time window [{min_time}, {max_time}]")]
    EmptyWindow { min_time: f64, max_time: f64 },

    /// The (method, model) pair does not name an estimator
    #[error("Unrecognized configuration: method '{method}' with model '{model}'")]
    UnrecognizedConfiguration { method: String, model: String },

    /// The hazard model could not be fitted
    #[error("Hazard model failed to fit: {0}")]
    FitConvergence(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// The run was cancelled through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// A bootstrap replicate failed, invalidating the whole run
    #[error("Bootstrap replicate {replicate} failed: {source}")]
    ReplicateFailed {
        replicate: usize,
        #[source]
        source: Box<Error>,
    },

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InvalidInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }

    /// Whether this error came from the hazard model fit, directly or inside a replicate
    pub fn is_fit_failure(&self) -> bool {
        match self {
            Self::FitConvergence(_) => true,
            Self::ReplicateFailed { source, .. } => source.is_fit_failure(),
            _ => false,
        }
    }
}
