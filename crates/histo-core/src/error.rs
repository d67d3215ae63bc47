//! Error types for histogram analysis
//!
//! Provides a unified error type for all histo-stats crates.

use thiserror::Error;

/// Core error type for histogram operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The data range has zero width, so no binning rule is defined
    #[error("Degenerate range: min ({min}) equals max ({max})")]
    DegenerateRange { min: f64, max: f64 },

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} bins, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a zero-width data range
    pub fn degenerate_range(min: f64, max: f64) -> Self {
        Self::DegenerateRange { min, max }
    }

    /// Create an error for a fit with too few usable bins
    pub fn too_few_bins(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

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

    /// Whether the error is one of the two conditions that end a call
    /// rather than a misuse of the API.
    pub fn is_data_condition(&self) -> bool {
        matches!(self, Self::DegenerateRange { .. } | Self::InsufficientData { .. })
    }
}
