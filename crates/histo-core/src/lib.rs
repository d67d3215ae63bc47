//! Core types shared by the histo-stats crates
//!
//! This crate holds the input model and the error taxonomy:
//!
//! - [`Dataset`] and [`DatasetStats`]: samples plus caller-supplied min, max,
//!   mean and standard deviation, trusted by every component
//! - [`Sample`] and [`DataKind`]: element types and whether they are integral
//! - [`Error`] and [`Result`]: fatal conditions
//! - [`Warning`]: recoverable conditions attached to results
//! - [`Verbosity`]: per-call reporting level
//!
//! # Example
//!
//! ```rust
//! use histo_core::{Dataset, DataKind};
//!
//! let samples: Vec<u16> = vec![3, 7, 7, 12, 40];
//! let dataset = Dataset::from_samples(&samples).unwrap();
//! assert_eq!(dataset.kind(), DataKind::Integral);
//! assert_eq!(dataset.stats().max, 40.0);
//! ```

pub mod dataset;
pub mod error;
pub mod sample;
pub mod verbosity;
pub mod warning;

#[cfg(feature = "test-utils")]
pub mod test_data;

pub use dataset::{Dataset, DatasetStats};
pub use error::{Error, Result};
pub use sample::{DataKind, Sample};
pub use verbosity::Verbosity;
pub use warning::Warning;
