//! Histogram-based characterization of sampled scalar data
//!
//! Everything here works on one binned representation of a dataset:
//!
//! - [`histogram`]: scale/offset binning, summaries and percentile tables
//! - [`threshold`]: Otsu threshold and K-way optimal partition
//! - [`quantize`]: recovery of a hidden quantization step
//! - [`mixture`]: Gaussian mixture and Poisson fits
//! - [`optim`]: the bounded simplex behind the fits
//!
//! # Example
//!
//! ```rust
//! use histo_stats::prelude::*;
//!
//! let data: Vec<f64> = (0..2000)
//!     .map(|i| if i % 2 == 0 { 10.0 + (i % 7) as f64 } else { 60.0 + (i % 5) as f64 })
//!     .collect();
//! let dataset = Dataset::from_samples(&data).unwrap();
//!
//! let otsu = ThresholdFinder::new().otsu_dataset(&dataset).unwrap();
//! assert!(otsu.threshold > 16.0 && otsu.threshold < 60.0);
//!
//! let table = percentiles(&dataset).unwrap();
//! assert_eq!(table.value(0), Some(10.0));
//! assert_eq!(table.value(100), Some(64.0));
//! ```

pub use histo_histogram as histogram;
pub use histo_mixture as mixture;
pub use histo_optim as optim;
pub use histo_quantize as quantize;
pub use histo_threshold as threshold;

pub use histo_core::{DataKind, Dataset, DatasetStats, Error, Result, Sample, Verbosity, Warning};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use histo_core::{DataKind, Dataset, DatasetStats, Error, Result, Sample, Verbosity, Warning};
    pub use histo_histogram::{
        percentiles, percentiles_for_channel, Binner, BinningRule, Histogram, HistogramBuilder,
        HistogramOps, PercentileTable,
    };
    pub use histo_mixture::{GaussianMixtureFitter, MixtureModel, PoissonFit, PoissonFitter};
    pub use histo_optim::{BoundedSimplex, Bounds, Minimizer};
    pub use histo_quantize::{QuantizationEstimate, QuantizationEstimator, QuantizationStep};
    pub use histo_threshold::{PartitionSearch, ThresholdFinder, ThresholdSet};
}
