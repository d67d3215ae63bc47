//! Histogram construction for sampled scalar data
//!
//! Samples are mapped to bins with a scale/offset rule chosen by the data
//! kind. Integral data uses `scale = 1/ceil((max-min+1)/bins)` so integer
//! levels never straddle a bin boundary, continuous data uses
//! `scale = (bins-1)/(max-min)` with the first and last bins centred on the
//! range ends. Samples whose bin falls outside `[0, bins)` are dropped.
//!
//! # Examples
//!
//! ## Binning a dataset
//!
//! ```rust
//! use histo_core::Dataset;
//! use histo_histogram::{Binner, HistogramBuilder, HistogramOps};
//!
//! let data = vec![0.5, 1.0, 1.5, 2.0, 2.5, 3.0];
//! let dataset = Dataset::from_samples(&data).unwrap();
//! let histogram = Binner::new(6).build(&dataset).unwrap();
//!
//! assert_eq!(histogram.mass(), 6);
//! let summary = histogram.summary();
//! println!("entropy {:.3} bits", summary.entropy_bits);
//! ```
//!
//! ## Percentiles
//!
//! ```rust
//! use histo_core::Dataset;
//! use histo_histogram::percentiles;
//!
//! let data: Vec<f64> = (0..1000).map(|i| i as f64 / 10.0).collect();
//! let dataset = Dataset::from_samples(&data).unwrap();
//! let table = percentiles(&dataset).unwrap();
//!
//! assert_eq!(table.value(0), Some(0.0));
//! assert_eq!(table.value(100), Some(99.9));
//! ```

pub mod builders;
pub mod ops;
pub mod percentile;
pub mod traits;
pub mod types;

pub use builders::{Binner, BinningRule};
pub use ops::{HistogramOps, HistogramSummary};
pub use percentile::{percentiles, percentiles_for_channel, PercentileEntry, PercentileTable, PERCENTILE_BINS};
pub use traits::HistogramBuilder;
pub use types::Histogram;

pub use histo_core::Result;
