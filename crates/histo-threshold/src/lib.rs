//! Histogram thresholds
//!
//! Two searches over the same binned representation:
//!
//! - **Otsu**: the single cut maximizing the inter-class variance
//!   `wB * wF * (mB - mF)^2`. Plateaus of equal maxima resolve to their
//!   midpoint.
//! - **K-way partition**: the `K - 1` cuts maximizing `sum S^2 / P` over the
//!   classes (Liao, Chen and Chung). [`PartitionSearch::Dynamic`] memoizes
//!   class prefixes, [`PartitionSearch::Exhaustive`] backtracks over every
//!   cut combination.
//!
//! # Example
//!
//! ```rust
//! use histo_core::Dataset;
//! use histo_threshold::{PartitionSearch, ThresholdFinder};
//!
//! let data: Vec<u8> = [10u8, 11, 12, 100, 101, 102, 200, 201, 202].repeat(20);
//! let dataset = Dataset::from_samples(&data).unwrap();
//!
//! let finder = ThresholdFinder::new().bins(64).search(PartitionSearch::Dynamic);
//! let set = finder.partition_dataset(&dataset, 3).unwrap();
//! assert_eq!(set.values.len(), 2);
//! assert!(set.values[0] > 12.0 && set.values[0] < 100.0);
//! assert!(set.values[1] > 102.0 && set.values[1] < 200.0);
//! ```

pub mod finder;
pub mod otsu;
pub mod partition;

pub use finder::{ThresholdConfig, ThresholdFinder, ThresholdSet};
pub use otsu::{otsu_bin, otsu_threshold, otsu_variance, OtsuCurve, OtsuThreshold};
pub use partition::{optimal_partition, Partition, PartitionSearch, SegmentTable, MAX_PARTITION_BINS};

pub use histo_core::Result;
