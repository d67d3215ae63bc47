//! Threshold finder configuration and entry points

use crate::otsu::{otsu_threshold, OtsuThreshold};
use crate::partition::{optimal_partition, PartitionSearch};
use histo_core::{Dataset, Result, Sample, Verbosity};
use histo_histogram::{Binner, Histogram, HistogramBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Thresholds separating `K` classes, in data units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Increasing threshold values, one fewer than the classes
    pub values: Vec<f64>,
    /// Last bin of each lower class
    pub bins: Vec<usize>,
    /// Maximized sum of `S^2 / P` over the classes
    pub objective: f64,
}

impl ThresholdSet {
    pub fn classes(&self) -> usize {
        self.values.len() + 1
    }

    /// Class index of a value
    pub fn classify(&self, value: f64) -> usize {
        self.values.iter().take_while(|&&t| value > t).count()
    }
}

/// Configuration of the threshold finder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Bins used when a dataset is binned by the finder
    pub bins: usize,
    pub search: PartitionSearch,
    pub verbosity: Verbosity,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            bins: 256,
            search: PartitionSearch::default(),
            verbosity: Verbosity::default(),
        }
    }
}

/// Otsu and K-way thresholds of a histogram
///
/// # Example
///
/// ```rust
/// use histo_core::Dataset;
/// use histo_threshold::ThresholdFinder;
///
/// let data: Vec<f64> = (0..100).map(|i| if i < 50 { 1.0 } else { 9.0 }).collect();
/// let dataset = Dataset::from_samples(&data).unwrap();
/// let otsu = ThresholdFinder::new().bins(64).otsu_dataset(&dataset).unwrap();
/// assert!(otsu.threshold > 1.0 && otsu.threshold < 9.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ThresholdFinder {
    config: ThresholdConfig,
}

impl ThresholdFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ThresholdConfig) -> Self {
        Self { config }
    }

    /// Sets the bin count (clamped into `[2, 100000]`).
    pub fn bins(mut self, bins: usize) -> Self {
        self.config.bins = bins.clamp(Binner::MIN_BINS, Binner::MAX_BINS);
        self
    }

    pub fn search(mut self, search: PartitionSearch) -> Self {
        self.config.search = search;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Binary threshold of the first channel
    #[instrument(skip(self, histogram), fields(bins = histogram.bins()))]
    pub fn otsu(&self, histogram: &Histogram) -> Result<OtsuThreshold> {
        let otsu = otsu_threshold(histogram)?;

        if self.config.verbosity.reports_debug() {
            for (i, v) in otsu.variance.iter().enumerate() {
                debug!(bin = i, count = histogram.counts()[i], variance = v, "otsu variance");
            }
        }
        if self.config.verbosity.reports_results() {
            info!(threshold = otsu.threshold, bin = otsu.bin, "otsu threshold");
        }
        Ok(otsu)
    }

    /// Bin the dataset with the configured bin count, then threshold it
    pub fn otsu_dataset<T: Sample>(&self, dataset: &Dataset<'_, T>) -> Result<OtsuThreshold> {
        let histogram = Binner::new(self.config.bins).build(dataset)?;
        self.otsu(&histogram)
    }

    /// Thresholds of the optimal partition into `classes` classes
    ///
    /// Each cut bin `t` converts to the value `(t - offset) / scale`.
    #[instrument(skip(self, histogram), fields(bins = histogram.bins()))]
    pub fn partition(&self, histogram: &Histogram, classes: usize) -> Result<ThresholdSet> {
        let partition = optimal_partition(histogram.counts(), classes, self.config.search)?;
        let values: Vec<f64> = partition
            .cuts
            .iter()
            .map(|&t| histogram.bin_to_value(t as f64))
            .collect();

        if self.config.verbosity.reports_results() {
            info!(objective = partition.objective, "best partition criterion");
            for (bin, value) in partition.cuts.iter().zip(&values) {
                info!(bin, threshold = value, "threshold");
            }
        }

        Ok(ThresholdSet {
            values,
            bins: partition.cuts,
            objective: partition.objective,
        })
    }

    /// Bin the dataset with the configured bin count, then partition it
    pub fn partition_dataset<T: Sample>(
        &self,
        dataset: &Dataset<'_, T>,
        classes: usize,
    ) -> Result<ThresholdSet> {
        let histogram = Binner::new(self.config.bins).build(dataset)?;
        self.partition(&histogram, classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_clamps() {
        let finder = ThresholdFinder::new().bins(1);
        assert_eq!(finder.config().bins, 2);
        let finder = ThresholdFinder::new()
            .bins(512)
            .search(PartitionSearch::Exhaustive)
            .verbosity(Verbosity::Debug);
        assert_eq!(finder.config().bins, 512);
        assert_eq!(finder.config().search, PartitionSearch::Exhaustive);
        assert_eq!(finder.config().verbosity, Verbosity::Debug);
    }

    #[test]
    fn test_classify() {
        let set = ThresholdSet {
            values: vec![10.0, 20.0],
            bins: vec![1, 2],
            objective: 0.0,
        };
        assert_eq!(set.classes(), 3);
        assert_eq!(set.classify(5.0), 0);
        assert_eq!(set.classify(10.0), 0);
        assert_eq!(set.classify(15.0), 1);
        assert_eq!(set.classify(25.0), 2);
    }

    #[test]
    fn test_partition_values() {
        let h = Histogram::from_counts(vec![5, 0, 0, 0, 5], 2.0, 1.0, 0.0, 2.0).unwrap();
        let set = ThresholdFinder::new().partition(&h, 2).unwrap();
        assert_eq!(set.bins, vec![3]);
        assert_eq!(set.values, vec![1.0]);
    }
}
