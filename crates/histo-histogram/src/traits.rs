//! Core traits for histogram building

use crate::types::Histogram;
use histo_core::{Dataset, Result, Sample};

/// Trait for building histograms from a dataset
pub trait HistogramBuilder<T: Sample> {
    /// Build a histogram from the given dataset
    fn build(&self, dataset: &Dataset<'_, T>) -> Result<Histogram>;

    /// Get the target number of bins (if known)
    fn target_bins(&self) -> Option<usize> {
        None
    }
}
