//! Fit settings

use histo_core::Verbosity;
use serde::{Deserialize, Serialize};

/// Settings of the Gaussian mixture fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixtureConfig {
    /// Number of Gaussian components
    pub components: usize,
    /// Histogram size used by `fit_dataset`
    pub bins: usize,
    /// Smallest sigma in bin widths, at least [`MixtureConfig::MIN_SIGMA_BINS`]
    pub min_sigma_bins: f64,
    /// Fewest bins between the first and last populated bin
    pub min_fit_bins: usize,
    pub verbosity: Verbosity,
}

impl MixtureConfig {
    /// Floor of `min_sigma_bins`; keeps every sigma bound positive
    pub const MIN_SIGMA_BINS: f64 = 1.0;
}

impl Default for MixtureConfig {
    fn default() -> Self {
        Self {
            components: 1,
            bins: 100,
            min_sigma_bins: Self::MIN_SIGMA_BINS,
            min_fit_bins: 20,
            verbosity: Verbosity::Silent,
        }
    }
}

/// Settings of the Poisson fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoissonConfig {
    /// Upper limit on the zero-anchored histogram size
    pub max_bins: usize,
    pub verbosity: Verbosity,
}

impl PoissonConfig {
    pub const MIN_BINS: usize = 5;
    pub const MAX_BINS: usize = 150;
}

impl Default for PoissonConfig {
    fn default() -> Self {
        Self {
            max_bins: Self::MAX_BINS,
            verbosity: Verbosity::Silent,
        }
    }
}
