//! Operations on histograms

use crate::types::Histogram;
use serde::{Deserialize, Serialize};

/// Descriptive table of a single-channel histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSummary {
    /// Sum of the counts
    pub mass: u64,
    /// Share of the samples that landed in a bin, in percent
    pub coverage_percent: f64,
    /// Shannon entropy of the bin occupancy in bits
    pub entropy_bits: f64,
    /// `log2(bins) - entropy`
    pub information_rate: f64,
    /// Count at or above each bin
    pub cumulative_from_top: Vec<u64>,
    /// Entropy contribution of each bin in bits
    pub bin_information: Vec<f64>,
}

/// Operations that can be performed on histograms
///
/// Unless stated otherwise the operations read the first channel.
pub trait HistogramOps {
    /// Sum of the counts
    fn mass(&self) -> u64;

    /// Largest count and the first bin holding it
    fn peak(&self) -> (usize, u64);

    /// Count-weighted mean bin index
    fn mean_bin(&self) -> f64;

    /// Count-weighted standard deviation in bins
    fn std_bins(&self) -> f64;

    /// First and last non-empty bins
    fn occupied_span(&self) -> Option<(usize, usize)>;

    /// Running sum from the top bin down
    fn cumulative_from_top(&self) -> Vec<u64>;

    /// Counts divided by the sample count
    fn normalized(&self) -> Vec<f64>;

    /// Mass, coverage, entropy and information rate
    fn summary(&self) -> HistogramSummary;
}

impl HistogramOps for Histogram {
    fn mass(&self) -> u64 {
        self.counts().iter().sum()
    }

    fn peak(&self) -> (usize, u64) {
        self.counts()
            .iter()
            .enumerate()
            .fold((0, 0), |(bi, bc), (i, &c)| if c > bc { (i, c) } else { (bi, bc) })
    }

    fn mean_bin(&self) -> f64 {
        let mass = self.mass();
        if mass == 0 {
            return 0.0;
        }
        let moment: f64 = self
            .counts()
            .iter()
            .enumerate()
            .map(|(i, &c)| i as f64 * c as f64)
            .sum();
        moment / mass as f64
    }

    fn std_bins(&self) -> f64 {
        let mass = self.mass();
        if mass == 0 {
            return 0.0;
        }
        let mean = self.mean_bin();
        let var: f64 = self
            .counts()
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let d = i as f64 - mean;
                d * d * c as f64
            })
            .sum();
        (var / mass as f64).sqrt()
    }

    fn occupied_span(&self) -> Option<(usize, usize)> {
        let counts = self.counts();
        let first = counts.iter().position(|&c| c > 0)?;
        let last = counts.iter().rposition(|&c| c > 0)?;
        Some((first, last))
    }

    fn cumulative_from_top(&self) -> Vec<u64> {
        let mut sums = self.counts().to_vec();
        for i in (1..sums.len()).rev() {
            sums[i - 1] += sums[i];
        }
        sums
    }

    fn normalized(&self) -> Vec<f64> {
        let n = self.sample_count().max(1) as f64;
        self.counts().iter().map(|&c| c as f64 / n).collect()
    }

    fn summary(&self) -> HistogramSummary {
        let cumulative_from_top = self.cumulative_from_top();
        let mass = cumulative_from_top.first().copied().unwrap_or(0);
        let coverage_percent = if self.sample_count() > 0 {
            mass as f64 * 100.0 / self.sample_count() as f64
        } else {
            0.0
        };

        let bin_information: Vec<f64> = self
            .counts()
            .iter()
            .map(|&c| {
                if c == 0 || mass == 0 {
                    0.0
                } else {
                    let p = c as f64 / mass as f64;
                    -p * p.log2()
                }
            })
            .collect();
        let entropy_bits: f64 = bin_information.iter().sum();

        HistogramSummary {
            mass,
            coverage_percent,
            entropy_bits,
            information_rate: (self.bins() as f64).log2() - entropy_bits,
            cumulative_from_top,
            bin_information,
        }
    }
}
