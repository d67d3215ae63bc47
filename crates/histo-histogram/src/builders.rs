//! Scale/offset binning rules

use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use histo_core::{DataKind, Dataset, DatasetStats, Error, Result, Sample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How values are mapped to bins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BinningRule {
    /// Follow the dataset's [`DataKind`]
    Auto,
    /// Integer levels never straddle bins: `scale = 1/ceil((max-min+1)/bins)`
    Integral,
    /// First and last bins centred on min and max: `scale = (bins-1)/(max-min)`
    Continuous,
    /// Bin `i` stands for the value `i/scale`, used for count data
    ZeroAnchored { scale: f64 },
}

/// Maps samples to a fixed number of bins
///
/// # Example
///
/// ```rust
/// use histo_core::Dataset;
/// use histo_histogram::{Binner, HistogramBuilder};
///
/// let samples: Vec<i32> = (0..1000).map(|i| i / 10).collect();
/// let dataset = Dataset::from_samples(&samples).unwrap();
/// let histogram = Binner::new(10).build(&dataset).unwrap();
/// assert!(histogram.counts().iter().all(|&c| c == 100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binner {
    bins: usize,
    rule: BinningRule,
}

impl Binner {
    pub const MIN_BINS: usize = 2;
    pub const MAX_BINS: usize = 100_000;

    /// Create a binner; the bin count is clamped into `[2, 100000]`
    pub fn new(bins: usize) -> Self {
        let clamped = bins.clamp(Self::MIN_BINS, Self::MAX_BINS);
        if clamped != bins {
            debug!(requested = bins, bins = clamped, "bin count clamped");
        }
        Self {
            bins: clamped,
            rule: BinningRule::Auto,
        }
    }

    /// Binner for count data where bin `i` stands for `i/scale`
    pub fn zero_anchored(bins: usize, scale: f64) -> Self {
        Self::new(bins).with_rule(BinningRule::ZeroAnchored { scale })
    }

    pub fn with_rule(mut self, rule: BinningRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn rule(&self) -> BinningRule {
        self.rule
    }

    /// Compute the scale and offset this binner would use
    pub fn scale_offset(&self, stats: &DatasetStats, kind: DataKind) -> Result<(f64, f64)> {
        let bins = self.bins as f64;
        let rule = match self.rule {
            BinningRule::Auto if kind.is_integral() => BinningRule::Integral,
            BinningRule::Auto => BinningRule::Continuous,
            other => other,
        };

        match rule {
            BinningRule::ZeroAnchored { scale } => {
                if !(scale.is_finite() && scale > 0.0) {
                    return Err(Error::InvalidParameter(format!(
                        "zero-anchored scale must be positive, got {scale}"
                    )));
                }
                Ok((scale, 0.5))
            }
            BinningRule::Integral => {
                stats.validate()?;
                let scale = 1.0 / ((stats.max - stats.min + 1.0) / bins).ceil();
                Ok((scale, -scale * stats.min))
            }
            _ => {
                stats.validate()?;
                let scale = (bins - 1.0) / (stats.max - stats.min);
                Ok((scale, 0.5 - scale * stats.min))
            }
        }
    }
}

impl<T: Sample> HistogramBuilder<T> for Binner {
    fn build(&self, dataset: &Dataset<'_, T>) -> Result<Histogram> {
        let stats = dataset.stats();
        let (scale, offset) = self.scale_offset(stats, dataset.kind())?;
        let bins = self.bins;
        let channels = dataset.channels();
        let upper = bins as f64;

        debug!(
            min = stats.min,
            max = stats.max,
            bins,
            scale,
            offset,
            "binning dataset"
        );

        let mut counts = vec![0u64; bins * channels];
        for (i, &sample) in dataset.samples().iter().enumerate() {
            let j = (scale * sample.as_f64() + offset).floor();
            // NaN fails both comparisons and is dropped
            if j >= 0.0 && j < upper {
                counts[(i % channels) * bins + j as usize] += 1;
            }
        }

        Ok(Histogram::new(
            counts,
            bins,
            channels,
            scale,
            offset,
            stats.min,
            stats.max,
            dataset.per_channel_count(),
            dataset.kind(),
        ))
    }

    fn target_bins(&self) -> Option<usize> {
        Some(self.bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bin_count_clamped() {
        assert_eq!(Binner::new(0).bins(), 2);
        assert_eq!(Binner::new(1).bins(), 2);
        assert_eq!(Binner::new(256).bins(), 256);
        assert_eq!(Binner::new(10_000_000).bins(), 100_000);
    }

    #[test]
    fn test_integral_rule() {
        let stats = DatasetStats::new(0.0, 255.0, 100.0, 30.0);
        let (scale, offset) = Binner::new(256)
            .scale_offset(&stats, DataKind::Integral)
            .unwrap();
        assert_relative_eq!(scale, 1.0);
        assert_relative_eq!(offset, 0.0);

        // 256 levels in 100 bins: three levels per bin
        let (scale, offset) = Binner::new(100)
            .scale_offset(&stats, DataKind::Integral)
            .unwrap();
        assert_relative_eq!(scale, 1.0 / 3.0);
        assert_relative_eq!(offset, 0.0);
    }

    #[test]
    fn test_continuous_rule() {
        let stats = DatasetStats::new(-1.0, 1.0, 0.0, 0.5);
        let (scale, offset) = Binner::new(21)
            .scale_offset(&stats, DataKind::Continuous)
            .unwrap();
        assert_relative_eq!(scale, 10.0);
        assert_relative_eq!(offset, 10.5);
    }

    #[test]
    fn test_degenerate_range() {
        let data = [4.0, 4.0, 4.0];
        let dataset = Dataset::from_samples(&data).unwrap();
        let err = Binner::new(10).build(&dataset).unwrap_err();
        assert_eq!(err, Error::degenerate_range(4.0, 4.0));
    }

    #[test]
    fn test_inverted_range() {
        let data = [1.0, 2.0];
        let dataset = Dataset::new(&data, DatasetStats::new(2.0, 1.0, 1.5, 0.5));
        assert!(matches!(
            Binner::new(10).build(&dataset),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_dropped() {
        // stats claim [0, 10], two samples lie outside
        let data = [-5.0, 0.0, 5.0, 10.0, 15.0];
        let dataset = Dataset::new(&data, DatasetStats::new(0.0, 10.0, 5.0, 3.0));
        let histogram = Binner::new(11).build(&dataset).unwrap();
        assert_eq!(histogram.counts().iter().sum::<u64>(), 3);
        assert_eq!(histogram.counts()[0], 1);
        assert_eq!(histogram.counts()[5], 1);
        assert_eq!(histogram.counts()[10], 1);
        assert_eq!(histogram.sample_count(), 5);
    }

    #[test]
    fn test_interleaved_channels() {
        let data: Vec<u8> = vec![0, 9, 1, 8, 2, 7];
        let dataset = Dataset::new(&data, DatasetStats::new(0.0, 9.0, 4.5, 3.0)).with_channels(2);
        let histogram = Binner::new(10).build(&dataset).unwrap();
        assert_eq!(histogram.channels(), 2);
        assert_eq!(histogram.channel(0).unwrap()[..3], [1, 1, 1]);
        assert_eq!(histogram.channel(1).unwrap()[7..], [1, 1, 1]);
        assert_eq!(histogram.sample_count(), 3);
    }

    #[test]
    fn test_zero_anchored() {
        let data = [0.0, 1.0, 1.0, 2.0, 7.0];
        let dataset = Dataset::from_samples(&data).unwrap();
        let histogram = Binner::zero_anchored(5, 1.0).build(&dataset).unwrap();
        assert_eq!(histogram.counts(), &[1, 2, 1, 0, 0]);
        assert!(Binner::zero_anchored(5, 0.0).build(&dataset).is_err());
    }
}
