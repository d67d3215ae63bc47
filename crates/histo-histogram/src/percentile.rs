//! Percentile tables from the cumulative histogram

use crate::builders::Binner;
use crate::traits::HistogramBuilder;
use crate::types::Histogram;
use histo_core::{Dataset, Error, Result, Sample, Verbosity};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Bins used for percentile extraction
pub const PERCENTILE_BINS: usize = 10_000;

/// One row of a percentile table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileEntry {
    /// Fractional bin coordinate of the crossing
    pub bin: f64,
    /// Data value at the crossing
    pub value: f64,
}

/// Values at 0, 1, ..., 100 percent of the cumulative distribution
///
/// Entry 0 is the dataset minimum and entry 100 the maximum. Values are
/// non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileTable {
    entries: Vec<PercentileEntry>,
}

impl PercentileTable {
    /// Interpolate the table from one channel of a histogram.
    ///
    /// Percentile `p` crossed inside bin `i` maps to the bin coordinate
    /// `i + (p - F_i) / (F_{i+1} - F_i)`, where `F` is the cumulative share
    /// of the per-channel sample count. Percentiles never reached because
    /// samples were dropped take the maximum.
    pub fn from_histogram(histogram: &Histogram, channel: usize) -> Result<Self> {
        let counts = histogram.channel(channel).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "channel {channel} out of range for {} channels",
                histogram.channels()
            ))
        })?;
        let min = histogram.min();
        let max = histogram.max();
        let bins = histogram.bins() as f64;
        let to_percent = 100.0 / histogram.sample_count().max(1) as f64;

        let mut entries = vec![PercentileEntry { bin: bins, value: max }; 101];
        entries[0] = PercentileEntry { bin: 0.0, value: min };

        let mut next = 1usize;
        let mut below = 0u64;
        for (i, &count) in counts.iter().enumerate() {
            if next >= 100 {
                break;
            }
            let lower = below as f64 * to_percent;
            below += count;
            let upper = below as f64 * to_percent;
            while next < 100 && upper > next as f64 {
                let x = i as f64 + (next as f64 - lower) / (upper - lower);
                let value = histogram.bin_to_value(x).clamp(min, max);
                entries[next] = PercentileEntry { bin: x, value };
                next += 1;
            }
        }

        // Clamping can only pull values back to the range ends
        for p in 1..entries.len() {
            if entries[p].value < entries[p - 1].value {
                entries[p].value = entries[p - 1].value;
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PercentileEntry] {
        &self.entries
    }

    /// Value at an integer percentile, `None` above 100
    pub fn value(&self, percent: usize) -> Option<f64> {
        self.entries.get(percent).map(|e| e.value)
    }

    pub fn median(&self) -> f64 {
        self.entries[50].value
    }

    /// Distance between the 25th and 75th percentiles
    pub fn interquartile_range(&self) -> f64 {
        self.entries[75].value - self.entries[25].value
    }

    fn report(&self) {
        for (p, entry) in self.entries.iter().enumerate() {
            info!(percent = p, bin = entry.bin, value = entry.value, "percentile");
        }
    }
}

/// Percentile table of the first channel, from a 10000-bin histogram
pub fn percentiles<T: Sample>(dataset: &Dataset<'_, T>) -> Result<PercentileTable> {
    percentiles_for_channel(dataset, 0, Verbosity::Silent)
}

/// Percentile table of one channel
#[instrument(skip(dataset), fields(samples = dataset.len()))]
pub fn percentiles_for_channel<T: Sample>(
    dataset: &Dataset<'_, T>,
    channel: usize,
    verbosity: Verbosity,
) -> Result<PercentileTable> {
    let histogram = Binner::new(PERCENTILE_BINS).build(dataset)?;
    let table = PercentileTable::from_histogram(&histogram, channel)?;
    if verbosity.reports_results() {
        table.report();
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use histo_core::DatasetStats;

    #[test]
    fn test_uniform_counts() {
        // 100 bins with one sample each, integral rule over [0, 99]
        let h = Histogram::from_counts(vec![1; 100], 1.0, 0.0, 0.0, 99.0).unwrap();
        let table = PercentileTable::from_histogram(&h, 0).unwrap();
        assert_eq!(table.entries().len(), 101);
        assert_eq!(table.value(0), Some(0.0));
        assert_eq!(table.value(100), Some(99.0));
        // 10% is reached at the end of bin 9
        assert_relative_eq!(table.entries()[10].bin, 10.0);
        assert_relative_eq!(table.median(), 50.0);
        assert_eq!(table.value(101), None);
    }

    #[test]
    fn test_interpolation_within_bin() {
        let h = Histogram::from_counts(vec![0, 10, 0, 0], 1.0, 0.0, 0.0, 3.0).unwrap();
        let table = PercentileTable::from_histogram(&h, 0).unwrap();
        assert_relative_eq!(table.entries()[25].bin, 1.25);
        assert_relative_eq!(table.entries()[50].value, 1.5);
        assert_relative_eq!(table.interquartile_range(), 0.5);
    }

    #[test]
    fn test_dropped_samples_take_max() {
        let data = [0.0, 1.0, 2.0, 3.0, 50.0];
        let dataset = Dataset::new(&data, DatasetStats::new(0.0, 4.0, 1.5, 1.1));
        let table = percentiles(&dataset).unwrap();
        assert_eq!(table.value(99), Some(4.0));
        assert_eq!(table.value(100), Some(4.0));
    }

    #[test]
    fn test_bad_channel() {
        let h = Histogram::from_counts(vec![1, 1], 1.0, 0.0, 0.0, 1.0).unwrap();
        assert!(PercentileTable::from_histogram(&h, 1).is_err());
    }
}
