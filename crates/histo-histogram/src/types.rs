//! Core types for histogram representation

use histo_core::{DataKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binned counts of one or more channels
///
/// A sample with value `v` lands in bin `floor(scale * v + offset)`. Channel
/// histograms are stored as contiguous blocks of `bins` counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    counts: Vec<u64>,
    bins: usize,
    channels: usize,
    scale: f64,
    offset: f64,
    /// Dataset minimum
    min: f64,
    /// Dataset maximum
    max: f64,
    /// Number of samples per channel, including dropped ones
    sample_count: usize,
    kind: DataKind,
}

impl Histogram {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        counts: Vec<u64>,
        bins: usize,
        channels: usize,
        scale: f64,
        offset: f64,
        min: f64,
        max: f64,
        sample_count: usize,
        kind: DataKind,
    ) -> Self {
        Self {
            counts,
            bins,
            channels,
            scale,
            offset,
            min,
            max,
            sample_count,
            kind,
        }
    }

    /// Wrap caller-supplied single-channel counts.
    ///
    /// The sample count is taken to be the total of the counts.
    pub fn from_counts(counts: Vec<u64>, scale: f64, offset: f64, min: f64, max: f64) -> Result<Self> {
        if counts.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "a histogram needs at least 2 bins, got {}",
                counts.len()
            )));
        }
        if !(scale.is_finite() && scale > 0.0 && offset.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "scale ({scale}) must be positive and offset ({offset}) finite"
            )));
        }
        let bins = counts.len();
        let sample_count = counts.iter().sum::<u64>() as usize;
        Ok(Self::new(
            counts,
            bins,
            1,
            scale,
            offset,
            min,
            max,
            sample_count,
            DataKind::Continuous,
        ))
    }

    /// Counts of the first channel
    pub fn counts(&self) -> &[u64] {
        &self.counts[..self.bins]
    }

    /// Counts of every channel, channel blocks in order
    pub fn all_counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts of one channel
    pub fn channel(&self, channel: usize) -> Option<&[u64]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.bins;
        Some(&self.counts[start..start + self.bins])
    }

    /// Extract one channel as a single-channel histogram
    pub fn channel_histogram(&self, channel: usize) -> Result<Histogram> {
        let counts = self.channel(channel).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "channel {channel} out of range for {} channels",
                self.channels
            ))
        })?;
        Ok(Self::new(
            counts.to_vec(),
            self.bins,
            1,
            self.scale,
            self.offset,
            self.min,
            self.max,
            self.sample_count,
            self.kind,
        ))
    }

    /// Number of bins per channel
    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Width of one bin in data units
    pub fn bin_width(&self) -> f64 {
        1.0 / self.scale
    }

    /// The data value bin `i` stands for: `min + i / scale`
    pub fn bin_level(&self, bin: f64) -> f64 {
        self.min + bin / self.scale
    }

    /// Invert the binning rule for a (possibly fractional) bin coordinate
    pub fn bin_to_value(&self, bin: f64) -> f64 {
        (bin - self.offset) / self.scale
    }

    /// Bin a value falls into, `None` when it would be dropped
    pub fn value_to_bin(&self, value: f64) -> Option<usize> {
        let j = (self.scale * value + self.offset).floor();
        if j >= 0.0 && j < self.bins as f64 {
            Some(j as usize)
        } else {
            None
        }
    }

    /// Levels of every bin
    pub fn levels(&self) -> Vec<f64> {
        (0..self.bins).map(|i| self.bin_level(i as f64)).collect()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Histogram: {} bins x {} channels, range [{:.3}, {:.3}], scale={:.6}, offset={:.6}",
            self.bins, self.channels, self.min, self.max, self.scale, self.offset
        )
    }
}
