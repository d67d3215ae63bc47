//! Read-only dataset view
//!
//! The engine never rescans the samples for their range. The caller supplies
//! [`DatasetStats`] alongside the samples and every component trusts them.

use crate::error::{Error, Result};
use crate::sample::{DataKind, Sample};
use serde::{Deserialize, Serialize};

/// Externally supplied summary statistics of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
}

impl DatasetStats {
    pub fn new(min: f64, max: f64, mean: f64, std: f64) -> Self {
        Self { min, max, mean, std }
    }

    /// Compute the statistics with a single pass over the samples.
    ///
    /// This is a caller-side convenience; the engine itself never calls it.
    /// The standard deviation is the population one.
    pub fn from_samples<T: Sample>(samples: &[T]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("empty sample".to_string()));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for &s in samples {
            if !s.is_finite() {
                return Err(Error::InvalidInput(
                    "sample contains NaN or infinite values".to_string(),
                ));
            }
            let v = s.as_f64();
            min = min.min(v);
            max = max.max(v);
            sum += v;
            sum_sq += v * v;
        }

        let n = samples.len() as f64;
        let mean = sum / n;
        let variance = (sum_sq / n - mean * mean).max(0.0);

        Ok(Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
        })
    }

    /// Width of the value range
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check the statistics define a usable range.
    ///
    /// Non-finite values and `max < min` are input errors, a zero-width range
    /// is [`Error::DegenerateRange`].
    pub fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "non-finite range [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max < self.min {
            return Err(Error::InvalidInput(format!(
                "max ({}) below min ({})",
                self.max, self.min
            )));
        }
        if self.max == self.min {
            return Err(Error::degenerate_range(self.min, self.max));
        }
        Ok(())
    }

    /// Return a copy with the mean and standard deviation replaced
    pub fn with_moments(self, mean: f64, std: f64) -> Self {
        Self { mean, std, ..self }
    }
}

/// An ordered, possibly multi-channel sequence of samples with known statistics
///
/// Channels are interleaved: sample `i` belongs to channel `i % channels`.
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a, T: Sample> {
    samples: &'a [T],
    channels: usize,
    stats: DatasetStats,
    kind: DataKind,
}

impl<'a, T: Sample> Dataset<'a, T> {
    /// Single-channel dataset with the kind implied by the element type
    pub fn new(samples: &'a [T], stats: DatasetStats) -> Self {
        Self {
            samples,
            channels: 1,
            stats,
            kind: T::KIND,
        }
    }

    /// Dataset whose statistics are computed from the samples
    pub fn from_samples(samples: &'a [T]) -> Result<Self> {
        Ok(Self::new(samples, DatasetStats::from_samples(samples)?))
    }

    /// Set the number of interleaved channels (at least one)
    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels.max(1);
        self
    }

    /// Override the data kind, e.g. integer levels stored as floats
    pub fn with_kind(mut self, kind: DataKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn samples(&self) -> &'a [T] {
        self.samples
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples in one channel
    pub fn per_channel_count(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Iterate over the values of one channel
    pub fn channel_values(&self, channel: usize) -> impl Iterator<Item = f64> + 'a {
        let skip = if channel < self.channels {
            channel
        } else {
            self.samples.len()
        };
        self.samples
            .iter()
            .skip(skip)
            .step_by(self.channels)
            .map(|&s| s.as_f64())
    }
}
