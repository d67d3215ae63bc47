//! Quantization step estimation

use crate::spectrum::{dominant_frequency, restricted_spectrum};
use crate::step::QuantizationStep;
use histo_core::{Dataset, Result, Sample, Verbosity, Warning};
use histo_histogram::{Binner, Histogram, HistogramBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One group of bins around a detected level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationLevel {
    /// Level number, `0` for the group around bin 0
    pub index: usize,
    /// Share of the histogram mass in this group
    pub fraction_percent: f64,
    /// Largest count in the group
    pub amplitude: u64,
    /// Count-weighted mean bin of the group
    pub mean_bin: f64,
    pub std_bins: f64,
}

/// Outcome of the periodicity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizationEstimate {
    /// Step in data units, `None` when no step was detected
    pub step: Option<f64>,
    /// Step in bins
    pub step_bins: Option<f64>,
    /// Frequency index of the spectral peak
    pub peak_frequency: Option<usize>,
    /// Group width in bins, `bins / peak_frequency`
    pub period_bins: Option<usize>,
    pub peak_power: f64,
    /// Non-empty groups in bin order
    pub levels: Vec<QuantizationLevel>,
    pub warnings: Vec<Warning>,
}

impl QuantizationEstimate {
    fn not_found(peak_frequency: Option<usize>, peak_power: f64, levels: Vec<QuantizationLevel>) -> Self {
        Self {
            step: None,
            step_bins: None,
            peak_frequency,
            period_bins: None,
            peak_power,
            levels,
            warnings: vec![Warning::NoQuantizationStepFound.emit()],
        }
    }

    /// The detected step, ready to rescale samples
    pub fn quantization_step(&self) -> Option<QuantizationStep> {
        self.step.and_then(|s| QuantizationStep::new(s).ok())
    }

    /// Gaussian outline of every level above the first, one curve per level
    /// evaluated on bins `0..bins`
    pub fn level_curves(&self, bins: usize) -> Vec<Vec<f64>> {
        self.levels
            .iter()
            .filter(|level| level.index > 0)
            .map(|level| {
                let var = level.std_bins * level.std_bins;
                (0..bins)
                    .map(|i| {
                        if var > 0.0 {
                            let d = level.mean_bin - i as f64;
                            level.amplitude as f64 * (-0.5 * d * d / var).exp()
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

/// Settings of the step search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationConfig {
    /// Histogram size used for continuous datasets
    pub continuous_bins: usize,
    /// Leading histogram samples entering the frequency search
    pub window: usize,
    pub verbosity: Verbosity,
}

impl Default for QuantizationConfig {
    fn default() -> Self {
        Self {
            continuous_bins: 1000,
            window: 100,
            verbosity: Verbosity::Silent,
        }
    }
}

/// Detects a regular step between the levels of a histogram
///
/// The dominant frequency of the leading histogram samples gives the level
/// spacing in bins. Bins are then grouped around the multiples of that
/// spacing; each well-populated group `j` contributes its mean bin divided
/// by `j` and the contributions are averaged.
///
/// # Example
///
/// ```rust
/// use histo_core::Dataset;
/// use histo_quantize::QuantizationEstimator;
///
/// let data: Vec<u16> = (0..2000).map(|i| (i % 20) as u16 * 5).collect();
/// let dataset = Dataset::from_samples(&data).unwrap();
/// let estimate = QuantizationEstimator::new().estimate_dataset(&dataset).unwrap();
/// assert_eq!(estimate.step, Some(5.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuantizationEstimator {
    config: QuantizationConfig,
}

impl QuantizationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QuantizationConfig) -> Self {
        Self { config }
    }

    /// Sets the bin count for continuous data (clamped into `[2, 100000]`).
    pub fn continuous_bins(mut self, bins: usize) -> Self {
        self.config.continuous_bins = bins.clamp(Binner::MIN_BINS, Binner::MAX_BINS);
        self
    }

    /// Sets the number of leading samples searched (at least 1).
    pub fn window(mut self, window: usize) -> Self {
        self.config.window = window.max(1);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &QuantizationConfig {
        &self.config
    }

    /// Bin the dataset and estimate its step.
    ///
    /// Integral data gets one bin per level (`max - min + 1` bins), other
    /// data the configured continuous bin count.
    pub fn estimate_dataset<T: Sample>(&self, dataset: &Dataset<'_, T>) -> Result<QuantizationEstimate> {
        let stats = dataset.stats();
        stats.validate()?;
        let bins = if dataset.kind().is_integral() {
            (stats.max - stats.min + 1.0) as usize
        } else {
            self.config.continuous_bins
        };
        let histogram = Binner::new(bins).build(dataset)?;
        self.estimate(&histogram)
    }

    /// Estimate the step of the first channel of a histogram
    #[instrument(skip(self, histogram), fields(bins = histogram.bins()))]
    pub fn estimate(&self, histogram: &Histogram) -> Result<QuantizationEstimate> {
        let counts = histogram.counts();
        let bins = counts.len();
        let verbosity = self.config.verbosity;

        let spectrum = restricted_spectrum(counts, self.config.window);
        let Some(peak) = dominant_frequency(&spectrum) else {
            return Ok(QuantizationEstimate::not_found(None, 0.0, Vec::new()));
        };
        let period = bins / peak.frequency;
        if verbosity.reports_results() {
            info!(period_bins = period, peak_power = peak.power, "spectral peak");
        }

        let groups = bins / period + 1;
        let mut mass = vec![0.0; groups];
        let mut first = vec![0.0; groups];
        let mut second = vec![0.0; groups];
        let mut amplitude = vec![0u64; groups];
        for (i, &c) in counts.iter().enumerate() {
            let j = (i + period / 2) / period;
            if j >= groups {
                break;
            }
            let h = c as f64;
            let x = i as f64;
            mass[j] += h;
            first[j] += h * x;
            second[j] += h * x * x;
            amplitude[j] = amplitude[j].max(c);
        }

        let total: f64 = mass.iter().sum();
        let threshold = histogram.sample_count() as f64 / 1e4;
        let mut levels = Vec::new();
        let mut sum = 0.0;
        let mut contributing = 0usize;
        for j in 0..groups {
            if mass[j] == 0.0 {
                continue;
            }
            let mean = first[j] / mass[j];
            let var = (second[j] / mass[j] - mean * mean).max(0.0);
            if j > 0 && amplitude[j] as f64 > threshold {
                sum += mean / j as f64;
                contributing += 1;
            }
            let level = QuantizationLevel {
                index: j,
                fraction_percent: 100.0 * mass[j] / total,
                amplitude: amplitude[j],
                mean_bin: mean,
                std_bins: var.sqrt(),
            };
            if verbosity.reports_debug() {
                debug!(
                    level = level.index,
                    percent = level.fraction_percent,
                    amplitude = level.amplitude,
                    mean_bin = level.mean_bin,
                    std_bins = level.std_bins,
                    "quantization level"
                );
            }
            levels.push(level);
        }

        if contributing == 0 {
            return Ok(QuantizationEstimate::not_found(Some(peak.frequency), peak.power, levels));
        }

        let step_bins = sum / contributing as f64;
        let step = step_bins / histogram.scale();
        if verbosity.reports_results() {
            info!(step, step_bins, levels = contributing, "quantization step");
        }

        Ok(QuantizationEstimate {
            step: Some(step),
            step_bins: Some(step_bins),
            peak_frequency: Some(peak.frequency),
            period_bins: Some(period),
            peak_power: peak.power,
            levels,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_too_few_bins() {
        let h = Histogram::from_counts(vec![4, 1, 4], 1.0, 0.0, 0.0, 2.0).unwrap();
        let estimate = QuantizationEstimator::new().estimate(&h).unwrap();
        assert_eq!(estimate.step, None);
        assert_eq!(estimate.warnings, vec![Warning::NoQuantizationStepFound]);
    }

    #[test]
    fn test_empty_histogram() {
        let h = Histogram::from_counts(vec![0; 50], 1.0, 0.0, 0.0, 49.0).unwrap();
        let estimate = QuantizationEstimator::new().estimate(&h).unwrap();
        assert!(estimate.step.is_none());
        assert!(estimate.quantization_step().is_none());
    }

    #[test]
    fn test_only_first_group_populated() {
        let mut counts = vec![0u64; 200];
        counts[0] = 100;
        let h = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 199.0).unwrap();
        let estimate = QuantizationEstimator::new().estimate(&h).unwrap();
        assert_eq!(estimate.step, None);
        assert_eq!(estimate.levels.len(), 1);
        assert_eq!(estimate.levels[0].index, 0);
    }

    #[test]
    fn test_exact_integer_levels() {
        // spikes every 4 bins, unit scale
        let counts: Vec<u64> = (0..80).map(|i| if i % 4 == 0 { 30 } else { 0 }).collect();
        let h = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 79.0).unwrap();
        let estimate = QuantizationEstimator::new().estimate(&h).unwrap();
        assert_eq!(estimate.period_bins, Some(4));
        assert_relative_eq!(estimate.step.unwrap(), 4.0);
        assert_eq!(estimate.levels.len(), 20);
        assert_relative_eq!(estimate.levels[3].mean_bin, 12.0);
        assert_relative_eq!(estimate.levels[3].fraction_percent, 5.0);
    }

    #[test]
    fn test_level_curves() {
        let estimate = QuantizationEstimate {
            step: Some(1.0),
            step_bins: Some(10.0),
            peak_frequency: Some(3),
            period_bins: Some(10),
            peak_power: 1.0,
            levels: vec![
                QuantizationLevel {
                    index: 0,
                    fraction_percent: 50.0,
                    amplitude: 8,
                    mean_bin: 0.0,
                    std_bins: 1.0,
                },
                QuantizationLevel {
                    index: 1,
                    fraction_percent: 50.0,
                    amplitude: 8,
                    mean_bin: 10.0,
                    std_bins: 2.0,
                },
            ],
            warnings: Vec::new(),
        };
        let curves = estimate.level_curves(30);
        assert_eq!(curves.len(), 1);
        assert_relative_eq!(curves[0][10], 8.0);
        assert_relative_eq!(curves[0][12], 8.0 * (-0.5f64).exp());
    }

    #[test]
    fn test_builder_clamps() {
        let e = QuantizationEstimator::new().continuous_bins(1).window(0);
        assert_eq!(e.config().continuous_bins, 2);
        assert_eq!(e.config().window, 1);
    }
}
