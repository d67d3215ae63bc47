//! Rescaling samples to integer counts with a known step

use histo_core::{DatasetStats, Error, Result, Sample};
use serde::{Deserialize, Serialize};

/// A detected quantization step in data units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationStep {
    step: f64,
}

/// Samples divided by the step and rounded to the nearest count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountRescale {
    pub counts: Vec<i64>,
    pub stats: DatasetStats,
    /// Variance over mean of the counts, near 1 for Poisson data
    pub dispersion: Option<f64>,
}

impl QuantizationStep {
    pub fn new(step: f64) -> Result<Self> {
        if !(step.is_finite() && step > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "quantization step must be positive and finite, got {step}"
            )));
        }
        Ok(Self { step })
    }

    pub fn value(&self) -> f64 {
        self.step
    }

    /// Convert every sample to `floor(value / step + 0.5)`.
    ///
    /// The input is left untouched; the counts and their statistics are
    /// returned as new values.
    pub fn apply<T: Sample>(&self, samples: &[T]) -> Result<CountRescale> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("no samples to rescale".to_string()));
        }
        let counts: Vec<i64> = samples
            .iter()
            .map(|&s| (s.as_f64() / self.step + 0.5).floor() as i64)
            .collect();
        let stats = DatasetStats::from_samples(&counts)?;
        let dispersion = if stats.mean != 0.0 {
            Some(stats.std * stats.std / stats.mean)
        } else {
            None
        };
        Ok(CountRescale {
            counts,
            stats,
            dispersion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_bad_step() {
        assert!(QuantizationStep::new(0.0).is_err());
        assert!(QuantizationStep::new(-2.0).is_err());
        assert!(QuantizationStep::new(f64::NAN).is_err());
        assert_eq!(QuantizationStep::new(2.5).unwrap().value(), 2.5);
    }

    #[test]
    fn test_apply_rounds() {
        let step = QuantizationStep::new(5.0).unwrap();
        let samples = [0.1, 4.9, 10.2, 14.7, 2.4];
        let rescaled = step.apply(&samples).unwrap();
        assert_eq!(rescaled.counts, vec![0, 1, 2, 3, 0]);
        assert_eq!(rescaled.stats.min, 0.0);
        assert_eq!(rescaled.stats.max, 3.0);
        // input untouched
        assert_eq!(samples[1], 4.9);
    }

    #[test]
    fn test_dispersion() {
        let step = QuantizationStep::new(1.0).unwrap();
        let rescaled = step.apply(&[1u16, 3, 1, 3]).unwrap();
        assert_relative_eq!(rescaled.stats.mean, 2.0);
        assert_relative_eq!(rescaled.dispersion.unwrap(), 0.5);

        let zeros = step.apply(&[0.0f32, 0.2]).unwrap();
        assert_eq!(zeros.dispersion, None);
    }
}
