//! Gaussian mixture fit

use crate::config::MixtureConfig;
use crate::seeding::seed_positions;
use histo_core::{Dataset, DatasetStats, Error, Result, Sample, Verbosity, Warning};
use histo_histogram::{Binner, Histogram, HistogramBuilder, HistogramOps};
use histo_optim::{BoundedSimplex, Bounds, MinimizeOutcome, Minimizer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianComponent {
    /// Peak height in counts per bin
    pub amplitude: f64,
    pub mean: f64,
    pub sigma: f64,
}

impl GaussianComponent {
    pub fn evaluate(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sigma;
        self.amplitude * (-0.5 * z * z).exp()
    }
}

/// Fitted Gaussian components of a histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureModel {
    pub components: Vec<GaussianComponent>,
    /// RMS deviation scaled by `bins / mass`, comparable across bin counts
    pub residual: f64,
    pub bins: usize,
    /// Histogram mass the model was fitted to
    pub mass: f64,
    pub outcome: MinimizeOutcome,
    pub warnings: Vec<Warning>,
}

impl MixtureModel {
    /// Sum of all components at `x`
    pub fn evaluate(&self, x: f64) -> f64 {
        self.components.iter().map(|c| c.evaluate(x)).sum()
    }

    /// Each component evaluated at the bin levels of `histogram`
    pub fn component_curves(&self, histogram: &Histogram) -> Vec<Vec<f64>> {
        self.components
            .iter()
            .map(|c| {
                (0..histogram.bins())
                    .map(|i| c.evaluate(histogram.bin_level(i as f64)))
                    .collect()
            })
            .collect()
    }

    /// Amplitudes scaled by `bins / mass`, independent of the sampling
    pub fn relative_amplitudes(&self) -> Vec<f64> {
        if self.mass <= 0.0 {
            return vec![0.0; self.components.len()];
        }
        let factor = self.bins as f64 / self.mass;
        self.components.iter().map(|c| c.amplitude * factor).collect()
    }

    /// Statistics with the mean and sigma of the first component
    pub fn adopted_stats(&self, stats: &DatasetStats) -> DatasetStats {
        match self.components.first() {
            Some(c) => stats.with_moments(c.mean, c.sigma),
            None => *stats,
        }
    }
}

/// Fits a sum of Gaussians to a histogram
///
/// Seeds come from the histogram gradient (see [`seed_positions`]). Each
/// component's position is confined between the midpoints to its
/// neighbouring seeds, so components keep their order.
///
/// # Example
///
/// ```rust
/// use histo_core::Dataset;
/// use histo_mixture::GaussianMixtureFitter;
///
/// // triangular bump centred near 49.8
/// let data: Vec<f64> = (0..4000)
///     .map(|i| 40.0 + (i % 100) as f64 * 0.1 + (i / 100) as f64 * 0.25)
///     .collect();
/// let dataset = Dataset::from_samples(&data).unwrap();
/// let model = GaussianMixtureFitter::new(1).bins(60).fit_dataset(&dataset).unwrap();
/// assert!((model.components[0].mean - 50.0).abs() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GaussianMixtureFitter<M = BoundedSimplex> {
    config: MixtureConfig,
    minimizer: M,
}

impl Default for GaussianMixtureFitter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GaussianMixtureFitter {
    /// Fitter for `components` Gaussians (at least one)
    pub fn new(components: usize) -> Self {
        Self {
            config: MixtureConfig {
                components: components.max(1),
                ..MixtureConfig::default()
            },
            minimizer: BoundedSimplex::new(),
        }
    }
}

impl<M> GaussianMixtureFitter<M> {
    pub fn with_config(mut self, config: MixtureConfig) -> Self {
        self.config = config;
        self.config.components = config.components.max(1);
        self.config.min_fit_bins = config.min_fit_bins.max(1);
        self.min_sigma_bins(config.min_sigma_bins)
    }

    /// Replace the minimizer used for the fit
    pub fn with_minimizer<N>(self, minimizer: N) -> GaussianMixtureFitter<N> {
        GaussianMixtureFitter {
            config: self.config,
            minimizer,
        }
    }

    pub fn components(mut self, components: usize) -> Self {
        self.config.components = components.max(1);
        self
    }

    /// Sets the bin count used by `fit_dataset` (clamped into `[2, 100000]`).
    pub fn bins(mut self, bins: usize) -> Self {
        self.config.bins = bins.clamp(Binner::MIN_BINS, Binner::MAX_BINS);
        self
    }

    /// Sets the smallest sigma in bin widths (at least one bin width).
    pub fn min_sigma_bins(mut self, bins: f64) -> Self {
        self.config.min_sigma_bins = if bins.is_finite() {
            bins.max(MixtureConfig::MIN_SIGMA_BINS)
        } else {
            MixtureConfig::default().min_sigma_bins
        };
        self
    }

    pub fn min_fit_bins(mut self, bins: usize) -> Self {
        self.config.min_fit_bins = bins.max(1);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &MixtureConfig {
        &self.config
    }
}

impl<M: Minimizer> GaussianMixtureFitter<M> {
    /// Bin the dataset with the configured bin count and fit it
    pub fn fit_dataset<T: Sample>(&self, dataset: &Dataset<'_, T>) -> Result<MixtureModel> {
        let histogram = Binner::new(self.config.bins).build(dataset)?;
        self.fit(&histogram, dataset.stats())
    }

    /// Fit the first channel of `histogram`
    ///
    /// `stats` supplies the standard deviation bounding the widths; the
    /// value range comes from the histogram itself.
    #[instrument(skip_all, fields(bins = histogram.bins(), components = self.config.components))]
    pub fn fit(&self, histogram: &Histogram, stats: &DatasetStats) -> Result<MixtureModel> {
        let counts = histogram.counts();
        let bins = counts.len();
        let n = self.config.components;
        let verbosity = self.config.verbosity;
        let mut warnings = Vec::new();

        let mass = histogram.mass() as f64;
        let Some((first, last)) = histogram.occupied_span() else {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        };
        let usable = last - first + 1;
        if usable < self.config.min_fit_bins {
            return Err(Error::too_few_bins(self.config.min_fit_bins, usable));
        }
        if usable < bins / 4 {
            warnings.push(Warning::FewFitBins { usable, bins }.emit());
        }

        let seeds = seed_positions(histogram, n);
        if let Some(w) = seeds.warning {
            warnings.push(w);
        }
        if verbosity.reports_debug() {
            debug!(peaks = seeds.peaks_found, seeds = ?seeds.positions, "mixture seeds");
        }

        let (mut params, bounds) = self.starting_point(histogram, stats, &seeds.positions);

        let levels = histogram.levels();
        let ys: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let objective = |p: &[f64]| mixture_rmsd(p, &levels, &ys);

        let outcome = self.minimizer.minimize(&mut params, &bounds, &objective)?;
        if !outcome.converged {
            warnings.push(
                Warning::OptimizerNonConvergence {
                    iterations: outcome.iterations,
                }
                .emit(),
            );
        }

        let components: Vec<GaussianComponent> = params
            .chunks_exact(3)
            .map(|p| GaussianComponent {
                amplitude: p[0],
                mean: p[1],
                sigma: p[2],
            })
            .collect();
        let model = MixtureModel {
            components,
            residual: bins as f64 * outcome.residual / mass,
            bins,
            mass,
            outcome,
            warnings,
        };

        if verbosity.reports_results() {
            let relative = model.relative_amplitudes();
            for (k, (c, r)) in model.components.iter().zip(&relative).enumerate() {
                info!(
                    component = k,
                    amplitude = c.amplitude,
                    mean = c.mean,
                    sigma = c.sigma,
                    relative_amplitude = r,
                    "gaussian component"
                );
            }
            info!(residual = model.residual, bins, "gaussian mixture fit");
        }
        Ok(model)
    }

    /// Parameters `[amplitude, mean, sigma]` per component and their bounds
    fn starting_point(
        &self,
        histogram: &Histogram,
        stats: &DatasetStats,
        seeds: &[f64],
    ) -> (Vec<f64>, Vec<Bounds>) {
        let n = seeds.len();
        let bins = histogram.bins() as f64;
        let hmax = histogram.peak().1 as f64;
        let (min, max) = (histogram.min(), histogram.max());

        let amplitude = Bounds::new(histogram.mass() as f64 / bins, 5.0 * hmax);
        let sigma_low = self.config.min_sigma_bins / histogram.scale();
        let sigma = Bounds {
            low: sigma_low,
            high: stats.std.max(sigma_low),
        };

        let mut params = Vec::with_capacity(3 * n);
        let mut bounds = Vec::with_capacity(3 * n);
        for (j, &seed) in seeds.iter().enumerate() {
            let low = if j == 0 { min } else { 0.5 * (seeds[j - 1] + seed) };
            let high = if j + 1 == n { max } else { 0.5 * (seed + seeds[j + 1]) };
            let position = Bounds::new(low, high);

            params.extend([
                amplitude.clamp(hmax),
                position.clamp(seed),
                sigma.clamp(stats.std / n as f64),
            ]);
            bounds.extend([amplitude, position, sigma]);
        }
        (params, bounds)
    }
}

/// `sqrt(sum (y - model)^2 / len)` for parameters `[a, mean, sigma]*`
fn mixture_rmsd(params: &[f64], xs: &[f64], ys: &[f64]) -> f64 {
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let model: f64 = params
                .chunks_exact(3)
                .map(|p| {
                    let z = (x - p[1]) / p[2];
                    p[0] * (-0.5 * z * z).exp()
                })
                .sum();
            let d = model - y;
            d * d
        })
        .sum();
    (sum / xs.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gaussian_counts(bins: usize, components: &[(f64, f64, f64)]) -> Vec<u64> {
        (0..bins)
            .map(|i| {
                let x = i as f64;
                components
                    .iter()
                    .map(|&(a, m, s)| a * (-0.5 * ((x - m) / s).powi(2)).exp())
                    .sum::<f64>()
                    .round() as u64
            })
            .collect()
    }

    #[test]
    fn test_component_evaluate() {
        let c = GaussianComponent {
            amplitude: 4.0,
            mean: 1.0,
            sigma: 2.0,
        };
        assert_relative_eq!(c.evaluate(1.0), 4.0);
        assert_relative_eq!(c.evaluate(3.0), 4.0 * (-0.5f64).exp());
    }

    #[test]
    fn test_rmsd() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [1.0, 1.0, 1.0];
        // zero-amplitude model leaves the data as residual
        assert_relative_eq!(mixture_rmsd(&[0.0, 1.0, 1.0], &xs, &ys), 1.0);
    }

    #[test]
    fn test_fits_two_components() {
        let counts = gaussian_counts(120, &[(300.0, 30.0, 4.0), (150.0, 80.0, 6.0)]);
        let histogram = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 119.0).unwrap();
        let stats = DatasetStats::new(0.0, 119.0, 50.0, 25.0);

        let model = GaussianMixtureFitter::new(2).fit(&histogram, &stats).unwrap();
        assert_eq!(model.components.len(), 2);
        let (a, b) = (model.components[0], model.components[1]);
        assert!((a.mean - 30.0).abs() < 0.5, "{model:?}");
        assert!((b.mean - 80.0).abs() < 0.5, "{model:?}");
        assert!((a.sigma - 4.0).abs() < 0.4, "{model:?}");
        assert!((b.sigma - 6.0).abs() < 0.6, "{model:?}");
        assert!(model.residual < 0.05, "{model:?}");
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = Histogram::from_counts(vec![0; 50], 1.0, 0.0, 0.0, 49.0).unwrap();
        let stats = DatasetStats::new(0.0, 49.0, 25.0, 10.0);
        let err = GaussianMixtureFitter::new(1).fit(&histogram, &stats).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { actual: 0, .. }));
    }

    #[test]
    fn test_too_narrow_support() {
        let mut counts = vec![0u64; 100];
        for c in &mut counts[40..50] {
            *c = 20;
        }
        let histogram = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 99.0).unwrap();
        let stats = DatasetStats::new(0.0, 99.0, 45.0, 3.0);
        let err = GaussianMixtureFitter::new(1).fit(&histogram, &stats).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientData {
                expected: 20,
                actual: 10
            }
        );
    }

    #[test]
    fn test_few_fit_bins_warning() {
        let counts = gaussian_counts(200, &[(100.0, 100.0, 3.0)]);
        let histogram = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 199.0).unwrap();
        let stats = DatasetStats::new(0.0, 199.0, 100.0, 3.0);
        let model = GaussianMixtureFitter::new(1)
            .min_fit_bins(5)
            .fit(&histogram, &stats)
            .unwrap();
        assert!(model
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::FewFitBins { bins: 200, .. })));
        assert!((model.components[0].mean - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_sigma_floor_clamped() {
        let fitter = GaussianMixtureFitter::new(1).min_sigma_bins(0.0);
        assert_eq!(fitter.config().min_sigma_bins, MixtureConfig::MIN_SIGMA_BINS);
        let fitter = GaussianMixtureFitter::new(1).min_sigma_bins(f64::NAN);
        assert_eq!(fitter.config().min_sigma_bins, MixtureConfig::MIN_SIGMA_BINS);
        let config = MixtureConfig {
            min_sigma_bins: -2.0,
            ..MixtureConfig::default()
        };
        let fitter = GaussianMixtureFitter::new(1).with_config(config);
        assert_eq!(fitter.config().min_sigma_bins, MixtureConfig::MIN_SIGMA_BINS);
        assert_eq!(GaussianMixtureFitter::new(1).min_sigma_bins(3.0).config().min_sigma_bins, 3.0);
    }

    #[test]
    fn test_narrow_spike_respects_sigma_floor() {
        // one-bin spike over a flat floor, half a data unit per bin
        let mut counts = vec![2u64; 100];
        counts[50] = 400;
        counts[49] = 60;
        counts[51] = 60;
        let histogram = Histogram::from_counts(counts, 2.0, 0.0, 0.0, 49.5).unwrap();
        let stats = DatasetStats::new(0.0, 49.5, 25.0, 12.0);

        for floor in [0.0, 3.0] {
            let model = GaussianMixtureFitter::new(1)
                .min_sigma_bins(floor)
                .fit(&histogram, &stats)
                .unwrap();
            let c = model.components[0];
            let low = floor.max(MixtureConfig::MIN_SIGMA_BINS) / histogram.scale();
            assert!(c.sigma >= low, "{model:?}");
            assert!(c.sigma <= stats.std, "{model:?}");
            assert!(c.amplitude.is_finite() && c.mean.is_finite());
            assert!(model.residual.is_finite(), "{model:?}");
        }
    }

    #[test]
    fn test_model_helpers() {
        let model = MixtureModel {
            components: vec![
                GaussianComponent {
                    amplitude: 10.0,
                    mean: 2.0,
                    sigma: 1.0,
                },
                GaussianComponent {
                    amplitude: 5.0,
                    mean: 6.0,
                    sigma: 2.0,
                },
            ],
            residual: 0.0,
            bins: 8,
            mass: 40.0,
            outcome: MinimizeOutcome {
                residual: 0.0,
                iterations: 1,
                converged: true,
            },
            warnings: Vec::new(),
        };
        assert_eq!(model.relative_amplitudes(), vec![2.0, 1.0]);
        assert_relative_eq!(model.evaluate(2.0), 10.0 + 5.0 * (-2.0f64).exp());

        let stats = DatasetStats::new(0.0, 8.0, 4.0, 3.0);
        let adopted = model.adopted_stats(&stats);
        assert_eq!(adopted.mean, 2.0);
        assert_eq!(adopted.std, 1.0);
        assert_eq!(adopted.min, 0.0);
        // input untouched
        assert_eq!(stats.mean, 4.0);

        let histogram = Histogram::from_counts(vec![1; 8], 1.0, 0.0, 0.0, 7.0).unwrap();
        let curves = model.component_curves(&histogram);
        assert_eq!(curves.len(), 2);
        assert_relative_eq!(curves[1][6], 5.0);
    }
}
