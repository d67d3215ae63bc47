//! Poisson fit to count histograms

use crate::config::PoissonConfig;
use histo_core::{Dataset, DatasetStats, Error, Result, Sample, Verbosity, Warning};
use histo_histogram::{Binner, Histogram, HistogramBuilder, HistogramOps};
use histo_optim::{BoundedSimplex, Bounds, MinimizeOutcome, Minimizer};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// `amplitude * lambda^i * exp(-lambda) / i!` fitted over bins `i`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonFit {
    pub amplitude: f64,
    /// Rate in bins
    pub lambda: f64,
    /// RMS deviation scaled by `bins / mass`
    pub residual: f64,
    /// Bins per data unit of the fitted histogram
    pub scale: f64,
    pub bins: usize,
    pub outcome: MinimizeOutcome,
    pub warnings: Vec<Warning>,
}

impl PoissonFit {
    /// Model value at bin `i`
    pub fn evaluate(&self, i: usize) -> f64 {
        poisson_terms(self.amplitude, self.lambda, i + 1)
            .last()
            .unwrap_or(0.0)
    }

    /// Model evaluated at every bin
    pub fn curve(&self) -> Vec<f64> {
        poisson_terms(self.amplitude, self.lambda, self.bins).collect()
    }

    /// Statistics with mean `lambda / scale` and std `sqrt(lambda) / scale`
    pub fn adopted_stats(&self, stats: &DatasetStats) -> DatasetStats {
        stats.with_moments(self.lambda / self.scale, self.lambda.sqrt() / self.scale)
    }
}

/// Poisson terms for `i = 0..len`, accumulated in log space
fn poisson_terms(amplitude: f64, lambda: f64, len: usize) -> impl Iterator<Item = f64> {
    let ln_lambda = lambda.ln();
    let mut ln_term = amplitude.ln() - lambda;
    (0..len).map(move |i| {
        if i > 0 {
            ln_term += ln_lambda - (i as f64).ln();
        }
        ln_term.exp()
    })
}

fn poisson_rmsd(params: &[f64], ys: &[f64]) -> f64 {
    let sum: f64 = poisson_terms(params[0], params[1], ys.len())
        .zip(ys)
        .map(|(t, &y)| (y - t) * (y - t))
        .sum();
    (sum / ys.len() as f64).sqrt()
}

/// Fits one Poisson distribution to a count histogram
///
/// The histogram must be zero-anchored (bin `i` standing for `i / scale`),
/// as built by [`PoissonFitter::fit_dataset`].
#[derive(Debug, Clone)]
pub struct PoissonFitter<M = BoundedSimplex> {
    config: PoissonConfig,
    minimizer: M,
}

impl Default for PoissonFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl PoissonFitter {
    pub fn new() -> Self {
        Self {
            config: PoissonConfig::default(),
            minimizer: BoundedSimplex::new(),
        }
    }
}

impl<M> PoissonFitter<M> {
    pub fn with_minimizer<N>(self, minimizer: N) -> PoissonFitter<N> {
        PoissonFitter {
            config: self.config,
            minimizer,
        }
    }

    /// Sets the histogram size limit (clamped into `[5, 150]`).
    pub fn max_bins(mut self, bins: usize) -> Self {
        self.config.max_bins = bins.clamp(PoissonConfig::MIN_BINS, PoissonConfig::MAX_BINS);
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &PoissonConfig {
        &self.config
    }
}

impl<M: Minimizer> PoissonFitter<M> {
    /// Bin the dataset on a zero-anchored grid covering `mean + 5 std` and fit
    pub fn fit_dataset<T: Sample>(&self, dataset: &Dataset<'_, T>) -> Result<PoissonFit> {
        let stats = dataset.stats();
        let reach = stats.mean + 5.0 * stats.std;
        if !(reach.is_finite() && reach > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Poisson fit needs mean + 5 std > 0, got {reach}"
            )));
        }
        let bins = (self.config.max_bins as f64)
            .min(reach)
            .clamp(PoissonConfig::MIN_BINS as f64, PoissonConfig::MAX_BINS as f64)
            as usize;
        let scale = bins as f64 / reach;
        let histogram = Binner::zero_anchored(bins, scale).build(dataset)?;
        self.fit(&histogram)
    }

    /// Fit the first channel of `histogram`
    #[instrument(skip_all, fields(bins = histogram.bins()))]
    pub fn fit(&self, histogram: &Histogram) -> Result<PoissonFit> {
        let counts = histogram.counts();
        let bins = counts.len();
        let mass = histogram.mass();
        if mass == 0 {
            return Err(Error::InsufficientData {
                expected: 1,
                actual: 0,
            });
        }

        let (peak, hmax) = histogram.peak();
        let hmax = hmax as f64;
        let peak = peak.max(1) as f64;
        let mean = histogram.mean_bin();

        let bounds = [Bounds::new(hmax, 20.0 * hmax), Bounds::new(0.5 * mean, 2.0 * peak)];
        let mut params = [hmax, bounds[1].clamp(peak.min(mean))];

        let ys: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        let objective = |p: &[f64]| poisson_rmsd(p, &ys);
        let outcome = self.minimizer.minimize(&mut params, &bounds, &objective)?;

        let mut warnings = Vec::new();
        if !outcome.converged {
            warnings.push(
                Warning::OptimizerNonConvergence {
                    iterations: outcome.iterations,
                }
                .emit(),
            );
        }

        let fit = PoissonFit {
            amplitude: params[0],
            lambda: params[1],
            residual: bins as f64 * outcome.residual / mass as f64,
            scale: histogram.scale(),
            bins,
            outcome,
            warnings,
        };
        if self.config.verbosity.reports_results() {
            info!(
                amplitude = fit.amplitude,
                lambda = fit.lambda,
                residual = fit.residual,
                bins,
                "poisson fit"
            );
        }
        Ok(fit)
    }
}
