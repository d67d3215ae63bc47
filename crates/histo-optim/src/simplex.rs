//! Bounded downhill simplex (Nelder and Mead, 1965)

use crate::traits::{Bounds, MinimizeOutcome, Minimizer};
use histo_core::{Error, Result, Verbosity};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const REFLECT: f64 = -1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;

/// Settings of the simplex search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimplexConfig {
    pub max_iterations: usize,
    /// Relative tolerance on the objective
    pub tolerance: f64,
    /// Seed of the generator placing the random simplex vertices
    pub seed: u64,
    pub verbosity: Verbosity,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-6,
            seed: 42,
            verbosity: Verbosity::Silent,
        }
    }
}

/// Nelder-Mead simplex respecting per-parameter bounds
///
/// Trial vertices never leave the bounds: a coordinate that would step
/// outside keeps the value of the vertex being replaced. When the simplex
/// collapses it is scattered again around its best vertex, and the run ends
/// once such a restart no longer improves the best value.
///
/// # Example
///
/// ```rust
/// use histo_optim::{Bounds, BoundedSimplex, Minimizer};
///
/// let mut params = [0.0, 0.0];
/// let bounds = [Bounds::new(-5.0, 5.0), Bounds::new(-5.0, 5.0)];
/// let bowl = |p: &[f64]| (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2) + 3.0;
///
/// let outcome = BoundedSimplex::new().minimize(&mut params, &bounds, &bowl).unwrap();
/// assert!((params[0] - 1.0).abs() < 1e-2);
/// assert!((outcome.residual - 3.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoundedSimplex {
    config: SimplexConfig,
}

impl BoundedSimplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimplexConfig) -> Self {
        Self { config }
    }

    /// Sets the iteration cap (at least 1).
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations.max(1);
        self
    }

    /// Sets the relative tolerance (at least machine epsilon).
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = if tolerance.is_finite() {
            tolerance.max(f64::EPSILON)
        } else {
            SimplexConfig::default().tolerance
        };
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.config.verbosity = verbosity;
        self
    }

    pub fn config(&self) -> &SimplexConfig {
        &self.config
    }
}

/// Vertices and their objective values
struct Simplex<'a> {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
    bounds: &'a [Bounds],
    objective: &'a dyn Fn(&[f64]) -> f64,
}

impl<'a> Simplex<'a> {
    fn evaluate(&self, point: &[f64]) -> f64 {
        let v = (self.objective)(point);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    }

    /// Indices of the best, worst and second worst vertices
    fn rank(&self) -> (usize, usize, usize) {
        let mut lo = 0;
        let mut hi = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v <= self.values[lo] {
                lo = i;
            }
            if v > self.values[hi] {
                hi = i;
            }
        }
        let mut next = lo;
        for (i, &v) in self.values.iter().enumerate() {
            if i != hi && v >= self.values[next] {
                next = i;
            }
        }
        (lo, hi, next)
    }

    /// Move the worst vertex through the centroid by `factor` and keep the
    /// trial if it is no worse
    fn try_move(&mut self, hi: usize, factor: f64) -> f64 {
        let n = self.bounds.len() as f64;
        let f1 = (1.0 - factor) / n;
        let f2 = f1 - factor;

        let trial: Vec<f64> = (0..self.bounds.len())
            .map(|j| {
                let worst = self.points[hi][j];
                let b = self.bounds[j];
                if b.is_fixed() {
                    return b.low;
                }
                let sum: f64 = self.points.iter().map(|p| p[j]).sum();
                let moved = sum * f1 - worst * f2;
                if b.contains(moved) {
                    moved
                } else {
                    worst
                }
            })
            .collect();

        let value = self.evaluate(&trial);
        if value <= self.values[hi] {
            self.values[hi] = value;
            self.points[hi] = trial;
        }
        value
    }

    /// Pull every vertex halfway towards the best one
    fn shrink(&mut self, lo: usize) {
        let best = self.points[lo].clone();
        for i in 0..self.points.len() {
            if i == lo {
                continue;
            }
            for (p, b) in self.points[i].iter_mut().zip(&best) {
                *p = 0.5 * (*p + b);
            }
            self.values[i] = self.evaluate(&self.points[i]);
        }
    }

    /// Replace every vertex but the first with a random point
    fn scatter(&mut self, rng: &mut ChaCha8Rng) {
        let first = self.points[0].clone();
        for i in 1..self.points.len() {
            for (j, b) in self.bounds.iter().enumerate() {
                let r: f64 = rng.gen();
                self.points[i][j] = if b.is_fixed() {
                    b.low
                } else if b.is_finite() {
                    b.low + b.width() * (0.25 + 0.5 * r)
                } else if first[j] == 0.0 {
                    b.clamp(2.0 * r - 1.0)
                } else {
                    b.clamp(first[j] * (4.0 * r - 2.0).exp())
                };
            }
            self.values[i] = self.evaluate(&self.points[i]);
        }
    }
}

impl Minimizer for BoundedSimplex {
    #[instrument(skip_all, fields(params = params.len()))]
    fn minimize(
        &self,
        params: &mut [f64],
        bounds: &[Bounds],
        objective: &dyn Fn(&[f64]) -> f64,
    ) -> Result<MinimizeOutcome> {
        if params.len() != bounds.len() {
            return Err(Error::size_mismatch(params.len(), bounds.len(), "parameter bounds"));
        }
        let tolerance = self.config.tolerance;
        let verbosity = self.config.verbosity;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        for (p, b) in params.iter_mut().zip(bounds) {
            *p = b.clamp(*p);
        }

        let npoints = params.len() + 1;
        let mut simplex = Simplex {
            points: vec![params.to_vec(); npoints],
            values: vec![f64::INFINITY; npoints],
            bounds,
            objective,
        };
        simplex.values[0] = simplex.evaluate(params);
        if params.is_empty() {
            return finish(params, &simplex, 0, 0, true, verbosity);
        }
        simplex.scatter(&mut rng);

        let mut iterations = 0;
        let mut restart_best: Option<f64> = None;
        let converged = loop {
            let (lo, hi, next) = simplex.rank();
            let best = simplex.values[lo];
            let worst = simplex.values[hi];

            if worst < tolerance {
                break true;
            }
            if iterations >= self.config.max_iterations {
                break false;
            }
            iterations += 1;

            if worst - best <= tolerance * best.abs() {
                if let Some(previous) = restart_best {
                    if previous - best <= tolerance * previous.abs() {
                        break true;
                    }
                }
                if verbosity.reports_debug() {
                    debug!(iterations, best, "simplex collapsed, scattering");
                }
                restart_best = Some(best);
                simplex.points.swap(0, lo);
                simplex.values.swap(0, lo);
                simplex.scatter(&mut rng);
                continue;
            }

            let trial = simplex.try_move(hi, REFLECT);
            if trial <= best {
                simplex.try_move(hi, EXPAND);
            } else if trial >= simplex.values[next] {
                let saved = simplex.values[hi];
                let trial = simplex.try_move(hi, CONTRACT);
                if trial >= saved {
                    simplex.shrink(lo);
                }
            }
        };

        let (lo, _, _) = simplex.rank();
        params.copy_from_slice(&simplex.points[lo]);
        finish(params, &simplex, lo, iterations, converged, verbosity)
    }
}

fn finish(
    params: &[f64],
    simplex: &Simplex<'_>,
    lo: usize,
    iterations: usize,
    converged: bool,
    verbosity: Verbosity,
) -> Result<MinimizeOutcome> {
    let residual = simplex.values[lo];
    if !residual.is_finite() {
        return Err(Error::non_finite("objective at the best simplex vertex"));
    }
    if verbosity.reports_results() {
        info!(iterations, residual, converged, ?params, "simplex finished");
    }
    Ok(MinimizeOutcome {
        residual,
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(p: &[f64]) -> f64 {
        (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2)
    }

    #[test]
    fn test_finds_zero_minimum() {
        let mut params = [4.0, 4.0];
        let bounds = [Bounds::new(-5.0, 5.0); 2];
        let outcome = BoundedSimplex::new().minimize(&mut params, &bounds, &square).unwrap();
        assert!(outcome.converged);
        assert!(outcome.residual < 1e-6);
        assert_relative_eq!(params[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(params[1], -2.0, epsilon = 1e-2);
    }

    #[test]
    fn test_fixed_parameter_stays() {
        let mut params = [0.0, 3.0];
        let bounds = [Bounds::new(-5.0, 5.0), Bounds::fixed(3.0)];
        let objective = |p: &[f64]| (p[0] - 2.0).powi(2) + (p[1] - 1.0).powi(2);
        let outcome = BoundedSimplex::new().minimize(&mut params, &bounds, &objective).unwrap();
        assert_eq!(params[1], 3.0);
        assert_relative_eq!(params[0], 2.0, epsilon = 1e-2);
        assert_relative_eq!(outcome.residual, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn test_minimum_on_bound() {
        let mut params = [0.5];
        let bounds = [Bounds::new(0.0, 1.0)];
        let objective = |p: &[f64]| (p[0] + 3.0).powi(2);
        BoundedSimplex::new().minimize(&mut params, &bounds, &objective).unwrap();
        assert!(params[0] >= 0.0);
        assert!(params[0] < 0.05);
    }

    #[test]
    fn test_iteration_cap() {
        let mut params = [4.0, 4.0];
        let bounds = [Bounds::new(-5.0, 5.0); 2];
        let outcome = BoundedSimplex::new()
            .max_iterations(3)
            .minimize(&mut params, &bounds, &square)
            .unwrap();
        assert!(!outcome.converged);
        assert_eq!(outcome.iterations, 3);
        assert!(outcome.residual.is_finite());
    }

    #[test]
    fn test_deterministic() {
        let bounds = [Bounds::new(-5.0, 5.0); 2];
        let run = || {
            let mut params = [4.0, 4.0];
            let outcome = BoundedSimplex::new()
                .seed(7)
                .minimize(&mut params, &bounds, &square)
                .unwrap();
            (params, outcome)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_nan_ranks_last() {
        let mut params = [0.0];
        let bounds = [Bounds::new(-2.0, 2.0)];
        let objective = |p: &[f64]| if p[0] > 1.0 { f64::NAN } else { (p[0] - 0.5).powi(2) + 1.0 };
        let outcome = BoundedSimplex::new().minimize(&mut params, &bounds, &objective).unwrap();
        assert_relative_eq!(params[0], 0.5, epsilon = 1e-2);
        assert!(outcome.residual.is_finite());
    }

    #[test]
    fn test_non_finite_everywhere() {
        let mut params = [0.0];
        let bounds = [Bounds::new(-1.0, 1.0)];
        let objective = |_: &[f64]| f64::NAN;
        let err = BoundedSimplex::new()
            .max_iterations(10)
            .minimize(&mut params, &bounds, &objective)
            .unwrap_err();
        assert!(matches!(err, Error::Computation(_)));
    }

    #[test]
    fn test_size_mismatch() {
        let mut params = [0.0, 1.0];
        let bounds = [Bounds::unbounded()];
        assert!(matches!(
            BoundedSimplex::new().minimize(&mut params, &bounds, &square),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_builder_clamps() {
        let s = BoundedSimplex::new().max_iterations(0).tolerance(-1.0);
        assert_eq!(s.config().max_iterations, 1);
        assert_eq!(s.config().tolerance, f64::EPSILON);
        let s = BoundedSimplex::new().tolerance(f64::NAN);
        assert_eq!(s.config().tolerance, 1e-6);
    }
}
