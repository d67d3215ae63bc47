//! The minimizer seam

use histo_core::Result;
use serde::{Deserialize, Serialize};

/// Closed interval a parameter may take
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    /// Interval between two limits, in either order
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// A parameter held at one value
    pub fn fixed(value: f64) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    pub fn unbounded() -> Self {
        Self {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.low == self.high
    }

    /// Both limits finite and apart
    pub fn is_finite(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low < self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.low).min(self.high)
    }
}

/// Summary of a minimization run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinimizeOutcome {
    /// Objective value at the returned parameters
    pub residual: f64,
    pub iterations: usize,
    /// False when the iteration cap ended the run
    pub converged: bool,
}

/// Derivative-free minimization of a scalar objective
///
/// `params` holds the starting point on entry and the best point found on
/// return. Implementations only evaluate the objective; they never need its
/// gradient.
pub trait Minimizer {
    fn minimize(
        &self,
        params: &mut [f64],
        bounds: &[Bounds],
        objective: &dyn Fn(&[f64]) -> f64,
    ) -> Result<MinimizeOutcome>;
}

impl<M: Minimizer + ?Sized> Minimizer for &M {
    fn minimize(
        &self,
        params: &mut [f64],
        bounds: &[Bounds],
        objective: &dyn Fn(&[f64]) -> f64,
    ) -> Result<MinimizeOutcome> {
        (**self).minimize(params, bounds, objective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let b = Bounds::new(3.0, -1.0);
        assert_eq!(b.low, -1.0);
        assert_eq!(b.high, 3.0);
        assert!(b.is_finite());
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.clamp(5.0), 3.0);
        assert_eq!(b.clamp(-2.0), -1.0);
        assert!(b.contains(0.0));

        let f = Bounds::fixed(2.5);
        assert!(f.is_fixed());
        assert!(!f.is_finite());

        let u = Bounds::unbounded();
        assert!(!u.is_finite());
        assert_eq!(u.clamp(1e300), 1e300);
    }
}
