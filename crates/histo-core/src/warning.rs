//! Recoverable conditions
//!
//! A warning never aborts a call. It is attached to the returned result and
//! emitted once as a `tracing::warn!` event.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Warning {
    /// Fewer histogram peaks than requested components; seeds were spread evenly
    SeedingUnderdetermined { found: usize, requested: usize },
    /// The optimizer hit its iteration cap; the best parameters were kept
    OptimizerNonConvergence { iterations: usize },
    /// No periodic structure qualified as a quantization step
    NoQuantizationStepFound,
    /// Most of the histogram is empty, the fit rests on few bins
    FewFitBins { usable: usize, bins: usize },
}

impl Warning {
    /// Emit the warning as a tracing event and hand it back
    pub fn emit(self) -> Self {
        warn!(warning = ?self, "{}", self);
        self
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SeedingUnderdetermined { found, requested } => write!(
                f,
                "found {found} peaks for {requested} components, using evenly spaced seeds"
            ),
            Warning::OptimizerNonConvergence { iterations } => {
                write!(f, "optimizer did not converge within {iterations} iterations")
            }
            Warning::NoQuantizationStepFound => write!(f, "no quantization step detected"),
            Warning::FewFitBins { usable, bins } => {
                write!(f, "only {usable} of {bins} bins are populated")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let w = Warning::SeedingUnderdetermined { found: 1, requested: 3 };
        assert_eq!(
            w.to_string(),
            "found 1 peaks for 3 components, using evenly spaced seeds"
        );
        assert_eq!(
            Warning::NoQuantizationStepFound.to_string(),
            "no quantization step detected"
        );
    }

    #[test]
    fn test_emit_returns_value() {
        let w = Warning::OptimizerNonConvergence { iterations: 5000 };
        assert_eq!(w.clone().emit(), w);
    }
}
