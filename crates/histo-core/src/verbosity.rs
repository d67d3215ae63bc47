//! Per-call reporting level
//!
//! Each configuration carries its own [`Verbosity`]. Result tables go to
//! `tracing::info!` at [`Verbosity::Results`], internals to `tracing::debug!`
//! at [`Verbosity::Debug`]. Warnings are emitted regardless.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verbosity {
    /// Only warnings
    #[default]
    Silent,
    /// Result tables and fitted parameters
    Results,
    /// Intermediate values of the algorithms
    Debug,
}

impl Verbosity {
    pub fn reports_results(self) -> bool {
        self >= Verbosity::Results
    }

    pub fn reports_debug(self) -> bool {
        self >= Verbosity::Debug
    }
}
