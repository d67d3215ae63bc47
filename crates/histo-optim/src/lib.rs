//! Derivative-free minimization for histogram fits
//!
//! The fitters only see the [`Minimizer`] trait: a starting point, per
//! parameter [`Bounds`] and an objective closure go in, the best point and a
//! [`MinimizeOutcome`] come out. [`BoundedSimplex`] is the implementation
//! shipped with the workspace.

pub mod simplex;
pub mod traits;

pub use simplex::{BoundedSimplex, SimplexConfig};
pub use traits::{Bounds, MinimizeOutcome, Minimizer};

pub use histo_core::Result;
