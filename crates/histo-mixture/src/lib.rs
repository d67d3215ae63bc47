//! Parametric fits to histograms
//!
//! - [`GaussianMixtureFitter`]: a sum of Gaussians seeded on the peaks of the
//!   histogram gradient.
//! - [`PoissonFitter`]: a single Poisson distribution over a zero-anchored
//!   count histogram.
//!
//! Both minimize the RMS deviation between model and counts through the
//! [`histo_optim::Minimizer`] seam and report it scaled by `bins / mass`.
//! Fitting never changes the dataset statistics; `adopted_stats` returns a
//! new [`histo_core::DatasetStats`] when the caller wants the fitted moments.

pub mod config;
pub mod gaussian;
pub mod poisson;
pub mod seeding;

pub use config::{MixtureConfig, PoissonConfig};
pub use gaussian::{GaussianComponent, GaussianMixtureFitter, MixtureModel};
pub use poisson::{PoissonFit, PoissonFitter};
pub use seeding::{gradient_peaks, moving_gradient, seed_positions, Seeds};

pub use histo_core::Result;
