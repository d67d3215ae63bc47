//! Quantization step detection
//!
//! Sampled data often sits on a regular grid of levels: an ADC with a gain,
//! photon counts scaled by a detector conversion factor. The step between
//! those levels shows up as a periodic comb in the histogram.
//! [`QuantizationEstimator`] finds the comb's period with a restricted
//! Fourier search and refines it from the positions of the individual levels.
//! [`QuantizationStep::apply`] then maps samples back to integer counts.

pub mod estimator;
pub mod spectrum;
pub mod step;

pub use estimator::{QuantizationConfig, QuantizationEstimate, QuantizationEstimator, QuantizationLevel};
pub use spectrum::{dominant_frequency, restricted_spectrum, SpectralPeak};
pub use step::{CountRescale, QuantizationStep};

pub use histo_core::Result;
