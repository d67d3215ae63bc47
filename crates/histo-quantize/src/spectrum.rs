//! Restricted frequency search over the low end of a histogram

use num_complex::Complex;
use rustfft::FftPlanner;

/// Dominant frequency of the leading histogram samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPeak {
    /// Frequency index `p*` in cycles per histogram
    pub frequency: usize,
    /// `|F(p*)|^2`
    pub power: f64,
}

/// `F(p) = (1/bins) * sum_{j < window} h[j] exp(-2 pi i p j / bins) / max(h)`
/// for every `p` in `0..bins`.
///
/// A forward FFT of the zero-padded leading `window` samples yields exactly
/// this sum.
pub fn restricted_spectrum(counts: &[u64], window: usize) -> Vec<Complex<f64>> {
    let bins = counts.len();
    let hmax = counts.iter().copied().max().unwrap_or(0);
    if bins == 0 || hmax == 0 {
        return vec![Complex::new(0.0, 0.0); bins];
    }

    let norm = 1.0 / hmax as f64;
    let mut buffer: Vec<Complex<f64>> = counts
        .iter()
        .enumerate()
        .map(|(j, &c)| {
            if j < window {
                Complex::new(c as f64 * norm, 0.0)
            } else {
                Complex::new(0.0, 0.0)
            }
        })
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(bins);
    fft.process(&mut buffer);

    let inv_bins = 1.0 / bins as f64;
    for value in buffer.iter_mut() {
        *value *= inv_bins;
    }
    buffer
}

/// First frequency of largest power in `[max(1, bins/100), bins/2)`
pub fn dominant_frequency(spectrum: &[Complex<f64>]) -> Option<SpectralPeak> {
    let bins = spectrum.len();
    let start = (bins / 100).max(1);
    let mut peak: Option<SpectralPeak> = None;
    let mut best = 0.0;
    for (p, value) in spectrum.iter().enumerate().take(bins / 2).skip(start) {
        let power = value.norm_sqr();
        if power > best {
            best = power;
            peak = Some(SpectralPeak { frequency: p, power });
        }
    }
    peak
}
