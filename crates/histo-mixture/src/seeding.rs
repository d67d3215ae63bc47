//! Peak seeding from the histogram gradient

use histo_core::Warning;
use histo_histogram::Histogram;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Smallest gradient window in bins
pub const MIN_GRADIENT_WINDOW: usize = 5;

/// A rising flank must exceed this slope (counts per bin) to mark a peak
pub const NOISE_FLOOR: f64 = 10.0;

/// Moving gradient: the slope of a least-squares line fitted to the window
/// around each element
///
/// The raw values are regressed directly, with no moving-average pass first.
/// The window is centred on each element and clipped at the ends, so the
/// first and last slopes are fitted on fewer points.
pub fn moving_gradient(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let half = window / 2;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(n - 1);
            slope(&values[lo..=hi])
        })
        .collect()
}

fn slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    if ys.len() < 2 {
        return 0.0;
    }
    let t_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (t, &y) in ys.iter().enumerate() {
        let dt = t as f64 - t_mean;
        sxy += dt * (y - y_mean);
        sxx += dt * dt;
    }
    sxy / sxx
}

/// Gradient window for a histogram of `bins` bins
pub fn gradient_window(bins: usize) -> usize {
    (bins / 20).max(MIN_GRADIENT_WINDOW)
}

/// Bins where the gradient turns negative after a steep enough rise
pub fn gradient_peaks(counts: &[u64]) -> Vec<usize> {
    let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
    let gradient = moving_gradient(&values, gradient_window(counts.len()));

    let mut peaks = Vec::new();
    let mut running = 0.0;
    let mut rise = 0;
    for (i, &g) in gradient.iter().enumerate() {
        if running < g {
            running = g;
            rise = i;
        } else if g < 0.0 && gradient[rise] > NOISE_FLOOR {
            peaks.push(i);
            running = 0.0;
            rise = i;
        }
    }
    peaks
}

/// Starting positions for the mixture components
#[derive(Debug, Clone, PartialEq)]
pub struct Seeds {
    /// One position per component, in value units and increasing
    pub positions: Vec<f64>,
    /// Peaks found by the gradient search
    pub peaks_found: usize,
    pub warning: Option<Warning>,
}

/// Place `components` seeds on the histogram peaks
///
/// Surplus peaks are dropped, keeping the tallest (mean count over the
/// gradient window). With too few peaks the seeds are spread evenly over
/// `[min, max]` instead.
pub fn seed_positions(histogram: &Histogram, components: usize) -> Seeds {
    let counts = histogram.counts();
    let mut peaks = gradient_peaks(counts);
    let found = peaks.len();

    if found < components {
        let (min, max) = (histogram.min(), histogram.max());
        let step = (max - min) / components as f64;
        return Seeds {
            positions: (0..components).map(|k| min + (k as f64 + 0.5) * step).collect(),
            peaks_found: found,
            warning: Some(
                Warning::SeedingUnderdetermined {
                    found,
                    requested: components,
                }
                .emit(),
            ),
        };
    }

    if found > components {
        let half = gradient_window(counts.len()) / 2;
        let height = |p: usize| {
            let lo = p.saturating_sub(half);
            let hi = (p + half).min(counts.len() - 1);
            let window = &counts[lo..=hi];
            window.iter().sum::<u64>() as f64 / window.len() as f64
        };
        peaks.sort_by_key(|&p| Reverse(OrderedFloat(height(p))));
        peaks.truncate(components);
        peaks.sort_unstable();
    }

    Seeds {
        positions: peaks.iter().map(|&p| histogram.bin_level(p as f64)).collect(),
        peaks_found: found,
        warning: None,
    }
}
