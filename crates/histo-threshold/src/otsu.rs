//! Binary threshold maximizing the inter-class variance (Otsu, 1979)

use histo_core::{Error, Result};
use histo_histogram::{Histogram, HistogramOps};
use serde::{Deserialize, Serialize};

/// Result of the binary threshold search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtsuThreshold {
    /// Threshold in data units, `min + bin / scale`
    pub threshold: f64,
    /// Threshold bin, halfway between the first and last maximizing bins
    pub bin: f64,
    /// Largest inter-class variance
    pub max_variance: f64,
    /// Inter-class variance per bin, zero where one class is empty
    pub variance: Vec<f64>,
}

/// Histogram and variance curves scaled for plotting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtsuCurve {
    /// Data value at the lower edge of each bin
    pub levels: Vec<f64>,
    /// Counts divided by the class total
    pub probability: Vec<f64>,
    /// Variance divided by the squared class total
    pub variance: Vec<f64>,
}

impl OtsuThreshold {
    /// Normalize the curves by the histogram mass
    pub fn normalized_curve(&self, histogram: &Histogram) -> OtsuCurve {
        let n = histogram.mass().max(1) as f64;
        let n2 = n * n;
        OtsuCurve {
            levels: (0..histogram.bins())
                .map(|i| histogram.bin_to_value(i as f64))
                .collect(),
            probability: histogram.counts().iter().map(|&c| c as f64 / n).collect(),
            variance: self.variance.iter().map(|&v| v / n2).collect(),
        }
    }
}

/// Per-bin inter-class variance `wB * wF * (mB - mF)^2`
///
/// `wB` counts the bins up to and including `i`, `wF` the rest of the
/// histogram mass; samples dropped during binning belong to neither class.
/// Bins where either class is empty are left at zero.
pub fn otsu_variance(counts: &[u64]) -> Vec<f64> {
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    let sum = first_moment(counts);

    let mut v = vec![0.0; counts.len()];
    let mut w_b = 0.0;
    let mut sum_b = 0.0;
    for (i, &c) in counts.iter().enumerate() {
        let c = c as f64;
        w_b += c;
        sum_b += i as f64 * c;
        let w_f = total - w_b;
        if w_b > 0.0 && w_f > 0.0 {
            let m_b = sum_b / w_b;
            let m_f = (sum - sum_b) / w_f;
            v[i] = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        }
    }
    v
}

/// Find the bin maximizing the inter-class variance.
///
/// On a plateau of equal maxima the midpoint of the first and the last
/// maximizing bin is returned.
pub fn otsu_bin(counts: &[u64]) -> Result<(f64, f64)> {
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    if total == 0.0 {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    let sum = first_moment(counts);

    let mut w_b = 0.0;
    let mut sum_b = 0.0;
    let mut best = 0.0;
    let mut last = 0usize;
    let mut first = 0usize;
    for (i, &c) in counts.iter().enumerate() {
        let c = c as f64;
        w_b += c;
        if w_b == 0.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0.0 {
            break;
        }
        sum_b += i as f64 * c;
        let m_b = sum_b / w_b;
        let m_f = (sum - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if between >= best {
            last = i;
            if between > best {
                first = i;
            }
            best = between;
        }
    }

    Ok(((first + last) as f64 / 2.0, best))
}

/// Binary threshold of the first channel of a histogram
pub fn otsu_threshold(histogram: &Histogram) -> Result<OtsuThreshold> {
    let counts = histogram.counts();
    let (bin, max_variance) = otsu_bin(counts)?;
    Ok(OtsuThreshold {
        threshold: histogram.bin_level(bin),
        bin,
        max_variance,
        variance: otsu_variance(counts),
    })
}

fn first_moment(counts: &[u64]) -> f64 {
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum()
}
