//! Seeded test data generators
//!
//! Shared by the unit, integration and benchmark code of every crate in the
//! workspace so that scenarios are reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson, Uniform};

/// Standard scenarios for histogram analysis
pub struct TestData;

impl TestData {
    /// 1000 integer values evenly spaced over [0, 99], each level repeated ten times
    pub fn evenly_spaced_integral() -> Vec<i32> {
        (0..1000).map(|i| i / 10).collect()
    }

    /// 500 samples from N(10, 1) followed by 500 samples from N(50, 4)
    pub fn bimodal_gaussian() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let narrow = Normal::new(10.0, 1.0).unwrap();
        let wide = Normal::new(50.0, 4.0).unwrap();

        let mut data = Vec::with_capacity(1000);
        for _ in 0..500 {
            data.push(narrow.sample(&mut rng));
        }
        for _ in 0..500 {
            data.push(wide.sample(&mut rng));
        }
        data
    }

    /// Two equal uniform clusters spanning [0, 10] and [90, 100]
    pub fn separated_clusters() -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let low = Uniform::new_inclusive(0.0, 10.0);
        let high = Uniform::new_inclusive(90.0, 100.0);

        let mut data = Vec::with_capacity(1000);
        for _ in 0..500 {
            data.push(low.sample(&mut rng));
        }
        for _ in 0..500 {
            data.push(high.sample(&mut rng));
        }
        data
    }

    /// Values on the levels `k * step` for `k < levels`, with uniform noise
    /// of at most `noise` around each level
    pub fn quantized_levels(step: f64, levels: usize, per_level: usize, noise: f64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let jitter = Uniform::new_inclusive(-noise, noise);

        let mut data = Vec::with_capacity(levels * per_level);
        for k in 0..levels {
            for _ in 0..per_level {
                data.push(k as f64 * step + jitter.sample(&mut rng));
            }
        }
        data
    }

    /// Poisson-distributed counts with rate `lambda`
    pub fn poisson_counts(lambda: f64, n: usize) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(42);
        let poisson = Poisson::new(lambda).unwrap();
        (0..n).map(|_| poisson.sample(&mut rng)).collect()
    }

    /// Three well separated Gaussian clusters centred on 20, 50 and 80
    pub fn three_clusters() -> Vec<f64> {
        mixture_normal(&[20.0, 50.0, 80.0], &[2.0, 2.0, 2.0], &[1.0, 1.0, 1.0], 3000, 7)
    }
}

/// Sample from a mixture of normal distributions
///
/// Each component receives `n * weight / sum(weights)` samples, in order.
pub fn mixture_normal(means: &[f64], stds: &[f64], weights: &[f64], n: usize, seed: u64) -> Vec<f64> {
    assert_eq!(means.len(), stds.len());
    assert_eq!(means.len(), weights.len());

    let mut rng = StdRng::seed_from_u64(seed);
    let total: f64 = weights.iter().sum();
    let mut data = Vec::with_capacity(n);
    for ((&mean, &std), &weight) in means.iter().zip(stds).zip(weights) {
        let count = (n as f64 * weight / total).round() as usize;
        let normal = Normal::new(mean, std).unwrap();
        for _ in 0..count {
            data.push(normal.sample(&mut rng));
        }
    }
    data
}
