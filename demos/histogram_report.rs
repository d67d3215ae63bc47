//! Full histogram report for a synthetic detector image
//!
//! Run with `RUST_LOG=info` to see the result tables logged by each stage.

use histo_stats::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Poisson};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Histogram Report ===\n");

    // Background and signal, read out with a gain of 4 counts per photon
    let mut rng = StdRng::seed_from_u64(2024);
    let background = Poisson::new(12.0)?;
    let signal = Poisson::new(45.0)?;
    let data: Vec<u16> = (0..20_000)
        .map(|i| {
            let photons: f64 = if i % 4 == 0 {
                signal.sample(&mut rng)
            } else {
                background.sample(&mut rng)
            };
            (photons * 4.0) as u16
        })
        .collect();
    let dataset = Dataset::from_samples(&data)?;
    let stats = dataset.stats();
    println!(
        "Dataset: {} samples, min {}, max {}, mean {:.2}, std {:.2}",
        dataset.len(),
        stats.min,
        stats.max,
        stats.mean,
        stats.std
    );

    // 1. Descriptive summary
    println!("\n1. Histogram summary");
    let histogram = Binner::new(128).build(&dataset)?;
    let summary = histogram.summary();
    println!("  {histogram}");
    println!(
        "  coverage {:.1}%, entropy {:.3} bits, information rate {:.3}",
        summary.coverage_percent, summary.entropy_bits, summary.information_rate
    );

    // 2. Thresholds
    println!("\n2. Thresholds");
    let finder = ThresholdFinder::new().bins(128).verbosity(Verbosity::Results);
    let otsu = finder.otsu(&histogram)?;
    println!("  Otsu threshold: {:.2} (bin {:.1})", otsu.threshold, otsu.bin);
    let classes = finder.partition(&histogram, 3)?;
    println!("  3-class cuts: {:?}", classes.values);

    // 3. Quantization
    println!("\n3. Quantization step");
    let estimate = QuantizationEstimator::new()
        .verbosity(Verbosity::Results)
        .estimate_dataset(&dataset)?;
    match estimate.quantization_step() {
        Some(step) => {
            println!("  step: {:.3}", step.value());
            let rescaled = step.apply(&data)?;
            println!(
                "  rescaled mean {:.2}, dispersion {:?}",
                rescaled.stats.mean, rescaled.dispersion
            );
        }
        None => println!("  no step detected"),
    }

    // 4. Percentiles
    println!("\n4. Percentiles");
    let table = percentiles(&dataset)?;
    for p in [1, 5, 25, 50, 75, 95, 99] {
        if let Some(v) = table.value(p) {
            println!("  p{p:<3} {v:>8.2}");
        }
    }

    // 5. Mixture fits
    println!("\n5. Gaussian mixture");
    let model = GaussianMixtureFitter::new(2)
        .bins(100)
        .verbosity(Verbosity::Results)
        .fit_dataset(&dataset)?;
    for (k, c) in model.components.iter().enumerate() {
        println!(
            "  component {k}: amplitude {:.1}, mean {:.2}, sigma {:.2}",
            c.amplitude, c.mean, c.sigma
        );
    }
    println!("  residual {:.4}", model.residual);
    for w in &model.warnings {
        println!("  warning: {w}");
    }

    println!("\n6. Poisson fit of the background");
    let background_only: Vec<f64> = (0..5000).map(|_| background.sample(&mut rng)).collect();
    let counts = Dataset::from_samples(&background_only)?;
    let fit = PoissonFitter::new().fit_dataset(&counts)?;
    let adopted = fit.adopted_stats(counts.stats());
    println!(
        "  lambda {:.2} bins -> mean {:.2}, std {:.2}",
        fit.lambda, adopted.mean, adopted.std
    );

    // Normal noise on top of the readout has no step
    println!("\n7. Continuous data");
    let normal = Normal::new(0.0, 1.0)?;
    let noise: Vec<f64> = (0..5000).map(|_| normal.sample(&mut rng)).collect();
    let noise_set = Dataset::from_samples(&noise)?;
    let estimate = QuantizationEstimator::new().estimate_dataset(&noise_set)?;
    println!("  step: {:?}, warnings: {:?}", estimate.step, estimate.warnings);

    Ok(())
}
