//! Step recovery on synthetic quantized data

use histo_core::test_data::TestData;
use histo_core::{Dataset, Warning};
use histo_histogram::{Binner, Histogram, HistogramBuilder};
use histo_quantize::{QuantizationEstimator, QuantizationStep};

#[test]
fn noisy_levels_recover_step() -> anyhow::Result<()> {
    let data = TestData::quantized_levels(5.0, 20, 100, 0.1);
    let dataset = Dataset::from_samples(&data)?;
    let estimate = QuantizationEstimator::new().estimate_dataset(&dataset)?;

    let step = estimate.step.expect("step detected");
    assert!((step - 5.0).abs() < 0.5, "step {step}");
    assert!(estimate.warnings.is_empty());
    assert!(estimate.levels.len() > 2);
    Ok(())
}

#[test]
fn integral_levels_give_exact_step() -> anyhow::Result<()> {
    let data: Vec<u16> = (0..4000).map(|i| (i % 20) as u16 * 5).collect();
    let dataset = Dataset::from_samples(&data)?;
    let estimate = QuantizationEstimator::new().estimate_dataset(&dataset)?;

    assert_eq!(estimate.period_bins, Some(5));
    assert_eq!(estimate.step, Some(5.0));
    assert_eq!(estimate.levels.len(), 20);

    let rescaled = estimate.quantization_step().expect("step").apply(&data)?;
    assert_eq!(rescaled.counts[..20], (0..20).collect::<Vec<i64>>()[..]);
    assert_eq!(rescaled.stats.max, 19.0);
    Ok(())
}

#[test]
fn smooth_histogram_has_no_step() -> anyhow::Result<()> {
    // one populated bin at the origin, nothing periodic beyond it
    let mut counts = vec![0u64; 500];
    counts[0] = 1000;
    let histogram = Histogram::from_counts(counts, 1.0, 0.0, 0.0, 499.0)?;
    let estimate = QuantizationEstimator::new().estimate(&histogram)?;

    assert_eq!(estimate.step, None);
    assert_eq!(estimate.step_bins, None);
    assert_eq!(estimate.warnings, vec![Warning::NoQuantizationStepFound]);
    Ok(())
}

#[test]
fn degenerate_dataset_is_rejected() {
    let data = [3.0f64; 10];
    let dataset = Dataset::from_samples(&data).unwrap();
    let err = QuantizationEstimator::new().estimate_dataset(&dataset).unwrap_err();
    assert!(err.is_data_condition());
}

#[test]
fn poisson_counts_have_unit_dispersion() -> anyhow::Result<()> {
    let data = TestData::poisson_counts(30.0, 5000);
    let rescaled = QuantizationStep::new(1.0)?.apply(&data)?;
    let dispersion = rescaled.dispersion.expect("non-zero mean");
    assert!((dispersion - 1.0).abs() < 0.15, "dispersion {dispersion}");
    Ok(())
}

#[test]
fn histogram_and_dataset_paths_agree() -> anyhow::Result<()> {
    let data: Vec<i32> = (0..3000).map(|i| (i % 30) * 4).collect();
    let dataset = Dataset::from_samples(&data)?;
    let histogram = Binner::new(117).build(&dataset)?;

    let from_histogram = QuantizationEstimator::new().estimate(&histogram)?;
    let from_dataset = QuantizationEstimator::new().estimate_dataset(&dataset)?;
    assert_eq!(from_histogram.step, from_dataset.step);
    assert_eq!(from_dataset.step, Some(4.0));
    Ok(())
}
