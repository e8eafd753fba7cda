//! Baseline versus stabilized support comparison.

use uom::si::{f64::Length, length::nanometer};

use super::{
    FocusStability, InvalidConfiguration, MachineConfiguration, StabilityResult, Stiffness,
};

/// Stiffness ratio of a uniformly stiff, stabilized support.
pub const STABILIZED_RATIO: f64 = 0.50;

/// A baseline evaluation next to its stabilized counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub baseline: StabilityResult,
    pub stabilized: StabilityResult,
    pub improvement: Improvement,
}

/// Gains from stabilizing the support.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    /// Relative drift reduction, in percent of the baseline drift.
    pub drift_reduction_pct: f64,

    /// Baseline drift divided by stabilized drift.
    pub drift_reduction_factor: f64,

    /// Relative variance factor reduction, in percent.
    pub variance_reduction_pct: f64,

    /// Stabilized margin minus baseline margin.
    pub margin_recovery: Length,
}

impl Improvement {
    fn between(baseline: &StabilityResult, stabilized: &StabilityResult) -> Self {
        let base_drift = baseline.focus_drift.get::<nanometer>();
        let stable_drift = stabilized.focus_drift.get::<nanometer>();

        Self {
            drift_reduction_pct: (base_drift - stable_drift) / base_drift * 100.0,
            drift_reduction_factor: base_drift / stable_drift,
            variance_reduction_pct: (baseline.variance_factor - stabilized.variance_factor)
                / baseline.variance_factor
                * 100.0,
            margin_recovery: stabilized.focus_margin - baseline.focus_margin,
        }
    }
}

pub(super) fn compare(
    evaluator: &FocusStability,
    baseline: &MachineConfiguration,
    stabilized_ratio: f64,
) -> Result<Comparison, InvalidConfiguration> {
    let stabilized_config = baseline
        .with_name(format!("{} (stabilized)", baseline.name()))
        .with_stiffness(Stiffness::fixed(stabilized_ratio)?);

    let baseline = evaluator.evaluate(baseline)?;
    let stabilized = evaluator.evaluate(&stabilized_config)?;
    let improvement = Improvement::between(&baseline, &stabilized);

    Ok(Comparison {
        baseline,
        stabilized,
        improvement,
    })
}
