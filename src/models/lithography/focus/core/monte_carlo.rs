//! Seeded batch of perturbed evaluations.
//!
//! Manufacturing tolerances scatter the stiffness ratio (and optionally the
//! thermal load) around the nominal operating point. Near the cliff this
//! scatter dominates the drift distribution, which is what the batch reports.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, trace};
use uom::si::{length::nanometer, power::watt};

use crate::support::{
    constraint::{UnitBounds, UpperOpenInterval},
    stats::SampleStatistics,
};

use super::{
    FocusStability, InvalidConfiguration, MachineConfiguration, StabilityResult, Status,
    Stiffness,
};

/// Batch settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonteCarloConfig {
    /// Number of evaluations, at least 1.
    pub samples: usize,

    /// Seed of the batch RNG. Equal seeds give identical batches.
    pub seed: u64,

    /// Relative half-width of the uniform ratio perturbation, in `[0, 1)`.
    pub ratio_spread: f64,

    /// Relative half-width of the uniform load perturbation, in `[0, 1)`.
    pub load_spread: f64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            seed: 42,
            ratio_spread: 0.05,
            load_spread: 0.0,
        }
    }
}

impl MonteCarloConfig {
    /// Checks the batch settings.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::MonteCarlo`] if `samples` is zero or a
    /// spread lies outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.samples == 0 {
            return Err(InvalidConfiguration::MonteCarlo(
                "at least one sample is required",
            ));
        }
        UpperOpenInterval::<UnitBounds>::new(self.ratio_spread)
            .map_err(|_| InvalidConfiguration::MonteCarlo("ratio spread must lie in [0, 1)"))?;
        UpperOpenInterval::<UnitBounds>::new(self.load_spread)
            .map_err(|_| InvalidConfiguration::MonteCarlo("load spread must lie in [0, 1)"))?;
        Ok(())
    }
}

/// Outcome of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloSummary {
    /// Every sample, in generation order.
    pub results: Vec<StabilityResult>,

    /// Statistics of the focus drift, in nanometers.
    pub drift: SampleStatistics,

    /// Number of samples per verdict. Verdicts that never occurred are absent.
    pub status_counts: BTreeMap<Status, usize>,
}

impl MonteCarloSummary {
    /// Share of samples that lost focus, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn failure_rate_pct(&self) -> f64 {
        let failures: usize = self
            .status_counts
            .iter()
            .filter(|(status, _)| status.is_failure())
            .map(|(_, count)| count)
            .sum();

        failures as f64 / self.results.len() as f64 * 100.0
    }
}

/// Uniform relative factor in `[1 − spread, 1 + spread)`.
fn perturbation(rng: &mut StdRng, spread: f64) -> f64 {
    let u: f64 = rng.r#gen();
    1.0 + spread * (2.0 * u - 1.0)
}

pub(super) fn run(
    evaluator: &FocusStability,
    config: &MachineConfiguration,
    batch: &MonteCarloConfig,
) -> Result<MonteCarloSummary, InvalidConfiguration> {
    batch.validate()?;

    let nominal_ratio = config.stiffness_ratio()?.value();
    let nominal_load = config.thermal_load();
    let mut rng = StdRng::seed_from_u64(batch.seed);

    let mut results = Vec::with_capacity(batch.samples);
    for index in 0..batch.samples {
        // Both draws happen for every sample so the ratio sequence does not
        // depend on the load spread.
        let ratio_factor = perturbation(&mut rng, batch.ratio_spread);
        let load_factor = perturbation(&mut rng, batch.load_spread);

        let sample = config
            .with_stiffness(Stiffness::fixed(nominal_ratio * ratio_factor)?)
            .with_thermal_load(nominal_load * load_factor)?;
        let result = evaluator.evaluate(&sample)?;

        trace!(
            index,
            k_azi = result.stiffness_ratio,
            load_w = result.thermal_load.get::<watt>(),
            drift_nm = result.focus_drift.get::<nanometer>(),
            status = %result.status,
            "monte carlo sample"
        );
        results.push(result);
    }

    let drifts: Vec<f64> = results
        .iter()
        .map(|result| result.focus_drift.get::<nanometer>())
        .collect();
    let drift = SampleStatistics::from_values(&drifts).ok_or(InvalidConfiguration::MonteCarlo(
        "at least one sample is required",
    ))?;

    let mut status_counts = BTreeMap::new();
    for result in &results {
        *status_counts.entry(result.status).or_insert(0) += 1;
    }

    debug!(
        config = config.name(),
        samples = drift.n,
        mean_nm = drift.mean,
        std_nm = drift.std,
        cv_pct = drift.cv_pct,
        "monte carlo batch complete"
    );

    Ok(MonteCarloSummary {
        results,
        drift,
        status_counts,
    })
}
