//! Closed-form focus stability evaluation near the stiffness cliff.
//!
//! Thermal load warps the substrate; a non-uniform azimuthal support stiffness
//! amplifies that warpage into focus drift. Amplification stays modest below
//! the cliff threshold and explodes at it. Everything here is a pure function
//! of its inputs, except the Monte Carlo batch which draws from a seeded RNG.

mod calibration;
mod compare;
mod critical_load;
mod error;
mod input;
mod monte_carlo;
mod results;

#[cfg(test)]
mod test_support;

pub use calibration::{BaseWarpage, CliffCalibration, CliffZone};
pub use compare::{Comparison, Improvement, STABILIZED_RATIO};
pub use critical_load::{CriticalLoadConfig, CriticalLoadError};
pub use error::InvalidConfiguration;
pub use input::{LoadCurve, MachineConfiguration, Stiffness, StiffnessRatio};
pub use monte_carlo::{MonteCarloConfig, MonteCarloSummary};
pub use results::{StabilityResult, Status};

use tracing::{debug, warn};
use uom::si::{length::nanometer, power::watt};

/// Focus stability evaluator.
///
/// Holds a validated cliff calibration and warpage baseline. Construct it once
/// and evaluate any number of configurations; it is `Send + Sync` and never
/// mutated by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FocusStability {
    calibration: CliffCalibration,
    warpage: BaseWarpage,
}

impl FocusStability {
    /// Creates an evaluator from a calibration and a warpage baseline.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::Calibration`] if the calibration anchors
    /// are inconsistent.
    pub fn new(
        calibration: CliffCalibration,
        warpage: BaseWarpage,
    ) -> Result<Self, InvalidConfiguration> {
        calibration.validate()?;
        Ok(Self {
            calibration,
            warpage,
        })
    }

    /// Returns a copy with a different cliff threshold, e.g. for another material.
    ///
    /// The onset and warning anchors move by the same offset, so the curve
    /// keeps its shape relative to the cliff.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::Calibration`] if the shifted onset
    /// falls to zero or below, or the threshold exceeds 2.
    pub fn with_cliff_ratio(&self, cliff_ratio: f64) -> Result<Self, InvalidConfiguration> {
        let shift = cliff_ratio - self.calibration.cliff_ratio;
        Self::new(
            CliffCalibration {
                onset_ratio: self.calibration.onset_ratio + shift,
                warning_ratio: self.calibration.warning_ratio + shift,
                cliff_ratio,
                ..self.calibration
            },
            self.warpage,
        )
    }

    #[must_use]
    pub fn calibration(&self) -> &CliffCalibration {
        &self.calibration
    }

    #[must_use]
    pub fn warpage(&self) -> &BaseWarpage {
        &self.warpage
    }

    /// Evaluates a single configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if the configuration's stiffness does
    /// not resolve to a ratio in `[0, 2]`, or
    /// [`InvalidConfiguration::DriftOverflow`] if the drift is not finite.
    pub fn evaluate(
        &self,
        config: &MachineConfiguration,
    ) -> Result<StabilityResult, InvalidConfiguration> {
        let k = config.stiffness_ratio()?.value();
        let thermal_load = config.thermal_load();
        let focus_budget = config.focus_budget();

        let cliff_threshold = self.calibration.cliff_ratio;
        let zone = self.calibration.zone(k);
        let variance_factor = self.calibration.variance_factor(k);

        let base_warpage = self.warpage.at(thermal_load);
        let focus_drift = base_warpage * variance_factor;
        if !focus_drift.get::<nanometer>().is_finite() {
            return Err(InvalidConfiguration::DriftOverflow);
        }
        let focus_margin = focus_budget - focus_drift;

        let status = if k >= cliff_threshold {
            Status::Catastrophic
        } else if focus_margin.get::<nanometer>() < 0.0 {
            Status::FocusFailure
        } else if k < self.calibration.onset_ratio {
            Status::Stable
        } else {
            Status::Marginal
        };

        debug!(
            config = config.name(),
            load_w = thermal_load.get::<watt>(),
            k_azi = k,
            variance_factor,
            drift_nm = focus_drift.get::<nanometer>(),
            margin_nm = focus_margin.get::<nanometer>(),
            %status,
            "evaluated focus stability"
        );
        if status == Status::Catastrophic {
            warn!(
                config = config.name(),
                k_azi = k,
                k_cliff = cliff_threshold,
                "stiffness ratio at or beyond the cliff"
            );
        }

        Ok(StabilityResult {
            name: config.name().to_owned(),
            thermal_load,
            stiffness_ratio: k,
            cliff_threshold,
            cliff_distance: k - cliff_threshold,
            zone,
            variance_factor,
            base_warpage,
            focus_drift,
            focus_budget,
            focus_margin,
            status,
        })
    }

    /// Evaluates a configuration next to a copy pinned at the stabilized ratio.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if either evaluation fails.
    pub fn compare(
        &self,
        baseline: &MachineConfiguration,
    ) -> Result<Comparison, InvalidConfiguration> {
        compare::compare(self, baseline, STABILIZED_RATIO)
    }

    /// Like [`compare`](Self::compare), with an explicit stabilized ratio.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if the ratio is outside `[0, 2]` or
    /// either evaluation fails.
    pub fn compare_with(
        &self,
        baseline: &MachineConfiguration,
        stabilized_ratio: f64,
    ) -> Result<Comparison, InvalidConfiguration> {
        compare::compare(self, baseline, stabilized_ratio)
    }

    /// Runs a seeded batch of perturbed evaluations.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if the batch settings are out of range
    /// or a perturbed sample leaves the valid ratio or load range.
    pub fn monte_carlo(
        &self,
        config: &MachineConfiguration,
        batch: &MonteCarloConfig,
    ) -> Result<MonteCarloSummary, InvalidConfiguration> {
        monte_carlo::run(self, config, batch)
    }

    /// Finds the thermal load at which focus drift consumes the whole budget.
    ///
    /// # Errors
    ///
    /// Returns [`CriticalLoadError`] if the drift does not cross the budget
    /// inside the search bracket or the solver fails to converge.
    pub fn critical_load(
        &self,
        config: &MachineConfiguration,
        search: &CriticalLoadConfig,
    ) -> Result<StabilityResult, CriticalLoadError> {
        critical_load::critical_load(self, config, search)
    }
}
