//! Iterative search for the thermal load that consumes the focus budget.
//!
//! Drift grows with load, both directly through the warpage baseline and,
//! for a load-curve stiffness, through the rising stiffness ratio. The search
//! varies the load until drift equals the configured budget.

mod config;
mod error;
mod problem;

pub use config::CriticalLoadConfig;
pub use error::CriticalLoadError;

use std::cmp::Ordering;

use tracing::debug;
use twine_core::Model;
use twine_solvers::equation::bisection;
use uom::si::{f64::Length, length::nanometer, power::watt};

use crate::support::constraint::StrictlyPositive;

use super::{FocusStability, MachineConfiguration, StabilityResult};

use problem::{BudgetProblem, LoadSweepModel};

/// Finds the load where `focus_drift == focus_budget` by bisection.
///
/// When the stiffness crosses the cliff inside the bracket the residual jumps;
/// the search then converges on the load where the jump happens.
///
/// # Errors
///
/// Returns [`CriticalLoadError`] on an invalid bracket, when drift does not
/// cross the budget inside it, or if the solver fails to converge.
pub(super) fn critical_load(
    evaluator: &FocusStability,
    config: &MachineConfiguration,
    search: &CriticalLoadConfig,
) -> Result<StabilityResult, CriticalLoadError> {
    let min_load = StrictlyPositive::new(search.min_load)
        .map_err(|_| CriticalLoadError::InvalidBracket)?
        .into_inner();
    if search.max_load.partial_cmp(&min_load) != Some(Ordering::Greater) {
        return Err(CriticalLoadError::InvalidBracket);
    }

    let model = LoadSweepModel::new(evaluator, config);
    let budget = config.focus_budget();

    let drift_at_min = model.call(&min_load)?.focus_drift - budget;
    let drift_at_max = model.call(&search.max_load)?.focus_drift - budget;
    if drift_at_min.get::<nanometer>() > 0.0 || drift_at_max.get::<nanometer>() < 0.0 {
        return Err(CriticalLoadError::NotBracketed {
            drift_at_min,
            drift_at_max,
        });
    }

    let problem = BudgetProblem::new(budget);

    let solution = bisection::solve(
        &model,
        &problem,
        [min_load.get::<watt>(), search.max_load.get::<watt>()],
        &search.bisection(),
        |_event: &bisection::Event<'_, _, _>| -> Option<bisection::Action> { None },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(CriticalLoadError::MaxIters {
            residual: Length::new::<nanometer>(solution.residual),
            iters: solution.iters,
        });
    }

    let result = solution.snapshot.output;
    debug!(
        config = config.name(),
        critical_load_w = result.thermal_load.get::<watt>(),
        iters = solution.iters,
        "critical load found"
    );
    Ok(result)
}
