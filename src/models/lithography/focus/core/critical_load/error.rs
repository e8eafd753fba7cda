use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::Length;

use super::super::InvalidConfiguration;

/// Errors that can occur while searching for the critical thermal load.
#[derive(Debug, Error)]
pub enum CriticalLoadError {
    /// The configuration could not be evaluated.
    #[error(transparent)]
    Invalid(#[from] InvalidConfiguration),

    /// The load bracket is empty or not strictly positive.
    #[error("invalid load bracket: expected 0 < min_load < max_load")]
    InvalidBracket,

    /// Drift stays on one side of the budget across the whole bracket.
    #[error(
        "drift does not cross the budget in the load bracket: \
         residual at min={drift_at_min:?}, at max={drift_at_max:?}"
    )]
    NotBracketed {
        /// Drift minus budget at the lower end of the bracket.
        drift_at_min: Length,

        /// Drift minus budget at the upper end of the bracket.
        drift_at_max: Length,
    },

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best drift residual achieved.
        residual: Length,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}
