use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// A configuration value is outside the range the evaluator accepts.
///
/// Raised at the evaluator boundary before any computation; an evaluation
/// either returns a complete result or fails with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvalidConfiguration {
    /// Thermal load must be strictly positive.
    #[error("invalid thermal load: {0}")]
    ThermalLoad(ConstraintError),

    /// Focus budget must be strictly positive.
    #[error("invalid focus budget: {0}")]
    FocusBudget(ConstraintError),

    /// Stiffness ratio must lie in `[0, 2]`.
    #[error("invalid stiffness ratio (expected 0 ≤ k_azi ≤ 2): {0}")]
    StiffnessRatio(ConstraintError),

    /// The load-to-stiffness curve is malformed.
    #[error("invalid stiffness load curve: {0}")]
    LoadCurve(&'static str),

    /// The cliff calibration anchors are inconsistent.
    #[error("invalid cliff calibration: {0}")]
    Calibration(&'static str),

    /// The warpage baseline is not strictly positive.
    #[error("invalid base warpage: {0}")]
    BaseWarpage(ConstraintError),

    /// The thermal load is so large that the focus drift overflows.
    #[error("focus drift is not finite at this thermal load")]
    DriftOverflow,

    /// A Monte Carlo batch setting is out of range.
    #[error("invalid Monte Carlo setting: {0}")]
    MonteCarlo(&'static str),
}
