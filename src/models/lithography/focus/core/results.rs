//! Results of a focus stability evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uom::si::f64::{Length, Power};

use super::CliffZone;

/// Focus-budget verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Within budget and below the onset ratio.
    Stable,

    /// Within budget but in the pre-cliff zone.
    Marginal,

    /// Drift exceeds the budget below the cliff.
    FocusFailure,

    /// Stiffness ratio at or beyond the cliff.
    Catastrophic,
}

impl Status {
    /// All verdicts, from best to worst.
    pub const ALL: [Status; 4] = [
        Status::Stable,
        Status::Marginal,
        Status::FocusFailure,
        Status::Catastrophic,
    ];

    /// Stable identifier used in reports and exports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "STABLE",
            Self::Marginal => "MARGINAL",
            Self::FocusFailure => "FOCUS_FAILURE",
            Self::Catastrophic => "CATASTROPHIC",
        }
    }

    /// Returns `true` for verdicts that lose focus.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::FocusFailure | Self::Catastrophic)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of a single evaluation.
///
/// Created once per call and never mutated. Numeric fields are bit-identical
/// across repeated evaluations of the same configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityResult {
    /// Name of the evaluated configuration.
    pub name: String,

    /// Thermal load the configuration was evaluated at.
    pub thermal_load: Power,

    /// Resolved stiffness ratio `k_azi`.
    pub stiffness_ratio: f64,

    /// Cliff threshold `k_cliff` used for this evaluation.
    pub cliff_threshold: f64,

    /// Signed distance to the cliff, `k_azi − k_cliff`.
    pub cliff_distance: f64,

    /// Stiffness zone of `k_azi`.
    pub zone: CliffZone,

    /// Variance amplification factor, at least 1.
    pub variance_factor: f64,

    /// Unamplified warpage at the thermal load.
    pub base_warpage: Length,

    /// Estimated focus drift, `base_warpage × variance_factor`.
    pub focus_drift: Length,

    pub focus_budget: Length,

    /// Signed margin, `focus_budget − focus_drift`. Negative means failure.
    pub focus_margin: Length,

    pub status: Status,
}
