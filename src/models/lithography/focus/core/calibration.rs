//! Empirical calibration of the physics cliff and the warpage baseline.

use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use crate::support::constraint::{Constrained, NonNegative, StrictlyPositive};

use super::InvalidConfiguration;

/// Region of the stiffness axis a ratio falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CliffZone {
    /// Below the onset ratio; no variance amplification.
    Safe,

    /// Between the onset ratio and the cliff; amplification grows smoothly.
    Approaching,

    /// At or beyond the cliff threshold.
    AtCliff,
}

/// Anchor points of the variance amplification curve.
///
/// The source data only documents discrete anchors, so the curve between them
/// is an explicit choice:
///
/// - `k < onset_ratio`: `V = 1`
/// - `onset_ratio ≤ k < cliff_ratio`: `V = exp(g · (k − onset_ratio))`, with
///   `g` chosen so that `V(warning_ratio) = warning_factor`
/// - `k ≥ cliff_ratio`: `V = min(cliff_factor · exp(cliff_growth · (k − cliff_ratio)), max_factor)`
///
/// With the defaults this gives `3.47×` at `0.78`, about `4.7×` at `0.80`
/// and a jump to `122×` at the cliff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CliffCalibration {
    /// Ratio where amplification starts.
    pub onset_ratio: f64,

    /// Ratio of the pre-cliff anchor.
    pub warning_ratio: f64,

    /// Amplification at `warning_ratio`.
    pub warning_factor: f64,

    /// Critical ratio `k_cliff`. Amplification explodes at and above it.
    pub cliff_ratio: f64,

    /// Amplification immediately at the cliff.
    pub cliff_factor: f64,

    /// Exponential growth rate beyond the cliff, per unit ratio.
    pub cliff_growth: f64,

    /// Upper cap on amplification.
    pub max_factor: f64,
}

impl Default for CliffCalibration {
    fn default() -> Self {
        Self {
            onset_ratio: 0.70,
            warning_ratio: 0.78,
            warning_factor: 3.47,
            cliff_ratio: 0.81,
            cliff_factor: 122.0,
            cliff_growth: 10.0,
            max_factor: 1000.0,
        }
    }
}

impl CliffCalibration {
    /// Checks that the anchors describe a monotone curve.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::Calibration`] unless
    /// `0 < onset < warning < cliff ≤ 2`, `1 ≤ warning_factor ≤ cliff_factor ≤ max_factor`
    /// and `cliff_growth ≥ 0`.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        let ordered = 0.0 < self.onset_ratio
            && self.onset_ratio < self.warning_ratio
            && self.warning_ratio < self.cliff_ratio
            && self.cliff_ratio <= 2.0;
        if !ordered {
            return Err(InvalidConfiguration::Calibration(
                "ratios must satisfy 0 < onset < warning < cliff <= 2",
            ));
        }

        let factors = 1.0 <= self.warning_factor
            && self.warning_factor <= self.cliff_factor
            && self.cliff_factor <= self.max_factor
            && self.max_factor.is_finite();
        if !factors {
            return Err(InvalidConfiguration::Calibration(
                "factors must satisfy 1 <= warning <= cliff <= max < inf",
            ));
        }

        NonNegative::new(self.cliff_growth)
            .map_err(|_| InvalidConfiguration::Calibration("cliff growth must be non-negative"))?;

        Ok(())
    }

    /// Classifies a stiffness ratio.
    #[must_use]
    pub fn zone(&self, k: f64) -> CliffZone {
        if k >= self.cliff_ratio {
            CliffZone::AtCliff
        } else if k >= self.onset_ratio {
            CliffZone::Approaching
        } else {
            CliffZone::Safe
        }
    }

    /// Variance amplification factor at the given stiffness ratio.
    ///
    /// Non-decreasing in `k` for any calibration that passes [`validate`](Self::validate).
    #[must_use]
    pub fn variance_factor(&self, k: f64) -> f64 {
        match self.zone(k) {
            CliffZone::Safe => 1.0,
            CliffZone::Approaching => {
                let rate = self.warning_factor.ln() / (self.warning_ratio - self.onset_ratio);
                // The pre-cliff curve can not exceed the factor at the cliff itself.
                (rate * (k - self.onset_ratio)).exp().min(self.cliff_factor)
            }
            CliffZone::AtCliff => {
                let excess = k - self.cliff_ratio;
                (self.cliff_factor * (self.cliff_growth * excess).exp()).min(self.max_factor)
            }
        }
    }
}

/// Focus drift baseline of an unamplified substrate, linear in thermal load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseWarpage {
    reference_load: Power,
    reference_warpage: Length,
}

impl Default for BaseWarpage {
    fn default() -> Self {
        Self::ule()
    }
}

impl BaseWarpage {
    /// Creates a baseline passing through `(reference_load, reference_warpage)`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if either value is not strictly positive.
    pub fn new(reference_load: Power, reference_warpage: Length) -> Result<Self, InvalidConfiguration> {
        let reference_load: Constrained<Power, StrictlyPositive> =
            StrictlyPositive::new(reference_load).map_err(InvalidConfiguration::ThermalLoad)?;
        let reference_warpage: Constrained<Length, StrictlyPositive> =
            StrictlyPositive::new(reference_warpage).map_err(InvalidConfiguration::BaseWarpage)?;

        Ok(Self {
            reference_load: reference_load.into_inner(),
            reference_warpage: reference_warpage.into_inner(),
        })
    }

    /// ULE glass reference: 12.4 nm at 500 W.
    #[must_use]
    pub fn ule() -> Self {
        Self {
            reference_load: Power::new::<watt>(500.0),
            reference_warpage: Length::new::<nanometer>(12.4),
        }
    }

    #[must_use]
    pub fn reference_load(&self) -> Power {
        self.reference_load
    }

    #[must_use]
    pub fn reference_warpage(&self) -> Length {
        self.reference_warpage
    }

    /// Baseline warpage at the given load.
    #[must_use]
    pub fn at(&self, load: Power) -> Length {
        let scale = load.get::<watt>() / self.reference_load.get::<watt>();
        self.reference_warpage * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn documented_anchor_points() {
        let cal = CliffCalibration::default();
        cal.validate().unwrap();

        assert_relative_eq!(cal.variance_factor(0.50), 1.0);
        assert_relative_eq!(cal.variance_factor(0.6999), 1.0);
        assert_relative_eq!(cal.variance_factor(0.70), 1.0);
        assert_relative_eq!(cal.variance_factor(0.78), 3.47, epsilon = 1e-12);

        let at_080 = cal.variance_factor(0.80);
        assert!(at_080 > 4.5 && at_080 < 5.0, "V(0.80) = {at_080}");

        assert_relative_eq!(cal.variance_factor(0.81), 122.0);
        assert_relative_eq!(cal.variance_factor(2.0), 1000.0);
    }

    #[test]
    fn zones_have_closed_lower_edges() {
        let cal = CliffCalibration::default();
        assert_eq!(cal.zone(0.0), CliffZone::Safe);
        assert_eq!(cal.zone(0.70), CliffZone::Approaching);
        assert_eq!(cal.zone(0.8099), CliffZone::Approaching);
        assert_eq!(cal.zone(0.81), CliffZone::AtCliff);
    }

    #[test]
    fn rejects_inconsistent_anchors() {
        let swapped = CliffCalibration {
            onset_ratio: 0.85,
            ..CliffCalibration::default()
        };
        assert!(matches!(
            swapped.validate(),
            Err(InvalidConfiguration::Calibration(_))
        ));

        let shrinking = CliffCalibration {
            warning_factor: 0.5,
            ..CliffCalibration::default()
        };
        assert!(shrinking.validate().is_err());

        let capped_below_cliff = CliffCalibration {
            max_factor: 100.0,
            ..CliffCalibration::default()
        };
        assert!(capped_below_cliff.validate().is_err());

        let decaying = CliffCalibration {
            cliff_growth: -1.0,
            ..CliffCalibration::default()
        };
        assert!(decaying.validate().is_err());
    }

    #[test]
    fn warpage_scales_linearly_with_load() {
        let base = BaseWarpage::default();
        assert_relative_eq!(
            base.at(Power::new::<watt>(500.0)).get::<nanometer>(),
            12.4,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            base.at(Power::new::<watt>(250.0)).get::<nanometer>(),
            6.2,
            epsilon = 1e-9
        );
        assert!(BaseWarpage::new(Power::new::<watt>(500.0), Length::new::<nanometer>(0.0)).is_err());
    }
}
