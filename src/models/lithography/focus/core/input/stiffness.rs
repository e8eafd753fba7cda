use std::ops::Deref;

use uom::si::{
    f64::{Power, Ratio},
    power::watt,
    ratio::ratio,
};

use crate::support::constraint::{
    ClosedInterval, Constrained, ConstraintResult, StiffnessBounds, StrictlyPositive,
};

use super::super::InvalidConfiguration;

/// Azimuthal support-stiffness ratio, `k_azi`.
///
/// Dimensionless measure of stiffness non-uniformity around the support.
/// Always lies in the closed interval `[0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StiffnessRatio(Constrained<Ratio, ClosedInterval<StiffnessBounds>>);

impl StiffnessRatio {
    /// Creates a [`StiffnessRatio`] from a scalar value.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the value lies outside `[0, 2]` or is NaN.
    pub fn new(value: f64) -> ConstraintResult<Self> {
        Self::from_quantity(Ratio::new::<ratio>(value))
    }

    /// Creates a [`StiffnessRatio`] from a ratio quantity.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the quantity lies outside `[0, 2]` or is NaN.
    pub fn from_quantity(quantity: Ratio) -> ConstraintResult<Self> {
        Ok(Self(ClosedInterval::<StiffnessBounds>::new(quantity)?))
    }

    /// Returns the ratio as a plain number.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0.as_ref().get::<ratio>()
    }
}

impl Deref for StiffnessRatio {
    type Target = Ratio;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Saturating relation between thermal load and stiffness ratio.
///
/// The support softens non-uniformly as load rises:
///
/// ```text
/// k(W) = min(base + span · (1 − exp(−W / load_scale)), ceiling)
/// ```
///
/// The curve is non-decreasing in `W` and never leaves `[base, ceiling]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadCurve {
    base: StiffnessRatio,
    span: f64,
    load_scale: Constrained<Power, StrictlyPositive>,
    ceiling: StiffnessRatio,
}

impl LoadCurve {
    /// Creates a load curve.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if `base` or `ceiling` lie outside
    /// `[0, 2]`, `span` is negative or not finite, `load_scale` is not
    /// strictly positive, or `ceiling < base`.
    pub fn new(
        base: f64,
        span: f64,
        load_scale: Power,
        ceiling: f64,
    ) -> Result<Self, InvalidConfiguration> {
        let base = StiffnessRatio::new(base).map_err(InvalidConfiguration::StiffnessRatio)?;
        let ceiling = StiffnessRatio::new(ceiling).map_err(InvalidConfiguration::StiffnessRatio)?;

        if !(span.is_finite() && span >= 0.0) {
            return Err(InvalidConfiguration::LoadCurve(
                "span must be finite and non-negative",
            ));
        }
        if ceiling.value() < base.value() {
            return Err(InvalidConfiguration::LoadCurve(
                "ceiling must not be below base",
            ));
        }
        let load_scale = StrictlyPositive::new(load_scale)
            .map_err(|_| InvalidConfiguration::LoadCurve("load scale must be strictly positive"))?;

        Ok(Self {
            base,
            span,
            load_scale,
            ceiling,
        })
    }

    /// Stiffness ratio at zero load.
    #[must_use]
    pub fn base(&self) -> StiffnessRatio {
        self.base
    }

    /// Increase of the ratio between zero and saturating load, before the ceiling applies.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Load at which `1 − 1/e` of the span has been reached.
    #[must_use]
    pub fn load_scale(&self) -> Power {
        self.load_scale.into_inner()
    }

    /// Physical upper limit of the ratio.
    #[must_use]
    pub fn ceiling(&self) -> StiffnessRatio {
        self.ceiling
    }

    /// Evaluates the curve at the given load.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::StiffnessRatio`] if the curve produces
    /// a non-numeric value, which only happens for non-finite loads.
    pub fn ratio_at(&self, load: Power) -> Result<StiffnessRatio, InvalidConfiguration> {
        let x = load.get::<watt>() / self.load_scale.as_ref().get::<watt>();
        let k = self.base.value() + self.span * (1.0 - (-x).exp());
        StiffnessRatio::new(k.min(self.ceiling.value()))
            .map_err(InvalidConfiguration::StiffnessRatio)
    }
}

/// Source of a configuration's stiffness ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stiffness {
    /// Ratio held constant regardless of thermal load.
    Fixed(StiffnessRatio),

    /// Ratio derived from the thermal load.
    LoadCurve(LoadCurve),
}

impl Stiffness {
    /// Creates a fixed stiffness ratio.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::StiffnessRatio`] if the value lies
    /// outside `[0, 2]` or is NaN.
    pub fn fixed(value: f64) -> Result<Self, InvalidConfiguration> {
        StiffnessRatio::new(value)
            .map(Self::Fixed)
            .map_err(InvalidConfiguration::StiffnessRatio)
    }

    /// Resolves the stiffness ratio at the given load.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`LoadCurve::ratio_at`].
    pub fn ratio_at(&self, load: Power) -> Result<StiffnessRatio, InvalidConfiguration> {
        match self {
            Self::Fixed(k) => Ok(*k),
            Self::LoadCurve(curve) => curve.ratio_at(load),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::support::constraint::ConstraintError;

    fn reference_curve() -> LoadCurve {
        LoadCurve::new(0.50, 0.40, Power::new::<watt>(415.0), 0.95).unwrap()
    }

    #[test]
    fn ratio_bounds() {
        assert!(StiffnessRatio::new(0.0).is_ok());
        assert!(StiffnessRatio::new(2.0).is_ok());
        assert!(matches!(
            StiffnessRatio::new(-0.01),
            Err(ConstraintError::BelowMinimum)
        ));
        assert!(matches!(
            StiffnessRatio::new(2.01),
            Err(ConstraintError::AboveMaximum)
        ));
        assert!(matches!(
            StiffnessRatio::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        ));
    }

    #[test]
    fn reference_curve_reaches_documented_ratio_at_500_watts() {
        let k = reference_curve().ratio_at(Power::new::<watt>(500.0)).unwrap();
        assert_relative_eq!(k.value(), 0.78, epsilon = 1e-3);
    }

    #[test]
    fn curve_is_monotone_and_clamped() {
        let curve = LoadCurve::new(0.5, 0.6, Power::new::<watt>(300.0), 0.95).unwrap();

        let mut previous = curve.ratio_at(Power::new::<watt>(1.0)).unwrap().value();
        for watts in (50..=5000).step_by(50) {
            let k = curve.ratio_at(Power::new::<watt>(f64::from(watts))).unwrap().value();
            assert!(k >= previous);
            assert!(k <= 0.95);
            previous = k;
        }
        assert_relative_eq!(previous, 0.95);
    }

    #[test]
    fn rejects_malformed_curves() {
        let scale = Power::new::<watt>(300.0);
        assert!(matches!(
            LoadCurve::new(0.5, -0.1, scale, 0.95),
            Err(InvalidConfiguration::LoadCurve(_))
        ));
        assert!(matches!(
            LoadCurve::new(0.5, 0.4, scale, 0.4),
            Err(InvalidConfiguration::LoadCurve(_))
        ));
        assert!(matches!(
            LoadCurve::new(0.5, 0.4, Power::new::<watt>(0.0), 0.95),
            Err(InvalidConfiguration::LoadCurve(_))
        ));
        assert!(matches!(
            LoadCurve::new(2.5, 0.4, scale, 2.5),
            Err(InvalidConfiguration::StiffnessRatio(_))
        ));
    }

    #[test]
    fn fixed_ignores_load() {
        let stiffness = Stiffness::fixed(0.5).unwrap();
        for watts in [1.0, 500.0, 5000.0] {
            let k = stiffness.ratio_at(Power::new::<watt>(watts)).unwrap();
            assert_relative_eq!(k.value(), 0.5);
        }
    }
}
