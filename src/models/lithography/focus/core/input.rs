//! Machine configuration inputs.

mod stiffness;

pub use stiffness::{LoadCurve, Stiffness, StiffnessRatio};

use num_traits::Zero;
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use crate::support::constraint::{Constrained, ConstraintError, StrictlyPositive};

use super::InvalidConfiguration;

/// A named lithography machine operating point.
///
/// Immutable once constructed. The `with_*` methods return modified copies,
/// validating the new value first.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineConfiguration {
    name: String,
    thermal_load: Constrained<Power, StrictlyPositive>,
    stiffness: Stiffness,
    focus_budget: Constrained<Length, StrictlyPositive>,
}

impl MachineConfiguration {
    /// Creates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if the thermal load or the focus
    /// budget is not strictly positive and finite.
    pub fn new(
        name: impl Into<String>,
        thermal_load: Power,
        stiffness: Stiffness,
        focus_budget: Length,
    ) -> Result<Self, InvalidConfiguration> {
        Ok(Self {
            name: name.into(),
            thermal_load: finite_positive(thermal_load, Power::is_finite)
                .map_err(InvalidConfiguration::ThermalLoad)?,
            stiffness,
            focus_budget: finite_positive(focus_budget, Length::is_finite)
                .map_err(InvalidConfiguration::FocusBudget)?,
        })
    }

    /// Creates an ad-hoc configuration with a fixed stiffness ratio from plain numbers.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if `load_w ≤ 0`, `budget_nm ≤ 0`,
    /// or `ratio` lies outside `[0, 2]`.
    ///
    /// # Example
    ///
    /// ```
    /// use focus_cliff::models::lithography::focus::MachineConfiguration;
    ///
    /// let config = MachineConfiguration::custom("bench", 500.0, 0.78, 20.0).unwrap();
    /// assert_eq!(config.name(), "bench");
    ///
    /// assert!(MachineConfiguration::custom("bench", 0.0, 0.78, 20.0).is_err());
    /// assert!(MachineConfiguration::custom("bench", 500.0, 2.5, 20.0).is_err());
    /// assert!(MachineConfiguration::custom("bench", 500.0, 0.78, -1.0).is_err());
    /// ```
    pub fn custom(
        name: impl Into<String>,
        load_w: f64,
        ratio: f64,
        budget_nm: f64,
    ) -> Result<Self, InvalidConfiguration> {
        let stiffness = Stiffness::fixed(ratio)?;
        Self::new(
            name,
            Power::new::<watt>(load_w),
            stiffness,
            Length::new::<nanometer>(budget_nm),
        )
    }

    /// Returns a copy with a different name.
    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy operating at a different thermal load.
    ///
    /// A load-curve stiffness follows the new load; a fixed ratio does not.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::ThermalLoad`] if the load is not
    /// strictly positive and finite.
    pub fn with_thermal_load(&self, thermal_load: Power) -> Result<Self, InvalidConfiguration> {
        Ok(Self {
            thermal_load: finite_positive(thermal_load, Power::is_finite)
                .map_err(InvalidConfiguration::ThermalLoad)?,
            ..self.clone()
        })
    }

    /// Returns a copy with a different stiffness source.
    #[must_use]
    pub fn with_stiffness(&self, stiffness: Stiffness) -> Self {
        Self {
            stiffness,
            ..self.clone()
        }
    }

    /// Returns a copy with a different focus budget.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration::FocusBudget`] if the budget is not
    /// strictly positive and finite.
    pub fn with_focus_budget(&self, focus_budget: Length) -> Result<Self, InvalidConfiguration> {
        Ok(Self {
            focus_budget: finite_positive(focus_budget, Length::is_finite)
                .map_err(InvalidConfiguration::FocusBudget)?,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn thermal_load(&self) -> Power {
        self.thermal_load.into_inner()
    }

    #[must_use]
    pub fn stiffness(&self) -> &Stiffness {
        &self.stiffness
    }

    #[must_use]
    pub fn focus_budget(&self) -> Length {
        self.focus_budget.into_inner()
    }

    /// Resolves the stiffness ratio at this configuration's thermal load.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Stiffness::ratio_at`].
    pub fn stiffness_ratio(&self) -> Result<StiffnessRatio, InvalidConfiguration> {
        self.stiffness.ratio_at(self.thermal_load())
    }
}

/// `StrictlyPositive` admits `+inf`; loads and budgets must also be finite.
fn finite_positive<Q>(
    value: Q,
    is_finite: fn(Q) -> bool,
) -> Result<Constrained<Q, StrictlyPositive>, ConstraintError>
where
    Q: Copy + PartialOrd + Zero,
{
    let value = StrictlyPositive::new(value)?;
    if is_finite(*value.as_ref()) {
        Ok(value)
    } else {
        Err(ConstraintError::NotFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn rejects_each_invalid_field() {
        assert!(matches!(
            MachineConfiguration::custom("x", 0.0, 0.5, 20.0),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::Zero))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", -500.0, 0.5, 20.0),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::Negative))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", 500.0, 0.5, 0.0),
            Err(InvalidConfiguration::FocusBudget(ConstraintError::Zero))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", 500.0, -0.1, 20.0),
            Err(InvalidConfiguration::StiffnessRatio(
                ConstraintError::BelowMinimum
            ))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", 500.0, 2.1, 20.0),
            Err(InvalidConfiguration::StiffnessRatio(
                ConstraintError::AboveMaximum
            ))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", f64::NAN, 0.5, 20.0),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::NotANumber))
        ));
    }

    #[test]
    fn rejects_infinite_load_and_budget() {
        assert!(matches!(
            MachineConfiguration::custom("x", f64::INFINITY, 0.5, 20.0),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::NotFinite))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", f64::NEG_INFINITY, 0.5, 20.0),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::Negative))
        ));
        assert!(matches!(
            MachineConfiguration::custom("x", 500.0, 0.5, f64::INFINITY),
            Err(InvalidConfiguration::FocusBudget(ConstraintError::NotFinite))
        ));

        let config = MachineConfiguration::custom("x", 500.0, 0.5, 20.0).unwrap();
        assert!(matches!(
            config.with_thermal_load(Power::new::<watt>(f64::INFINITY)),
            Err(InvalidConfiguration::ThermalLoad(ConstraintError::NotFinite))
        ));
        assert!(matches!(
            config.with_focus_budget(Length::new::<nanometer>(f64::INFINITY)),
            Err(InvalidConfiguration::FocusBudget(ConstraintError::NotFinite))
        ));
    }

    #[test]
    fn load_override_moves_curve_ratio_only() {
        let curve = LoadCurve::new(0.5, 0.4, Power::new::<watt>(415.0), 0.95).unwrap();
        let config = MachineConfiguration::new(
            "curve",
            Power::new::<watt>(500.0),
            Stiffness::LoadCurve(curve),
            Length::new::<nanometer>(20.0),
        )
        .unwrap();

        let hotter = config.with_thermal_load(Power::new::<watt>(750.0)).unwrap();
        assert!(hotter.stiffness_ratio().unwrap().value() > config.stiffness_ratio().unwrap().value());
        assert_relative_eq!(hotter.thermal_load().get::<watt>(), 750.0);

        let pinned = config.with_stiffness(Stiffness::fixed(0.5).unwrap());
        let pinned_hot = pinned.with_thermal_load(Power::new::<watt>(750.0)).unwrap();
        assert_relative_eq!(pinned_hot.stiffness_ratio().unwrap().value(), 0.5);
    }

    #[test]
    fn overrides_validate() {
        let config = MachineConfiguration::custom("x", 500.0, 0.5, 20.0).unwrap();
        assert!(config.with_thermal_load(Power::new::<watt>(-1.0)).is_err());
        assert!(config.with_focus_budget(Length::new::<nanometer>(0.0)).is_err());

        let renamed = config.with_name("y");
        assert_eq!(renamed.name(), "y");
        assert_eq!(renamed.thermal_load(), config.thermal_load());
    }
}
