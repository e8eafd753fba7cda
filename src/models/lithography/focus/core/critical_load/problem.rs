//! Problem formulation for the critical load search.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use crate::models::lithography::focus::core::{
    FocusStability, InvalidConfiguration, MachineConfiguration, StabilityResult,
};

/// Model adapter that evaluates one configuration at a variable thermal load.
///
/// A load-curve stiffness follows the load; a fixed ratio stays put.
pub(super) struct LoadSweepModel<'a> {
    evaluator: &'a FocusStability,
    config: &'a MachineConfiguration,
}

impl<'a> LoadSweepModel<'a> {
    pub(super) fn new(evaluator: &'a FocusStability, config: &'a MachineConfiguration) -> Self {
        Self { evaluator, config }
    }
}

impl Model for LoadSweepModel<'_> {
    type Input = Power;
    type Output = StabilityResult;
    type Error = InvalidConfiguration;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let config = self.config.with_thermal_load(*input)?;
        self.evaluator.evaluate(&config)
    }
}

/// Equation problem definition for the critical load.
///
/// Computes the residual as `focus_drift - focus_budget`, in nanometers.
pub(super) struct BudgetProblem {
    budget: Length,
}

impl BudgetProblem {
    pub(super) fn new(budget: Length) -> Self {
        Self { budget }
    }
}

impl EquationProblem<1> for BudgetProblem {
    type Input = Power;
    type Output = StabilityResult;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(Power::new::<watt>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        let drift = output.focus_drift.get::<nanometer>();
        let budget = self.budget.get::<nanometer>();
        Ok([drift - budget])
    }
}
