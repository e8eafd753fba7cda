//! Focus stability of thermally loaded substrate supports.
//!
//! [`FocusStability`] implements [`twine_core::Model`], mapping a
//! [`MachineConfiguration`] to a [`StabilityResult`]. The computational core
//! is in an internal `core` module; [`profiles`] holds named machine
//! configurations and [`export`] the structured record consumed by report
//! and chart tooling.
//!
//! # Example
//!
//! ```
//! use focus_cliff::models::lithography::focus::{FocusStability, MachineConfiguration, Status};
//! use twine_core::Model;
//!
//! let evaluator = FocusStability::default();
//!
//! let uniform = MachineConfiguration::custom("uniform", 500.0, 0.50, 20.0).unwrap();
//! assert_eq!(evaluator.call(&uniform).unwrap().status, Status::Stable);
//!
//! let at_cliff = MachineConfiguration::custom("at cliff", 500.0, 0.81, 20.0).unwrap();
//! assert_eq!(evaluator.call(&at_cliff).unwrap().status, Status::Catastrophic);
//! ```

mod core;

pub mod export;
pub mod profiles;

pub use self::core::{
    BaseWarpage, CliffCalibration, CliffZone, Comparison, CriticalLoadConfig, CriticalLoadError,
    FocusStability, Improvement, InvalidConfiguration, LoadCurve, MachineConfiguration,
    MonteCarloConfig, MonteCarloSummary, STABILIZED_RATIO, StabilityResult, Status, Stiffness,
    StiffnessRatio,
};

use twine_core::Model;

impl Model for FocusStability {
    type Input = MachineConfiguration;
    type Output = StabilityResult;
    type Error = InvalidConfiguration;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.evaluate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::length::nanometer;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_thread_safe() {
        assert_send_sync::<FocusStability>();
        assert_send_sync::<MachineConfiguration>();
        assert_send_sync::<StabilityResult>();
        assert_send_sync::<MonteCarloSummary>();
    }

    #[test]
    fn model_call_matches_evaluate() {
        let evaluator = FocusStability::default();
        let config = MachineConfiguration::custom("bench", 500.0, 0.78, 20.0).unwrap();

        let via_model = evaluator.call(&config).unwrap();
        let direct = evaluator.evaluate(&config).unwrap();
        assert_eq!(via_model, direct);
        assert_relative_eq!(via_model.focus_drift.get::<nanometer>(), 43.03, epsilon = 0.01);
    }

    #[test]
    fn evaluations_agree_across_threads() {
        let evaluator = FocusStability::default();
        let config = MachineConfiguration::custom("bench", 600.0, 0.79, 20.0).unwrap();
        let expected = evaluator.evaluate(&config).unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| evaluator.evaluate(&config).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
