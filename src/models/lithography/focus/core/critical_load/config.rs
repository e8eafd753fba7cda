use twine_solvers::equation::bisection;
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

/// Search settings for the critical thermal load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalLoadConfig {
    /// Lower end of the load bracket. Must be strictly positive.
    pub min_load: Power,

    /// Upper end of the load bracket.
    pub max_load: Power,

    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance for the load search variable.
    pub load_tol: Power,

    /// Absolute tolerance for the drift residual (drift - budget).
    pub drift_tol: Length,
}

impl Default for CriticalLoadConfig {
    fn default() -> Self {
        Self {
            min_load: Power::new::<watt>(1.0),
            max_load: Power::new::<watt>(5000.0),
            max_iters: 100,
            load_tol: Power::new::<watt>(1e-9),
            drift_tol: Length::new::<nanometer>(1e-9),
        }
    }
}

impl CriticalLoadConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.load_tol.get::<watt>(),
            x_rel_tol: 0.0,
            residual_tol: self.drift_tol.get::<nanometer>(),
        }
    }
}
