use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use super::{LoadCurve, MachineConfiguration, Stiffness};

/// Ad-hoc configuration with a fixed stiffness ratio.
pub(super) fn fixed(load_w: f64, ratio: f64, budget_nm: f64) -> MachineConfiguration {
    MachineConfiguration::custom("test", load_w, ratio, budget_nm).unwrap()
}

/// Reference load curve, `k(500 W) ≈ 0.78`.
pub(super) fn reference_curve() -> LoadCurve {
    LoadCurve::new(0.50, 0.40, Power::new::<watt>(415.0), 0.95).unwrap()
}

/// Reference tool at 500 W with a 20 nm budget.
pub(super) fn reference() -> MachineConfiguration {
    MachineConfiguration::new(
        "reference",
        Power::new::<watt>(500.0),
        Stiffness::LoadCurve(reference_curve()),
        Length::new::<nanometer>(20.0),
    )
    .unwrap()
}
