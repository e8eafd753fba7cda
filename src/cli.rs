//! Command-line interface of the `focus-audit` tool.
//!
//! Lives in the library so the command can be driven from tests with an
//! in-memory writer. The binary only installs logging and maps errors to an
//! exit code.

use std::{io, io::Write, path::PathBuf};

use clap::Parser;
use thiserror::Error;
use tracing::info;
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use crate::models::lithography::focus::{
    Comparison, CriticalLoadConfig, CriticalLoadError, FocusStability, InvalidConfiguration,
    MachineConfiguration, MonteCarloConfig, MonteCarloSummary, StabilityResult, Status,
    Stiffness,
    export::{EvaluationRecord, ExportDocument, ExportError, MonteCarloRecord},
    profiles::{ProfileError, ProfileTable},
};

/// Evaluate focus stability of EUV substrate supports near the stiffness cliff.
#[derive(Debug, Clone, Parser)]
#[command(name = "focus-audit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Named machine profile to evaluate [default: nxe3800e, or the first
    /// profile of a --profiles table without it]
    #[arg(long, value_name = "NAME")]
    pub config: Option<String>,

    /// Override the thermal load, in watts
    #[arg(long, value_name = "W", allow_negative_numbers = true)]
    pub power: Option<f64>,

    /// Override the stiffness ratio k_azi with a fixed value
    #[arg(long, value_name = "K", allow_negative_numbers = true)]
    pub ratio: Option<f64>,

    /// Override the focus budget, in nanometers
    #[arg(long, value_name = "NM", allow_negative_numbers = true)]
    pub budget: Option<f64>,

    /// Override the cliff threshold k_cliff (material dependent); the onset
    /// and warning anchors shift with it
    #[arg(long, value_name = "K")]
    pub cliff: Option<f64>,

    /// Evaluate every profile in the table
    #[arg(long)]
    pub all: bool,

    /// Compare against a stabilized support (k_azi = 0.50)
    #[arg(long)]
    pub compare: bool,

    /// Run a Monte Carlo batch with this many samples
    #[arg(long, value_name = "N")]
    pub monte_carlo: Option<usize>,

    /// Seed of the Monte Carlo batch
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Relative spread of the stiffness ratio in the Monte Carlo batch
    #[arg(long, value_name = "FRACTION", default_value_t = 0.05)]
    pub spread: f64,

    /// Search for the thermal load at which drift consumes the budget
    #[arg(long)]
    pub critical_load: bool,

    /// Replace the built-in profile table with a JSON file
    #[arg(long, value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Write a JSON export of all results to this path
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

/// Errors surfaced by the command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Invalid(#[from] InvalidConfiguration),

    #[error("critical load search failed: {0}")]
    CriticalLoad(#[from] CriticalLoadError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

/// Outcome of the critical load search.
enum CriticalLoadOutcome {
    Found(StabilityResult),
    OutOfReach {
        search: CriticalLoadConfig,
        drift_at_min: Length,
        drift_at_max: Length,
    },
}

/// Runs the command, writing the report to `out`.
///
/// Every result is computed before anything is written, so an invalid
/// configuration or a failed search aborts without partial output.
///
/// # Errors
///
/// Returns [`CliError`] on an unknown profile, an invalid configuration, a
/// failed critical load search (other than an unreachable budget), or an
/// I/O failure.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<ExportDocument, CliError> {
    let evaluator = match cli.cliff {
        Some(cliff) => FocusStability::default().with_cliff_ratio(cliff)?,
        None => FocusStability::default(),
    };

    let table = match &cli.profiles {
        Some(path) => ProfileTable::from_path(path)?,
        None => ProfileTable::builtin()?,
    };

    let selected = match &cli.config {
        Some(name) => table.get(name)?,
        None => table.default_profile(),
    };
    let primary = apply_overrides(cli, selected)?;
    let targets = if cli.all {
        table
            .iter()
            .map(|config| apply_overrides(cli, config))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        vec![primary.clone()]
    };

    let evaluations = targets
        .iter()
        .map(|config| evaluator.evaluate(config).map(|result| (config, result)))
        .collect::<Result<Vec<_>, _>>()?;

    let comparison = if cli.compare {
        Some(evaluator.compare(&primary)?)
    } else {
        None
    };

    let batch = cli.monte_carlo.map(|samples| MonteCarloConfig {
        samples,
        seed: cli.seed,
        ratio_spread: cli.spread,
        ..MonteCarloConfig::default()
    });
    let summary = match &batch {
        Some(batch) => Some(evaluator.monte_carlo(&primary, batch)?),
        None => None,
    };

    let critical = if cli.critical_load {
        let search = CriticalLoadConfig::default();
        match evaluator.critical_load(&primary, &search) {
            Ok(result) => Some(CriticalLoadOutcome::Found(result)),
            Err(CriticalLoadError::NotBracketed {
                drift_at_min,
                drift_at_max,
            }) => Some(CriticalLoadOutcome::OutOfReach {
                search,
                drift_at_min,
                drift_at_max,
            }),
            Err(err) => return Err(err.into()),
        }
    } else {
        None
    };

    let mut document = ExportDocument::default();

    for (config, result) in &evaluations {
        render_result(out, result)?;
        document
            .evaluations
            .push(EvaluationRecord::new(config, result));
    }

    if let Some(comparison) = &comparison {
        render_comparison(out, comparison)?;
        document.comparison = Some(comparison.into());
    }

    if let (Some(batch), Some(summary)) = (&batch, &summary) {
        render_monte_carlo(out, &primary, summary)?;
        document.monte_carlo = Some(MonteCarloRecord::new(&primary, batch, summary));
    }

    match &critical {
        Some(CriticalLoadOutcome::Found(result)) => {
            render_critical_load(out, result)?;
            document.critical_load = Some(result.into());
        }
        Some(CriticalLoadOutcome::OutOfReach {
            search,
            drift_at_min,
            drift_at_max,
        }) => {
            writeln!(
                out,
                "critical load: drift does not cross the budget between {} W and {} W \
                 (drift - budget: {:+.2} nm to {:+.2} nm)",
                search.min_load.get::<watt>(),
                search.max_load.get::<watt>(),
                drift_at_min.get::<nanometer>(),
                drift_at_max.get::<nanometer>(),
            )?;
            writeln!(out)?;
        }
        None => {}
    }

    if let Some(path) = &cli.export {
        document.write_to(path)?;
        info!(path = %path.display(), "wrote export");
        writeln!(out, "exported results to {}", path.display())?;
    }

    Ok(document)
}

/// Applies the `--power`, `--ratio` and `--budget` overrides to a profile.
///
/// # Errors
///
/// Returns [`InvalidConfiguration`] if an override is out of range.
pub fn apply_overrides(
    cli: &Cli,
    config: &MachineConfiguration,
) -> Result<MachineConfiguration, InvalidConfiguration> {
    let mut config = config.clone();
    if let Some(power) = cli.power {
        config = config.with_thermal_load(Power::new::<watt>(power))?;
    }
    if let Some(ratio) = cli.ratio {
        config = config.with_stiffness(Stiffness::fixed(ratio)?);
    }
    if let Some(budget) = cli.budget {
        config = config.with_focus_budget(Length::new::<nanometer>(budget))?;
    }
    Ok(config)
}

fn render_result(out: &mut impl Write, result: &StabilityResult) -> io::Result<()> {
    writeln!(out, "== {} ==", result.name)?;
    writeln!(
        out,
        "  thermal load      {:>10.1} W",
        result.thermal_load.get::<watt>()
    )?;
    writeln!(
        out,
        "  stiffness ratio   {:>10.4}   (cliff {:.2}, distance {:+.4})",
        result.stiffness_ratio, result.cliff_threshold, result.cliff_distance
    )?;
    writeln!(out, "  variance factor   {:>10.2} x", result.variance_factor)?;
    writeln!(
        out,
        "  base warpage      {:>10.2} nm",
        result.base_warpage.get::<nanometer>()
    )?;
    writeln!(
        out,
        "  focus drift       {:>10.2} nm",
        result.focus_drift.get::<nanometer>()
    )?;
    writeln!(
        out,
        "  focus budget      {:>10.2} nm",
        result.focus_budget.get::<nanometer>()
    )?;
    writeln!(
        out,
        "  focus margin      {:>+10.2} nm",
        result.focus_margin.get::<nanometer>()
    )?;
    writeln!(out, "  status            {}", result.status)?;
    writeln!(out)
}

fn render_comparison(out: &mut impl Write, comparison: &Comparison) -> io::Result<()> {
    let improvement = &comparison.improvement;
    writeln!(
        out,
        "== comparison: {} vs {} ==",
        comparison.baseline.name, comparison.stabilized.name
    )?;
    writeln!(
        out,
        "  focus drift       {:>10.2} nm -> {:.2} nm",
        comparison.baseline.focus_drift.get::<nanometer>(),
        comparison.stabilized.focus_drift.get::<nanometer>()
    )?;
    writeln!(
        out,
        "  status            {} -> {}",
        comparison.baseline.status, comparison.stabilized.status
    )?;
    writeln!(
        out,
        "  drift reduction   {:>10.1} %  ({:.2}x)",
        improvement.drift_reduction_pct, improvement.drift_reduction_factor
    )?;
    writeln!(
        out,
        "  variance reduction{:>10.1} %",
        improvement.variance_reduction_pct
    )?;
    writeln!(
        out,
        "  margin recovery   {:>+10.2} nm",
        improvement.margin_recovery.get::<nanometer>()
    )?;
    writeln!(out)
}

fn render_monte_carlo(
    out: &mut impl Write,
    config: &MachineConfiguration,
    summary: &MonteCarloSummary,
) -> io::Result<()> {
    let drift = &summary.drift;
    writeln!(
        out,
        "== monte carlo: {} ({} samples) ==",
        config.name(),
        drift.n
    )?;
    writeln!(
        out,
        "  drift mean        {:>10.2} nm (std {:.2} nm, cv {:.1} %)",
        drift.mean, drift.std, drift.cv_pct
    )?;
    writeln!(
        out,
        "  drift range       {:>10.2} nm .. {:.2} nm",
        drift.min, drift.max
    )?;
    for status in Status::ALL {
        let count = summary.status_counts.get(&status).copied().unwrap_or(0);
        writeln!(out, "  {status:<18}{count:>10}")?;
    }
    writeln!(
        out,
        "  failure rate      {:>10.1} %",
        summary.failure_rate_pct()
    )?;
    writeln!(out)
}

fn render_critical_load(out: &mut impl Write, result: &StabilityResult) -> io::Result<()> {
    writeln!(out, "== critical load: {} ==", result.name)?;
    writeln!(
        out,
        "  thermal load      {:>10.1} W (k_azi {:.4}, status {})",
        result.thermal_load.get::<watt>(),
        result.stiffness_ratio,
        result.status
    )?;
    writeln!(out)
}
