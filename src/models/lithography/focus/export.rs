//! Structured export of evaluation results.
//!
//! The export is a versioned JSON document consumed by chart and report
//! tooling. Quantities are flattened to plain numbers with the unit in the
//! field name (`thermal_load_w`, `focus_drift_nm`, ...).

use std::{collections::BTreeMap, fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{length::nanometer, power::watt};

use crate::support::stats::SampleStatistics;

use super::{
    CliffZone, Comparison, MachineConfiguration, MonteCarloConfig, MonteCarloSummary,
    StabilityResult, Status, profiles::ProfileEntry,
};

/// Version of the export layout. Bumped on incompatible changes.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur while writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write export: {0}")]
    Io(#[from] io::Error),
}

/// Flattened [`StabilityResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub thermal_load_w: f64,
    pub stiffness_ratio: f64,
    pub cliff_threshold: f64,
    pub cliff_distance: f64,
    pub zone: CliffZone,
    pub variance_factor: f64,
    pub base_warpage_nm: f64,
    pub focus_drift_nm: f64,
    pub focus_budget_nm: f64,
    pub focus_margin_nm: f64,
    pub status: Status,
}

impl From<&StabilityResult> for ResultRecord {
    fn from(result: &StabilityResult) -> Self {
        Self {
            name: result.name.clone(),
            thermal_load_w: result.thermal_load.get::<watt>(),
            stiffness_ratio: result.stiffness_ratio,
            cliff_threshold: result.cliff_threshold,
            cliff_distance: result.cliff_distance,
            zone: result.zone,
            variance_factor: result.variance_factor,
            base_warpage_nm: result.base_warpage.get::<nanometer>(),
            focus_drift_nm: result.focus_drift.get::<nanometer>(),
            focus_budget_nm: result.focus_budget.get::<nanometer>(),
            focus_margin_nm: result.focus_margin.get::<nanometer>(),
            status: result.status,
        }
    }
}

/// One configuration and its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub input: ProfileEntry,
    pub result: ResultRecord,
}

impl EvaluationRecord {
    #[must_use]
    pub fn new(config: &MachineConfiguration, result: &StabilityResult) -> Self {
        Self {
            input: config.into(),
            result: result.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub baseline: ResultRecord,
    pub stabilized: ResultRecord,
    pub drift_reduction_pct: f64,
    pub drift_reduction_factor: f64,
    pub variance_reduction_pct: f64,
    pub margin_recovery_nm: f64,
}

impl From<&Comparison> for ComparisonRecord {
    fn from(comparison: &Comparison) -> Self {
        let improvement = &comparison.improvement;
        Self {
            baseline: (&comparison.baseline).into(),
            stabilized: (&comparison.stabilized).into(),
            drift_reduction_pct: improvement.drift_reduction_pct,
            drift_reduction_factor: improvement.drift_reduction_factor,
            variance_reduction_pct: improvement.variance_reduction_pct,
            margin_recovery_nm: improvement.margin_recovery.get::<nanometer>(),
        }
    }
}

/// Batch settings and drift statistics. Individual samples are not exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloRecord {
    pub configuration: String,
    pub seed: u64,
    pub ratio_spread: f64,
    pub load_spread: f64,
    pub drift_nm: SampleStatistics,
    pub status_counts: BTreeMap<Status, usize>,
    pub failure_rate_pct: f64,
}

impl MonteCarloRecord {
    #[must_use]
    pub fn new(
        config: &MachineConfiguration,
        batch: &MonteCarloConfig,
        summary: &MonteCarloSummary,
    ) -> Self {
        Self {
            configuration: config.name().to_owned(),
            seed: batch.seed,
            ratio_spread: batch.ratio_spread,
            load_spread: batch.load_spread,
            drift_nm: summary.drift,
            status_counts: summary.status_counts.clone(),
            failure_rate_pct: summary.failure_rate_pct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalLoadRecord {
    pub configuration: String,
    pub critical_load_w: f64,
    pub result: ResultRecord,
}

impl From<&StabilityResult> for CriticalLoadRecord {
    fn from(result: &StabilityResult) -> Self {
        Self {
            configuration: result.name.clone(),
            critical_load_w: result.thermal_load.get::<watt>(),
            result: result.into(),
        }
    }
}

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub format_version: u32,
    pub evaluations: Vec<EvaluationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_load: Option<CriticalLoadRecord>,
}

impl Default for ExportDocument {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            evaluations: Vec::new(),
            comparison: None,
            monte_carlo: None,
            critical_load: None,
        }
    }
}

impl ExportDocument {
    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Serialize`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if serialization or the write fails.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut json = self.to_json_string()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;

    use crate::models::lithography::focus::FocusStability;

    #[test]
    fn field_names_carry_units() {
        let evaluator = FocusStability::default();
        let config = MachineConfiguration::custom("bench", 500.0, 0.78, 20.0).unwrap();
        let result = evaluator.evaluate(&config).unwrap();

        let document = ExportDocument {
            evaluations: vec![EvaluationRecord::new(&config, &result)],
            ..ExportDocument::default()
        };
        let value: Value = serde_json::from_str(&document.to_json_string().unwrap()).unwrap();

        assert_eq!(value["format_version"], 1);
        assert!(value.get("comparison").is_none());

        let evaluation = &value["evaluations"][0];
        assert_eq!(evaluation["input"]["thermal_load_w"], 500.0);
        assert_eq!(evaluation["input"]["stiffness"]["kind"], "fixed");
        assert_eq!(evaluation["result"]["status"], "FOCUS_FAILURE");
        assert_eq!(evaluation["result"]["zone"], "APPROACHING");
        assert!(evaluation["result"]["focus_drift_nm"].as_f64().unwrap() > 42.0);
        assert!(evaluation["result"]["focus_margin_nm"].as_f64().unwrap() < -22.0);
    }

    #[test]
    fn optional_sections_round_trip() {
        let evaluator = FocusStability::default();
        let config = MachineConfiguration::custom("bench", 500.0, 0.78, 20.0).unwrap();
        let batch = MonteCarloConfig {
            samples: 10,
            ..MonteCarloConfig::default()
        };
        let summary = evaluator.monte_carlo(&config, &batch).unwrap();
        let comparison = evaluator.compare(&config).unwrap();

        let document = ExportDocument {
            comparison: Some((&comparison).into()),
            monte_carlo: Some(MonteCarloRecord::new(&config, &batch, &summary)),
            ..ExportDocument::default()
        };
        let json = document.to_json_string().unwrap();
        assert!(json.contains("\"margin_recovery_nm\""));
        assert!(json.contains("\"cv_pct\""));

        let parsed: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.format_version, FORMAT_VERSION);
        assert_eq!(parsed.monte_carlo.unwrap().drift_nm.n, 10);
        assert_eq!(
            parsed.comparison.unwrap().stabilized.status,
            Status::Stable
        );
    }
}
