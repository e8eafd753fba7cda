//! Named machine profiles.
//!
//! A [`ProfileTable`] maps names to [`MachineConfiguration`]s. The built-in
//! table covers the reference High-NA tool, two higher-power successors and a
//! stabilized support; a JSON file with the same shape can replace it.
//!
//! ```json
//! [
//!   {
//!     "name": "bench",
//!     "thermal_load_w": 500.0,
//!     "focus_budget_nm": 20.0,
//!     "stiffness": { "kind": "fixed", "ratio": 0.5 }
//!   }
//! ]
//! ```

use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Length, Power},
    length::nanometer,
    power::watt,
};

use super::{InvalidConfiguration, LoadCurve, MachineConfiguration, Stiffness};

/// Profile evaluated when none is named.
pub const DEFAULT_PROFILE: &str = "nxe3800e";

/// Errors that can occur while building or querying a profile table.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// No profile has the requested name.
    #[error("unknown profile `{name}` (available: {available})")]
    Unknown { name: String, available: String },

    /// Two profiles share a name.
    #[error("duplicate profile `{0}`")]
    Duplicate(String),

    /// The table has no profiles.
    #[error("profile table is empty")]
    Empty,

    /// A profile holds out-of-range values.
    #[error("invalid profile `{name}`: {source}")]
    Invalid {
        name: String,
        source: InvalidConfiguration,
    },

    /// The profile file is not valid JSON of the expected shape.
    #[error("malformed profile table: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile file could not be read.
    #[error("failed to read profile table: {0}")]
    Io(#[from] io::Error),
}

/// Serialized form of a stiffness source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StiffnessEntry {
    Fixed {
        ratio: f64,
    },
    LoadCurve {
        base: f64,
        span: f64,
        load_scale_w: f64,
        ceiling: f64,
    },
}

impl StiffnessEntry {
    /// Validates and converts into a [`Stiffness`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if a ratio or curve parameter is out of range.
    pub fn to_stiffness(&self) -> Result<Stiffness, InvalidConfiguration> {
        match *self {
            Self::Fixed { ratio } => Stiffness::fixed(ratio),
            Self::LoadCurve {
                base,
                span,
                load_scale_w,
                ceiling,
            } => LoadCurve::new(base, span, Power::new::<watt>(load_scale_w), ceiling)
                .map(Stiffness::LoadCurve),
        }
    }
}

impl From<&Stiffness> for StiffnessEntry {
    fn from(stiffness: &Stiffness) -> Self {
        match stiffness {
            Stiffness::Fixed(ratio) => Self::Fixed {
                ratio: ratio.value(),
            },
            Stiffness::LoadCurve(curve) => Self::LoadCurve {
                base: curve.base().value(),
                span: curve.span(),
                load_scale_w: curve.load_scale().get::<watt>(),
                ceiling: curve.ceiling().value(),
            },
        }
    }
}

/// Serialized form of a machine configuration, with units in the field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
    pub name: String,
    pub thermal_load_w: f64,
    pub focus_budget_nm: f64,
    pub stiffness: StiffnessEntry,
}

impl ProfileEntry {
    /// Validates and converts into a [`MachineConfiguration`].
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] if any value is out of range.
    pub fn to_configuration(&self) -> Result<MachineConfiguration, InvalidConfiguration> {
        MachineConfiguration::new(
            self.name.clone(),
            Power::new::<watt>(self.thermal_load_w),
            self.stiffness.to_stiffness()?,
            Length::new::<nanometer>(self.focus_budget_nm),
        )
    }
}

impl From<&MachineConfiguration> for ProfileEntry {
    fn from(config: &MachineConfiguration) -> Self {
        Self {
            name: config.name().to_owned(),
            thermal_load_w: config.thermal_load().get::<watt>(),
            focus_budget_nm: config.focus_budget().get::<nanometer>(),
            stiffness: config.stiffness().into(),
        }
    }
}

/// Ordered, name-unique collection of machine configurations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTable {
    profiles: Vec<MachineConfiguration>,
}

impl ProfileTable {
    /// Creates a table, rejecting duplicate names.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Empty`] or [`ProfileError::Duplicate`].
    pub fn new(profiles: Vec<MachineConfiguration>) -> Result<Self, ProfileError> {
        if profiles.is_empty() {
            return Err(ProfileError::Empty);
        }
        for (index, profile) in profiles.iter().enumerate() {
            if profiles[..index].iter().any(|p| p.name() == profile.name()) {
                return Err(ProfileError::Duplicate(profile.name().to_owned()));
            }
        }
        Ok(Self { profiles })
    }

    /// The built-in profiles.
    ///
    /// All tools share the reference load curve (`k ≈ 0.78` at 500 W) and a
    /// 20 nm focus budget; they differ in thermal load.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in values; the signature mirrors
    /// [`from_entries`](Self::from_entries).
    pub fn builtin() -> Result<Self, ProfileError> {
        let curve = StiffnessEntry::LoadCurve {
            base: 0.50,
            span: 0.40,
            load_scale_w: 415.0,
            ceiling: 0.95,
        };
        let entry = |name: &str, thermal_load_w: f64, stiffness: StiffnessEntry| ProfileEntry {
            name: name.to_owned(),
            thermal_load_w,
            focus_budget_nm: 20.0,
            stiffness,
        };

        Self::from_entries(&[
            entry(DEFAULT_PROFILE, 500.0, curve),
            entry("exe5000", 600.0, curve),
            entry("nxe4000", 750.0, curve),
            entry("stabilized", 500.0, StiffnessEntry::Fixed { ratio: 0.50 }),
        ])
    }

    /// Builds a table from serialized entries.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Invalid`] naming the first out-of-range entry,
    /// or any error of [`new`](Self::new).
    pub fn from_entries(entries: &[ProfileEntry]) -> Result<Self, ProfileError> {
        let profiles = entries
            .iter()
            .map(|entry| {
                entry
                    .to_configuration()
                    .map_err(|source| ProfileError::Invalid {
                        name: entry.name.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(profiles)
    }

    /// Parses a JSON array of [`ProfileEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Json`] on malformed input, or any error of
    /// [`from_entries`](Self::from_entries).
    pub fn from_json_str(json: &str) -> Result<Self, ProfileError> {
        let entries: Vec<ProfileEntry> = serde_json::from_str(json)?;
        Self::from_entries(&entries)
    }

    /// Reads a JSON profile table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Io`] if the file cannot be read, or any error
    /// of [`from_json_str`](Self::from_json_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Looks up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Unknown`] listing the available names.
    pub fn get(&self, name: &str) -> Result<&MachineConfiguration, ProfileError> {
        self.profiles
            .iter()
            .find(|profile| profile.name() == name)
            .ok_or_else(|| ProfileError::Unknown {
                name: name.to_owned(),
                available: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    /// The profile named [`DEFAULT_PROFILE`] if present, otherwise the first one.
    #[must_use]
    pub fn default_profile(&self) -> &MachineConfiguration {
        self.profiles
            .iter()
            .find(|profile| profile.name() == DEFAULT_PROFILE)
            .unwrap_or(&self.profiles[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &MachineConfiguration> {
        self.profiles.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(MachineConfiguration::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always `false`; a table holds at least one profile.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileTable {
    type Item = &'a MachineConfiguration;
    type IntoIter = std::slice::Iter<'a, MachineConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::lithography::focus::{FocusStability, Status};

    #[test]
    fn builtin_profiles_span_the_cliff() {
        let table = ProfileTable::builtin().unwrap();
        let evaluator = FocusStability::default();

        assert_eq!(
            table.names().collect::<Vec<_>>(),
            ["nxe3800e", "exe5000", "nxe4000", "stabilized"]
        );
        assert_eq!(table.default_profile().name(), DEFAULT_PROFILE);

        let status = |name: &str| evaluator.evaluate(table.get(name).unwrap()).unwrap().status;
        assert_eq!(status("nxe3800e"), Status::FocusFailure);
        assert_eq!(status("exe5000"), Status::FocusFailure);
        assert_eq!(status("nxe4000"), Status::Catastrophic);
        assert_eq!(status("stabilized"), Status::Stable);

        let k = table.get("nxe3800e").unwrap().stiffness_ratio().unwrap();
        assert_relative_eq!(k.value(), 0.78, epsilon = 1e-3);
    }

    #[test]
    fn unknown_name_lists_available_profiles() {
        let table = ProfileTable::builtin().unwrap();
        let error = table.get("twinscan").unwrap_err();
        assert!(matches!(error, ProfileError::Unknown { .. }));
        assert!(error.to_string().contains("nxe3800e, exe5000"));
    }

    #[test]
    fn parses_json_table() {
        let json = r#"[
            {
                "name": "bench",
                "thermal_load_w": 250.0,
                "focus_budget_nm": 15.0,
                "stiffness": { "kind": "fixed", "ratio": 0.6 }
            },
            {
                "name": "hot",
                "thermal_load_w": 900.0,
                "focus_budget_nm": 20.0,
                "stiffness": {
                    "kind": "load_curve",
                    "base": 0.5,
                    "span": 0.4,
                    "load_scale_w": 415.0,
                    "ceiling": 0.95
                }
            }
        ]"#;

        let table = ProfileTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);
        // No profile carries the default name, so the first one stands in.
        assert_eq!(table.default_profile().name(), "bench");

        let bench = table.get("bench").unwrap();
        assert_relative_eq!(bench.thermal_load().get::<watt>(), 250.0);
        assert_relative_eq!(bench.stiffness_ratio().unwrap().value(), 0.6);
        assert!(matches!(bench.stiffness(), Stiffness::Fixed(_)));
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(
            ProfileTable::from_json_str("[]"),
            Err(ProfileError::Empty)
        ));
        assert!(matches!(
            ProfileTable::from_json_str("{"),
            Err(ProfileError::Json(_))
        ));

        let duplicate = r#"[
            {"name": "a", "thermal_load_w": 1.0, "focus_budget_nm": 1.0, "stiffness": {"kind": "fixed", "ratio": 0.5}},
            {"name": "a", "thermal_load_w": 2.0, "focus_budget_nm": 1.0, "stiffness": {"kind": "fixed", "ratio": 0.5}}
        ]"#;
        assert!(matches!(
            ProfileTable::from_json_str(duplicate),
            Err(ProfileError::Duplicate(name)) if name == "a"
        ));

        let negative = r#"[
            {"name": "cold", "thermal_load_w": -1.0, "focus_budget_nm": 1.0, "stiffness": {"kind": "fixed", "ratio": 0.5}}
        ]"#;
        assert!(matches!(
            ProfileTable::from_json_str(negative),
            Err(ProfileError::Invalid {
                name,
                source: InvalidConfiguration::ThermalLoad(_),
            }) if name == "cold"
        ));
    }

    #[test]
    fn entry_mirrors_configuration() {
        let table = ProfileTable::builtin().unwrap();
        for config in &table {
            let restored = ProfileEntry::from(config).to_configuration().unwrap();
            assert_eq!(restored.name(), config.name());
            assert_eq!(restored.stiffness(), config.stiffness());
            assert_relative_eq!(
                restored.thermal_load().get::<watt>(),
                config.thermal_load().get::<watt>()
            );
            assert_relative_eq!(
                restored.focus_budget().get::<nanometer>(),
                config.focus_budget().get::<nanometer>(),
                epsilon = 1e-12
            );
        }
    }
}
