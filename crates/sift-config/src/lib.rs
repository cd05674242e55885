//! Configuration system for sift.
//!
//! Builder policy lives in TOML files named `.sift.toml`. Callers hand this crate an
//! ordered list of files (highest precedence first); each file is parsed, merged over the
//! built-in defaults, and range-checked. The resulting [`CriteriaSettings`] are passed to
//! `sift_criteria::Criteria::with_settings`.
//!
//! ```toml
//! [criteria]
//! leading_wildcards = true
//! max_clauses = 1024
//! ```
//!
//! Without `max_clauses` the builder puts no limit on the entries of a node.

#![warn(missing_docs)]

mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;
mod validate;

use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawCriteriaSettings, parse_config_file, parse_config_str};
use serde::{Deserialize, Serialize};
pub use validate::ConfigWarning;
use validate::validate_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".sift.toml";

/// Stock boolean clause limit of Lucene-based engines.
///
/// Only used to warn about configured limits above it; the builder itself is unbounded
/// unless `max_clauses` is set.
pub const ENGINE_MAX_CLAUSES: usize = 1024;

/// Top-level merged configuration for sift.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Criteria builder settings.
    pub criteria: CriteriaSettings,
    /// Files that contributed to this configuration, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Loads configuration from a TOML string.
    ///
    /// `origin` is only used for error reporting and as the recorded source.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config = parse_config_str(contents, origin)?;
        merge_configs(&[ParsedConfig {
            path: origin.to_path_buf(),
            config,
        }])
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.sift.toml` file.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            criteria: self.criteria.clone(),
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Policy applied by the criteria builder to every node of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CriteriaSettings {
    /// Whether `contains` and `ends_with` (leading `*`) predicates are allowed.
    pub leading_wildcards: bool,
    /// Maximum number of predicate entries on a single node. `None` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_clauses: Option<usize>,
}

impl Default for CriteriaSettings {
    fn default() -> Self {
        Self {
            leading_wildcards: true,
            max_clauses: None,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Criteria builder settings.
    criteria: CriteriaSettings,
}
