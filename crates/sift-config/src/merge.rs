//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and checking value ranges.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, CriteriaSettings,
    parse::{RawConfig, RawCriteriaSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first,
/// lowest precedence last. For every scalar setting the first defined value wins.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let criteria = merge_criteria_settings(configs)?;
    let sources = configs.iter().map(|c| c.path.clone()).collect();

    Ok(Config { criteria, sources })
}

/// Merges criteria settings, taking the first defined value for each field.
fn merge_criteria_settings(configs: &[ParsedConfig]) -> Result<CriteriaSettings, ConfigError> {
    let mut result = CriteriaSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref criteria) = parsed.config.criteria {
            apply_raw_criteria(&mut result, criteria, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw criteria settings to result, overwriting any present values.
fn apply_raw_criteria(
    result: &mut CriteriaSettings,
    raw: &RawCriteriaSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.leading_wildcards {
        result.leading_wildcards = v;
    }
    if let Some(v) = raw.max_clauses {
        if v == 0 {
            return Err(ConfigError::InvalidValue {
                path: path.to_path_buf(),
                key: "criteria.max_clauses".into(),
                message: "must be at least 1".into(),
            });
        }
        result.max_clauses = Some(v);
    }
    Ok(())
}
