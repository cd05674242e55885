//! Configuration file parsing.
//!
//! Parses individual `.sift.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Criteria builder settings section.
    pub criteria: Option<RawCriteriaSettings>,
}

/// Raw criteria builder settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawCriteriaSettings {
    /// Whether predicates with a leading wildcard (`contains`, `ends_with`) are allowed.
    pub leading_wildcards: Option<bool>,
    /// Maximum number of predicate entries on a single criteria node.
    pub max_clauses: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.criteria.is_none());
    }

    #[test]
    fn test_parse_criteria_section() {
        let toml = r#"
[criteria]
leading_wildcards = false
max_clauses = 64
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let criteria = config.criteria.unwrap();
        assert_eq!(criteria.leading_wildcards, Some(false));
        assert_eq!(criteria.max_clauses, Some(64));
    }

    #[test]
    fn test_parse_partial_criteria_section() {
        let config = parse_config("[criteria]\nmax_clauses = 10\n").unwrap();
        let criteria = config.criteria.unwrap();
        assert!(criteria.leading_wildcards.is_none());
        assert_eq!(criteria.max_clauses, Some(10));
    }

    #[test]
    fn test_parse_unknown_key_is_rejected() {
        assert!(parse_config("[criteria]\nwildcards = true\n").is_err());
        assert!(parse_config("[search]\nlimit = 3\n").is_err());
    }

    #[test]
    fn test_parse_error_carries_path() {
        let err = parse_config_str("[criteria\n", Path::new("broken.toml")).unwrap_err();
        match err {
            ConfigError::ParseToml { path, .. } => assert_eq!(path, Path::new("broken.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_negative_clause_limit_is_type_error() {
        assert!(parse_config("[criteria]\nmax_clauses = -1\n").is_err());
    }
}
