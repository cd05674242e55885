//! Configuration validation.
//!
//! Checks a loaded configuration and reports warnings for settings that are legal
//! but likely to be rejected by the search engine that receives the rendered query.

use std::fmt;

use crate::{Config, ENGINE_MAX_CLAUSES};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The clause limit exceeds the engine's stock boolean clause limit.
    ClauseLimitAboveEngineDefault {
        /// The configured limit.
        max_clauses: usize,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClauseLimitAboveEngineDefault { max_clauses } => {
                write!(
                    f,
                    "max_clauses = {max_clauses} exceeds the default engine limit of \
                     {ENGINE_MAX_CLAUSES}; queries may be rejected unless the engine is tuned"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if let Some(max_clauses) = config.criteria.max_clauses
        && max_clauses > ENGINE_MAX_CLAUSES
    {
        warnings.push(ConfigWarning::ClauseLimitAboveEngineDefault { max_clauses });
    }

    warnings
}
