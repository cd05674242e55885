//! Input validation shared by the builder operations.
//!
//! Each check returns the normalized input on success so callers can feed it straight
//! into the entry they build.

use log::warn;
use sift_config::CriteriaSettings;

use crate::{CriteriaError, Distance, Value};

/// Wildcard character rendered around wildcarded values.
pub const WILDCARD: &str = "*";

/// Separator between terms of a value; a wildcarded value must be a single token.
pub const VALUE_SEPARATOR: char = ' ';

/// Rejects empty or whitespace-only field names.
pub(crate) fn field_name(name: &str) -> Result<(), CriteriaError> {
    if name.trim().is_empty() {
        return Err(CriteriaError::invalid_field(
            "field name must not be null or empty",
        ));
    }
    Ok(())
}

/// Requires at least one value for a plural builder operation.
pub(crate) fn values_present<T>(values: &[T], operation: &str) -> Result<(), CriteriaError> {
    if values.is_empty() {
        return Err(CriteriaError::invalid_argument(format!(
            "at least one value has to be present for {operation}"
        )));
    }
    Ok(())
}

/// Rejects wildcarded values that contain the value separator.
pub(crate) fn no_separator_in_wildcarded(
    value: &str,
    leading: bool,
    trailing: bool,
) -> Result<(), CriteriaError> {
    if value.contains(VALUE_SEPARATOR) {
        let lead = if leading { WILDCARD } else { "" };
        let trail = if trailing { WILDCARD } else { "" };
        return Err(CriteriaError::invalid_argument(format!(
            "cannot construct query '{lead}\"{value}\"{trail}'; use an expression or multiple clauses instead"
        )));
    }
    Ok(())
}

/// Rejects leading wildcards when the chain settings disable them.
pub(crate) fn leading_wildcard_allowed(
    settings: &CriteriaSettings,
    value: &str,
) -> Result<(), CriteriaError> {
    if !settings.leading_wildcards {
        warn!("leading wildcard requested for {value:?} but disabled by settings");
        return Err(CriteriaError::invalid_argument(format!(
            "leading wildcards are disabled; cannot construct query '{WILDCARD}{value}'"
        )));
    }
    Ok(())
}

/// Checks a fuzzy similarity; NaN means "unset" and maps to `None`.
pub(crate) fn fuzzy_distance(distance: f32) -> Result<Option<f32>, CriteriaError> {
    if distance.is_nan() {
        return Ok(None);
    }
    if !(0.0..=1.0).contains(&distance) {
        return Err(CriteriaError::invalid_argument(format!(
            "levenshtein distance has to be within its bounds (0.0 - 1.0), got {distance}"
        )));
    }
    Ok(Some(distance))
}

/// Checks a phrase slop: positive distance and a multi-term phrase.
pub(crate) fn slop(phrase: &str, distance: i32) -> Result<u32, CriteriaError> {
    let slop = u32::try_from(distance)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| {
            CriteriaError::invalid_argument(format!(
                "slop distance has to be greater than 0, got {distance}"
            ))
        })?;

    if !phrase.contains(VALUE_SEPARATOR) {
        return Err(CriteriaError::invalid_argument(format!(
            "phrase '{phrase}' must consist of multiple terms, separated with spaces"
        )));
    }
    Ok(slop)
}

/// Checks a boost factor.
pub(crate) fn boost(value: f32) -> Result<f32, CriteriaError> {
    if !value.is_finite() {
        return Err(CriteriaError::invalid_argument(format!(
            "boost must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(CriteriaError::invalid_argument(format!(
            "boost must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Checks an optional geo distance; `None` is the zero distance.
pub(crate) fn distance(distance: Option<Distance>) -> Result<Distance, CriteriaError> {
    match distance {
        Some(d) if d.value < 0.0 || d.value.is_nan() => Err(CriteriaError::invalid_argument(
            format!("distance must not be negative, got {}", d.value),
        )),
        Some(d) => Ok(d),
        None => Ok(Distance::zero()),
    }
}

/// Normalizes a range bound: `Null` is open-ended, lists are rejected.
pub(crate) fn range_bound(value: Value) -> Result<Option<Value>, CriteriaError> {
    match value {
        Value::Null => Ok(None),
        Value::List(_) => Err(CriteriaError::invalid_argument(
            "range bounds must be single values, not collections",
        )),
        other => Ok(Some(other)),
    }
}
