//! Field references.

use std::fmt;

use serde::Serialize;

use crate::{CriteriaError, validate};

/// A named target attribute of a criteria node.
///
/// The name is validated on construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Field {
    /// Attribute name, never blank.
    name: String,
}

impl Field {
    /// Creates a field reference, rejecting empty or whitespace-only names.
    pub fn new(name: impl Into<String>) -> Result<Self, CriteriaError> {
        let name = name.into();
        validate::field_name(&name)?;
        Ok(Self { name })
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Conversion into a validated [`Field`].
///
/// Implemented for field references and plain names so that every entry point
/// accepts either.
pub trait IntoField {
    /// Converts `self` into a field, validating the name.
    fn into_field(self) -> Result<Field, CriteriaError>;
}

impl IntoField for Field {
    fn into_field(self) -> Result<Field, CriteriaError> {
        Ok(self)
    }
}

impl IntoField for &Field {
    fn into_field(self) -> Result<Field, CriteriaError> {
        Ok(self.clone())
    }
}

impl IntoField for &str {
    fn into_field(self) -> Result<Field, CriteriaError> {
        Field::new(self)
    }
}

impl IntoField for String {
    fn into_field(self) -> Result<Field, CriteriaError> {
        Field::new(self)
    }
}

impl IntoField for &String {
    fn into_field(self) -> Result<Field, CriteriaError> {
        Field::new(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_name() {
        let field = Field::new("title").unwrap();
        assert_eq!(field.name(), "title");
        assert_eq!(field.to_string(), "title");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            Field::new(""),
            Err(CriteriaError::InvalidField { .. })
        ));
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            Field::new("  \t"),
            Err(CriteriaError::InvalidField { .. })
        ));
    }

    #[test]
    fn into_field_variants() {
        let owned = String::from("tags");
        assert_eq!("tags".into_field().unwrap(), Field::new("tags").unwrap());
        assert_eq!((&owned).into_field().unwrap().name(), "tags");
        assert_eq!(owned.into_field().unwrap().name(), "tags");

        let field = Field::new("body").unwrap();
        assert_eq!((&field).into_field().unwrap(), field);
    }
}
