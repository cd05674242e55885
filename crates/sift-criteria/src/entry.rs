//! Predicate entries and the operation key table.
//!
//! The symbolic key of each [`OperationKind`] is the contract between this crate and the
//! renderer that turns a chain into an engine query: renderers dispatch on the key, so the
//! table below must never change.

use std::{
    fmt,
    hash::{Hash, Hasher},
    mem,
};

use serde::Serialize;

use crate::{
    geo::{BoundingBox, Distance, GeoLocation},
    value::Value,
};

/// The closed set of predicate semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    /// Exact match; several on one node form a value list.
    #[serde(rename = "$equals")]
    Equals,
    /// Leading and trailing wildcard.
    #[serde(rename = "$contains")]
    Contains,
    /// Trailing wildcard.
    #[serde(rename = "$startsWith")]
    StartsWith,
    /// Leading wildcard.
    #[serde(rename = "$endsWith")]
    EndsWith,
    /// Raw engine-native fragment.
    #[serde(rename = "$expression")]
    Expression,
    /// Range with optional open ends.
    #[serde(rename = "$between")]
    Between,
    /// Approximate geo match (bounding box).
    #[serde(rename = "$near")]
    Near,
    /// Exact geo radius match.
    #[serde(rename = "$within")]
    Within,
    /// Edit-distance match.
    #[serde(rename = "$fuzzy")]
    Fuzzy,
    /// Phrase match with slop.
    #[serde(rename = "$sloppy")]
    Sloppy,
}

impl OperationKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Equals,
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Expression,
        Self::Between,
        Self::Near,
        Self::Within,
        Self::Fuzzy,
        Self::Sloppy,
    ];

    /// Returns the stable symbolic key used by renderers.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Equals => "$equals",
            Self::Contains => "$contains",
            Self::StartsWith => "$startsWith",
            Self::EndsWith => "$endsWith",
            Self::Expression => "$expression",
            Self::Between => "$between",
            Self::Near => "$near",
            Self::Within => "$within",
            Self::Fuzzy => "$fuzzy",
            Self::Sloppy => "$sloppy",
        }
    }

    /// Looks up a kind by its symbolic key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The operand of a predicate entry. The variant is determined by the entry's kind.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    /// A single value (equals, contains, starts/ends with, expression).
    Value(Value),
    /// A range. `None` bounds are open-ended.
    Range {
        /// Lower bound, `None` for "from -infinity".
        lower: Option<Value>,
        /// Upper bound, `None` for "to +infinity".
        upper: Option<Value>,
        /// Whether the lower bound is inclusive.
        include_lower: bool,
        /// Whether the upper bound is inclusive.
        include_upper: bool,
    },
    /// A fuzzy term.
    Fuzzy {
        /// Term to match.
        text: String,
        /// Levenshtein similarity in `[0, 1]`; `None` uses the engine default.
        distance: Option<f32>,
    },
    /// A phrase with slop.
    Sloppy {
        /// Multi-term phrase.
        phrase: String,
        /// Maximum number of position moves, always positive.
        slop: u32,
    },
    /// A center point and radius.
    Circle {
        /// Center of the circle.
        center: GeoLocation,
        /// Radius, never negative.
        distance: Distance,
    },
    /// An explicit bounding box.
    BoundingBox(BoundingBox),
}

impl Operand {
    /// Returns the value of a `Value` operand.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (
                Self::Range {
                    lower: al,
                    upper: au,
                    include_lower: ail,
                    include_upper: aiu,
                },
                Self::Range {
                    lower: bl,
                    upper: bu,
                    include_lower: bil,
                    include_upper: biu,
                },
            ) => al == bl && au == bu && ail == bil && aiu == biu,
            (
                Self::Fuzzy {
                    text: at,
                    distance: ad,
                },
                Self::Fuzzy {
                    text: bt,
                    distance: bd,
                },
            ) => at == bt && ad.map(f32::to_bits) == bd.map(f32::to_bits),
            (
                Self::Sloppy {
                    phrase: ap,
                    slop: a_slop,
                },
                Self::Sloppy {
                    phrase: bp,
                    slop: b_slop,
                },
            ) => ap == bp && a_slop == b_slop,
            (
                Self::Circle {
                    center: ac,
                    distance: ad,
                },
                Self::Circle {
                    center: bc,
                    distance: bd,
                },
            ) => ac == bc && ad == bd,
            (Self::BoundingBox(a), Self::BoundingBox(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Operand {}

impl Hash for Operand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Value(v) => v.hash(state),
            Self::Range {
                lower,
                upper,
                include_lower,
                include_upper,
            } => {
                lower.hash(state);
                upper.hash(state);
                include_lower.hash(state);
                include_upper.hash(state);
            }
            Self::Fuzzy { text, distance } => {
                text.hash(state);
                distance.map(f32::to_bits).hash(state);
            }
            Self::Sloppy { phrase, slop } => {
                phrase.hash(state);
                slop.hash(state);
            }
            Self::Circle { center, distance } => {
                center.hash(state);
                distance.hash(state);
            }
            Self::BoundingBox(b) => b.hash(state),
        }
    }
}

/// A single (operation kind, operand) pair attached to a criteria node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CriteriaEntry {
    /// Operation kind, serialized as its symbolic key.
    kind: OperationKind,
    /// Operand matching `kind`.
    operand: Operand,
}

impl CriteriaEntry {
    /// Creates an entry. Callers guarantee the operand variant matches `kind`.
    pub(crate) fn new(kind: OperationKind, operand: Operand) -> Self {
        Self { kind, operand }
    }

    /// Creates an entry carrying a single value.
    pub(crate) fn value(kind: OperationKind, value: impl Into<Value>) -> Self {
        Self::new(kind, Operand::Value(value.into()))
    }

    /// Creates a range entry.
    pub(crate) fn range(
        lower: Option<Value>,
        upper: Option<Value>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        Self::new(
            OperationKind::Between,
            Operand::Range {
                lower,
                upper,
                include_lower,
                include_upper,
            },
        )
    }

    /// Returns the operation kind.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the symbolic key of the operation kind.
    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    /// Returns the operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_table_is_stable() {
        let keys: Vec<&str> = OperationKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(
            keys,
            vec![
                "$equals",
                "$contains",
                "$startsWith",
                "$endsWith",
                "$expression",
                "$between",
                "$near",
                "$within",
                "$fuzzy",
                "$sloppy",
            ]
        );
    }

    #[test]
    fn from_key_reverses_key() {
        for kind in OperationKind::ALL {
            assert_eq!(OperationKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(OperationKind::from_key("$unknown"), None);
        assert_eq!(OperationKind::from_key("equals"), None);
    }

    #[test]
    fn display_prints_key() {
        assert_eq!(OperationKind::StartsWith.to_string(), "$startsWith");
    }

    #[test]
    fn fuzzy_operands_compare_by_bits() {
        let a = Operand::Fuzzy {
            text: "x".into(),
            distance: Some(0.5),
        };
        let b = Operand::Fuzzy {
            text: "x".into(),
            distance: Some(0.5),
        };
        let unset = Operand::Fuzzy {
            text: "x".into(),
            distance: None,
        };
        assert_eq!(a, b);
        assert_ne!(a, unset);
    }

    #[test]
    fn entry_accessors() {
        let entry = CriteriaEntry::value(OperationKind::Equals, "rust");
        assert_eq!(entry.kind(), OperationKind::Equals);
        assert_eq!(entry.key(), "$equals");
        assert_eq!(entry.operand().as_value(), Some(&Value::from("rust")));
    }

    #[test]
    fn range_entry() {
        let entry = CriteriaEntry::range(None, Some(Value::Int(5)), true, false);
        assert_eq!(entry.kind(), OperationKind::Between);
        assert!(entry.operand().as_value().is_none());
    }
}
