//! Criteria node state.
//!
//! A node is the mutable cell behind every [`Criteria`](crate::Criteria) handle. It owns the
//! field, the ordered entry set, the boost and negation state, and its conjunction.

use std::fmt;

use indexmap::IndexSet;
use log::trace;
use serde::Serialize;

use crate::{CriteriaEntry, CriteriaError, Field, snapshot::NodeSnapshot};

/// Operator string joining an AND node to its predecessor.
pub const AND_OPERATOR: &str = " AND ";

/// Operator string joining an OR node to its predecessor.
pub const OR_OPERATOR: &str = " OR ";

/// How a node joins to the node before it in the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Conjunction {
    /// Both sides must match. Roots and `and` nodes report this.
    #[default]
    And,
    /// Either side may match. Nodes created through `or` report this.
    Or,
}

impl Conjunction {
    /// Returns the bare symbol (`AND` / `OR`).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Returns the operator padded with spaces, ready to join rendered nodes.
    pub fn operator(self) -> &'static str {
        match self {
            Self::And => AND_OPERATOR,
            Self::Or => OR_OPERATOR,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Mutable state of one criteria node.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Target field.
    pub(crate) field: Field,
    /// Predicate entries in first-insertion order, duplicates collapsed.
    pub(crate) entries: IndexSet<CriteriaEntry>,
    /// Boost factor, `None` while unset.
    pub(crate) boost: Option<f32>,
    /// Whether the node is negated.
    pub(crate) negating: bool,
    /// How the node joins its predecessor.
    pub(crate) conjunction: Conjunction,
}

impl Node {
    /// Creates an empty node.
    pub(crate) fn new(field: Field, conjunction: Conjunction) -> Self {
        Self {
            field,
            entries: IndexSet::new(),
            boost: None,
            negating: false,
            conjunction,
        }
    }

    /// Inserts entries as one unit.
    ///
    /// Either every entry is inserted or, when a limit is set and the distinct new entries
    /// would push the node past it, nothing is. `None` means unbounded.
    pub(crate) fn insert_all(
        &mut self,
        entries: Vec<CriteriaEntry>,
        max_clauses: Option<usize>,
    ) -> Result<(), CriteriaError> {
        if let Some(max_clauses) = max_clauses {
            let fresh: IndexSet<&CriteriaEntry> = entries
                .iter()
                .filter(|entry| !self.entries.contains(*entry))
                .collect();

            let total = self.entries.len() + fresh.len();
            if total > max_clauses {
                return Err(CriteriaError::invalid_argument(format!(
                    "field '{}' would have {total} clauses, limit is {max_clauses}",
                    self.field
                )));
            }
        }

        for entry in entries {
            let key = entry.key();
            if self.entries.insert(entry) {
                trace!("{}: added {key} entry", self.field);
            } else {
                trace!("{}: collapsed duplicate {key} entry", self.field);
            }
        }
        Ok(())
    }

    /// Copies the node into its read-only form.
    pub(crate) fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            field: self.field.clone(),
            conjunction: self.conjunction,
            negating: self.negating,
            boost: self.boost,
            entries: self.entries.iter().cloned().collect(),
        }
    }
}
