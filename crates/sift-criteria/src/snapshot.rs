//! Read-only chain snapshots.
//!
//! Criteria handles share their chain through `Rc` and cannot cross threads. A snapshot is an
//! owned, immutable copy of a finished chain that can be sent to a renderer on any thread or
//! serialized for another process.

use serde::Serialize;

use crate::{CriteriaEntry, Field, node::Conjunction};

/// Immutable copy of one criteria node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    /// Target field.
    pub field: Field,
    /// How the node joins its predecessor.
    pub conjunction: Conjunction,
    /// Whether the node is negated.
    pub negating: bool,
    /// Boost factor, `None` if unset.
    pub boost: Option<f32>,
    /// Predicate entries in insertion order.
    pub entries: Vec<CriteriaEntry>,
}

/// Immutable copy of a whole criteria chain, in chain order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSnapshot {
    /// Nodes in chain order.
    pub nodes: Vec<NodeSnapshot>,
}

impl ChainSnapshot {
    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeSnapshot> {
        self.nodes.iter()
    }
}
