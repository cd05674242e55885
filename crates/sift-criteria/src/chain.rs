//! The shared, ordered node sequence behind a group of criteria handles.
//!
//! A chain is a flat list, not a boolean tree: each node carries the conjunction that
//! joins it to its predecessor. Every handle derived from one root shares the same chain,
//! so appending through any of them is visible through all of them.
//!
//! Nodes live in their own cells and do not point back at the chain, so handles, chain and
//! nodes never form a reference cycle.

use std::{cell::RefCell, rc::Rc};

use log::debug;
use sift_config::CriteriaSettings;

use crate::node::Node;

/// Shared reference to a node cell.
pub(crate) type NodeRef = Rc<RefCell<Node>>;

/// Contents of a chain.
#[derive(Debug)]
pub(crate) struct ChainState {
    /// Nodes in the order they joined the chain.
    nodes: Vec<NodeRef>,
    /// Builder policy applied to every node of the chain.
    settings: CriteriaSettings,
}

/// A reference-counted handle to a chain.
#[derive(Debug, Clone)]
pub(crate) struct Chain(Rc<RefCell<ChainState>>);

impl Chain {
    /// Creates a chain containing only `root`.
    pub(crate) fn new(root: NodeRef, settings: CriteriaSettings) -> Self {
        Self(Rc::new(RefCell::new(ChainState {
            nodes: vec![root],
            settings,
        })))
    }

    /// Appends a node.
    pub(crate) fn push(&self, node: NodeRef) {
        let mut state = self.0.borrow_mut();
        {
            let n = node.borrow();
            debug!(
                "chain: appended {} node for '{}' at position {}",
                n.conjunction,
                n.field,
                state.nodes.len()
            );
        }
        state.nodes.push(node);
    }

    /// Appends nodes taken over from other chains, in order.
    pub(crate) fn adopt(&self, nodes: Vec<NodeRef>) {
        let mut state = self.0.borrow_mut();
        debug!(
            "chain: adopted {} node(s) at position {}",
            nodes.len(),
            state.nodes.len()
        );
        state.nodes.extend(nodes);
    }

    /// Returns the nodes in order.
    pub(crate) fn nodes(&self) -> Vec<NodeRef> {
        self.0.borrow().nodes.clone()
    }

    /// Returns the number of nodes.
    pub(crate) fn len(&self) -> usize {
        self.0.borrow().nodes.len()
    }

    /// Returns the chain settings.
    pub(crate) fn settings(&self) -> CriteriaSettings {
        self.0.borrow().settings.clone()
    }

    /// Returns true if both handles refer to the same chain.
    pub(crate) fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns true if no other handle refers to this chain.
    pub(crate) fn is_unique(&self) -> bool {
        Rc::strong_count(&self.0) == 1
    }

    /// Consumes a uniquely held single-node chain and returns that node.
    ///
    /// Returns `None` if another handle still refers to the chain or it holds more than
    /// one node.
    pub(crate) fn into_sole_node(self) -> Option<NodeRef> {
        let mut nodes = Rc::into_inner(self.0)?.into_inner().nodes;
        if nodes.len() == 1 { nodes.pop() } else { None }
    }
}
