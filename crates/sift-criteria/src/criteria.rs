//! The criteria handle and its fluent builder operations.

use std::{cell::RefCell, fmt, rc::Rc};

use log::debug;
use sift_config::CriteriaSettings;

use crate::{
    BoundingBox, CriteriaEntry, CriteriaError, Distance, Field, GeoLocation, IntoField,
    OperationKind, Operand, Value,
    chain::{Chain, NodeRef},
    node::{Conjunction, Node},
    snapshot::ChainSnapshot,
    validate,
};

/// A handle to one node of a criteria chain.
///
/// Handles are cheap to clone; clones refer to the same node. Every handle derived from one
/// root through [`and`](Self::and) / [`or`](Self::or) shares one chain, and appending through
/// any of them is visible through all of them.
///
/// Builder operations take `&self` and return a handle, so calls can be chained fluently or
/// issued one by one on a kept handle. Operations that can reject their input return
/// `Result`; a rejected call leaves the node unchanged.
///
/// Handles are neither `Send` nor `Sync`. Build the chain on one thread, then hand a
/// [`ChainSnapshot`] to other threads.
#[derive(Clone)]
pub struct Criteria {
    /// The node this handle refers to.
    node: NodeRef,
    /// The chain the node belongs to.
    chain: Chain,
}

impl Criteria {
    /// Creates a root criteria for `field` with a fresh chain and default settings.
    ///
    /// This is the `where` entry point of the builder.
    pub fn new(field: impl IntoField) -> Result<Self, CriteriaError> {
        Self::with_settings(field, CriteriaSettings::default())
    }

    /// Creates a root criteria whose chain applies `settings` to every node.
    pub fn with_settings(
        field: impl IntoField,
        settings: CriteriaSettings,
    ) -> Result<Self, CriteriaError> {
        let field = field.into_field()?;
        let node = Rc::new(RefCell::new(Node::new(field, Conjunction::And)));
        let chain = Chain::new(Rc::clone(&node), settings);
        Ok(Self { node, chain })
    }

    /// Creates a node for `field` and appends it to this chain.
    fn link(&self, field: Field, conjunction: Conjunction) -> Self {
        let node = Rc::new(RefCell::new(Node::new(field, conjunction)));
        self.chain.push(Rc::clone(&node));
        Self {
            node,
            chain: self.chain.clone(),
        }
    }

    /// Returns a handle for `node` on this chain.
    fn handle(&self, node: NodeRef) -> Self {
        Self {
            node,
            chain: self.chain.clone(),
        }
    }

    // --- chaining ---

    /// Appends a new AND node for `field` and returns it.
    pub fn and(&self, field: impl IntoField) -> Result<Self, CriteriaError> {
        Ok(self.link(field.into_field()?, Conjunction::And))
    }

    /// Appends already built criteria to this chain and returns `self`.
    ///
    /// Exactly the given nodes are appended, in order; no new nodes are created. The
    /// criteria are taken by value and each must be a standalone node: the only node of its
    /// chain, with no other handle to it. Anything else is rejected so no node ever ends up
    /// in two chains. All criteria are checked before any is appended.
    pub fn and_criteria(
        &self,
        criteria: impl IntoIterator<Item = Self>,
    ) -> Result<Self, CriteriaError> {
        let chains: Vec<Chain> = criteria
            .into_iter()
            .map(|Self { node, chain }| {
                // Release the node handle so only the chain keeps it alive
                drop(node);
                chain
            })
            .collect();

        validate::values_present(&chains, "and_criteria")?;
        for chain in &chains {
            if chain.ptr_eq(&self.chain) {
                return Err(CriteriaError::invalid_chain_link(
                    "criteria is already part of this chain",
                ));
            }
            if !chain.is_unique() {
                return Err(CriteriaError::invalid_chain_link(
                    "criteria chain is shared by another handle",
                ));
            }
            if chain.len() != 1 {
                return Err(CriteriaError::invalid_chain_link(format!(
                    "criteria is already chained to {} other node(s)",
                    chain.len() - 1
                )));
            }
        }

        let adopted = chains
            .into_iter()
            .map(|chain| {
                chain.into_sole_node().ok_or_else(|| {
                    CriteriaError::invalid_chain_link("criteria chain is shared by another handle")
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.chain.adopt(adopted);
        Ok(self.clone())
    }

    /// Appends a new OR node for `field` and returns it.
    pub fn or(&self, field: impl IntoField) -> Result<Self, CriteriaError> {
        Ok(self.link(field.into_field()?, Conjunction::Or))
    }

    /// Appends a new OR node for the field of `other`, carrying a copy of its entries.
    ///
    /// Entries are copied by value: later changes to either node do not affect the other.
    pub fn or_criteria(&self, other: &Self) -> Result<Self, CriteriaError> {
        let (field, entries) = {
            let source = other.node.borrow();
            (
                source.field.clone(),
                source.entries.iter().cloned().collect::<Vec<_>>(),
            )
        };

        let max_clauses = self.chain.settings().max_clauses;
        let mut node = Node::new(field, Conjunction::Or);
        node.insert_all(entries, max_clauses)?;

        let node = Rc::new(RefCell::new(node));
        self.chain.push(Rc::clone(&node));
        Ok(self.handle(node))
    }

    // --- predicates ---

    /// Adds an entry set to this node, optionally negating it.
    fn apply(&self, entries: Vec<CriteriaEntry>, negate: bool) -> Result<Self, CriteriaError> {
        let max_clauses = self.chain.settings().max_clauses;
        let mut node = self.node.borrow_mut();
        node.insert_all(entries, max_clauses)?;
        if negate {
            node.negating = true;
        }
        drop(node);
        Ok(self.clone())
    }

    /// Matches `value` exactly.
    ///
    /// `Null` is a null check ([`is_null`](Self::is_null)) and a `List` is a value list
    /// ([`is_in`](Self::is_in)). Text containing whitespace is stored verbatim; escaping it
    /// as a single token is up to the renderer.
    pub fn is(&self, value: impl Into<Value>) -> Result<Self, CriteriaError> {
        match value.into() {
            Value::Null => self.is_null(),
            Value::List(values) => self.is_in(values),
            other => self.apply(vec![CriteriaEntry::value(OperationKind::Equals, other)], false),
        }
    }

    /// Matches any of `values`.
    ///
    /// Nested lists are flattened recursively into one disjunctive set of equality entries;
    /// duplicates collapse. A `Null` element adds a null check. Fails if `values` is empty.
    pub fn is_in<I, V>(&self, values: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        validate::values_present(&values, "is_in")?;

        let mut entries = Vec::with_capacity(values.len());
        let mut negate = false;
        flatten_values(values, &mut entries, &mut negate);
        self.apply(entries, negate)
    }

    /// Matches documents without a value for the field.
    pub fn is_null(&self) -> Result<Self, CriteriaError> {
        self.apply(vec![CriteriaEntry::range(None, None, true, true)], true)
    }

    /// Matches documents with any value for the field.
    pub fn is_not_null(&self) -> Result<Self, CriteriaError> {
        self.apply(vec![CriteriaEntry::range(None, None, true, true)], false)
    }

    /// Builds wildcarded entries, checking every value before any is added.
    fn wildcarded<I, S>(
        &self,
        kind: OperationKind,
        values: I,
        leading: bool,
        trailing: bool,
    ) -> Result<Vec<CriteriaEntry>, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let settings = self.chain.settings();
        values
            .into_iter()
            .map(|value| {
                let value = value.as_ref();
                validate::no_separator_in_wildcarded(value, leading, trailing)?;
                if leading {
                    validate::leading_wildcard_allowed(&settings, value)?;
                }
                Ok(CriteriaEntry::value(kind, value))
            })
            .collect()
    }

    /// Matches values containing `s` (leading and trailing wildcard).
    ///
    /// `s` must be a single token: a space is rejected. Leading wildcards can be slow or
    /// unsupported depending on the schema, and can be disabled through settings.
    pub fn contains(&self, s: &str) -> Result<Self, CriteriaError> {
        self.contains_any([s])
    }

    /// Adds a [`contains`](Self::contains) entry per value. Fails if `values` is empty.
    pub fn contains_any<I, S>(&self, values: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.wildcarded(OperationKind::Contains, values, true, true)?;
        validate::values_present(&entries, "contains")?;
        self.apply(entries, false)
    }

    /// Matches values starting with `s` (trailing wildcard). A space is rejected.
    pub fn starts_with(&self, s: &str) -> Result<Self, CriteriaError> {
        self.starts_with_any([s])
    }

    /// Adds a [`starts_with`](Self::starts_with) entry per value. Fails if `values` is empty.
    pub fn starts_with_any<I, S>(&self, values: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.wildcarded(OperationKind::StartsWith, values, false, true)?;
        validate::values_present(&entries, "starts_with")?;
        self.apply(entries, false)
    }

    /// Matches values ending with `s` (leading wildcard). A space is rejected.
    pub fn ends_with(&self, s: &str) -> Result<Self, CriteriaError> {
        self.ends_with_any([s])
    }

    /// Adds an [`ends_with`](Self::ends_with) entry per value. Fails if `values` is empty.
    pub fn ends_with_any<I, S>(&self, values: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = self.wildcarded(OperationKind::EndsWith, values, true, false)?;
        validate::values_present(&entries, "ends_with")?;
        self.apply(entries, false)
    }

    /// Negates this node. Idempotent.
    pub fn not(&self) -> Self {
        self.node.borrow_mut().negating = true;
        self.clone()
    }

    /// Matches `s` approximately, with the engine's default edit distance.
    pub fn fuzzy(&self, s: &str) -> Result<Self, CriteriaError> {
        self.fuzzy_with_distance(s, f32::NAN)
    }

    /// Matches `s` approximately with a Levenshtein similarity in `[0, 1]`.
    ///
    /// NaN means "unset" and behaves like [`fuzzy`](Self::fuzzy).
    pub fn fuzzy_with_distance(&self, s: &str, distance: f32) -> Result<Self, CriteriaError> {
        let distance = validate::fuzzy_distance(distance)?;
        let entry = CriteriaEntry::new(
            OperationKind::Fuzzy,
            Operand::Fuzzy {
                text: s.to_string(),
                distance,
            },
        );
        self.apply(vec![entry], false)
    }

    /// Matches a multi-term phrase whose terms may be up to `distance` positions apart.
    ///
    /// `distance` must be positive and `phrase` must contain a space.
    pub fn sloppy(&self, phrase: &str, distance: i32) -> Result<Self, CriteriaError> {
        let slop = validate::slop(phrase, distance)?;
        let entry = CriteriaEntry::new(
            OperationKind::Sloppy,
            Operand::Sloppy {
                phrase: phrase.to_string(),
                slop,
            },
        );
        self.apply(vec![entry], false)
    }

    /// Adds a raw engine-native query fragment, passed through untouched.
    pub fn expression(&self, s: &str) -> Result<Self, CriteriaError> {
        self.apply(vec![CriteriaEntry::value(OperationKind::Expression, s)], false)
    }

    /// Sets the boost factor of this node. Negative, NaN and infinite factors are rejected.
    pub fn boost(&self, value: f32) -> Result<Self, CriteriaError> {
        let value = validate::boost(value)?;
        self.node.borrow_mut().boost = Some(value);
        Ok(self.clone())
    }

    /// Matches the inclusive range `[lower, upper]`. `Null` bounds are open-ended.
    pub fn between(
        &self,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
    ) -> Result<Self, CriteriaError> {
        self.between_with(lower, upper, true, true)
    }

    /// Matches a range with explicit bound inclusion. `Null` bounds are open-ended.
    pub fn between_with(
        &self,
        lower: impl Into<Value>,
        upper: impl Into<Value>,
        include_lower: bool,
        include_upper: bool,
    ) -> Result<Self, CriteriaError> {
        let lower = validate::range_bound(lower.into())?;
        let upper = validate::range_bound(upper.into())?;
        self.apply(
            vec![CriteriaEntry::range(
                lower,
                upper,
                include_lower,
                include_upper,
            )],
            false,
        )
    }

    /// Matches values below `upper`: `[* TO upper}`.
    pub fn less_than(&self, upper: impl Into<Value>) -> Result<Self, CriteriaError> {
        self.between_with(Value::Null, upper, true, false)
    }

    /// Matches values up to and including `upper`: `[* TO upper]`.
    pub fn less_than_equal(&self, upper: impl Into<Value>) -> Result<Self, CriteriaError> {
        self.between_with(Value::Null, upper, true, true)
    }

    /// Matches values above `lower`: `{lower TO *]`.
    pub fn greater_than(&self, lower: impl Into<Value>) -> Result<Self, CriteriaError> {
        self.between_with(lower, Value::Null, false, true)
    }

    /// Matches values from `lower` on: `[lower TO *]`.
    pub fn greater_than_equal(&self, lower: impl Into<Value>) -> Result<Self, CriteriaError> {
        self.between_with(lower, Value::Null, true, true)
    }

    /// Matches locations within `distance` of `location` (exact radius).
    ///
    /// A missing distance is zero; a negative one is rejected.
    pub fn within(
        &self,
        location: GeoLocation,
        distance: Option<Distance>,
    ) -> Result<Self, CriteriaError> {
        self.circle(OperationKind::Within, location, distance)
    }

    /// Matches locations near `location`, approximated by the box around the radius.
    ///
    /// Cheaper but less exact than [`within`](Self::within). Same distance rules.
    pub fn near(
        &self,
        location: GeoLocation,
        distance: Option<Distance>,
    ) -> Result<Self, CriteriaError> {
        self.circle(OperationKind::Near, location, distance)
    }

    /// Matches locations inside an explicit bounding box.
    pub fn near_box(&self, bounding_box: BoundingBox) -> Result<Self, CriteriaError> {
        let entry = CriteriaEntry::new(OperationKind::Near, Operand::BoundingBox(bounding_box));
        self.apply(vec![entry], false)
    }

    /// Adds a center-and-radius geo entry.
    fn circle(
        &self,
        kind: OperationKind,
        center: GeoLocation,
        distance: Option<Distance>,
    ) -> Result<Self, CriteriaError> {
        let distance = validate::distance(distance)?;
        let entry = CriteriaEntry::new(kind, Operand::Circle { center, distance });
        self.apply(vec![entry], false)
    }

    // --- read accessors ---

    /// Returns the target field.
    pub fn field(&self) -> Field {
        self.node.borrow().field.clone()
    }

    /// Returns a copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<CriteriaEntry> {
        self.node.borrow().entries.iter().cloned().collect()
    }

    /// Returns how this node joins its predecessor.
    pub fn conjunction(&self) -> Conjunction {
        self.node.borrow().conjunction
    }

    /// Returns a handle to every node of the chain, in order.
    pub fn criteria_chain(&self) -> Vec<Self> {
        self.chain
            .nodes()
            .into_iter()
            .map(|node| self.handle(node))
            .collect()
    }

    /// Returns true if this node is negated.
    pub fn is_negating(&self) -> bool {
        self.node.borrow().negating
    }

    /// Returns the boost factor, `None` if unset.
    pub fn boost_value(&self) -> Option<f32> {
        self.node.borrow().boost
    }

    /// Returns the settings of this chain.
    ///
    /// Settings usually come from `.sift.toml` files; renderers read them here to apply
    /// the same policy (e.g. whether leading wildcards are allowed) as the builder did.
    pub fn settings(&self) -> CriteriaSettings {
        self.chain.settings()
    }

    /// Copies the whole chain into an immutable, thread-safe snapshot.
    pub fn snapshot(&self) -> ChainSnapshot {
        let nodes = self
            .chain
            .nodes()
            .iter()
            .map(|node| node.borrow().snapshot())
            .collect();
        let snapshot = ChainSnapshot { nodes };
        debug!("chain: snapshot of {} node(s)", snapshot.len());
        snapshot
    }
}

/// Recursively flattens `values` into equality entries.
///
/// `Null` elements become a null-check range and request negation of the node.
fn flatten_values(values: Vec<Value>, entries: &mut Vec<CriteriaEntry>, negate: &mut bool) {
    for value in values {
        match value {
            Value::List(inner) => flatten_values(inner, entries, negate),
            Value::Null => {
                entries.push(CriteriaEntry::range(None, None, true, true));
                *negate = true;
            }
            scalar => entries.push(CriteriaEntry::value(OperationKind::Equals, scalar)),
        }
    }
}

impl fmt::Debug for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.node.borrow();
        f.debug_struct("Criteria")
            .field("field", &node.field)
            .field("conjunction", &node.conjunction)
            .field("negating", &node.negating)
            .field("boost", &node.boost)
            .field("entries", &node.entries)
            .field("chain_len", &self.chain.len())
            .finish()
    }
}
