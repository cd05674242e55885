//! Integration tests for sift-criteria.
//!
//! Exercises the public builder API end to end: predicates, chaining, and snapshots.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::thread;

use sift_criteria::{
    Conjunction, Criteria, CriteriaEntry, CriteriaError, CriteriaSettings, Distance, Field,
    GeoLocation, OperationKind, Operand, Value,
};

/// Installs a test logger so `RUST_LOG=trace` shows builder activity.
fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn root(name: &str) -> Criteria {
    init_logging();
    Criteria::new(name).unwrap()
}

fn range(entry: &CriteriaEntry) -> (Option<Value>, Option<Value>, bool, bool) {
    match entry.operand() {
        Operand::Range {
            lower,
            upper,
            include_lower,
            include_upper,
        } => (lower.clone(), upper.clone(), *include_lower, *include_upper),
        other => panic!("expected range operand, got {other:?}"),
    }
}

fn names(chain: &[Criteria]) -> Vec<String> {
    chain.iter().map(|c| c.field().name().to_string()).collect()
}

#[test]
fn test_is_in_collapses_duplicates_in_order() {
    let c = root("id").is_in(["b", "a", "b", "c", "a"]).unwrap();
    let values: Vec<Value> = c
        .entries()
        .iter()
        .map(|e| {
            assert_eq!(e.kind(), OperationKind::Equals);
            e.operand().as_value().cloned().unwrap()
        })
        .collect();
    assert_eq!(
        values,
        vec![Value::from("b"), Value::from("a"), Value::from("c")]
    );
}

#[test]
fn test_is_in_flattens_recursively() {
    let c = root("id")
        .is_in([
            Value::from(1),
            Value::from(vec![2, 3]),
            Value::from(vec![Value::from(vec![4])]),
        ])
        .unwrap();
    let values: Vec<Value> = c
        .entries()
        .iter()
        .filter_map(|e| e.operand().as_value().cloned())
        .collect();
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
    assert_eq!(c.entries().len(), 4);
}

#[test]
fn test_null_checks_share_range_and_differ_in_negation() {
    let null = root("name").is_null().unwrap();
    let not_null = root("name").is_not_null().unwrap();

    assert_eq!(null.entries(), not_null.entries());
    assert_eq!(null.entries().len(), 1);
    assert_eq!(null.entries()[0].kind(), OperationKind::Between);
    assert_eq!(range(&null.entries()[0]), (None, None, true, true));
    assert!(null.is_negating());
    assert!(!not_null.is_negating());
}

#[test]
fn test_comparisons_are_ranges() {
    let lt = root("price").less_than(10).unwrap();
    let lt_between = root("price").between_with(Value::Null, 10, true, false).unwrap();
    assert_eq!(lt.entries(), lt_between.entries());
    assert_eq!(range(&lt.entries()[0]), (None, Some(Value::Int(10)), true, false));

    let gte = root("price").greater_than_equal(5).unwrap();
    let gte_between = root("price").between_with(5, Value::Null, true, true).unwrap();
    assert_eq!(gte.entries(), gte_between.entries());
    assert_eq!(range(&gte.entries()[0]), (Some(Value::Int(5)), None, true, true));

    let lte = root("price").less_than_equal(7.5).unwrap();
    assert_eq!(range(&lte.entries()[0]), (None, Some(Value::Float(7.5)), true, true));

    let gt = root("price").greater_than(1).unwrap();
    assert_eq!(range(&gt.entries()[0]), (Some(Value::Int(1)), None, false, true));

    let between = root("price").between(1, None::<i64>).unwrap();
    assert_eq!(range(&between.entries()[0]), (Some(Value::Int(1)), None, true, true));
}

#[test]
fn test_wildcards_reject_separator() {
    let c = root("title");
    for result in [c.contains("a b"), c.starts_with("a b"), c.ends_with("a b")] {
        assert!(matches!(result, Err(CriteriaError::InvalidArgument { .. })));
    }
    assert!(c.entries().is_empty());

    let c = c.contains("ab").unwrap();
    let entries = c.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind(), OperationKind::Contains);
    assert_eq!(entries[0].operand().as_value(), Some(&Value::from("ab")));
}

#[test]
fn test_plural_wildcards_add_one_entry_each() {
    let c = root("title")
        .starts_with_any(["ru", "go"])
        .unwrap()
        .ends_with_any(vec![String::from("st")])
        .unwrap();
    let kinds: Vec<OperationKind> = c.entries().iter().map(CriteriaEntry::kind).collect();
    assert_eq!(
        kinds,
        vec![
            OperationKind::StartsWith,
            OperationKind::StartsWith,
            OperationKind::EndsWith
        ]
    );
}

#[test]
fn test_fuzzy_distance_bounds() {
    let c = root("title");
    assert!(c.fuzzy_with_distance("x", 1.5).is_err());
    assert!(c.fuzzy_with_distance("x", -0.1).is_err());
    assert!(c.entries().is_empty());

    c.fuzzy_with_distance("x", 0.0).unwrap();
    c.fuzzy_with_distance("x", 1.0).unwrap();
    c.fuzzy("x").unwrap();

    let distances: Vec<Option<f32>> = c
        .entries()
        .iter()
        .map(|e| match e.operand() {
            Operand::Fuzzy { distance, .. } => *distance,
            other => panic!("expected fuzzy operand, got {other:?}"),
        })
        .collect();
    assert_eq!(distances, vec![Some(0.0), Some(1.0), None]);

    // NaN is the explicit "unset" distance and collapses with fuzzy()
    c.fuzzy_with_distance("x", f32::NAN).unwrap();
    assert_eq!(c.entries().len(), 3);
}

#[test]
fn test_sloppy_rules() {
    let c = root("body");
    let err = c.sloppy("one two", 0).unwrap_err();
    assert!(err.message().contains("greater than 0"));
    let err = c.sloppy("one", 2).unwrap_err();
    assert!(err.message().contains("multiple terms"));

    c.sloppy("one two", 2).unwrap();
    assert_eq!(
        c.entries()[0].operand(),
        &Operand::Sloppy {
            phrase: "one two".into(),
            slop: 2,
        }
    );
}

#[test]
fn test_chain_order_visible_from_every_handle() {
    let a = root("a");
    let b = a.and("b").unwrap();
    let c = b.or("c").unwrap();

    for handle in [&a, &b, &c] {
        let chain = handle.criteria_chain();
        assert_eq!(names(&chain), vec!["a", "b", "c"]);
        let conjunctions: Vec<Conjunction> = chain.iter().map(Criteria::conjunction).collect();
        assert_eq!(
            conjunctions,
            vec![Conjunction::And, Conjunction::And, Conjunction::Or]
        );
    }

    // Chain handles refer to the same nodes as the originals
    a.criteria_chain()[1].is("via-chain").unwrap();
    assert_eq!(b.entries().len(), 1);
    c.criteria_chain()[0].not();
    assert!(a.is_negating());
}

#[test]
fn test_chain_accepts_field_references() {
    let field = Field::new("title").unwrap();
    let c = Criteria::new(&field).unwrap().or(field.clone()).unwrap();
    assert_eq!(c.field(), field);
    assert!(matches!(c.and(""), Err(CriteriaError::InvalidField { .. })));
    assert!(matches!(c.or(" "), Err(CriteriaError::InvalidField { .. })));
    assert_eq!(c.criteria_chain().len(), 2);
}

#[test]
fn test_or_criteria_copies_entries() {
    let existing = root("tags").is("rust").unwrap();
    let base = root("title");
    let copy = base.or_criteria(&existing).unwrap();

    assert_eq!(copy.field().name(), "tags");
    assert_eq!(copy.conjunction(), Conjunction::Or);
    assert_eq!(copy.entries(), existing.entries());
    assert_eq!(names(&base.criteria_chain()), vec!["title", "tags"]);

    existing.is("go").unwrap();
    assert_eq!(copy.entries().len(), 1);

    copy.is("zig").unwrap();
    assert_eq!(existing.entries().len(), 2);
    assert_eq!(copy.entries().len(), 2);
    assert_ne!(copy.entries(), existing.entries());

    // The source chain is not touched
    assert_eq!(existing.criteria_chain().len(), 1);
}

#[test]
fn test_or_criteria_from_same_chain() {
    let a = root("a").is(1).unwrap();
    let copy = a.or_criteria(&a).unwrap();
    assert_eq!(copy.entries(), a.entries());
    assert_eq!(a.criteria_chain().len(), 2);
}

#[test]
fn test_and_criteria_appends_exactly_the_given_nodes() {
    let a = root("a");
    let b = Criteria::new("b").unwrap().is(1).unwrap();
    let c = Criteria::new("c").unwrap().is(2).unwrap().not();

    let same = a.and_criteria([b, c]).unwrap();
    assert_eq!(same.field().name(), "a");

    let chain = a.criteria_chain();
    assert_eq!(names(&chain), vec!["a", "b", "c"]);
    assert_eq!(chain[1].entries().len(), 1);
    assert!(chain[2].is_negating());

    // Appending through the returned handle extends the same chain
    same.and("d").unwrap();
    assert_eq!(a.criteria_chain().len(), 4);
}

#[test]
fn test_and_criteria_rejects_nodes_from_longer_chains() {
    let a = root("root");
    let y = Criteria::new("x")
        .unwrap()
        .is(1)
        .unwrap()
        .or("y")
        .unwrap()
        .is(2)
        .unwrap();

    let err = a.and_criteria([y]).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidChainLink { .. }));
    assert!(err.message().contains("already chained"));
    assert!(err.suggestion().is_some());
    assert_eq!(names(&a.criteria_chain()), vec!["root"]);
}

#[test]
fn test_and_criteria_rejects_shared_chain() {
    let a = root("a");
    let other = Criteria::new("b").unwrap();
    let keep = other.clone();

    let err = a.and_criteria([other]).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidChainLink { .. }));
    assert!(err.suggestion().is_some());
    assert_eq!(a.criteria_chain().len(), 1);
    assert_eq!(keep.criteria_chain().len(), 1);
}

#[test]
fn test_and_criteria_rejects_own_chain() {
    let a = root("a");
    let b = a.and("b").unwrap();
    let err = a.and_criteria([b]).unwrap_err();
    assert!(matches!(err, CriteriaError::InvalidChainLink { .. }));
    assert_eq!(a.criteria_chain().len(), 2);
}

#[test]
fn test_and_criteria_is_all_or_nothing() {
    let a = root("a");
    let fine = Criteria::new("b").unwrap();
    let shared = Criteria::new("c").unwrap();
    let _keep = shared.clone();

    assert!(a.and_criteria([fine, shared]).is_err());
    assert_eq!(a.criteria_chain().len(), 1);
}

#[test]
fn test_boost() {
    let c = root("title");
    assert!(c.boost(-1.0).is_err());
    assert_eq!(c.boost_value(), None);
    c.boost(2.5).unwrap();
    assert_eq!(c.boost_value(), Some(2.5));
}

#[test]
fn test_snapshot_is_detached() {
    let a = root("title").is("rust").unwrap().boost(3.0).unwrap();
    let b = a.or("tags").unwrap().not();
    let snapshot = a.snapshot();

    b.is("late").unwrap();
    a.and("later").unwrap();

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.nodes[1].entries.is_empty());
    assert!(snapshot.nodes[1].negating);
    assert_eq!(snapshot.nodes[1].conjunction, Conjunction::Or);
    assert_eq!(snapshot.nodes[0].boost, Some(3.0));
    assert_ne!(a.snapshot(), snapshot);
}

#[test]
fn test_snapshot_can_be_rendered_on_another_thread() {
    let c = root("title").is_in(["a", "b"]).unwrap();
    let snapshot = c.snapshot();

    let keys = thread::spawn(move || {
        snapshot
            .iter()
            .flat_map(|node| node.entries.iter().map(CriteriaEntry::key))
            .collect::<Vec<_>>()
    })
    .join()
    .unwrap();

    assert_eq!(keys, vec!["$equals", "$equals"]);
}

#[test]
fn test_snapshot_serializes_with_operation_keys() {
    let here = GeoLocation::new(1.0, 2.0);
    let c = root("title")
        .is("rust")
        .unwrap()
        .or("location")
        .unwrap()
        .within(here, Some(Distance::new(5.0)))
        .unwrap();
    let json = serde_json::to_value(c.snapshot()).unwrap();

    let nodes = json["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0]["field"], "title");
    assert_eq!(nodes[0]["conjunction"], "AND");
    assert_eq!(nodes[0]["boost"], serde_json::Value::Null);
    assert_eq!(nodes[0]["entries"][0]["kind"], "$equals");
    assert_eq!(nodes[0]["entries"][0]["operand"]["value"], "rust");
    assert_eq!(nodes[1]["conjunction"], "OR");
    assert_eq!(nodes[1]["entries"][0]["kind"], "$within");
    assert_eq!(
        nodes[1]["entries"][0]["operand"]["circle"]["distance"]["unit"],
        "kilometers"
    );
}

#[test]
fn test_settings_propagate_through_chain() {
    let settings = CriteriaSettings {
        leading_wildcards: false,
        max_clauses: Some(3),
    };
    let a = Criteria::with_settings("a", settings.clone()).unwrap();
    let c = a.and("b").unwrap().or("c").unwrap();
    assert_eq!(c.settings(), settings);
    assert!(c.ends_with("x").is_err());
    assert!(c.is_in([1, 2, 3, 4]).is_err());
}

#[test]
fn test_default_settings_put_no_limit_on_value_lists() {
    let c = root("id");
    assert_eq!(c.settings().max_clauses, None);

    c.is_in(0..5000).unwrap();
    assert_eq!(c.entries().len(), 5000);
    assert!(c.entries().iter().all(|e| e.kind() == OperationKind::Equals));
}
