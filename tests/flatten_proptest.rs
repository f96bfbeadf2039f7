//! Property-based tests for record deserialization
//!
//! Generates random trees, flattens them into wire records, parses them
//! back, and checks structural invariants: the node table round-trips in
//! preorder, leaf ranges exactly partition the leaf list at every
//! internal node, and sibling ranges are contiguous.

use proptest::prelude::*;

use cass_parser::cass::{parse_record, Config, NodeKind, Tree};

/// A generated tree, before flattening.
#[derive(Debug, Clone)]
enum Spec {
    Internal { label: String, children: Vec<Spec> },
    Number(String),
    StringLit(String),
    GlobalVar(String),
    GlobalFun(String),
    LocalVar(String),
}

fn label() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn leaf_spec() -> impl Strategy<Value = Spec> {
    prop_oneof![
        label().prop_map(Spec::Number),
        label().prop_map(Spec::StringLit),
        label().prop_map(Spec::GlobalVar),
        label().prop_map(Spec::GlobalFun),
        label().prop_map(Spec::LocalVar),
    ]
}

fn tree_spec() -> impl Strategy<Value = Spec> {
    let node = leaf_spec().prop_recursive(6, 64, 4, |inner| {
        (label(), prop::collection::vec(inner, 1..4))
            .prop_map(|(label, children)| Spec::Internal { label, children })
    });
    // Roots are always internal so a leading string leaf can never be
    // mistaken for a function-signature field.
    (label(), prop::collection::vec(node, 1..4))
        .prop_map(|(label, children)| Spec::Internal { label, children })
}

/// Flatten a spec to the wire format and record the expected preorder
/// (kind, label, arity) sequence.
fn flatten(spec: &Spec, fields: &mut Vec<String>, expected: &mut Vec<(NodeKind, String, usize)>) {
    match spec {
        Spec::Internal { label, children } => {
            fields.push(format!("I#a#{}", label));
            fields.push(children.len().to_string());
            expected.push((NodeKind::Internal, label.clone(), children.len()));
            for child in children {
                flatten(child, fields, expected);
            }
        }
        Spec::Number(label) => {
            fields.push(format!("N{}", label));
            expected.push((NodeKind::NumberLiteral, label.clone(), 0));
        }
        Spec::StringLit(label) => {
            fields.push(format!("S{}", label));
            expected.push((NodeKind::StringLiteral, label.clone(), 0));
        }
        Spec::GlobalVar(label) => {
            fields.push(format!("V{}", label));
            expected.push((NodeKind::GlobalVariable, label.clone(), 0));
        }
        Spec::GlobalFun(label) => {
            fields.push(format!("F{}", label));
            expected.push((NodeKind::GlobalFunction, label.clone(), 0));
        }
        Spec::LocalVar(label) => {
            fields.push(format!("v{}", label));
            fields.push("-1".to_string());
            fields.push("-1".to_string());
            expected.push((NodeKind::LocalVariable, label.clone(), 0));
        }
    }
}

fn to_record(spec: &Spec) -> (String, Vec<(NodeKind, String, usize)>) {
    let mut fields = Vec::new();
    let mut expected = Vec::new();
    flatten(spec, &mut fields, &mut expected);
    let mut record = expected.len().to_string();
    for field in &fields {
        record.push('\t');
        record.push_str(field);
    }
    (record, expected)
}

fn parse(record: &str) -> Tree {
    parse_record(record, &Config::default())
        .expect("generated record should parse")
        .expect("generated record is not blank")
}

proptest! {
    #[test]
    fn prop_preorder_round_trips(spec in tree_spec()) {
        let (record, expected) = to_record(&spec);
        let tree = parse(&record);

        prop_assert_eq!(tree.len(), expected.len());
        for (id, (kind, label, arity)) in tree.preorder().zip(expected.iter()) {
            let node = tree.node(id);
            prop_assert_eq!(node.kind, *kind);
            prop_assert_eq!(&node.label, label);
            prop_assert_eq!(node.arity, *arity);
            prop_assert_eq!(node.children.len(), *arity);
        }
    }

    #[test]
    fn prop_leaf_ranges_partition_children(spec in tree_spec()) {
        let (record, _) = to_record(&spec);
        let tree = parse(&record);

        prop_assert_eq!(tree.leaf_range(tree.root()), (0, tree.num_leaves()));

        for id in tree.preorder() {
            let node = tree.node(id);
            if node.kind != NodeKind::Internal {
                continue;
            }
            let (start, end) = tree.leaf_range(id);
            prop_assert!(start < end);

            // Children's ranges tile the parent's range contiguously.
            let mut cursor = start;
            for &child in &node.children {
                let (child_start, child_end) = tree.leaf_range(child);
                prop_assert_eq!(child_start, cursor);
                cursor = child_end;
            }
            prop_assert_eq!(cursor, end);
        }
    }

    #[test]
    fn prop_leaves_follow_table_order(spec in tree_spec()) {
        let (record, _) = to_record(&spec);
        let tree = parse(&record);

        let from_table: Vec<_> = tree
            .preorder()
            .filter(|&id| tree.node(id).kind.is_leaf())
            .collect();
        prop_assert_eq!(tree.leaves(), from_table.as_slice());

        for (position, &id) in tree.leaves().iter().enumerate() {
            prop_assert_eq!(tree.leaf_range(id), (position, position + 1));
            prop_assert!(tree.spans(id, position));
        }
    }
}
