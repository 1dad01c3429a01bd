use tracing::instrument;

use crate::domain::{Record, TreeFields, Value};

/// Flattens a forest of nested records into a flat, parent-linked set.
///
/// Roots and their descendants are visited depth-first in pre-order, children
/// in their sequence order, so every record lands immediately before its own
/// subtree. Each visited record is copied shallowly without the children
/// field; records reached through a child link additionally carry their
/// parent's identifier value under the reference field (replacing any value
/// already stored there, in place). Records passed directly as roots never
/// receive a reference field, and no deduplication is attempted when the
/// same record also appears nested somewhere else.
///
/// Only children held in a sequence are traversed, and only record elements
/// of that sequence are visited. A parent without an identifier value
/// contributes no reference field to its children.
///
/// The input is never mutated; every output record is newly allocated.
#[must_use]
#[instrument(skip_all, fields(roots = forest.len()))]
pub fn flatten(forest: &[Record], fields: &TreeFields) -> Vec<Record> {
    let mut flat = Vec::new();
    for root in forest {
        flatten_into(root, None, fields, &mut flat);
    }
    tracing::debug!(records = flat.len(), "flattened forest");
    flat
}

/// Copies `record` (minus its children field) into `flat`, then recurses
/// into its children. Recursion depth is bounded by the depth of the input
/// tree.
fn flatten_into(
    record: &Record,
    parent_id: Option<&Value>,
    fields: &TreeFields,
    flat: &mut Vec<Record>,
) {
    let mut copy = Record::with_capacity(record.len());
    for (name, value) in record.iter() {
        if name == fields.children.as_str() {
            continue;
        }
        copy.insert(name, value.clone());
    }
    if let Some(id) = parent_id {
        copy.insert(fields.reference.as_str(), id.clone());
    }
    flat.push(copy);

    if let Some(Value::Seq(children)) = record.get(&fields.children) {
        let parent_id = record.get(&fields.id);
        for child in children {
            if let Value::Record(child) = child {
                flatten_into(child, parent_id, fields, flat);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> TreeFields {
        TreeFields::parse("id", "parent", "children").unwrap()
    }

    fn leaf(id: i64, title: &str) -> Record {
        Record::from_iter([("id", Value::from(id)), ("title", Value::from(title))])
    }

    fn branch(id: i64, title: &str, children: Vec<Record>) -> Record {
        Record::from_iter([
            ("id", Value::from(id)),
            ("title", Value::from(title)),
            (
                "children",
                Value::Seq(children.into_iter().map(Value::Record).collect()),
            ),
        ])
    }

    #[test]
    fn visits_in_pre_order_and_links_children_to_parents() {
        let forest = vec![branch(
            1,
            "A root node",
            vec![
                leaf(2, "A child"),
                branch(3, "Another child", vec![leaf(4, "A leaf")]),
            ],
        )];

        let flat = flatten(&forest, &fields());

        let ids: Vec<Option<&Value>> = flat.iter().map(|record| record.get("id")).collect();
        assert_eq!(
            ids,
            [
                Some(&Value::from(1)),
                Some(&Value::from(2)),
                Some(&Value::from(3)),
                Some(&Value::from(4)),
            ]
        );

        let parents: Vec<Option<&Value>> = flat.iter().map(|record| record.get("parent")).collect();
        assert_eq!(
            parents,
            [
                None,
                Some(&Value::from(1)),
                Some(&Value::from(1)),
                Some(&Value::from(3)),
            ]
        );

        assert!(flat.iter().all(|record| !record.contains_field("children")));
    }

    #[test]
    fn roots_never_receive_a_reference_field() {
        let forest = vec![leaf(1, "one"), leaf(2, "two")];
        let flat = flatten(&forest, &fields());
        assert!(flat.iter().all(|record| !record.contains_field("parent")));
    }

    #[test]
    fn overwrites_a_stale_reference_in_place() {
        let mut child = leaf(2, "child");
        child.insert("parent", 99);
        child.insert("note", "keep");
        let forest = vec![branch(1, "root", vec![child])];

        let flat = flatten(&forest, &fields());

        let names: Vec<&str> = flat[1].iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["id", "title", "parent", "note"]);
        assert_eq!(flat[1].get("parent"), Some(&Value::from(1)));
    }

    #[test]
    fn drops_a_children_field_that_is_not_a_sequence() {
        let mut record = leaf(1, "odd");
        record.insert("children", "not a sequence");

        let flat = flatten(&[record], &fields());

        assert_eq!(flat.len(), 1);
        assert!(!flat[0].contains_field("children"));
    }

    #[test]
    fn skips_non_record_children() {
        let record = Record::from_iter([
            ("id", Value::from(1)),
            (
                "children",
                Value::Seq(vec![Value::from("stray"), Value::Record(leaf(2, "real"))]),
            ),
        ]);

        let flat = flatten(&[record], &fields());

        assert_eq!(flat.len(), 2);
        assert_eq!(flat[1].get("id"), Some(&Value::from(2)));
    }

    #[test]
    fn parent_without_identifier_leaves_children_unlinked() {
        let record = Record::from_iter([
            ("title", Value::from("anonymous root")),
            (
                "children",
                Value::Seq(vec![Value::Record(leaf(2, "child"))]),
            ),
        ]);

        let flat = flatten(&[record], &fields());

        assert_eq!(flat.len(), 2);
        assert!(!flat[1].contains_field("parent"));
    }

    #[test]
    fn input_is_left_untouched() {
        let forest = vec![branch(1, "root", vec![leaf(2, "child")])];
        let before = forest.clone();

        let _ = flatten(&forest, &fields());

        assert_eq!(forest, before);
    }
}
