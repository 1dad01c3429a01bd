use std::collections::HashMap;

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use thiserror::Error;
use tracing::instrument;

use crate::domain::{Record, TreeFields, Value};

/// Options for [`grow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowOptions {
    /// Strip the reference field from every record that was collected as a
    /// child. Roots are unaffected.
    pub remove_reference: bool,

    /// Fail with [`GrowError::DuplicateIdentifier`] instead of silently
    /// letting a later record replace an earlier one with the same
    /// identifier.
    pub reject_duplicates: bool,
}

/// Errors raised by [`grow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrowError {
    /// A record carries no value usable as an identifier: the field is
    /// absent, null, or holds a composite value.
    #[error("record at position {position} has no usable identifier in field `{field}`")]
    MissingIdentifier {
        /// Zero-based position of the record in the input.
        position: usize,
        /// Name of the identifier field.
        field: String,
    },

    /// Two records share an identifier (only raised under
    /// [`GrowOptions::reject_duplicates`]).
    #[error("duplicate identifier `{identifier}`")]
    DuplicateIdentifier {
        /// The identifier that occurred more than once.
        identifier: String,
    },

    /// A reference names an identifier absent from the input collection.
    #[error("unknown parent reference `{reference}`")]
    UnknownReference {
        /// Lexical form of the unresolvable reference value.
        reference: String,
    },

    /// Parent references form a cycle, so no record in it can become a root.
    #[error("parent references form a cycle: {}", .identifiers.join(" -> "))]
    Cycle {
        /// Identifiers of the records in the cycle, in input order.
        identifiers: Vec<String>,
    },
}

/// Grows a flat, parent-linked record set into a forest of nested trees.
///
/// Every record must carry a value under the identifier field. Records whose
/// reference field is absent or falsy become roots and are returned in input
/// order; every other record is appended to its parent's children sequence,
/// also in input order. Identifiers and references are matched by their
/// canonical string form (see [`Value::as_identifier`]), so a reference
/// `"1"` resolves a parent whose id is the integer `1`.
///
/// Without [`GrowOptions::reject_duplicates`], a duplicated identifier
/// silently replaces the earlier record while keeping the earlier position.
///
/// The input is never mutated; every returned record is a fresh copy.
///
/// # Errors
///
/// - [`GrowError::MissingIdentifier`] if a record has no usable identifier.
/// - [`GrowError::DuplicateIdentifier`] under
///   [`GrowOptions::reject_duplicates`].
/// - [`GrowError::UnknownReference`] if a truthy reference matches no
///   identifier. The whole operation fails; no partial forest is returned.
/// - [`GrowError::Cycle`] if the references form a cycle, including a record
///   referencing itself.
#[instrument(skip_all, fields(records = records.len()))]
pub fn grow(
    records: &[Record],
    fields: &TreeFields,
    options: &GrowOptions,
) -> Result<Vec<Record>, GrowError> {
    // Index every record by its canonical identifier.
    let mut nodes: Vec<Record> = Vec::with_capacity(records.len());
    let mut keys: Vec<String> = Vec::with_capacity(records.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let key = record
            .get(&fields.id)
            .and_then(Value::as_identifier)
            .ok_or_else(|| GrowError::MissingIdentifier {
                position,
                field: fields.id.to_string(),
            })?;
        if let Some(&existing) = index.get(&key) {
            if options.reject_duplicates {
                return Err(GrowError::DuplicateIdentifier { identifier: key });
            }
            // Last write wins, in the position of the first occurrence.
            nodes[existing] = record.clone();
        } else {
            index.insert(key.clone(), nodes.len());
            keys.push(key);
            nodes.push(record.clone());
        }
    }

    // Resolve every reference before assembling anything, so a bad input
    // cannot leak a partially grown forest.
    let mut parent_of: Vec<Option<usize>> = vec![None; nodes.len()];
    for (child, node) in nodes.iter().enumerate() {
        let Some(reference) = node.get(&fields.reference) else {
            continue;
        };
        if !reference.is_truthy() {
            continue;
        }
        let parent = reference
            .as_identifier()
            .and_then(|key| index.get(&key).copied())
            .ok_or_else(|| GrowError::UnknownReference {
                reference: reference.to_string(),
            })?;
        parent_of[child] = Some(parent);
    }

    reject_cycles(&parent_of, &keys)?;

    // Children attach to their parents in input order.
    let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (child, parent) in parent_of.iter().enumerate() {
        if let Some(parent) = parent {
            children_of[*parent].push(child);
        }
    }

    let roots: Vec<usize> = (0..nodes.len())
        .filter(|&node| parent_of[node].is_none())
        .collect();
    tracing::debug!(records = nodes.len(), roots = roots.len(), "grew forest");

    let mut slots: Vec<Option<Record>> = nodes.into_iter().map(Some).collect();
    Ok(roots
        .into_iter()
        .map(|root| build(root, &mut slots, &children_of, fields, options))
        .collect())
}

/// Moves the record at `node` out of `slots` and attaches its recursively
/// built children under the children field. Recursion depth is bounded by
/// the depth of the grown tree; by the time this runs the edges form a
/// forest, so every slot is taken exactly once.
fn build(
    node: usize,
    slots: &mut Vec<Option<Record>>,
    children_of: &[Vec<usize>],
    fields: &TreeFields,
    options: &GrowOptions,
) -> Record {
    let mut record = slots[node].take().expect("forest slots are taken once");
    if children_of[node].is_empty() {
        return record;
    }

    let children: Vec<Value> = children_of[node]
        .iter()
        .map(|&child| {
            let mut built = build(child, slots, children_of, fields, options);
            if options.remove_reference {
                built.remove(&fields.reference);
            }
            Value::Record(built)
        })
        .collect();

    let slot = record.get_or_insert_with(fields.children.as_str(), || Value::Seq(Vec::new()));
    if !matches!(slot, Value::Seq(_)) {
        *slot = Value::Seq(Vec::new());
    }
    if let Value::Seq(existing) = slot {
        existing.extend(children);
    }
    record
}

/// Fails when the child→parent edges contain a cycle, reporting the
/// identifiers involved in input order.
fn reject_cycles(parent_of: &[Option<usize>], keys: &[String]) -> Result<(), GrowError> {
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (child, parent) in parent_of.iter().enumerate() {
        graph.add_node(child);
        if let Some(parent) = parent {
            if *parent == child {
                return Err(GrowError::Cycle {
                    identifiers: vec![keys[child].clone()],
                });
            }
            graph.add_edge(child, *parent, ());
        }
    }

    for mut component in tarjan_scc(&graph) {
        if component.len() > 1 {
            component.sort_unstable();
            return Err(GrowError::Cycle {
                identifiers: component.into_iter().map(|node| keys[node].clone()).collect(),
            });
        }
    }

    Ok(())
}
