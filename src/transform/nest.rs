use tracing::instrument;

use crate::domain::{Record, Value};

/// Options for [`nest`] and [`nest_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestOptions {
    /// Substring marking the nesting boundary inside a key. An empty
    /// delimiter never matches, so the input is copied through unchanged.
    pub delimiter: String,
}

impl Default for NestOptions {
    fn default() -> Self {
        Self {
            delimiter: ":".to_string(),
        }
    }
}

impl NestOptions {
    /// Options using the given delimiter.
    #[must_use]
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

/// Rebuilds a nested record from a flat record whose keys encode nesting.
///
/// Each key is split on the first occurrence of the delimiter: the prefix
/// names a nested record and the remainder becomes a key inside it, so
/// deeper nesting falls out of recursion (`"a:b:c"` ends up three levels
/// deep). Keys are processed in record order; a key without the delimiter is
/// copied through unchanged, keys sharing a prefix merge into one
/// sub-record, and when a plain value and a delimited key collide on a field
/// name the later key wins.
///
/// Recursion descends into every nested record in the result, whether it
/// was created by a split or copied through. Timestamps are opaque leaves
/// and are never decomposed; sequences are copied as-is.
///
/// The input is never mutated.
#[must_use]
#[instrument(skip_all, fields(fields = record.len()))]
pub fn nest(record: &Record, options: &NestOptions) -> Record {
    nest_record(record, options)
}

/// Applies [`nest`] to every record in a sequence, preserving order and
/// length.
#[must_use]
#[instrument(skip_all, fields(records = records.len()))]
pub fn nest_all(records: &[Record], options: &NestOptions) -> Vec<Record> {
    records
        .iter()
        .map(|record| nest_record(record, options))
        .collect()
}

/// One pass splits one level of keys; the rest is recursion into the
/// sub-records it produced.
fn nest_record(record: &Record, options: &NestOptions) -> Record {
    let mut nested = Record::with_capacity(record.len());

    for (key, value) in record.iter() {
        let split = if options.delimiter.is_empty() {
            None
        } else {
            key.split_once(&options.delimiter)
        };
        match split {
            None => {
                nested.insert(key, value.clone());
            }
            Some((field, subfield)) => {
                let slot = nested.get_or_insert_with(field, || Value::Record(Record::new()));
                if !matches!(slot, Value::Record(_)) {
                    // A delimited key shadows an earlier plain value.
                    *slot = Value::Record(Record::new());
                }
                if let Value::Record(sub) = slot {
                    sub.insert(subfield, value.clone());
                }
            }
        }
    }

    for (_, value) in nested.iter_mut() {
        if let Value::Record(sub) = value {
            *sub = nest_record(sub, options);
        }
    }

    nested
}
