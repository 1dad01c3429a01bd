use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

use super::Value;

/// An insertion-ordered mapping from field name to [`Value`].
///
/// Field order is significant: iteration, serialization and the transforms
/// all follow it. Setting an existing field replaces its value in place, so
/// the field keeps its original position; new fields are appended.
///
/// Equality is field-for-field and order-sensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty record with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record carries no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value of `field`, if present.
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value of `field`, first inserting
    /// the result of `default` if the field is absent.
    pub fn get_or_insert_with(
        &mut self,
        field: impl Into<String>,
        default: impl FnOnce() -> Value,
    ) -> &mut Value {
        let field = field.into();
        let index = match self.entries.iter().position(|(name, _)| *name == field) {
            Some(index) => index,
            None => {
                self.entries.push((field, default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// Whether the record carries `field`.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// Sets `field` to `value`, returning the previous value if the field
    /// already existed. Existing fields keep their position; new fields are
    /// appended.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let field = field.into();
        let value = value.into();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(std::mem::replace(slot, value))
        } else {
            self.entries.push((field, value));
            None
        }
    }

    /// Removes `field` and returns its value. The order of the remaining
    /// fields is unchanged.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates fields in insertion order, with mutable access to the
    /// values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Value)> {
        self.entries
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a record (map of field names to values)")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut record = Record::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((field, value)) = map.next_entry::<String, Value>()? {
                    record.insert(field, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_iter([
            ("id", Value::from(1)),
            ("title", Value::from("first")),
            ("done", Value::from(false)),
        ])
    }

    #[test]
    fn keeps_insertion_order() {
        let record = sample();
        let fields: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, ["id", "title", "done"]);
    }

    #[test]
    fn replacing_a_field_keeps_its_position() {
        let mut record = sample();
        let previous = record.insert("title", "second");
        assert_eq!(previous, Some(Value::from("first")));

        let fields: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, ["id", "title", "done"]);
        assert_eq!(record.get("title"), Some(&Value::from("second")));
    }

    #[test]
    fn removal_preserves_remaining_order() {
        let mut record = sample();
        assert_eq!(record.remove("title"), Some(Value::from("first")));
        assert_eq!(record.remove("title"), None);

        let fields: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, ["id", "done"]);
    }

    #[test]
    fn get_or_insert_with_appends_missing_fields() {
        let mut record = sample();

        *record.get_or_insert_with("count", || Value::from(0)) = Value::from(2);
        assert_eq!(record.get("count"), Some(&Value::from(2)));

        let existing = record.get_or_insert_with("id", || Value::from(99));
        assert_eq!(existing, &Value::from(1));
    }

    #[test]
    fn serde_round_trip_preserves_field_order() {
        let json = r#"{"z": 1, "a": {"y": true, "b": null}}"#;
        let record: Record = serde_json::from_str(json).unwrap();

        let fields: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(fields, ["z", "a"]);

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"z":1,"a":{"y":true,"b":null}}"#
        );
    }

    #[test]
    fn yaml_round_trip_preserves_field_order() {
        let yaml = "z: 1\na: two\n";
        let record: Record = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(serde_yaml::to_string(&record).unwrap(), yaml);
    }

    #[test]
    fn duplicate_keys_in_input_keep_first_position_last_value() {
        let record: Record = serde_json::from_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let entries: Vec<(&str, &Value)> = record.iter().collect();
        assert_eq!(
            entries,
            [("a", &Value::from(3)), ("b", &Value::from(2))]
        );
    }
}
