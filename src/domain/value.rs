use std::fmt;

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};

use super::Record;

/// A single field value.
///
/// Records are dynamically shaped, so values form a closed union covering
/// scalars, timestamps, nested records and sequences. Timestamps are opaque
/// leaves: structurally composite, but never decomposed by the transforms.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value (i64 range).
    Integer(i64),
    /// Floating point value (f64).
    Float(f64),
    /// String value (UTF-8).
    String(String),
    /// Timestamp value, preserved as-is by the delimited-key transform.
    Timestamp(DateTime<Utc>),
    /// A nested record.
    Record(Record),
    /// An ordered sequence of values.
    Seq(Vec<Value>),
}

impl Value {
    /// Whether this value counts as "set" when deciding roots and parents.
    ///
    /// `Null`, `false`, `0`, `0.0`, `NaN` and the empty string are falsy;
    /// every other value (including empty records and sequences) is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(d) => *d != 0.0 && !d.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Timestamp(_) | Self::Record(_) | Self::Seq(_) => true,
        }
    }

    /// The canonical string used to match identifier and reference fields,
    /// or `None` for values that cannot name a record (null and composites).
    ///
    /// Matching by canonical string means an integer id `1` and a string
    /// reference `"1"` resolve to each other, which callers mixing typed and
    /// stringly-typed sources rely on.
    #[must_use]
    pub fn as_identifier(&self) -> Option<String> {
        match self {
            Self::Null | Self::Record(_) | Self::Seq(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(d) => Some(d.to_string()),
            Self::String(s) => Some(s.clone()),
            Self::Timestamp(ts) => Some(ts.to_rfc3339()),
        }
    }

    /// Returns the nested record, if this value is one.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Lexical form for diagnostics: scalars bare, timestamps as RFC 3339,
    /// composites in a compact braced form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            Self::Record(record) => {
                f.write_str("{")?;
                for (position, (name, value)) in record.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Seq(values) => {
                f.write_str("[")?;
                for (position, value) in values.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Record(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Seq(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(d) => serializer.serialize_f64(*d),
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            Self::Record(record) => record.serialize(serializer),
            Self::Seq(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Maps self-describing formats (JSON, YAML) onto the value union, keeping
/// object keys in document order. Timestamps are never manufactured here;
/// date-looking strings stay strings.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any record value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(i64::try_from(v).map_or_else(|_| Value::Float(v as f64), Value::Integer))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(Value::Seq(values))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut record = Record::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((field, value)) = map.next_entry::<String, Value>()? {
            record.insert(field, value);
        }
        Ok(Value::Record(record))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use test_case::test_case;

    use super::*;

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test_case(Value::Null, false; "null is falsy")]
    #[test_case(Value::Bool(false), false; "false is falsy")]
    #[test_case(Value::Bool(true), true; "true is truthy")]
    #[test_case(Value::Integer(0), false; "zero is falsy")]
    #[test_case(Value::Integer(-3), true; "negative integer is truthy")]
    #[test_case(Value::Float(0.0), false; "zero float is falsy")]
    #[test_case(Value::Float(f64::NAN), false; "nan is falsy")]
    #[test_case(Value::Float(0.5), true; "nonzero float is truthy")]
    #[test_case(Value::String(String::new()), false; "empty string is falsy")]
    #[test_case(Value::from("x"), true; "string is truthy")]
    #[test_case(Value::Record(Record::new()), true; "empty record is truthy")]
    #[test_case(Value::Seq(Vec::new()), true; "empty sequence is truthy")]
    fn truthiness(value: Value, expected: bool) {
        assert_eq!(value.is_truthy(), expected);
    }

    #[test]
    fn timestamps_are_truthy() {
        assert!(Value::from(timestamp()).is_truthy());
    }

    #[test]
    fn integer_and_string_identifiers_coincide() {
        assert_eq!(Value::from(1).as_identifier(), Value::from("1").as_identifier());
    }

    #[test]
    fn composite_values_have_no_identifier() {
        assert_eq!(Value::Record(Record::new()).as_identifier(), None);
        assert_eq!(Value::Seq(Vec::new()).as_identifier(), None);
        assert_eq!(Value::Null.as_identifier(), None);
    }

    #[test]
    fn display_renders_composites_compactly() {
        let mut record = Record::new();
        record.insert("a", 1);
        record.insert("b", Value::Seq(vec![Value::from(2), Value::from("x")]));
        assert_eq!(Value::from(record).to_string(), "{a: 1, b: [2, x]}");
    }

    #[test]
    fn timestamps_serialize_as_rfc3339_strings() {
        let json = serde_json::to_string(&Value::from(timestamp())).unwrap();
        assert_eq!(json, "\"2024-05-01T12:30:00+00:00\"");
    }

    #[test]
    fn deserialization_keeps_strings_as_strings() {
        let value: Value = serde_json::from_str("\"2024-05-01T12:30:00+00:00\"").unwrap();
        assert_eq!(value, Value::from("2024-05-01T12:30:00+00:00"));
    }

    #[test]
    fn deserializes_scalars_and_composites() {
        let value: Value = serde_json::from_str(r#"{"a": 1, "b": [true, null, 1.5]}"#).unwrap();
        let Value::Record(record) = value else {
            panic!("expected a record");
        };
        assert_eq!(record.get("a"), Some(&Value::Integer(1)));
        assert_eq!(
            record.get("b"),
            Some(&Value::Seq(vec![
                Value::Bool(true),
                Value::Null,
                Value::Float(1.5)
            ]))
        );
    }
}
