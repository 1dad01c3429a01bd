use std::{fmt, ops::Deref, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated, non-empty field name.
///
/// The transforms in this crate are parameterized over the names of the
/// fields they read and write rather than a fixed schema, so the same
/// functions work against differently-named record layouts. An empty name
/// can never address a field, hence the validation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FieldName(NonEmptyString);

impl FieldName {
    /// Creates a new `FieldName` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFieldName`] if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidFieldName> {
        NonEmptyString::new(s).map(Self).map_err(|_| InvalidFieldName)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for FieldName {
    type Error = InvalidFieldName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldName {
    type Error = InvalidFieldName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for FieldName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for FieldName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FieldName {
    type Err = InvalidFieldName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a field name is empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("field names must not be empty")]
pub struct InvalidFieldName;

/// The field-name triple shared by the tree transforms.
///
/// Flattening writes the parent identifier under `reference` and drops
/// `children`; growing reads `reference` to find parents by their `id`
/// value and stores nested records under `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFields {
    /// Field holding a record's unique identifier.
    pub id: FieldName,
    /// Field holding the identifier of a record's parent.
    pub reference: FieldName,
    /// Field holding a record's nested children.
    pub children: FieldName,
}

impl TreeFields {
    /// Creates the triple from pre-validated field names.
    #[must_use]
    pub const fn new(id: FieldName, reference: FieldName, children: FieldName) -> Self {
        Self {
            id,
            reference,
            children,
        }
    }

    /// Validates and assembles the triple from plain strings.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFieldName`] if any of the names is empty.
    pub fn parse(id: &str, reference: &str, children: &str) -> Result<Self, InvalidFieldName> {
        Ok(Self {
            id: id.try_into()?,
            reference: reference.try_into()?,
            children: children.try_into()?,
        })
    }
}
