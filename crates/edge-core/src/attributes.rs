//! Entity attributes and their typed field mapping.
//!
//! The management API stores custom data as a flat list of string name/value
//! pairs. [`AttributeMapping`] is a statically declared table that says which
//! attribute backs which typed field, so reading and writing those fields
//! never depends on runtime reflection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EdgeError;

/// Ordered attribute name → value map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Declared type of a mapped attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Text,
    Bool,
    Integer,
    /// Comma separated list of values.
    List,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Bool => write!(f, "bool"),
            Self::Integer => write!(f, "integer"),
            Self::List => write!(f, "list"),
        }
    }
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    List(Vec<String>),
}

impl AttributeValue {
    fn kind(&self) -> AttributeKind {
        match self {
            Self::Text(_) => AttributeKind::Text,
            Self::Bool(_) => AttributeKind::Bool,
            Self::Integer(_) => AttributeKind::Integer,
            Self::List(_) => AttributeKind::List,
        }
    }

    fn encode(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::List(items) => items.join(","),
        }
    }
}

/// One row of an [`AttributeMapping`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Typed field name exposed to callers.
    pub field: &'static str,
    /// Attribute name on the remote entity.
    pub attribute: &'static str,
    pub kind: AttributeKind,
}

/// Static field → attribute table.
#[derive(Debug, Clone, Copy)]
pub struct AttributeMapping {
    fields: &'static [FieldMapping],
}

impl AttributeMapping {
    pub const fn new(fields: &'static [FieldMapping]) -> Self {
        Self { fields }
    }

    /// Looks up the mapping row for a field.
    pub fn field(&self, field: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|m| m.field == field)
    }

    pub fn fields(&self) -> &'static [FieldMapping] {
        self.fields
    }

    /// Decodes a mapped field from `attributes`.
    ///
    /// Returns `Ok(None)` when the attribute is absent.
    ///
    /// # Errors
    ///
    /// Returns `EdgeError::InvalidArgument` for unmapped fields and for values
    /// that do not parse as the declared kind.
    pub fn read(&self, attributes: &Attributes, field: &str) -> Result<Option<AttributeValue>, EdgeError> {
        let mapping = self
            .field(field)
            .ok_or_else(|| EdgeError::invalid_argument(format!("Unmapped field: {field}")))?;
        let Some(raw) = attributes.get(mapping.attribute) else {
            return Ok(None);
        };
        let value = match mapping.kind {
            AttributeKind::Text => AttributeValue::Text(raw.to_string()),
            AttributeKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => AttributeValue::Bool(true),
                "false" | "0" | "" => AttributeValue::Bool(false),
                other => {
                    return Err(EdgeError::invalid_argument(format!(
                        "Attribute {} is not a bool: {other}",
                        mapping.attribute
                    )));
                }
            },
            AttributeKind::Integer => raw.trim().parse().map(AttributeValue::Integer).map_err(|e| {
                EdgeError::invalid_argument(format!("Attribute {} is not an integer: {e}", mapping.attribute))
            })?,
            AttributeKind::List => AttributeValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        };
        Ok(Some(value))
    }

    /// Encodes `value` into the attribute backing `field`.
    ///
    /// # Errors
    ///
    /// Returns `EdgeError::InvalidArgument` for unmapped fields and for values
    /// of the wrong kind.
    pub fn write(&self, attributes: &mut Attributes, field: &str, value: &AttributeValue) -> Result<(), EdgeError> {
        let mapping = self
            .field(field)
            .ok_or_else(|| EdgeError::invalid_argument(format!("Unmapped field: {field}")))?;
        if value.kind() != mapping.kind {
            return Err(EdgeError::invalid_argument(format!(
                "Field {field} expects {} but got {}",
                mapping.kind,
                value.kind()
            )));
        }
        attributes.set(mapping.attribute, value.encode());
        Ok(())
    }
}
