//! Field values
//!
//! `Value` is the opaque cell stored in a record slot. `FieldType` converts
//! typed struct fields to and from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Accepts every value
    Any,
    Bool,
    Int,
    Float,
    Text,
    Bytes,
}

impl ValueKind {
    /// Lower-case name used in textual schema descriptions
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Bytes => "bytes",
        }
    }

    /// Parse a kind name (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "any" => Some(ValueKind::Any),
            "bool" => Some(ValueKind::Bool),
            "int" => Some(ValueKind::Int),
            "float" => Some(ValueKind::Float),
            "text" => Some(ValueKind::Text),
            "bytes" => Some(ValueKind::Bytes),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Kind of this value (`Null` reports `Any`)
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Any,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value may occupy a field of `kind`.
    /// `Null` fits every kind; `Any` accepts every value.
    pub fn fits(&self, kind: ValueKind) -> bool {
        self.is_null() || kind == ValueKind::Any || self.kind() == kind
    }

    /// Name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            other => other.kind().name(),
        }
    }

    /// Parse a textual token into a value of `kind`.
    ///
    /// `null` always parses to `Value::Null`. `Any` infers, in order:
    /// int, float, bool, then falls back to text.
    pub fn parse(token: &str, kind: ValueKind) -> Result<Value> {
        if token == "null" {
            return Ok(Value::Null);
        }

        let invalid = || TableError::mismatch(format!("cannot parse `{}` as {}", token, kind));

        match kind {
            ValueKind::Bool => token.parse().map(Value::Bool).map_err(|_| invalid()),
            ValueKind::Int => token.parse().map(Value::Int).map_err(|_| invalid()),
            ValueKind::Float => token.parse().map(Value::Float).map_err(|_| invalid()),
            ValueKind::Text => Ok(Value::Text(token.to_string())),
            ValueKind::Bytes => Ok(Value::Bytes(token.as_bytes().to_vec())),
            ValueKind::Any => {
                if let Ok(i) = token.parse::<i64>() {
                    Ok(Value::Int(i))
                } else if let Ok(f) = token.parse::<f64>() {
                    Ok(Value::Float(f))
                } else if let Ok(b) = token.parse::<bool>() {
                    Ok(Value::Bool(b))
                } else {
                    Ok(Value::Text(token.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

// =============================================================================
// Typed Field Conversions
// =============================================================================

/// A Rust type that can live in a record slot
pub trait FieldType: Sized {
    /// Kind reported in the owning shape
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    /// Convert back from a stored value; wrong variants are a shape mismatch
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! field_type {
    ($ty:ty, $variant:ident) => {
        impl FieldType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> Value {
                Value::$variant(self)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(TableError::mismatch(format!(
                        "expected {}, got {}",
                        ValueKind::$variant,
                        other.type_name()
                    ))),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

field_type!(bool, Bool);
field_type!(i64, Int);
field_type!(f64, Float);
field_type!(String, Text);
field_type!(Vec<u8>, Bytes);

impl FieldType for Value {
    const KIND: ValueKind = ValueKind::Any;

    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
