//! Dynamic rows
//!
//! A `Row` is an entity whose shape is decided at runtime, for callers that
//! have no Rust struct for their records (the shell, ad-hoc scripts).

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{Entity, FieldDef, Shape, Shaped, Value};
use crate::error::{Result, TableError};

/// Ordered, named field values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    shape: Shape,
    values: Vec<Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row with every field of `shape` set to `Null`; the usual query destination
    pub fn blank(shape: &Shape) -> Self {
        Self {
            shape: shape.clone(),
            values: vec![Value::Null; shape.len()],
        }
    }

    /// Build a row from a shape and values in shape order
    pub fn from_values(shape: &Shape, values: Vec<Value>) -> Result<Self> {
        let mut row = Self::blank(shape);
        row.populate(values)?;
        Ok(row)
    }

    /// Append a field, taking its kind from the value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.shape = self.shape.field(name, value.kind());
        self.values.push(value);
        self
    }

    /// Value of a field, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.shape.position(name).and_then(|i| self.values.get(i))
    }

    /// Replace the value of an existing field
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .shape
            .position(name)
            .ok_or_else(|| TableError::mismatch(format!("row has no field `{}`", name)))?;
        let value = value.into();
        let kind = self.shape.fields()[index].kind();
        if !value.fits(kind) {
            return Err(TableError::mismatch(format!(
                "field `{}` expects {}, got {}",
                name,
                kind,
                value.type_name()
            )));
        }
        self.values[index] = value;
        Ok(())
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn check_kinds(fields: &[FieldDef], values: &[Value]) -> Result<()> {
        for (def, value) in fields.iter().zip(values) {
            if !value.fits(def.kind()) {
                return Err(TableError::mismatch(format!(
                    "field `{}` expects {}, got {}",
                    def.name(),
                    def.kind(),
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}

impl Shaped for Row {
    fn shape(&self) -> Shape {
        self.shape.clone()
    }
}

impl Entity for Row {
    fn fields(&self) -> Vec<Value> {
        self.values.clone()
    }

    fn populate(&mut self, fields: Vec<Value>) -> Result<()> {
        if fields.len() != self.shape.len() {
            return Err(TableError::mismatch(format!(
                "row expects {} fields, got {}",
                self.shape.len(),
                fields.len()
            )));
        }
        Self::check_kinds(self.shape.fields(), &fields)?;
        self.values = fields;
        Ok(())
    }
}

// Rows render as a JSON object in field order
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.shape.names().zip(&self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Row::new(), |row, (name, value)| row.with(name, value))
    }
}
