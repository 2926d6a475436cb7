//! Record
//!
//! The storage unit for one table entry.

use crate::error::{Result, TableError};
use crate::schema::{Entity, Schema, Value};

/// One stored entry: its primary key and positional field values
///
/// The field count and order come from the value the record was built from.
/// The table schema is only consulted when values are transferred back out.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<K> {
    key: K,
    values: Vec<Value>,
}

impl<K> Record<K> {
    /// Build a record from a value.
    ///
    /// Fails with `ShapeMismatch` when the value's shape repeats a field name,
    /// when it reports a different number of values than fields, or when a
    /// value does not fit its declared kind.
    pub(crate) fn from_entity<E: Entity + ?Sized>(key: K, value: &E) -> Result<Self> {
        let shape = value.shape();
        if let Some(name) = shape.duplicate_name() {
            return Err(TableError::mismatch(format!("duplicate field `{}`", name)));
        }

        let values = value.fields();
        if values.len() != shape.len() {
            return Err(TableError::mismatch(format!(
                "shape declares {} fields but value has {}",
                shape.len(),
                values.len()
            )));
        }

        for (def, v) in shape.fields().iter().zip(&values) {
            if !v.fits(def.kind()) {
                return Err(TableError::mismatch(format!(
                    "field `{}` expects {}, got {}",
                    def.name(),
                    def.kind(),
                    v.type_name()
                )));
            }
        }

        Ok(Self { key, values })
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Stored values in creation order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value stored for `name` according to `schema`
    pub fn value(&self, schema: &Schema, name: &str) -> Option<&Value> {
        schema.slot(name).and_then(|slot| self.values.get(slot))
    }

    /// Populate `dest` from this record.
    ///
    /// Each destination field is looked up by its lower-cased name in
    /// `schema`; with an empty schema fields transfer positionally.
    /// `dest` is left untouched on failure.
    pub fn populate<E: Entity + ?Sized>(&self, schema: &Schema, dest: &mut E) -> Result<()> {
        let shape = dest.shape();
        let mut out = Vec::with_capacity(shape.len());

        for (position, field) in shape.fields().iter().enumerate() {
            let slot = if schema.is_empty() {
                position
            } else {
                schema.slot(field.name()).ok_or_else(|| {
                    TableError::mismatch(format!("schema has no field `{}`", field.name()))
                })?
            };

            let value = self.values.get(slot).ok_or_else(|| {
                TableError::mismatch(format!(
                    "record has {} fields, `{}` maps to slot {}",
                    self.values.len(),
                    field.name(),
                    slot
                ))
            })?;

            if !value.fits(field.kind()) {
                return Err(TableError::mismatch(format!(
                    "field `{}` expects {}, got {}",
                    field.name(),
                    field.kind(),
                    value.type_name()
                )));
            }
            out.push(value.clone());
        }

        dest.populate(out)
    }
}
