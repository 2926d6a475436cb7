//! Schema Module
//!
//! Describes the shape of values exchanged with a table and derives the
//! table's field-name to slot mapping from a sample.
//!
//! ## Responsibilities
//! - `Shape`: ordered, named, typed field list of a value
//! - `Shaped` / `Entity`: how a value reports its shape and moves its
//!   fields in and out of record slots
//! - `Schema`: lower-cased field name → zero-based slot, derived once per table
//!
//! Types declare their shape through the [`entity!`](crate::entity) macro,
//! or use the dynamic [`Row`].

mod row;
mod value;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

pub use row::Row;
pub use value::{FieldType, Value, ValueKind};

// =============================================================================
// Shape
// =============================================================================

/// One named, typed field in a shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    name: String,
    kind: ValueKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Structural layout of a value: named fields in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    fields: Vec<FieldDef>,
}

impl Shape {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    /// Append a field (builder style)
    pub fn field(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.push(FieldDef::new(name, kind));
        self
    }

    /// Parse a textual description such as `id:int,name:text,note`.
    ///
    /// A field without a kind is `any`.
    pub fn parse(description: &str) -> Result<Self> {
        let mut shape = Shape::default();

        for part in description.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, kind) = match part.split_once(':') {
                Some((name, kind)) => {
                    let kind = ValueKind::parse(kind).ok_or_else(|| {
                        TableError::Config(format!("unknown field kind `{}` for `{}`", kind, name))
                    })?;
                    (name.trim(), kind)
                }
                None => (part, ValueKind::Any),
            };

            if name.is_empty() {
                return Err(TableError::Config(format!("missing field name in `{}`", part)));
            }
            shape = shape.field(name, kind);
        }

        if let Some(name) = shape.duplicate_name() {
            return Err(TableError::Config(format!("duplicate field `{}`", name)));
        }

        Ok(shape)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(FieldDef::name)
    }

    /// Position of a field, matched case-insensitively
    pub fn position(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.fields.iter().position(|f| f.name.to_lowercase() == name)
    }

    /// First field name that repeats (case-insensitively), if any
    pub fn duplicate_name(&self) -> Option<&str> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        self.fields
            .iter()
            .find(|f| !seen.insert(f.name.to_lowercase()))
            .map(FieldDef::name)
    }
}

// =============================================================================
// Shaped / Entity
// =============================================================================

/// A value that can describe its own shape
pub trait Shaped {
    fn shape(&self) -> Shape;
}

// A shape description is its own sample
impl Shaped for Shape {
    fn shape(&self) -> Shape {
        self.clone()
    }
}

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for &mut T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for Box<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for Rc<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for Arc<T> {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

/// A value that can be stored in, and populated from, a record
pub trait Entity: Shaped {
    /// Field values in shape order
    fn fields(&self) -> Vec<Value>;

    /// Overwrite `self` from `fields` (in shape order).
    ///
    /// Must leave `self` untouched when it returns an error.
    fn populate(&mut self, fields: Vec<Value>) -> Result<()>;
}

impl<T: Entity + ?Sized> Entity for Box<T> {
    fn fields(&self) -> Vec<Value> {
        (**self).fields()
    }

    fn populate(&mut self, fields: Vec<Value>) -> Result<()> {
        (**self).populate(fields)
    }
}

impl<T: Entity + ?Sized> Entity for &mut T {
    fn fields(&self) -> Vec<Value> {
        (**self).fields()
    }

    fn populate(&mut self, fields: Vec<Value>) -> Result<()> {
        (**self).populate(fields)
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Mapping from lower-cased field name to record slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    slots: HashMap<String, usize>,
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Derive a schema from a representative value
    pub fn derive<S: Shaped + ?Sized>(sample: &S) -> Self {
        Self::from_shape(&sample.shape())
    }

    /// Build the mapping from a shape. A repeated name keeps its last position.
    pub fn from_shape(shape: &Shape) -> Self {
        let slots = shape
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_lowercase(), i))
            .collect();

        Self {
            slots,
            fields: shape.fields().to_vec(),
        }
    }

    /// Slot for a field name (case-insensitive)
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(&name.to_lowercase()).copied()
    }

    /// Field definitions of the sample this schema was derived from
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Number of distinct field names
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `(name, slot)` pairs ordered by slot
    pub fn slots(&self) -> Vec<(&str, usize)> {
        let mut slots: Vec<_> = self.slots.iter().map(|(n, &s)| (n.as_str(), s)).collect();
        slots.sort_by_key(|&(_, s)| s);
        slots
    }
}

// =============================================================================
// entity! macro
// =============================================================================

/// Define a struct and implement [`Shaped`] and [`Entity`] for it.
///
/// Every field type must implement [`FieldType`] and `Clone`.
///
/// ```
/// keytable::entity! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct User {
///         pub id: i64,
///         pub name: String,
///     }
/// }
///
/// use keytable::Shaped;
/// let shape = User::default().shape();
/// assert_eq!(shape.names().collect::<Vec<_>>(), vec!["id", "name"]);
/// ```
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $fty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $fty ),*
        }

        impl $crate::Shaped for $name {
            fn shape(&self) -> $crate::Shape {
                $crate::Shape::new(::std::vec![
                    $( $crate::FieldDef::new(
                        ::std::stringify!($field),
                        <$fty as $crate::FieldType>::KIND,
                    ) ),*
                ])
            }
        }

        impl $crate::Entity for $name {
            fn fields(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![
                    $( $crate::FieldType::into_value(::std::clone::Clone::clone(&self.$field)) ),*
                ]
            }

            #[allow(unused_mut, unused_variables, non_snake_case)]
            fn populate(
                &mut self,
                fields: ::std::vec::Vec<$crate::Value>,
            ) -> $crate::Result<()> {
                let expected: usize = 0 $( + { let _ = ::std::stringify!($field); 1 } )*;
                if fields.len() != expected {
                    return ::std::result::Result::Err($crate::TableError::mismatch(
                        ::std::format!(
                            "{} expects {} fields, got {}",
                            ::std::stringify!($name),
                            expected,
                            fields.len()
                        ),
                    ));
                }

                // Convert everything first so a failure leaves `self` untouched
                let mut values = fields.into_iter();
                $(
                    let $field: $fty = <$fty as $crate::FieldType>::from_value(
                        values.next().unwrap_or($crate::Value::Null),
                    )
                    .map_err(|e| e.for_field(::std::stringify!($field)))?;
                )*
                $( self.$field = $field; )*
                ::std::result::Result::Ok(())
            }
        }
    };
}
