//! Visitors
//!
//! A visitor receives the whole table and returns a materialized list or a
//! failure. Read-side logic (scans, filters, projections) lives here instead
//! of on `Table`.

use std::marker::PhantomData;

use super::Table;
use crate::error::{Result, TableError};
use crate::schema::{Entity, Value};

/// Read-only traversal over a table
pub trait TableVisitor<K> {
    type Item;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<Self::Item>>;
}

// =============================================================================
// Built-in Visitors
// =============================================================================

/// Materializes every record into a copy of `template`
#[derive(Debug, Clone, Default)]
pub struct CollectVisitor<E> {
    template: E,
}

impl<E> CollectVisitor<E> {
    /// `template` supplies the destination shape (e.g. `Row::blank(&shape)`)
    pub fn new(template: E) -> Self {
        Self { template }
    }
}

impl<K, E: Entity + Clone> TableVisitor<K> for CollectVisitor<E> {
    type Item = E;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<E>> {
        table
            .iterator()
            .map(|record| {
                let mut item = self.template.clone();
                record.populate(table.schema(), &mut item)?;
                Ok(item)
            })
            .collect()
    }
}

/// Materializes records and keeps those matching a predicate
pub struct FilterVisitor<E, F> {
    template: E,
    predicate: F,
}

impl<E, F> FilterVisitor<E, F>
where
    F: FnMut(&E) -> bool,
{
    pub fn new(template: E, predicate: F) -> Self {
        Self {
            template,
            predicate,
        }
    }
}

impl<K, E, F> TableVisitor<K> for FilterVisitor<E, F>
where
    E: Entity + Clone,
    F: FnMut(&E) -> bool,
{
    type Item = E;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<E>> {
        let mut matched = Vec::new();
        for record in table.iterator() {
            let mut item = self.template.clone();
            record.populate(table.schema(), &mut item)?;
            if (self.predicate)(&item) {
                matched.push(item);
            }
        }
        Ok(matched)
    }
}

/// Projects named columns out of every record
#[derive(Debug, Clone)]
pub struct ProjectVisitor {
    columns: Vec<String>,
}

impl ProjectVisitor {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl<K> TableVisitor<K> for ProjectVisitor {
    type Item = Vec<Value>;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<Vec<Value>>> {
        let schema = table.schema();
        if schema.is_empty() {
            return Err(TableError::mismatch(format!(
                "table `{}` has no schema to project from",
                table.name()
            )));
        }

        // Resolve slots once
        let slots = self
            .columns
            .iter()
            .map(|column| {
                schema
                    .slot(column)
                    .ok_or_else(|| TableError::mismatch(format!("unknown column `{}`", column)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(table
            .iterator()
            .map(|record| {
                slots
                    .iter()
                    .map(|&slot| record.values().get(slot).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect())
    }
}

/// Collects primary keys
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyVisitor;

impl<K: Clone> TableVisitor<K> for KeyVisitor {
    type Item = K;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<K>> {
        Ok(table.iterator().map(|record| record.key().clone()).collect())
    }
}

/// Adapts a closure into a visitor
pub struct FnVisitor<F, T> {
    f: F,
    _item: PhantomData<fn() -> T>,
}

/// Build a visitor from a closure
pub fn visit_fn<K, T, F>(f: F) -> FnVisitor<F, T>
where
    F: FnMut(&Table<K>) -> Result<Vec<T>>,
{
    FnVisitor {
        f,
        _item: PhantomData,
    }
}

impl<K, T, F> TableVisitor<K> for FnVisitor<F, T>
where
    F: FnMut(&Table<K>) -> Result<Vec<T>>,
{
    type Item = T;

    fn visit(&mut self, table: &Table<K>) -> Result<Vec<T>> {
        (self.f)(table)
    }
}
