//! Table Module
//!
//! In-memory keyed record store.
//!
//! ## Responsibilities
//! - Primary-key CRUD with conflict / not-found semantics
//! - Schema-driven value transfer between caller values and records
//! - Iteration through a replaceable strategy
//! - Read-only traversal through visitors
//!
//! ## Concurrency
//! `Table` has no internal synchronization. Share it across threads through
//! [`SharedTable`](crate::sync::SharedTable) or
//! [`TableActor`](crate::sync::TableActor).

mod iter;
mod record;
mod visitor;

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::config::TableConfig;
use crate::error::{Result, TableError};
use crate::schema::{Entity, Schema, Shaped};

pub use iter::{
    FilteredIteratorFactory, IteratorFactory, OrderedIteratorFactory, RandomIteratorFactory,
    TableIter,
};
pub use record::Record;
pub use visitor::{
    visit_fn, CollectVisitor, FilterVisitor, FnVisitor, KeyVisitor, ProjectVisitor, TableVisitor,
};

/// A keyed record store
///
/// Keys are unique: at most one record exists per key at any time.
pub struct Table<K> {
    /// Normalized (lower-case) identifier
    name: String,

    /// Field name → slot; empty until derived
    schema: Schema,

    /// Primary key → record
    records: FxHashMap<K, Record<K>>,

    /// Strategy used by `iterator()`
    iterator_factory: Box<dyn IteratorFactory<K>>,
}

impl<K: Eq + Hash + Clone> Table<K> {
    /// Create an empty table using the random iteration strategy
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_factory(name.into(), Box::new(RandomIteratorFactory::new()))
    }

    /// Create an empty table from a config
    pub fn from_config(config: &TableConfig) -> Self {
        let factory = match config.random_seed {
            Some(seed) => RandomIteratorFactory::seeded(seed),
            None => RandomIteratorFactory::new(),
        };
        Self::with_factory(config.name.clone(), Box::new(factory))
    }

    fn with_factory(name: String, iterator_factory: Box<dyn IteratorFactory<K>>) -> Self {
        let name = name.to_lowercase();
        tracing::debug!(table = %name, "table created");
        Self {
            name,
            schema: Schema::default(),
            records: FxHashMap::default(),
            iterator_factory,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Derive the schema from a sample value (builder style)
    pub fn with_schema<S: Shaped + ?Sized>(mut self, sample: &S) -> Self {
        self.set_schema(sample);
        self
    }

    /// Replace the iteration strategy (builder style)
    pub fn with_iterator_factory<F: IteratorFactory<K> + 'static>(mut self, factory: F) -> Self {
        self.set_iterator_factory(factory);
        self
    }

    /// Derive the schema from a sample value, replacing any previous schema
    pub fn set_schema<S: Shaped + ?Sized>(&mut self, sample: &S) {
        self.schema = Schema::derive(sample);
        tracing::debug!(table = %self.name, fields = self.schema.len(), "schema derived");
    }

    /// Replace the iteration strategy; takes effect on the next `iterator()`
    pub fn set_iterator_factory<F: IteratorFactory<K> + 'static>(&mut self, factory: F) {
        self.iterator_factory = Box::new(factory);
        tracing::debug!(table = %self.name, "iteration strategy replaced");
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    /// Populate `dest` from the record stored under `key`
    pub fn query_by_primary_key<Q, E>(&self, key: &Q, dest: &mut E) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        E: Entity + ?Sized,
    {
        let record = self.records.get(key).ok_or(TableError::RecordNotFound)?;
        record.populate(&self.schema, dest)
    }

    /// Store a new record; fails if `key` is already present
    pub fn insert<E: Entity + ?Sized>(&mut self, key: K, value: &E) -> Result<()> {
        let slot = match self.records.entry(key) {
            Entry::Occupied(_) => return Err(TableError::PrimaryKeyConflict),
            Entry::Vacant(slot) => slot,
        };

        // Build before storing so a rejected value leaves no entry behind
        let record = Record::from_entity(slot.key().clone(), value)?;
        slot.insert(record);

        tracing::trace!(table = %self.name, records = self.records.len(), "record inserted");
        Ok(())
    }

    /// Replace the record stored under `key`; fails if `key` is absent.
    /// The replacement keeps the key already stored in the map.
    pub fn update<E: Entity + ?Sized>(&mut self, key: K, value: &E) -> Result<()> {
        let existing = self.records.get_mut(&key).ok_or(TableError::RecordNotFound)?;
        *existing = Record::from_entity(existing.key().clone(), value)?;
        tracing::trace!(table = %self.name, "record updated");
        Ok(())
    }

    /// Remove the record stored under `key`; fails if `key` is absent
    pub fn delete<Q>(&mut self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.remove(key).ok_or(TableError::RecordNotFound)?;
        tracing::trace!(table = %self.name, records = self.records.len(), "record deleted");
        Ok(())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.records.contains_key(key)
    }
}

impl<K> Table<K> {
    /// Lower-case table name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in storage order. Iteration strategies build on this;
    /// callers should prefer `iterator()`.
    pub fn records(&self) -> impl Iterator<Item = &Record<K>> {
        self.records.values()
    }

    /// Iterator from the current strategy
    pub fn iterator(&self) -> TableIter<'_, K> {
        self.iterator_factory.create(self)
    }

    /// Run a visitor over this table and return its result unchanged
    pub fn accept<V>(&self, visitor: &mut V) -> Result<Vec<V::Item>>
    where
        V: TableVisitor<K> + ?Sized,
    {
        visitor.visit(self)
    }
}

impl<K> fmt::Debug for Table<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("records", &self.records.len())
            .finish()
    }
}
