//! Lock-guarded shared table

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::schema::Entity;
use crate::table::{Table, TableVisitor};

/// A table behind an `Arc<RwLock<_>>`
///
/// ## Concurrency:
/// - `query_by_primary_key`, `read`, `accept`: read lock (many concurrent readers)
/// - `insert`, `update`, `delete`, `write`: write lock (exclusive)
/// - A traversal inside `read` / `accept` holds the read lock throughout,
///   so no writer can interleave with it
pub struct SharedTable<K> {
    inner: Arc<RwLock<Table<K>>>,
}

impl<K> Clone for SharedTable<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K> fmt::Debug for SharedTable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedTable").field(&*self.inner.read()).finish()
    }
}

impl<K: Eq + Hash + Clone> SharedTable<K> {
    pub fn new(table: Table<K>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(table)),
        }
    }

    /// Query under the read lock
    pub fn query_by_primary_key<Q, E>(&self, key: &Q, dest: &mut E) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        E: Entity + ?Sized,
    {
        self.inner.read().query_by_primary_key(key, dest)
    }

    /// Insert under the write lock
    pub fn insert<E: Entity + ?Sized>(&self, key: K, value: &E) -> Result<()> {
        self.inner.write().insert(key, value)
    }

    /// Update under the write lock
    pub fn update<E: Entity + ?Sized>(&self, key: K, value: &E) -> Result<()> {
        self.inner.write().update(key, value)
    }

    /// Delete under the write lock
    pub fn delete<Q>(&self, key: &Q) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.write().delete(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().contains_key(key)
    }
}

impl<K> SharedTable<K> {
    pub fn name(&self) -> String {
        self.inner.read().name().to_string()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with shared access (e.g. to iterate)
    pub fn read<R>(&self, f: impl FnOnce(&Table<K>) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` with exclusive access (e.g. to swap the iteration strategy)
    pub fn write<R>(&self, f: impl FnOnce(&mut Table<K>) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// Run a visitor under the read lock
    pub fn accept<V>(&self, visitor: &mut V) -> Result<Vec<V::Item>>
    where
        V: TableVisitor<K> + ?Sized,
    {
        self.inner.read().accept(visitor)
    }

    /// Take the table back if this is the last handle
    pub fn try_into_inner(self) -> std::result::Result<Table<K>, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}
