//! Iteration strategies
//!
//! A table hands iterator creation to its current `IteratorFactory`, so the
//! traversal policy can be swapped without touching the table.
//!
//! Every strategy here collects record references when the iterator is
//! created. The iterator borrows the table, so the table cannot be mutated
//! while a traversal is in flight.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{Record, Table};

/// Iterator over a table's records
pub type TableIter<'a, K> = Box<dyn Iterator<Item = &'a Record<K>> + 'a>;

/// Creates iterators over a table's records
pub trait IteratorFactory<K>: Send + Sync {
    fn create<'a>(&'a self, table: &'a Table<K>) -> TableIter<'a, K>;
}

// =============================================================================
// Random Order (default)
// =============================================================================

/// Visits every record exactly once in a shuffled order.
///
/// The order changes between calls. With a seed, the sequence of orders is
/// reproducible for tables built by the same sequence of operations
/// (record storage uses a deterministic hasher).
#[derive(Debug, Default)]
pub struct RandomIteratorFactory {
    seed: Option<u64>,
    calls: AtomicU64,
}

impl RandomIteratorFactory {
    /// Shuffle with the thread RNG
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffle with an RNG derived from `seed` and the call count
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            calls: AtomicU64::new(0),
        }
    }
}

impl<K> IteratorFactory<K> for RandomIteratorFactory {
    fn create<'a>(&'a self, table: &'a Table<K>) -> TableIter<'a, K> {
        let mut records: Vec<&'a Record<K>> = table.records().collect();

        match self.seed {
            Some(seed) => {
                let call = self.calls.fetch_add(1, Ordering::Relaxed);
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(call));
                records.shuffle(&mut rng);
            }
            None => records.shuffle(&mut rand::thread_rng()),
        }

        Box::new(records.into_iter())
    }
}

// =============================================================================
// Key Order
// =============================================================================

/// Visits records sorted by primary key
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedIteratorFactory {
    descending: bool,
}

impl OrderedIteratorFactory {
    pub fn ascending() -> Self {
        Self { descending: false }
    }

    pub fn descending() -> Self {
        Self { descending: true }
    }
}

impl<K: Ord> IteratorFactory<K> for OrderedIteratorFactory {
    fn create<'a>(&'a self, table: &'a Table<K>) -> TableIter<'a, K> {
        let mut records: Vec<&'a Record<K>> = table.records().collect();
        records.sort_by(|a, b| a.key().cmp(b.key()));
        if self.descending {
            records.reverse();
        }
        Box::new(records.into_iter())
    }
}

// =============================================================================
// Filtered
// =============================================================================

type RecordPredicate<K> = Box<dyn Fn(&Record<K>) -> bool + Send + Sync>;

/// Wraps another strategy and skips records failing a predicate
pub struct FilteredIteratorFactory<K> {
    inner: Box<dyn IteratorFactory<K>>,
    predicate: RecordPredicate<K>,
}

impl<K> FilteredIteratorFactory<K> {
    /// Filter over the default random order
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Record<K>) -> bool + Send + Sync + 'static,
    {
        Self::over(RandomIteratorFactory::new(), predicate)
    }

    /// Filter over an explicit inner strategy
    pub fn over<I, F>(inner: I, predicate: F) -> Self
    where
        I: IteratorFactory<K> + 'static,
        F: Fn(&Record<K>) -> bool + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(inner),
            predicate: Box::new(predicate),
        }
    }
}

impl<K> IteratorFactory<K> for FilteredIteratorFactory<K> {
    fn create<'a>(&'a self, table: &'a Table<K>) -> TableIter<'a, K> {
        let predicate = &self.predicate;
        Box::new(self.inner.create(table).filter(move |record| predicate(*record)))
    }
}
