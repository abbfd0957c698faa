// 🗃️ Collection Store - ordered in-memory records
//
// Records live in insertion order behind a single RwLock, together with the
// last identifier handed out. Every read-modify-write (allocate id + append,
// find + remove) happens under one write guard, so concurrent requests never
// observe the same next id or a half-finished removal.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct Inner<T> {
    records: Vec<T>,
    /// Highest id ever issued; never decreases, even when records are removed
    last_id: u64,
}

pub struct Collection<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: Clone> Collection<T> {
    pub fn new() -> Self {
        Self::seeded(Vec::new(), 0)
    }

    /// Start from existing records; the next issued id will be `last_id + 1`.
    pub fn seeded(records: Vec<T>, last_id: u64) -> Self {
        Collection {
            inner: RwLock::new(Inner { records, last_id }),
        }
    }

    // A panic while holding the guard cannot leave `records` half-written
    // (push/remove are the only mutations), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every record in current order
    pub fn all(&self) -> Vec<T> {
        self.read().records.clone()
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last_id(&self) -> u64 {
        self.read().last_id
    }

    /// First record matching the predicate (linear scan)
    pub fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.read().records.iter().find(|r| predicate(r)).cloned()
    }

    /// Fold over the records without cloning them
    pub fn fold<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.read().records.iter().fold(init, f)
    }

    /// Append a record as-is
    pub fn push(&self, record: T) -> T {
        self.write().records.push(record.clone());
        record
    }

    /// Allocate the next id and append the record built from it, atomically
    pub fn push_with_id<F>(&self, build: F) -> T
    where
        F: FnOnce(u64) -> T,
    {
        let mut inner = self.write();
        let id = inner.last_id + 1;
        let record = build(id);
        inner.last_id = id;
        inner.records.push(record.clone());
        record
    }

    /// Remove the first record matching the predicate, keeping the others in order
    pub fn remove_first<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        let mut inner = self.write();
        let index = inner.records.iter().position(predicate)?;
        Some(inner.records.remove(index))
    }
}

impl<T: Clone> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
