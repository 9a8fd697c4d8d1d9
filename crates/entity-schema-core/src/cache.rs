// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Schema cache.
//!
//! Memoizes synthesized schemas so that repeated requests return the same
//! `Arc<Schema>`; callers may compare results with [`Arc::ptr_eq`].
//!
//! # Key
//!
//! ```text
//! {entity}::{variant}::{sorted forward-reference names joined by ','}
//! ```
//!
//! Only the names of the forward-reference namespace take part in the key,
//! not the types they map to. Two calls passing the same names with different
//! types share one entry, and the first one wins.
//!
//! # Concurrency
//!
//! Building happens outside the lock. When two threads race on a cold key,
//! both may build, but the first insert wins and both return that schema.
//! Failed builds are never cached.

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering}
    }
};

use parking_lot::RwLock;

use crate::{
    error::Result,
    resolve::ForwardRefs,
    schema::{Schema, SchemaVariant}
};

/// Cache key for one synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for `entity`, `variant` and the names in `refs`.
    ///
    /// `refs` is ordered by name, so insertion order never affects the key.
    pub fn new(entity: &str, variant: SchemaVariant, refs: &ForwardRefs) -> Self {
        let names: Vec<&str> = refs.keys().map(String::as_str).collect();
        Self(format!("{entity}::{variant}::{}", names.join(",")))
    }

    /// Key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hit, miss and size counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits:   usize,
    /// Lookups that had to build.
    pub misses: usize,
    /// Cached schemas.
    pub size:   usize
}

/// Process-lifetime schema memo.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: RwLock<HashMap<CacheKey, Arc<Schema>>>,
    hits:    AtomicUsize,
    misses:  AtomicUsize
}

impl SchemaCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached schema for `key`, if any. Does not touch the counters.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Schema>> {
        self.entries.read().get(key).cloned()
    }

    /// Return the cached schema for `key` or build, insert and return it.
    ///
    /// # Errors
    ///
    /// Propagates the error of `build`; nothing is cached in that case.
    pub fn get_or_try_insert_with<F>(&self, key: CacheKey, build: F) -> Result<Arc<Schema>>
    where
        F: FnOnce() -> Result<Schema>
    {
        if let Some(schema) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "schema cache hit");
            return Ok(schema);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key, "schema cache miss");
        let built = Arc::new(build()?);

        let schema = match self.entries.write().entry(key) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(built))
        };
        Ok(schema)
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits:   self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size:   self.len()
        }
    }
}
