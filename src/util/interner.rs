//! String interning for stage identifiers
//!
//! Pipeline definitions repeat the same stage names across many connections,
//! and every sub-graph extracted during phase planning repeats them again.
//! Interning keeps one allocation per unique name.
//!
//! - Memory: single allocation per unique string
//! - Cloning: Arc::clone is O(1), no string copy
//! - Concurrency: DashMap shards, safe to share between planning threads

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Global string interner (thread-safe, sharded)
static INTERNER: Lazy<Interner> = Lazy::new(Interner::new);

/// Thread-safe string interner using DashMap
pub struct Interner {
    /// Set of interned strings (value unused)
    strings: DashMap<Arc<str>, ()>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            strings: DashMap::new(),
        }
    }

    /// Intern a string, returning a shared Arc<str>
    ///
    /// If the string was already interned, returns the existing Arc.
    pub fn intern(&self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing.key());
        }

        // entry() holds the shard lock, so two racing callers agree on one Arc
        let entry = self.strings.entry(Arc::from(s)).or_insert(());
        Arc::clone(entry.key())
    }

    /// Intern an already-Arc'd string
    #[inline]
    pub fn intern_arc(&self, s: Arc<str>) -> Arc<str> {
        if let Some(existing) = self.strings.get(&s) {
            return Arc::clone(existing.key());
        }

        let entry = self.strings.entry(s).or_insert(());
        Arc::clone(entry.key())
    }

    /// Number of interned strings
    pub(crate) fn len(&self) -> usize {
        self.strings.len()
    }

    #[cfg(test)]
    fn contains(&self, s: &str) -> bool {
        self.strings.contains_key(s)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// Intern a stage name using the global interner
#[inline]
pub fn intern(s: &str) -> Arc<str> {
    INTERNER.intern(s)
}

/// Intern an already-Arc'd stage name using the global interner
#[inline]
pub fn intern_arc(s: Arc<str>) -> Arc<str> {
    INTERNER.intern_arc(s)
}

/// Number of stage names held by the global interner
pub(crate) fn interned_count() -> usize {
    INTERNER.len()
}

#[cfg(test)]
pub(crate) fn is_interned(s: &str) -> bool {
    INTERNER.contains(s)
}
