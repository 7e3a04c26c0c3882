//! Utilities shared across the crate

mod interner;

pub use interner::{intern, intern_arc, Interner};
pub(crate) use interner::interned_count;

#[cfg(test)]
pub(crate) use interner::is_interned;
