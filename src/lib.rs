#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bucket;

/// Hasher implementations and the crate-wide default hasher builder.
pub mod hasher;

/// A key-value map over the dense hash table.
///
/// This module provides a `HashMap` that wraps the `HashTable` and hashes
/// keys with a configurable hasher builder. Keys and values occupy dense,
/// insertion-ordered slots that compact on removal.
pub mod hash_map;

pub mod hash_table;

/// A hash set over the dense hash table.
///
/// This module provides a `HashSet` that wraps the `HashTable` and provides
/// a standard set interface with configurable hashers and dense slot
/// access.
pub mod hash_set;

/// A value-interning table: a deduplicated value pool plus an ordered list
/// of logical references into it.
pub mod indexed_table;

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use hasher::DefaultHashBuilder;
pub use indexed_table::IndexedTable;
