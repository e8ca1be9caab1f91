#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Construction-time configuration: hash functions, load factor, growth
/// factor, deletion policy and the value-release callback.
pub mod config;

mod error;

pub mod hash_fns;

pub mod hash_table;

/// Bounded key storage.
pub mod key;

pub mod prime;

/// Probe-sequence generation shared by every table operation.
pub mod probe;

pub use config::DeletionPolicy;
pub use config::HashFunc;
pub use config::HashTableConfig;
pub use error::HashTableError;
pub use hash_table::HashTable;
pub use hash_table::Slot;
pub use hash_table::SlotState;
pub use hash_table::Stats;
