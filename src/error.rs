use thiserror::Error;

/// Errors reported by [`HashTable`](crate::HashTable) operations.
///
/// A failed operation leaves the table exactly as it was before the call.
///
/// Note the asymmetry for absent keys: [`insert`](crate::HashTable::insert)
/// reports [`NullKey`](HashTableError::NullKey), while
/// [`find`](crate::HashTable::find) and [`remove`](crate::HashTable::remove)
/// report [`NotFound`](HashTableError::NotFound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HashTableError {
    /// The key passed to `insert` was absent.
    #[error("key cannot be null")]
    NullKey,
    /// No empty slot or tombstone was reachable along the probe sequence.
    #[error("failed to insert item: no reusable slot")]
    TableFull,
    /// The key is not in the table, or was absent on `find`/`remove`.
    #[error("key not in table")]
    NotFound,
    /// The configuration passed to `HashTable::new` is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
