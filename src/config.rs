use alloc::boxed::Box;
use core::fmt::Debug;

use crate::error::HashTableError;
use crate::hash_fns::DEFAULT_PRIMARY;

/// A hash function mapping `(key, size)` to an index.
///
/// Results are reduced modulo the relevant size by the table, so a function
/// returning values outside `0..size` is tolerated.
pub type HashFunc = fn(&str, usize) -> usize;

/// Callback that takes ownership of a value the table relinquishes.
pub type ReleaseFn<V> = Box<dyn FnMut(V)>;

/// How `remove` disposes of the vacated slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletionPolicy {
    /// Leave a tombstone that later inserts may reclaim.
    #[default]
    Mark,
    /// Empty the slot and re-place the rest of its cluster.
    Pack,
}

const DEFAULT_INITIAL_CAPACITY: usize = 7;
const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.7;
const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

/// Construction-time configuration for a [`HashTable`](crate::HashTable).
///
/// Immutable once the table is built.
///
/// # Examples
///
/// ```rust
/// # use oa_hash::DeletionPolicy;
/// # use oa_hash::HashTable;
/// # use oa_hash::HashTableConfig;
/// # use oa_hash::hash_fns::pjw_hash;
/// # use oa_hash::hash_fns::universal_hash;
/// #
/// let config = HashTableConfig::new(pjw_hash)
///     .initial_capacity(11)
///     .secondary_hash(universal_hash)
///     .max_load_factor(0.5)
///     .deletion_policy(DeletionPolicy::Pack);
///
/// let table: HashTable<u32> = HashTable::new(config).unwrap();
/// assert_eq!(table.capacity(), 11);
/// ```
pub struct HashTableConfig<V> {
    pub(crate) initial_capacity: usize,
    pub(crate) primary: HashFunc,
    pub(crate) secondary: Option<HashFunc>,
    pub(crate) max_load_factor: f64,
    pub(crate) growth_factor: f64,
    pub(crate) deletion_policy: DeletionPolicy,
    pub(crate) release: Option<ReleaseFn<V>>,
}

impl<V> Default for HashTableConfig<V> {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY)
    }
}

impl<V> Debug for HashTableConfig<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTableConfig")
            .field("initial_capacity", &self.initial_capacity)
            .field("double_hashing", &self.secondary.is_some())
            .field("max_load_factor", &self.max_load_factor)
            .field("growth_factor", &self.growth_factor)
            .field("deletion_policy", &self.deletion_policy)
            .field("has_release", &self.release.is_some())
            .finish()
    }
}

impl<V> HashTableConfig<V> {
    /// Starts a configuration around `primary` with default settings:
    /// capacity 7, linear probing, load factor 0.7, growth factor 2,
    /// [`DeletionPolicy::Mark`] and no release callback.
    pub fn new(primary: HashFunc) -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            primary,
            secondary: None,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            deletion_policy: DeletionPolicy::Mark,
            release: None,
        }
    }

    /// Requested initial size; rounded up to the nearest prime.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Enables double hashing with `secondary` as the stride source.
    pub fn secondary_hash(mut self, secondary: HashFunc) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Load factor in `(0, 1]` above which an insert grows the table first.
    /// Exactly 1 grows only when the table is full.
    pub fn max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    /// Multiplier (> 1) applied to the capacity on growth.
    pub fn growth_factor(mut self, growth_factor: f64) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Selects how removal treats the vacated slot.
    pub fn deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Hands every value the table relinquishes (on removal, `clear` and
    /// drop) to `release` instead of dropping it.
    pub fn release(mut self, release: impl FnMut(V) + 'static) -> Self {
        self.release = Some(Box::new(release));
        self
    }

    pub(crate) fn validate(&self) -> Result<(), HashTableError> {
        if self.initial_capacity == 0 {
            return Err(HashTableError::InvalidConfig(
                "initial capacity must be at least 1",
            ));
        }
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(HashTableError::InvalidConfig(
                "max load factor must lie in (0, 1]",
            ));
        }
        if !(self.growth_factor > 1.0 && self.growth_factor.is_finite()) {
            return Err(HashTableError::InvalidConfig(
                "growth factor must be a finite number above 1",
            ));
        }
        Ok(())
    }
}
