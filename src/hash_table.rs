//! The open-addressing table engine.
//!
//! Every slot lives directly in one prime-sized array. Insert, find and
//! remove walk the [`ProbeSeq`] of the key; removal either leaves a
//! tombstone ([`DeletionPolicy::Mark`]) or empties the slot and re-places
//! the cluster behind it ([`DeletionPolicy::Pack`]).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::fmt::Debug;
use core::fmt::Display;

use crate::config::DeletionPolicy;
use crate::config::HashFunc;
use crate::config::HashTableConfig;
use crate::error::HashTableError;
use crate::key::SlotKey;
use crate::key::truncate_key;
use crate::prime::closest_prime;
use crate::probe::ProbeSeq;
use crate::probe::step;
use crate::probe::stride_for;

/// State marker of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never used, or vacated by compaction. Ends every probe walk.
    Empty,
    /// Holds a live key/value pair.
    Occupied,
    /// Tombstone: logically empty, but probe walks continue past it.
    Deleted,
}

/// One entry of the backing array, as exposed by [`HashTable::raw_view`].
pub struct Slot<V> {
    state: SlotState,
    key: SlotKey,
    value: Option<V>,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Self {
            state: SlotState::Empty,
            key: SlotKey::default(),
            value: None,
        }
    }

    #[inline]
    fn fill(&mut self, key: &str, value: V) {
        self.key = SlotKey::new(key);
        self.value = Some(value);
        self.state = SlotState::Occupied;
    }

    /// Current state marker.
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// The stored key. Tombstones keep the key of the entry they replaced;
    /// slots that were never filled report `""`.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The stored value; `Some` exactly when the slot is occupied.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }
}

impl<V: Debug> Debug for Slot<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot")
            .field("state", &self.state)
            .field("key", &self.key)
            .field("value", &self.value)
            .finish()
    }
}

fn empty_slots<V>(capacity: usize) -> Box<[Slot<V>]> {
    (0..capacity).map(|_| Slot::empty()).collect()
}

/// Snapshot of table statistics returned by [`HashTable::stats`].
#[derive(Clone, Copy)]
pub struct Stats {
    /// Number of slots in the backing array (always prime).
    pub table_size: usize,
    /// Lifetime number of slots examined by all probe walks.
    pub probes: usize,
    /// Number of occupied slots.
    pub count: usize,
    /// Lifetime number of growth events.
    pub expansions: usize,
    /// `count / table_size`.
    pub load_factor: f64,
    /// The configured primary hash.
    pub primary_hash: HashFunc,
    /// The configured secondary hash, if double hashing is enabled.
    pub secondary_hash: Option<HashFunc>,
}

impl Debug for Stats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stats")
            .field("table_size", &self.table_size)
            .field("probes", &self.probes)
            .field("count", &self.count)
            .field("expansions", &self.expansions)
            .field("load_factor", &self.load_factor)
            .field("double_hashing", &self.secondary_hash.is_some())
            .finish()
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}/{} slots ({:.2}% load), {} probes, {} expansions",
            self.count,
            self.table_size,
            self.load_factor * 100.0,
            self.probes,
            self.expansions
        )
    }
}

impl Stats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.count,
            self.table_size,
            self.load_factor * 100.0
        );
        println!(
            "Probing: {}",
            if self.secondary_hash.is_some() {
                "double hashing"
            } else {
                "linear"
            }
        );
        println!("Probes: {}", self.probes);
        println!("Expansions: {}", self.expansions);
    }
}

/// An open-addressing hash table from bounded-length text keys to `V`.
///
/// Keys are copied into the slots (truncated to
/// [`MAX_KEY_LEN`](crate::key::MAX_KEY_LEN) bytes). Collisions are resolved
/// by linear probing, or by double hashing when a secondary hash is
/// configured. The capacity is always prime and grows by the configured
/// factor whenever an insert would push the load factor past its maximum.
///
/// Inserting does not check for an existing entry with the same key: a
/// second insert of the same key occupies a second slot, and `find`/`remove`
/// act on whichever copy comes first along the probe sequence.
///
/// Not thread-safe; every operation assumes exclusive access.
///
/// ## Example
///
/// ```rust
/// # use oa_hash::HashTable;
/// # use oa_hash::HashTableError;
/// #
/// let mut table = HashTable::with_capacity(7);
/// table.insert("alpha", 1).unwrap();
/// table.insert("beta", 2).unwrap();
///
/// assert_eq!(table.find("alpha"), Ok(&1));
/// table.remove("alpha").unwrap();
/// assert_eq!(table.find("alpha"), Err(HashTableError::NotFound));
/// assert_eq!(table.len(), 1);
/// ```
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    count: usize,
    probes: Cell<usize>,
    expansions: usize,
    config: HashTableConfig<V>,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::string::ToString;

        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .map(|slot| match slot.state {
                        SlotState::Empty => "..".to_string(),
                        SlotState::Deleted => "xx".to_string(),
                        SlotState::Occupied => slot.key().to_string(),
                    })
                    .collect::<Vec<String>>(),
            )
            .field("count", &self.count)
            .field("capacity", &self.slots.len())
            .field("expansions", &self.expansions)
            .field("policy", &self.config.deletion_policy)
            .finish()
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V> HashTable<V> {
    /// Builds an empty table from `config`.
    ///
    /// The capacity is the nearest prime at or above the requested initial
    /// capacity.
    ///
    /// # Errors
    ///
    /// [`HashTableError::InvalidConfig`] if the initial capacity is 0, the
    /// max load factor lies outside `(0, 1]`, or the growth factor is not a
    /// finite number above 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// # use oa_hash::HashTableConfig;
    /// # use oa_hash::hash_fns::simple_hash;
    /// #
    /// let table: HashTable<i32> =
    ///     HashTable::new(HashTableConfig::new(simple_hash).initial_capacity(8)).unwrap();
    /// assert_eq!(table.capacity(), 11);
    ///
    /// let bad = HashTable::<i32>::new(HashTableConfig::new(simple_hash).growth_factor(0.5));
    /// assert!(bad.is_err());
    /// ```
    pub fn new(config: HashTableConfig<V>) -> Result<Self, HashTableError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Builds an empty table with the default configuration and at least
    /// `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_valid_config(HashTableConfig::default().initial_capacity(capacity.max(1)))
    }

    fn from_valid_config(config: HashTableConfig<V>) -> Self {
        Self {
            slots: empty_slots(closest_prime(config.initial_capacity)),
            count: 0,
            probes: Cell::new(0),
            expansions: 0,
            config,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots in the backing array.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn probe_seq(&self, key: &str) -> ProbeSeq {
        ProbeSeq::new(
            key,
            self.slots.len(),
            self.config.primary,
            self.config.secondary,
        )
    }

    #[inline]
    fn record_probes(&self, probes: usize) {
        self.probes.set(self.probes.get().saturating_add(probes));
    }

    fn release(&mut self, value: V) {
        match self.config.release.as_mut() {
            Some(release) => release(value),
            None => drop(value),
        }
    }

    /// Inserts `value` under `key`.
    ///
    /// If the insert would push the load factor past the configured maximum
    /// (or, with a maximum of exactly 1, if the table is full) the table
    /// grows first. The first tombstone on the key's probe sequence is
    /// reused in preference to the empty slot that ends the walk.
    ///
    /// An existing entry with the same key is not replaced; the new entry
    /// takes another slot.
    ///
    /// # Errors
    ///
    /// - [`HashTableError::NullKey`] if `key` is `None`.
    /// - [`HashTableError::TableFull`] if no empty slot or tombstone is
    ///   reachable. The growth check makes this unreachable with a valid
    ///   configuration; `value` is dropped if it happens.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// # use oa_hash::HashTableError;
    /// #
    /// let mut table = HashTable::with_capacity(7);
    /// assert_eq!(table.insert("key", 10), Ok(()));
    /// assert_eq!(table.insert(None, 11), Err(HashTableError::NullKey));
    ///
    /// // Duplicates are stored side by side.
    /// table.insert("key", 12).unwrap();
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn insert<'k>(
        &mut self,
        key: impl Into<Option<&'k str>>,
        value: V,
    ) -> Result<(), HashTableError> {
        let key = truncate_key(key.into().ok_or(HashTableError::NullKey)?);

        while self.needs_growth() {
            self.grow(self.next_size());
        }

        self.place(key, value)
            .map(|_| ())
            .map_err(|_| HashTableError::TableFull)
    }

    fn needs_growth(&self) -> bool {
        let capacity = self.slots.len();
        if self.config.max_load_factor >= 1.0 {
            return self.count >= capacity;
        }
        (self.count + 1) as f64 / capacity as f64 > self.config.max_load_factor
    }

    fn next_size(&self) -> usize {
        let capacity = self.slots.len();
        let requested = (capacity as f64 * self.config.growth_factor).ceil() as usize;
        requested.max(capacity + 1)
    }

    /// Walks the probe sequence of `key` and stores the pair in the first
    /// tombstone seen, else in the empty slot that ends the walk. Returns the
    /// slot index, or hands the value back if the walk found neither.
    ///
    /// Never grows the table.
    fn place(&mut self, key: &str, value: V) -> Result<usize, V> {
        let mut tombstone = None;
        let mut target = None;
        let mut probes = 0;

        for index in self.probe_seq(key) {
            probes += 1;
            match self.slots[index].state {
                SlotState::Deleted => {
                    tombstone.get_or_insert(index);
                }
                SlotState::Empty => {
                    target = Some(tombstone.unwrap_or(index));
                    break;
                }
                SlotState::Occupied => {}
            }
        }
        self.record_probes(probes);

        let Some(index) = target.or(tombstone) else {
            return Err(value);
        };

        self.slots[index].fill(key, value);
        self.count += 1;
        Ok(index)
    }

    /// Index of the first occupied slot holding `key` along its probe
    /// sequence. Tombstones are stepped over without comparing keys.
    fn locate(&self, key: &str) -> Option<usize> {
        let mut probes = 0;
        let mut found = None;

        for index in self.probe_seq(key) {
            probes += 1;
            let slot = &self.slots[index];
            match slot.state {
                SlotState::Occupied if slot.key == *key => {
                    found = Some(index);
                    break;
                }
                SlotState::Empty => break,
                _ => {}
            }
        }

        self.record_probes(probes);
        found
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// [`HashTableError::NotFound`] if the key is absent from the table, or
    /// if `key` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// # use oa_hash::HashTableError;
    /// #
    /// let mut table = HashTable::with_capacity(7);
    /// table.insert("key", 'v').unwrap();
    ///
    /// assert_eq!(table.find("key"), Ok(&'v'));
    /// assert_eq!(table.find("other"), Err(HashTableError::NotFound));
    /// assert_eq!(table.find(None), Err(HashTableError::NotFound));
    /// ```
    pub fn find<'k>(&self, key: impl Into<Option<&'k str>>) -> Result<&V, HashTableError> {
        let key = truncate_key(key.into().ok_or(HashTableError::NotFound)?);
        let index = self.locate(key).ok_or(HashTableError::NotFound)?;
        self.slots[index]
            .value
            .as_ref()
            .ok_or(HashTableError::NotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`find`](Self::find).
    pub fn find_mut<'k>(
        &mut self,
        key: impl Into<Option<&'k str>>,
    ) -> Result<&mut V, HashTableError> {
        let key = truncate_key(key.into().ok_or(HashTableError::NotFound)?);
        let index = self.locate(key).ok_or(HashTableError::NotFound)?;
        self.slots[index]
            .value
            .as_mut()
            .ok_or(HashTableError::NotFound)
    }

    /// Removes the entry stored under `key`, releasing its value.
    ///
    /// Under [`DeletionPolicy::Mark`] the slot becomes a tombstone. Under
    /// [`DeletionPolicy::Pack`] it becomes empty and every entry in the
    /// cluster behind it (along the removed key's stride) is re-placed, so
    /// entries that were only reachable past the freed slot stay findable.
    ///
    /// # Errors
    ///
    /// [`HashTableError::NotFound`] if the key is absent from the table, or
    /// if `key` is `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::DeletionPolicy;
    /// # use oa_hash::HashTable;
    /// # use oa_hash::HashTableConfig;
    /// # use oa_hash::HashTableError;
    /// # use oa_hash::SlotState;
    /// #
    /// let config = HashTableConfig::default().deletion_policy(DeletionPolicy::Pack);
    /// let mut table = HashTable::new(config).unwrap();
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    ///
    /// table.remove("a").unwrap();
    /// assert_eq!(table.remove("a"), Err(HashTableError::NotFound));
    /// assert_eq!(table.find("b"), Ok(&2));
    /// assert!(table.raw_view().iter().all(|s| s.state() != SlotState::Deleted));
    /// ```
    pub fn remove<'k>(&mut self, key: impl Into<Option<&'k str>>) -> Result<(), HashTableError> {
        let key = truncate_key(key.into().ok_or(HashTableError::NotFound)?);
        let index = self.locate(key).ok_or(HashTableError::NotFound)?;

        if let Some(value) = self.slots[index].value.take() {
            self.release(value);
        }

        match self.config.deletion_policy {
            DeletionPolicy::Mark => {
                self.slots[index].state = SlotState::Deleted;
                self.count -= 1;
            }
            DeletionPolicy::Pack => {
                self.slots[index].state = SlotState::Empty;
                self.count -= 1;
                let stride = stride_for(key, self.slots.len(), self.config.secondary);
                self.pack(index, stride);
            }
        }

        Ok(())
    }

    /// Re-places the cluster that follows the freed slot at `freed` along
    /// `stride`.
    ///
    /// With linear probing the cluster ends at the first empty slot, and no
    /// entry outside it can have probed through `freed`. With double hashing
    /// other keys step with other strides, so every occupied slot is
    /// re-placed. Entries are lifted out before any is placed again, so a
    /// placement can never strand an entry that was already re-placed.
    fn pack(&mut self, freed: usize, stride: usize) {
        let capacity = self.slots.len();
        let whole_table = self.config.secondary.is_some();

        let mut cluster = Vec::new();
        let mut cursor = step(freed, stride, capacity);
        while cursor != freed {
            match self.slots[cursor].state {
                SlotState::Occupied => cluster.push(cursor),
                SlotState::Empty if !whole_table => break,
                _ => {}
            }
            cursor = step(cursor, stride, capacity);
        }

        let mut lifted = Vec::with_capacity(cluster.len());
        for index in cluster {
            let slot = &mut self.slots[index];
            slot.state = SlotState::Empty;
            self.count -= 1;
            if let Some(value) = slot.value.take() {
                lifted.push((slot.key, value));
            }
        }

        let relocated = lifted.len();
        for (key, value) in lifted {
            let placed = self.place(key.as_str(), value);
            debug_assert!(placed.is_ok(), "a vacated slot is always reachable");
        }

        log::trace!(
            "packed cluster after slot {freed} (stride {stride}): {relocated} entries re-placed"
        );
    }

    /// Reallocates the backing array at the nearest prime at or above
    /// `requested` and re-places every live entry in old slot order.
    ///
    /// Values are moved, never released.
    fn grow(&mut self, requested: usize) {
        let capacity = closest_prime(requested);
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        let old_capacity = old.len();
        let migrated = self.count;

        self.expansions += 1;
        self.count = 0;

        for mut slot in old.into_vec() {
            if slot.state != SlotState::Occupied {
                continue;
            }
            if let Some(value) = slot.value.take() {
                let placed = self.place(slot.key.as_str(), value);
                debug_assert!(placed.is_ok(), "grown table has room for every entry");
            }
        }

        debug_assert_eq!(self.count, migrated);
        log::debug!(
            "grew table from {old_capacity} to {capacity} slots, {migrated} entries rehashed \
             (expansion #{})",
            self.expansions
        );
    }

    /// Releases every value and resets all slots to empty. The capacity and
    /// the lifetime statistics are kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(7);
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    ///
    /// table.clear();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), 7);
    /// ```
    pub fn clear(&mut self) {
        for index in 0..self.slots.len() {
            let slot = &mut self.slots[index];
            slot.state = SlotState::Empty;
            if let Some(value) = slot.value.take() {
                self.release(value);
            }
        }
        self.count = 0;
    }

    /// Returns a snapshot of the table statistics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(7);
    /// table.insert("a", 1).unwrap();
    ///
    /// let stats = table.stats();
    /// assert_eq!(stats.count, 1);
    /// assert_eq!(stats.table_size, 7);
    /// assert!(stats.probes >= 1);
    /// ```
    pub fn stats(&self) -> Stats {
        let table_size = self.slots.len();
        Stats {
            table_size,
            probes: self.probes.get(),
            count: self.count,
            expansions: self.expansions,
            load_factor: self.count as f64 / table_size as f64,
            primary_hash: self.config.primary,
            secondary_hash: self.config.secondary,
        }
    }

    /// Read-only view of the backing slot array, for diagnostics and tests.
    pub fn raw_view(&self) -> &[Slot<V>] {
        &self.slots
    }

    /// Returns an iterator over the live `(key, value)` pairs in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use oa_hash::HashTable;
    /// #
    /// let mut table = HashTable::with_capacity(7);
    /// table.insert("a", 1).unwrap();
    /// table.insert("b", 2).unwrap();
    ///
    /// let mut pairs: Vec<_> = table.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [("a", &1), ("b", &2)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Computes a histogram of cluster lengths.
    ///
    /// A cluster here is a maximal run of non-empty slots at adjacent
    /// indices, wrapping around the end of the array. Entry `n` of the result
    /// counts clusters of length `n`; entry 0 is always 0.
    #[cfg(feature = "stats")]
    pub fn cluster_histogram(&self) -> Vec<usize> {
        let capacity = self.slots.len();
        let Some(first_empty) = self
            .slots
            .iter()
            .position(|slot| slot.state == SlotState::Empty)
        else {
            let mut hist = alloc::vec![0usize; capacity + 1];
            hist[capacity] = 1;
            return hist;
        };

        let mut hist = alloc::vec![0usize; 1];
        let mut run = 0usize;
        for offset in 1..=capacity {
            let index = (first_empty + offset) % capacity;
            if self.slots[index].state != SlotState::Empty {
                run += 1;
                continue;
            }
            if run > 0 {
                if hist.len() <= run {
                    hist.resize(run + 1, 0);
                }
                hist[run] += 1;
                run = 0;
            }
        }
        hist
    }
}

/// An iterator over the live entries of a [`HashTable`].
///
/// This struct is created by [`HashTable::iter`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if slot.state != SlotState::Occupied {
                continue;
            }
            if let Some(value) = slot.value.as_ref() {
                return Some((slot.key.as_str(), value));
            }
        }
        None
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
