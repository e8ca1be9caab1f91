//! Ready-made hash functions for [`HashTableConfig`](crate::HashTableConfig).
//!
//! Each function maps `(key, size)` to an index in `0..size`. Any of them can
//! serve as the primary hash; as the secondary hash the table calls them
//! with `capacity - 1` and adds 1 to the result to form the probe stride.

use crate::config::HashFunc;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The primary hash used by [`HashTableConfig::default`](crate::HashTableConfig::default).
        pub const DEFAULT_PRIMARY: HashFunc = fold_hash;
    } else {
        /// The primary hash used by [`HashTableConfig::default`](crate::HashTableConfig::default).
        pub const DEFAULT_PRIMARY: HashFunc = pjw_hash;
    }
}

/// Sum of the key's bytes modulo `size`.
///
/// Deliberately weak: anagrams collide. Useful for building predictable
/// layouts in tests and demonstrations.
pub fn simple_hash(key: &str, size: usize) -> usize {
    let sum = key
        .bytes()
        .fold(0usize, |acc, b| acc.wrapping_add(b as usize));
    sum % size.max(1)
}

/// Polynomial hash with a pseudo-random multiplier that changes per byte.
pub fn universal_hash(key: &str, size: usize) -> usize {
    let size = size.max(1) as u64;
    let modulus = (size - 1).max(1);
    let mut hash = 0u64;
    let mut a = 31_415u64;
    let b = 27_183u64;

    for byte in key.bytes() {
        hash = (a.wrapping_mul(hash).wrapping_add(byte as u64)) % size;
        a = a.wrapping_mul(b) % modulus;
    }
    hash as usize
}

/// P. J. Weinberger's hash, as used in ELF symbol tables.
pub fn pjw_hash(key: &str, size: usize) -> usize {
    let mut h = 0u32;
    for byte in key.bytes() {
        h = (h << 4).wrapping_add(byte as u32);
        let g = h & 0xF000_0000;
        if g != 0 {
            h ^= g >> 24;
            h ^= g;
        }
    }
    h as usize % size.max(1)
}

/// foldhash with a fixed seed, so layouts are reproducible across runs.
#[cfg(feature = "foldhash")]
pub fn fold_hash(key: &str, size: usize) -> usize {
    use core::hash::BuildHasher;

    const SEED: u64 = 0x5851_F42D_4C95_7F2D;
    let state = foldhash::fast::FixedState::with_seed(SEED);
    (state.hash_one(key) % size.max(1) as u64) as usize
}
