use crate::config::HashFunc;

/// The cyclic sequence of slot indices examined for one key.
///
/// Starts at `primary(key, capacity) mod capacity` and advances by a fixed
/// stride: `secondary(key, capacity - 1) + 1` when a secondary hash is
/// configured, otherwise 1. Yields each index once and stops after `capacity`
/// steps, i.e. just before the sequence would return to its start. With a
/// prime capacity every stride in `1..capacity` is coprime with it, so a
/// full cycle visits every slot.
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    start: usize,
    index: usize,
    stride: usize,
    capacity: usize,
    remaining: usize,
}

impl ProbeSeq {
    /// Builds the sequence for `key` over a table of `capacity` slots.
    #[inline]
    pub fn new(
        key: &str,
        capacity: usize,
        primary: HashFunc,
        secondary: Option<HashFunc>,
    ) -> Self {
        debug_assert!(capacity > 0);
        let start = primary(key, capacity) % capacity;
        Self {
            start,
            index: start,
            stride: stride_for(key, capacity, secondary),
            capacity,
            remaining: capacity,
        }
    }

    /// First index of the sequence.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Distance between consecutive indices.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Computes the probe stride for `key`.
///
/// The secondary hash is reduced into `0..capacity - 1` before the `+ 1`, so
/// a misbehaving hash function cannot produce a stride of 0 or `capacity`.
#[inline]
pub fn stride_for(key: &str, capacity: usize, secondary: Option<HashFunc>) -> usize {
    match secondary {
        Some(secondary) if capacity > 1 => secondary(key, capacity - 1) % (capacity - 1) + 1,
        _ => 1,
    }
}

/// Steps `index` forward by `stride` on a ring of `capacity` slots.
#[inline(always)]
pub fn step(index: usize, stride: usize, capacity: usize) -> usize {
    (index + stride) % capacity
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.index;
        self.index = step(self.index, self.stride, self.capacity);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
