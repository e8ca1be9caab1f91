//! Prime sizing for the slot array.
//!
//! Capacities are always prime so that any double-hashing stride in
//! `1..capacity` is coprime with the capacity and the probe sequence visits
//! every slot before returning to its start.

/// Returns `true` if `n` is prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut d = 5usize;
    while d.saturating_mul(d) <= n {
        if n % d == 0 || n % (d + 2) == 0 {
            return false;
        }
        d += 6;
    }
    true
}

/// Returns the smallest prime greater than or equal to `n`.
///
/// Values below 2 map to 2.
///
/// # Examples
///
/// ```rust
/// # use oa_hash::prime::closest_prime;
/// #
/// assert_eq!(closest_prime(14), 17);
/// assert_eq!(closest_prime(17), 17);
/// assert_eq!(closest_prime(0), 2);
/// ```
pub fn closest_prime(n: usize) -> usize {
    let mut candidate = n.max(2);
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}
