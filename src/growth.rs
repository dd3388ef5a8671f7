//! Capacity growth policy: bucket counts are primes of the form `6k ± 1`.

/// Bucket count used when nothing better is known about the expected size.
pub const DEFAULT_CAPACITY: usize = 5;

/// Trial-division primality test. Divisors run from 2 up to and including
/// the integer square root, so perfect squares are never reported prime.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2usize;
    while let Some(sq) = i.checked_mul(i) {
        if sq > n {
            break;
        }
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Smallest prime `p >= n` with `p % 6` equal to 1 or 5.
///
/// The residue filter skips multiples of 2 and 3 up front, which also means
/// 2 and 3 are never returned: `next_capacity(0..=5)` is always 5.
pub fn next_capacity(n: usize) -> usize {
    let mut candidate = n;
    loop {
        let r = candidate % 6;
        if (r == 1 || r == 5) && is_prime(candidate) {
            return candidate;
        }
        candidate += 1;
    }
}
