//! Bloom Filter
//!
//! Probabilistic set membership for SSTables: "is this key in the table?"
//!
//! - If any probed bit is 0 → key is DEFINITELY NOT in the table
//! - If all probed bits are 1 → key is PROBABLY in the table
//!
//! Every SSTable carries exactly one filter, populated while the table is
//! built and never mutated afterwards. There is no removal operation; bits
//! are only ever set, which is safe precisely because the filters belong to
//! immutable tables.
//!
//! Geometry is fixed: M = 200,000 bits probed K = 9 times per key. For n
//! inserted keys the false-positive rate is bounded by the standard
//! `(1 - e^(-K*n/M))^K` (about 1.3% at n = 10,000).

use xxhash_rust::xxh3::xxh3_64;

/// Number of bits in the filter
pub const FILTER_BITS: usize = 200_000;

/// Number of bit positions probed per key
pub const HASH_COUNT: u64 = 9;

// Odd multiplier mixing the seed into the base hash. The exact constant is
// not load-bearing; it only has to keep the K probe positions independent.
const SEED_MIX: u64 = 0x5bd1_e995;

/// Fixed-size Bloom filter with K derived positions per key.
pub struct BloomFilter {
    /// Bit array packed into u64 words
    bits: Vec<u64>,
}

impl BloomFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self {
            bits: vec![0u64; FILTER_BITS.div_ceil(64)],
        }
    }

    /// Add a key to the filter
    pub fn add(&mut self, key: &str) {
        let base = xxh3_64(key.as_bytes());
        for seed in 0..HASH_COUNT {
            let pos = Self::position(base, seed);
            self.set_bit(pos);
        }
    }

    /// Check whether a key might be in the set.
    ///
    /// `false` is a definitive proof of absence; `true` is only a
    /// probabilistic claim.
    pub fn might_contain(&self, key: &str) -> bool {
        let base = xxh3_64(key.as_bytes());
        for seed in 0..HASH_COUNT {
            let pos = Self::position(base, seed);
            if !self.check_bit(pos) {
                return false;
            }
        }
        true
    }

    /// Derive the bit position for a (base hash, seed) pair
    fn position(base: u64, seed: u64) -> usize {
        ((base ^ seed.wrapping_mul(SEED_MIX)) % FILTER_BITS as u64) as usize
    }

    /// Set the bit at the given position
    fn set_bit(&mut self, pos: usize) {
        self.bits[pos / 64] |= 1 << (pos % 64);
    }

    /// Check the bit at the given position
    fn check_bit(&self, pos: usize) -> bool {
        (self.bits[pos / 64] >> (pos % 64)) & 1 == 1
    }
}

impl Default for BloomFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basics() {
        let mut bf = BloomFilter::new();
        bf.add("hello");
        assert!(bf.might_contain("hello"));
        assert!(!bf.might_contain("world"));
    }

    #[test]
    fn test_empty_filter_rejects_everything() {
        let bf = BloomFilter::new();
        assert!(!bf.might_contain("any_key"));
        assert!(!bf.might_contain(""));
    }
}
