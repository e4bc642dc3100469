//! Load Generator
//!
//! Pre-generated random keys and values for performance testing. Data is
//! built up front so benchmark loops measure the engine, not the RNG.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Pre-generated benchmark data
pub struct LoadData {
    /// Random keys, sized to cover both read and write counts
    pub keys: Vec<String>,

    /// Random values, one per write
    pub values: Vec<String>,
}

impl LoadData {
    /// Generate keys and values for a workload of `num_reads` reads and
    /// `num_writes` writes.
    pub fn generate(
        num_reads: usize,
        num_writes: usize,
        key_len: usize,
        value_len: usize,
    ) -> Self {
        let num_keys = num_reads.max(num_writes);

        let keys = (0..num_keys).map(|_| random_string(key_len)).collect();
        let values = (0..num_writes).map(|_| random_string(value_len)).collect();

        Self { keys, values }
    }
}

/// Random alphanumeric string of the given length
fn random_string(len: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sizes() {
        let data = LoadData::generate(100, 50, 16, 32);
        assert_eq!(data.keys.len(), 100);
        assert_eq!(data.values.len(), 50);
        assert!(data.keys.iter().all(|k| k.len() == 16));
        assert!(data.values.iter().all(|v| v.len() == 32));
    }

    #[test]
    fn test_keys_are_wire_safe() {
        let data = LoadData::generate(10, 10, 8, 8);
        for k in &data.keys {
            assert!(!k.chars().any(char::is_whitespace));
        }
    }
}
