use sha3::{Digest, Keccak256};

/// A 256-byte (2048-bit) per-transaction bloom filter, the same shape used by
/// the Ethereum-style client family this engine's wire format descends from.
pub type Bloom = [u8; 256];

/// Hash `data` with Keccak-256 and set the three bits it selects in `bloom`.
///
/// Each of the low three 16-bit words of the hash is masked to 11 bits to
/// pick a bit position in `[0, 2048)`; this is the fixed, non-pluggable
/// scheme named in SPEC_FULL §4.6.
pub fn bloom_add(bloom: &mut Bloom, data: &[u8]) {
    let hash = Keccak256::digest(data);
    for chunk in 0..3 {
        let word = u16::from_be_bytes([hash[chunk * 2], hash[chunk * 2 + 1]]);
        let bit = (word & 0x07ff) as usize;
        let byte_index = 255 - bit / 8;
        let bit_index = bit % 8;
        bloom[byte_index] |= 1 << bit_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_bits_is_idempotent() {
        let mut bloom = [0u8; 256];
        bloom_add(&mut bloom, b"an address");
        let once = bloom;
        bloom_add(&mut bloom, b"an address");
        assert_eq!(bloom, once);
    }

    #[test]
    fn distinct_inputs_usually_set_distinct_bits() {
        let mut a = [0u8; 256];
        let mut b = [0u8; 256];
        bloom_add(&mut a, b"topic-one");
        bloom_add(&mut b, b"topic-two");
        assert_ne!(a, b);
    }
}
