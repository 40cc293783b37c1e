use alloy_primitives::Address;

/// Consensus constant: a transaction whose gas limit exceeds this is invalid
/// at Prepare time, no matter how much the sender is willing to pay for it.
pub const MAX_TX_GAS_LIMIT: u64 = 10_000_000;

/// Accumulator for gas fees pre-deducted during Prepare.
///
/// Part of the wire/consensus format; zero-padded on the left with the ASCII
/// bytes of `"system"` on the right, exactly as the reference implementation
/// defines it. Must never change across versions.
pub const SYSTEM_ADDRESS: Address = well_known(b"system");

/// Sink for value that is deliberately burned rather than transferred.
///
/// Same layout convention as [`SYSTEM_ADDRESS`], with the ASCII bytes of
/// `"blackhole"`.
pub const BLACKHOLE_ADDRESS: Address = well_known(b"blackhole");

const fn well_known(suffix: &[u8]) -> Address {
    let mut bytes = [0u8; 20];
    let mut i = 0;
    // left-pad: the suffix occupies the rightmost `suffix.len()` bytes.
    while i < suffix.len() {
        bytes[20 - suffix.len() + i] = suffix[i];
        i += 1;
    }
    Address::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_address_is_left_padded_ascii() {
        assert_eq!(SYSTEM_ADDRESS.as_slice(), &hex_literal("system"));
    }

    #[test]
    fn blackhole_address_is_left_padded_ascii() {
        assert_eq!(BLACKHOLE_ADDRESS.as_slice(), &hex_literal("blackhole"));
    }

    #[test]
    fn well_known_addresses_are_distinct_and_stable() {
        assert_ne!(SYSTEM_ADDRESS, BLACKHOLE_ADDRESS);
        assert_eq!(SYSTEM_ADDRESS, well_known(b"system"));
    }

    fn hex_literal(ascii: &str) -> [u8; 20] {
        let mut out = [0u8; 20];
        let suffix = ascii.as_bytes();
        out[20 - suffix.len()..].copy_from_slice(suffix);
        out
    }
}
