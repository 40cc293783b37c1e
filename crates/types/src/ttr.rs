use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::codec::CodecError;

/// Transaction-to-run: the engine's internal transaction form.
///
/// Immutable once constructed — every field is set at `new()` time and there
/// are no setters. This is what Prepare validates and what the standby queue
/// stores (serialized via [`Ttr::to_bytes`]/[`Ttr::from_bytes`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ttr {
    content_hash: B256,
    sender: Address,
    /// Zero address means contract creation.
    recipient: Address,
    nonce: u64,
    value: U256,
    gas_limit: u64,
    gas_price: U256,
    input: Vec<u8>,
    block_height: u64,
}

impl Ttr {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        content_hash: B256,
        sender: Address,
        recipient: Address,
        nonce: u64,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
        input: Vec<u8>,
        block_height: u64,
    ) -> Self {
        Self {
            content_hash,
            sender,
            recipient,
            nonce,
            value,
            gas_limit,
            gas_price,
            input,
            block_height,
        }
    }

    pub fn content_hash(&self) -> B256 {
        self.content_hash
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    pub fn recipient(&self) -> Address {
        self.recipient
    }

    pub fn is_contract_creation(&self) -> bool {
        self.recipient.is_zero()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn gas_price(&self) -> U256 {
        self.gas_price
    }

    pub fn input(&self) -> &[u8] {
        &self.input
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// `gas_limit * gas_price`, widened to 256 bits so it can never overflow
    /// for any `u64` gas limit and `U256` gas price combination a Prepare
    /// caller could construct.
    pub fn gas_fee(&self) -> U256 {
        U256::from(self.gas_limit).saturating_mul(self.gas_price)
    }

    /// Fixed-layout binary encoding. Consensus state (the standby queue
    /// stores these bytes directly), so this must stay a total, deterministic
    /// bijection on the fields above — no self-describing format, no
    /// `#[serde(skip)]`, no `Option` fields that could serialize differently
    /// across versions of this crate.
    pub fn to_bytes(&self) -> Vec<u8> {
        // bincode's fixed-width integer + length-prefixed encoding is a
        // bijection for any concrete, non-self-describing struct, which is
        // exactly what's needed for queue entries that must round-trip
        // byte-for-byte across nodes.
        bincode::serialize(self).expect("Ttr fields are all bincode-encodable")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        bincode::deserialize(bytes).map_err(|source| CodecError::Ttr { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ttr {
        Ttr::new(
            B256::repeat_byte(0xAB),
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            7,
            U256::from(1_000u64),
            21_000,
            U256::from(5u64),
            vec![1, 2, 3, 4],
            42,
        )
    }

    #[test]
    fn round_trips_through_bytes() {
        let ttr = sample();
        let bytes = ttr.to_bytes();
        let decoded = Ttr::from_bytes(&bytes).expect("valid encoding");
        assert_eq!(ttr, decoded);
    }

    #[test]
    fn contract_creation_is_zero_recipient() {
        let ttr = Ttr::new(
            B256::ZERO,
            Address::repeat_byte(0x11),
            Address::ZERO,
            0,
            U256::ZERO,
            21_000,
            U256::from(1u64),
            vec![],
            0,
        );
        assert!(ttr.is_contract_creation());
    }

    #[test]
    fn gas_fee_is_limit_times_price() {
        let ttr = sample();
        assert_eq!(ttr.gas_fee(), U256::from(21_000u64) * U256::from(5u64));
    }

    #[test]
    fn decoding_garbage_is_a_codec_error() {
        assert!(Ttr::from_bytes(&[0xff; 3]).is_err());
    }
}
