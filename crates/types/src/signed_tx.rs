use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Everything about a transaction except its sender, which Prepare only
/// learns once the signature over this payload has been recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPayload {
    /// Zero address means contract creation.
    pub recipient: Address,
    pub nonce: u64,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub input: Vec<u8>,
    pub block_height: u64,
}

impl TxPayload {
    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("TxPayload is always bincode-encodable")
    }

    pub fn content_hash(&self) -> B256 {
        B256::from_slice(&Keccak256::digest(self.to_bytes()))
    }
}

/// What `collect_tx` appends to the engine's input list: a payload plus a
/// recoverable signature over it. Prepare is the only place the signature is
/// ever inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTx {
    pub payload: TxPayload,
    /// `r(32) || s(32) || recovery_id(1)` over `payload.to_bytes()`.
    pub signature: [u8; 65],
}

impl SignedTx {
    pub fn new(payload: TxPayload, signature: [u8; 65]) -> Self {
        Self { payload, signature }
    }

    /// The bytes an injected `Signer` recovers a sender from: the payload
    /// followed by its signature.
    pub fn raw_bytes(&self) -> Vec<u8> {
        let mut bytes = self.payload.to_bytes();
        bytes.extend_from_slice(&self.signature);
        bytes
    }
}
