use pex_types::Address;
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, Secp256k1,
};
use sha3::{Digest, Keccak256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("raw transaction is shorter than the 65-byte signature suffix")]
    Truncated,
    #[error("malformed recovery id byte {0}")]
    BadRecoveryId(u8),
    #[error("signature does not recover to a valid public key: {0}")]
    Secp256k1(#[from] secp256k1::Error),
}

/// Pure function: recover a sender address from a raw signed transaction.
/// A concrete secp256k1 implementation is provided as the default, but the
/// engine only depends on this trait.
pub trait Signer: Send + Sync {
    fn recover_sender(&self, raw_tx: &[u8]) -> Result<Address, RecoveryError>;
}

/// Recovers senders assuming `raw_tx` is `message || r(32) || s(32) || recovery_id(1)`,
/// where `message` is hashed with Keccak-256 before recovery.
pub struct Secp256k1Signer {
    ctx: Secp256k1<secp256k1::VerifyOnly>,
}

impl Default for Secp256k1Signer {
    fn default() -> Self {
        Self::new()
    }
}

impl Secp256k1Signer {
    pub fn new() -> Self {
        Self { ctx: Secp256k1::verification_only() }
    }
}

impl Signer for Secp256k1Signer {
    fn recover_sender(&self, raw_tx: &[u8]) -> Result<Address, RecoveryError> {
        if raw_tx.len() < 65 {
            return Err(RecoveryError::Truncated);
        }
        let (message, sig_bytes) = raw_tx.split_at(raw_tx.len() - 65);
        let recovery_id = RecoveryId::from_i32(sig_bytes[64] as i32)
            .map_err(|_| RecoveryError::BadRecoveryId(sig_bytes[64]))?;
        let signature = RecoverableSignature::from_compact(&sig_bytes[..64], recovery_id)?;
        let digest = Keccak256::digest(message);
        let msg = Message::from_digest_slice(&digest)?;
        let public_key = self.ctx.recover_ecdsa(&msg, &signature)?;
        Ok(public_key_to_address(&public_key))
    }
}

fn public_key_to_address(public_key: &secp256k1::PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    // Drop the 0x04 tag byte; the address is the low 20 bytes of Keccak-256
    // over the remaining 64-byte (x, y) point, as in the reference client
    // family this engine's wire format descends from.
    let hash = Keccak256::digest(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}
