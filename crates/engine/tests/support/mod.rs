//! Shared fixtures for the scenario tests in this directory: a deterministic
//! keypair/signer, a scriptable reference VM, and a small `TxPayload`
//! builder. Not part of the crate's public API — each test binary pulls
//! this in via `#[path = "support/mod.rs"] mod support;`.

#![allow(dead_code)]

use std::collections::HashMap;

use secp256k1::{Message, Secp256k1, SecretKey};
use sha3::{Digest, Keccak256};

use pex_engine::{Runner, RunnerLog, VmPrimitive};
use pex_types::{Address, BlockContext, SignedTx, TxPayload, VmStatus, B256, U256};

/// A fixed (non-random) secp256k1 keypair, so scenario tests are
/// reproducible without needing an RNG.
pub fn test_keypair(seed: u8) -> (SecretKey, Address) {
    let mut bytes = [0u8; 32];
    bytes[31] = seed.max(1);
    let secret = SecretKey::from_slice(&bytes).expect("non-zero 32-byte seed is a valid secp256k1 scalar");
    let public = secret.public_key(&Secp256k1::new());
    let uncompressed = public.serialize_uncompressed();
    let hash = Keccak256::digest(&uncompressed[1..]);
    let address = Address::from_slice(&hash[12..]);
    (secret, address)
}

/// Sign `payload` the way `pex_engine::Secp256k1Signer` expects to recover
/// it: Keccak-256 over the payload bytes, then a recoverable ECDSA signature.
pub fn sign(secret: &SecretKey, payload: TxPayload) -> SignedTx {
    let ctx = Secp256k1::signing_only();
    let digest = Keccak256::digest(payload.to_bytes());
    let msg = Message::from_digest_slice(&digest).expect("32-byte digest is a valid message");
    let (recovery_id, compact) = ctx.sign_ecdsa_recoverable(&msg, secret).serialize_compact();
    let mut signature = [0u8; 65];
    signature[..64].copy_from_slice(&compact);
    signature[64] = recovery_id.to_i32() as u8;
    SignedTx::new(payload, signature)
}

pub struct PayloadBuilder {
    payload: TxPayload,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self {
            payload: TxPayload {
                recipient: Address::repeat_byte(0xaa),
                nonce: 0,
                value: U256::ZERO,
                gas_limit: 21_000,
                gas_price: U256::from(1u64),
                input: Vec::new(),
                block_height: 0,
            },
        }
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.payload.nonce = nonce;
        self
    }

    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.payload.gas_limit = gas_limit;
        self
    }

    pub fn gas_price(mut self, gas_price: U256) -> Self {
        self.payload.gas_price = gas_price;
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.payload.value = value;
        self
    }

    pub fn build(self) -> TxPayload {
        self.payload
    }
}

impl Default for PayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What [`ScriptedVm`] does when it runs a particular transaction.
#[derive(Clone, Default)]
pub struct ScriptedOutcome {
    pub status: Option<VmStatus>,
    pub gas_used: u64,
    pub gas_refund: u64,
    pub out_data: Vec<u8>,
    pub created_address: Option<Address>,
    pub logs: Vec<RunnerLog>,
    pub reads: Vec<Vec<u8>>,
    pub writes: Vec<(Vec<u8>, Vec<u8>)>,
}

/// A reference `VmPrimitive` that returns a pre-scripted outcome per
/// transaction hash, defaulting to a no-op success for anything unscripted.
#[derive(Default)]
pub struct ScriptedVm {
    scripts: HashMap<B256, ScriptedOutcome>,
}

impl ScriptedVm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, tx_hash: B256, outcome: ScriptedOutcome) -> Self {
        self.scripts.insert(tx_hash, outcome);
        self
    }
}

impl VmPrimitive for ScriptedVm {
    fn run_tx(&self, runner: &mut Runner, _block: &BlockContext) {
        let Some(outcome) = self.scripts.get(&runner.ttr.content_hash()) else {
            runner.status = VmStatus::Success;
            return;
        };

        for key in &outcome.reads {
            runner.ctx.get(key);
        }
        for (key, value) in &outcome.writes {
            runner.ctx.set(key, value.clone());
        }

        runner.status = outcome.status.unwrap_or(VmStatus::Success);
        runner.gas_used = outcome.gas_used;
        runner.gas_refund = outcome.gas_refund;
        runner.out_data = outcome.out_data.clone();
        runner.created_address = outcome.created_address;
        runner.logs = outcome.logs.clone();
    }
}
