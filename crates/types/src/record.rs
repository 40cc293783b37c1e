use alloy_primitives::{Address, B256, U256};

use crate::bloom::Bloom;
use crate::ttr::Ttr;

/// `successful` unless the VM status indicated a failure, in which case the
/// record is still included but marked `failed` (SPEC_FULL §4.6) — or
/// `Failed` for a transaction Prepare rejected before it ever ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxRecordStatus {
    Successful,
    Failed,
}

/// One emitted log, fully owned (copied out of the runner's snapshot rather
/// than aliasing it, per SPEC_FULL §4.6, so the snapshot can be freed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Vec<u8>,
    pub block_number: u64,
    pub block_hash: B256,
    pub tx_hash: B256,
    /// This log's transaction's index within the block's committable list.
    pub tx_index: u64,
    /// Monotonic index across every log in the block, not just this tx.
    pub log_index: u64,
    pub removed: bool,
}

/// A finished, block-scoped record of one transaction: either something
/// Prepare rejected (`status == Failed`, no VM fields populated) or something
/// the round executor ran to completion (committed, possibly with a
/// non-successful VM outcome).
#[derive(Debug, Clone)]
pub struct TxRecord {
    pub tx_index: u64,
    pub tx_hash: B256,
    pub nonce: u64,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub input: Vec<u8>,
    pub block_hash: B256,
    pub block_number: u64,
    pub cumulative_gas_used: u64,
    pub cumulative_gas_refund: u64,
    pub cumulative_gas_fee: U256,
    pub gas_used: u64,
    pub gas_refund: u64,
    pub out_data: Vec<u8>,
    pub created_address: Option<Address>,
    pub logs: Vec<LogRecord>,
    pub bloom: Bloom,
    pub status: TxRecordStatus,
    /// Human-readable reason, populated only for Prepare-time `Failed`
    /// records (SPEC_FULL §4.4); `None` for anything the round executor ran.
    pub status_str: Option<String>,
}

impl TxRecord {
    /// Build a `Failed` record for a transaction Prepare rejected outright.
    /// `cumulative_*` fields are carried over unchanged — SPEC_FULL §9 notes
    /// that invalid-at-Prepare transactions never contribute to cumulative
    /// gas, in contrast to transactions dropped during Execute.
    pub fn invalid(
        tx_index: u64,
        ttr_fields: InvalidTxFields,
        cumulative_gas_used: u64,
        cumulative_gas_refund: u64,
        cumulative_gas_fee: U256,
        status_str: impl Into<String>,
    ) -> Self {
        Self {
            tx_index,
            tx_hash: ttr_fields.content_hash,
            nonce: ttr_fields.nonce,
            from: ttr_fields.sender,
            to: ttr_fields.recipient,
            value: ttr_fields.value,
            gas_price: ttr_fields.gas_price,
            gas_limit: ttr_fields.gas_limit,
            input: ttr_fields.input,
            block_hash: B256::ZERO,
            block_number: 0,
            cumulative_gas_used,
            cumulative_gas_refund,
            cumulative_gas_fee,
            gas_used: 0,
            gas_refund: 0,
            out_data: Vec::new(),
            created_address: None,
            logs: Vec::new(),
            bloom: [0u8; 256],
            status: TxRecordStatus::Failed,
            status_str: Some(status_str.into()),
        }
    }
}

/// The subset of a `Ttr`'s fields still recordable when the sender could not
/// be recovered (SPEC_FULL §4.4: "keep TTR with recovered sender omitted").
#[derive(Debug, Clone)]
pub struct InvalidTxFields {
    pub content_hash: B256,
    pub sender: Address,
    pub recipient: Address,
    pub nonce: u64,
    pub value: U256,
    pub gas_price: U256,
    pub gas_limit: u64,
    pub input: Vec<u8>,
}

impl From<&Ttr> for InvalidTxFields {
    fn from(ttr: &Ttr) -> Self {
        Self {
            content_hash: ttr.content_hash(),
            sender: ttr.sender(),
            recipient: ttr.recipient(),
            nonce: ttr.nonce(),
            value: ttr.value(),
            gas_price: ttr.gas_price(),
            gas_limit: ttr.gas_limit(),
            input: ttr.input().to_vec(),
        }
    }
}
