//! Core data model for the parallel transaction execution engine.
//!
//! Everything here is plain data: the engine's internal transaction form (the
//! TTR), accounts, block context, VM status codes, and the per-transaction
//! records the engine emits. None of it knows how to run a transaction or how
//! bytes get to disk — see `pex-storage` and `pex-engine` for that.

mod account;
mod addr;
mod block;
mod bloom;
mod codec;
mod record;
mod signed_tx;
mod status;
mod ttr;

pub use account::Account;
pub use addr::{BLACKHOLE_ADDRESS, MAX_TX_GAS_LIMIT, SYSTEM_ADDRESS};
pub use block::BlockContext;
pub use bloom::{bloom_add, Bloom};
pub use codec::CodecError;
pub use record::{InvalidTxFields, LogRecord, TxRecord, TxRecordStatus};
pub use signed_tx::{SignedTx, TxPayload};
pub use status::VmStatus;
pub use ttr::Ttr;

/// Re-exported so downstream crates don't need their own `alloy-primitives` pin.
pub use alloy_primitives::{Address, B256, U256};
