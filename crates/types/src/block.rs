use alloy_primitives::{Address, B256};

/// The block-scoped context an `execute()` call stamps onto every committed
/// record, and the descriptor a real `VmPrimitive` needs to execute against:
/// hash, number, timestamp, and coinbase. Nothing here is computed by the
/// engine itself; the caller supplies it per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockContext {
    pub block_hash: B256,
    pub block_number: u64,
    pub timestamp: u64,
    pub coinbase: Address,
}

impl BlockContext {
    pub fn new(block_hash: B256, block_number: u64, timestamp: u64, coinbase: Address) -> Self {
        Self { block_hash, block_number, timestamp, coinbase }
    }
}
