//! Commit collector (C6): turns a round's committed runners into final
//! `TxRecord`s, accumulating the engine's cumulative counters and the
//! block-wide monotonic log index.

use pex_types::{bloom_add, BlockContext, LogRecord, TxRecord, TxRecordStatus, U256};

use crate::vm::CommittedRunner;

#[allow(clippy::too_many_arguments)]
pub(crate) fn append_committed(
    committed_txs: &mut Vec<TxRecord>,
    next_log_index: &mut u64,
    cumulative_gas_used: &mut u64,
    cumulative_gas_refund: &mut u64,
    cumulative_gas_fee: &mut U256,
    block: &BlockContext,
    runners: Vec<CommittedRunner>,
) {
    for runner in runners {
        let tx_index = committed_txs.len() as u64;
        *cumulative_gas_used += runner.gas_used;
        *cumulative_gas_refund += runner.gas_refund;
        *cumulative_gas_fee += U256::from(runner.gas_used) * runner.ttr.gas_price();

        let mut bloom = [0u8; 256];
        let mut logs = Vec::with_capacity(runner.logs.len());
        for log in runner.logs {
            bloom_add(&mut bloom, log.address.as_slice());
            for topic in &log.topics {
                bloom_add(&mut bloom, topic.as_slice());
            }
            logs.push(LogRecord {
                address: log.address,
                topics: log.topics,
                data: log.data,
                block_number: block.block_number,
                block_hash: block.block_hash,
                tx_hash: runner.ttr.content_hash(),
                tx_index,
                log_index: *next_log_index,
                removed: false,
            });
            *next_log_index += 1;
        }

        committed_txs.push(TxRecord {
            tx_index,
            tx_hash: runner.ttr.content_hash(),
            nonce: runner.ttr.nonce(),
            from: runner.ttr.sender(),
            to: runner.ttr.recipient(),
            value: runner.ttr.value(),
            gas_price: runner.ttr.gas_price(),
            gas_limit: runner.ttr.gas_limit(),
            input: runner.ttr.input().to_vec(),
            block_hash: block.block_hash,
            block_number: block.block_number,
            cumulative_gas_used: *cumulative_gas_used,
            cumulative_gas_refund: *cumulative_gas_refund,
            cumulative_gas_fee: *cumulative_gas_fee,
            gas_used: runner.gas_used,
            gas_refund: runner.gas_refund,
            out_data: runner.out_data,
            created_address: runner.created_address,
            logs,
            bloom,
            status: if runner.status.is_success() { TxRecordStatus::Successful } else { TxRecordStatus::Failed },
            status_str: None,
        });
    }
}
