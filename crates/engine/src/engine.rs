//! The top-level facade (C7): the only type callers outside this crate talk
//! to. Owns the fixed configuration and worker pool for the engine's
//! lifetime; `set_context`/`prepare`/`execute` are the three calls a caller
//! cycles through once per block.

use std::sync::Arc;

use tracing::instrument;

use pex_config::EngineConfig;
use pex_storage::{add_balance, CleanContext, KvStore, StandbyQueue};
use pex_types::{BlockContext, SignedTx, TxRecord, U256, SYSTEM_ADDRESS};

use crate::{commit, metrics, pool::WorkerPool, prepare, round, signer::Signer, vm::VmPrimitive};

/// Parallel transaction execution engine (SPEC_FULL §4.7). Generic over the
/// injected signer and VM primitive so callers can swap in test doubles
/// without this crate depending on a concrete VM.
pub struct Engine<S: Signer, V: VmPrimitive> {
    config: EngineConfig,
    pool: WorkerPool,
    signer: S,
    vm: V,
    store: Arc<dyn KvStore>,
    clean_ctx: Option<CleanContext>,
    inputs: Vec<SignedTx>,
    block: BlockContext,
    committed_txs: Vec<TxRecord>,
    next_log_index: u64,
    cumulative_gas_used: u64,
    cumulative_gas_refund: u64,
    cumulative_gas_fee: U256,
}

impl<S: Signer, V: VmPrimitive> Engine<S, V> {
    pub fn new(config: EngineConfig, store: Arc<dyn KvStore>, signer: S, vm: V) -> Self {
        let pool = WorkerPool::new(config.parallelism);
        Self {
            config,
            pool,
            signer,
            vm,
            store,
            clean_ctx: None,
            inputs: Vec::new(),
            block: BlockContext::default(),
            committed_txs: Vec::new(),
            next_log_index: 0,
            cumulative_gas_used: 0,
            cumulative_gas_refund: 0,
            cumulative_gas_fee: U256::ZERO,
        }
    }

    /// Append a raw signed transaction to the input list.
    pub fn collect_tx(&mut self, tx: SignedTx) {
        self.inputs.push(tx);
    }

    pub fn collect_tx_count(&self) -> usize {
        self.inputs.len()
    }

    /// Attach a clean KV snapshot. Must be called before each `prepare` and
    /// each `execute`.
    pub fn set_context(&mut self) {
        self.clean_ctx = Some(CleanContext::new(self.store.clone()));
    }

    #[instrument(name = "prepare", skip_all, fields(inputs = self.inputs.len()))]
    pub fn prepare(&mut self, reorder_seed: u64, min_gas_price: U256) {
        let clean_ctx = self.clean_ctx.take().expect("set_context must be called before prepare");
        let inputs = std::mem::take(&mut self.inputs);

        if inputs.is_empty() {
            clean_ctx.close();
            return;
        }

        let report = prepare::run(
            &self.pool,
            &self.signer,
            &clean_ctx,
            &inputs,
            reorder_seed,
            min_gas_price,
            (self.cumulative_gas_used, self.cumulative_gas_refund, self.cumulative_gas_fee),
            self.committed_txs.len() as u64,
        );

        metrics::prepare_invalid(report.invalid_records.len() as u64);
        metrics::prepare_valid(report.to_enqueue.len() as u64);
        self.committed_txs.extend(report.invalid_records);

        let mut finalize_ctx = clean_ctx.with_rbt_copy();
        add_balance(&mut finalize_ctx, &SYSTEM_ADDRESS, report.total_gas_fee)
            .expect("system account balance overflowed U256");

        let (start, mut end) =
            StandbyQueue::get_range(&mut finalize_ctx).expect("standby queue header is well-formed");
        for ttr in report.to_enqueue {
            StandbyQueue::put(&mut finalize_ctx, end, ttr.to_bytes());
            end += 1;
        }
        StandbyQueue::set_range(&mut finalize_ctx, start, end);
        finalize_ctx.close(true);
        clean_ctx.close();

        metrics::standby_queue_depth(end - start);
    }

    #[instrument(name = "execute", skip_all, fields(block_number = block_info.block_number))]
    pub fn execute(&mut self, block_info: BlockContext) {
        let clean_ctx = self.clean_ctx.take().expect("set_context must be called before execute");
        self.block = block_info;
        self.committed_txs.clear();
        self.next_log_index = 0;
        self.cumulative_gas_used = 0;
        self.cumulative_gas_refund = 0;
        self.cumulative_gas_fee = U256::ZERO;

        for _ in 0..self.config.round_count {
            let Some(report) =
                round::run_round(&self.pool, &self.vm, &clean_ctx, &self.block, self.config.runner_cap)
            else {
                break;
            };

            self.cumulative_gas_used += report.dropped_gas_used;
            commit::append_committed(
                &mut self.committed_txs,
                &mut self.next_log_index,
                &mut self.cumulative_gas_used,
                &mut self.cumulative_gas_refund,
                &mut self.cumulative_gas_fee,
                &self.block,
                report.committed,
            );

            if report.queue_empty {
                break;
            }
        }

        let mut q_ctx = clean_ctx.with_rbt_copy();
        let (start, end) = StandbyQueue::get_range(&mut q_ctx).expect("standby queue header is well-formed");
        q_ctx.close(false);
        clean_ctx.close();

        metrics::standby_queue_depth(end - start);
    }

    /// `end - start` from a fresh header read.
    pub fn standby_q_len(&self) -> u64 {
        let mut ctx = CleanContext::new(self.store.clone()).with_rbt_copy();
        let (start, end) = StandbyQueue::get_range(&mut ctx).expect("standby queue header is well-formed");
        ctx.close(false);
        end - start
    }

    pub fn committed_txs(&self) -> &[TxRecord] {
        &self.committed_txs
    }

    pub fn gas_used_info(&self) -> (u64, u64, U256) {
        (self.cumulative_gas_used, self.cumulative_gas_refund, self.cumulative_gas_fee)
    }
}
