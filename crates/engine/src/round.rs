//! Round executor (C5): load a prefix of the standby queue, run it
//! optimistically in parallel, then commit serially using short-key conflict
//! detection. Grounded on the same worker-pool + atomic-cursor shape as
//! `prepare.rs`'s step 1, since both are "parallel run over a claimed
//! index range".

use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use tracing::instrument;

use pex_storage::{CleanContext, StandbyQueue};
use pex_types::{BlockContext, Ttr, VmStatus};

use crate::{
    metrics,
    pool::WorkerPool,
    vm::{CommittedRunner, Runner, VmPrimitive},
};

pub(crate) struct RoundReport {
    pub committed: Vec<CommittedRunner>,
    /// Full gas limit of every dropped (`AccountNotExist` / `TxNonceTooSmall`)
    /// transaction this round, to be folded into cumulative gas used.
    pub dropped_gas_used: u64,
    /// `true` once the header shows `start == end` after this round's update.
    pub queue_empty: bool,
}

/// Runs one round. Returns `None` if the queue was already empty, meaning no
/// round should have run at all (the caller stops immediately).
#[instrument(name = "execute_round", skip_all)]
pub(crate) fn run_round<V: VmPrimitive>(
    pool: &WorkerPool,
    vm: &V,
    clean_ctx: &CleanContext,
    block: &BlockContext,
    runner_cap: usize,
) -> Option<RoundReport> {
    let mut peek_ctx = clean_ctx.with_rbt_copy();
    let (start, end) = StandbyQueue::get_range(&mut peek_ctx).expect("standby queue header is well-formed");
    peek_ctx.close(false);

    let take = runner_cap.min((end - start) as usize);
    if take == 0 {
        return None;
    }

    // Load: one TTR per position, each runner given its own fresh snapshot.
    let mut load_ctx = clean_ctx.with_rbt_copy();
    let runners: Vec<Mutex<Runner>> = (0..take)
        .map(|j| {
            let bytes = StandbyQueue::get(&mut load_ctx, start + j as u64)
                .expect("every position within [start, end) has an entry");
            let ttr = Ttr::from_bytes(&bytes).expect("standby queue entries are well-formed TTRs");
            Mutex::new(Runner::new(ttr, clean_ctx.with_rbt_copy()))
        })
        .collect();
    load_ctx.close(false);

    // Run in parallel: runners never observe each other's writes.
    let cursor = AtomicUsize::new(0);
    pool.run(|_worker_id| loop {
        let j = cursor.fetch_add(1, Ordering::Relaxed);
        if j >= take {
            break;
        }
        let mut runner = runners[j].lock();
        vm.run_tx(&mut runner, block);
    });

    // Conflict detection, commit, and the standby-queue update, all as one
    // serial pass in load order (the dependency `touched` carries between
    // iterations is exactly why this can't be parallelized).
    let mut touched: HashSet<u64> = HashSet::new();
    let mut queue_ctx = clean_ctx.with_rbt_copy();
    let mut end = end;
    let mut committed = Vec::new();
    let mut dropped_gas_used = 0u64;

    for (j, slot) in runners.into_iter().enumerate() {
        let mut runner = slot.into_inner();

        let short_keys = runner.ctx.scan_all_short_keys();
        if short_keys.iter().any(|(key, _)| touched.contains(key)) {
            runner.status = VmStatus::FailedToCommit;
        } else {
            for (key, dirty) in short_keys {
                if dirty {
                    touched.insert(key);
                }
            }
        }

        StandbyQueue::delete(&mut queue_ctx, start + j as u64);

        if runner.status.requeues() {
            runner.ctx.close(false);
            StandbyQueue::put(&mut queue_ctx, end, runner.ttr.to_bytes());
            end += 1;
            metrics::round_requeued(1);
        } else if runner.status.drops() {
            runner.ctx.close(false);
            dropped_gas_used += runner.ttr.gas_limit();
            metrics::round_dropped(1);
        } else {
            runner.ctx.close(true);
            metrics::round_committed(1);
            committed.push(CommittedRunner {
                ttr: runner.ttr,
                status: runner.status,
                gas_used: runner.gas_used,
                gas_refund: runner.gas_refund,
                out_data: runner.out_data,
                created_address: runner.created_address,
                logs: runner.logs,
            });
        }
    }

    let new_start = start + take as u64;
    StandbyQueue::set_range(&mut queue_ctx, new_start, end);
    queue_ctx.close(true);

    Some(RoundReport { committed, dropped_gas_used, queue_empty: new_start == end })
}
