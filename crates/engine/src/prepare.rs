//! Prepare (C4): parallel validation, deterministic reorder, and the
//! cross-worker nonce/fee-deduction pass. Grounded on the shape of
//! `crates/execution/batch-validator`'s pure valid/invalid partitioning
//! function, generalized to this engine's two-pass worker-pool structure.

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use parking_lot::Mutex;
use rand_core::RngCore;
use rand_mt::Mt64;
use tracing::{debug, instrument};

use pex_storage::{account_exists, get_account, sub_balance, CleanContext, RabbitContext};
use pex_types::{Address, InvalidTxFields, SignedTx, Ttr, TxPayload, TxRecord, MAX_TX_GAS_LIMIT, U256};

use crate::{pool::WorkerPool, signer::Signer};

enum StepOutcome {
    Invalid { fields: InvalidTxFields, reason: &'static str },
    Draft { sender: Address, ttr: Ttr },
}

enum AddrOutcome {
    Enqueue(Ttr),
    Invalid(Ttr, &'static str),
}

struct WorkerSlice {
    ctx: RabbitContext,
    total_gas_fee: U256,
    changed: bool,
}

/// What one `prepare()` call needs to apply back onto the engine: Prepare's
/// own finalize step (writing the standby queue and crediting the system
/// account) is left to the caller, since it needs a fresh snapshot taken
/// *after* every worker slice has committed.
pub(crate) struct PrepareReport {
    pub invalid_records: Vec<TxRecord>,
    pub to_enqueue: Vec<Ttr>,
    pub total_gas_fee: U256,
}

#[instrument(name = "prepare", skip_all, fields(inputs = inputs.len()))]
pub(crate) fn run<S: Signer>(
    pool: &WorkerPool,
    signer: &S,
    clean_ctx: &CleanContext,
    inputs: &[SignedTx],
    reorder_seed: u64,
    min_gas_price: U256,
    cumulative: (u64, u64, U256),
    starting_tx_index: u64,
) -> PrepareReport {
    let n = inputs.len();
    let parallelism = pool.workers();

    let results: Vec<Mutex<Option<StepOutcome>>> = (0..n).map(|_| Mutex::new(None)).collect();
    let worker_slices: Vec<Mutex<WorkerSlice>> = (0..parallelism)
        .map(|_| {
            Mutex::new(WorkerSlice {
                ctx: clean_ctx.with_rbt_copy(),
                total_gas_fee: U256::ZERO,
                changed: false,
            })
        })
        .collect();

    // Step 1 (C4a): parallel read + validation, dispatched by an atomic
    // cursor into the raw input list.
    let cursor = AtomicUsize::new(0);
    pool.run(|worker_id| {
        let mut slice = worker_slices[worker_id].lock();
        loop {
            let idx = cursor.fetch_add(1, Ordering::Relaxed);
            if idx >= n {
                break;
            }
            let outcome = validate_one(signer, &inputs[idx], &mut slice.ctx, min_gas_price);
            *results[idx].lock() = Some(outcome);
        }
    });

    // Step 2 (C4b): sequential grouping by sender (preserving per-address
    // arrival order) plus the consensus-critical MT19937-64 reorder.
    let (cum_gas_used, cum_gas_refund, cum_gas_fee) = cumulative;
    let mut tx_index = starting_tx_index;
    let mut invalid_records = Vec::new();
    let mut addrs_first_seen = Vec::new();
    let mut groups: HashMap<Address, Vec<Ttr>> = HashMap::new();

    for slot in &results {
        match slot.lock().take().expect("every index was processed exactly once in step 1") {
            StepOutcome::Invalid { fields, reason } => {
                debug!(reason, "prepare: invalidated transaction");
                invalid_records.push(TxRecord::invalid(
                    tx_index,
                    fields,
                    cum_gas_used,
                    cum_gas_refund,
                    cum_gas_fee,
                    reason,
                ));
                tx_index += 1;
            }
            StepOutcome::Draft { sender, ttr } => {
                groups
                    .entry(sender)
                    .or_insert_with(|| {
                        addrs_first_seen.push(sender);
                        Vec::new()
                    })
                    .push(ttr);
            }
        }
    }

    shuffle(&mut addrs_first_seen, reorder_seed);

    // Step 3 (C4c): nonce check + fee deduction. Dispatch is an atomic
    // cursor over the (already shuffled) distinct-address list rather than a
    // separate race-based ownership map: claiming an index from this cursor
    // *is* the first-owner assignment, since each address appears in the
    // list exactly once and is therefore claimed by exactly one worker.
    let per_addr: Vec<Mutex<Vec<AddrOutcome>>> =
        addrs_first_seen.iter().map(|_| Mutex::new(Vec::new())).collect();
    let addr_cursor = AtomicUsize::new(0);

    pool.run(|worker_id| {
        let mut slice = worker_slices[worker_id].lock();
        loop {
            let k = addr_cursor.fetch_add(1, Ordering::Relaxed);
            if k >= addrs_first_seen.len() {
                break;
            }
            let addr = addrs_first_seen[k];
            let drafts = &groups[&addr];
            let account = get_account(&mut slice.ctx, &addr)
                .expect("account existence was confirmed for this address in step 1");
            let mut expected_nonce = account.nonce;
            let mut out = per_addr[k].lock();
            for ttr in drafts {
                if ttr.nonce() != expected_nonce {
                    out.push(AddrOutcome::Invalid(ttr.clone(), "incorrect nonce"));
                    continue;
                }
                // Nonce is bumped before the deduction is known to succeed. If
                // `sub_balance` then fails, the expectation has already moved
                // past this transaction's nonce, so the sender's next draft
                // (which actually has the right next nonce) is rejected too.
                // This cascading behavior is preserved verbatim.
                expected_nonce += 1;
                match sub_balance(&mut slice.ctx, &addr, ttr.gas_fee()) {
                    Err(_) => out.push(AddrOutcome::Invalid(ttr.clone(), "not enough balance to pay gasfee")),
                    Ok(()) => {
                        slice.total_gas_fee += ttr.gas_fee();
                        slice.changed = true;
                        out.push(AddrOutcome::Enqueue(ttr.clone()));
                    }
                }
            }
        }
    });

    // Commit worker slices: write-back order across workers is irrelevant
    // because the dispatch above guarantees each address was mutated by
    // exactly one worker.
    let mut total_gas_fee = U256::ZERO;
    for slice_mutex in worker_slices {
        let slice = slice_mutex.into_inner();
        total_gas_fee += slice.total_gas_fee;
        slice.ctx.close(slice.changed);
    }

    let mut to_enqueue = Vec::new();
    for bucket in per_addr {
        for outcome in bucket.into_inner() {
            match outcome {
                AddrOutcome::Enqueue(ttr) => to_enqueue.push(ttr),
                AddrOutcome::Invalid(ttr, reason) => {
                    debug!(reason, "prepare: invalidated transaction during ownership pass");
                    invalid_records.push(TxRecord::invalid(
                        tx_index,
                        InvalidTxFields::from(&ttr),
                        cum_gas_used,
                        cum_gas_refund,
                        cum_gas_fee,
                        reason,
                    ));
                    tx_index += 1;
                }
            }
        }
    }

    PrepareReport { invalid_records, to_enqueue, total_gas_fee }
}

fn validate_one<S: Signer>(
    signer: &S,
    signed: &SignedTx,
    ctx: &mut RabbitContext,
    min_gas_price: U256,
) -> StepOutcome {
    let payload = &signed.payload;
    let sender = match signer.recover_sender(&signed.raw_bytes()) {
        Ok(sender) => sender,
        Err(_) => {
            return StepOutcome::Invalid {
                fields: invalid_fields(payload, Address::ZERO),
                reason: "invalid signature",
            }
        }
    };

    if payload.gas_price < min_gas_price {
        return StepOutcome::Invalid {
            fields: invalid_fields(payload, sender),
            reason: "invalid gas price",
        };
    }
    if payload.gas_limit > MAX_TX_GAS_LIMIT {
        return StepOutcome::Invalid {
            fields: invalid_fields(payload, sender),
            reason: "invalid gas limit",
        };
    }
    if !account_exists(ctx, &sender) {
        return StepOutcome::Invalid {
            fields: invalid_fields(payload, sender),
            reason: "non-existent account",
        };
    }

    let ttr = Ttr::new(
        payload.content_hash(),
        sender,
        payload.recipient,
        payload.nonce,
        payload.value,
        payload.gas_limit,
        payload.gas_price,
        payload.input.clone(),
        payload.block_height,
    );
    StepOutcome::Draft { sender, ttr }
}

fn invalid_fields(payload: &TxPayload, sender: Address) -> InvalidTxFields {
    InvalidTxFields {
        content_hash: payload.content_hash(),
        sender,
        recipient: payload.recipient,
        nonce: payload.nonce,
        value: payload.value,
        gas_price: payload.gas_price,
        gas_limit: payload.gas_limit,
        input: payload.input.clone(),
    }
}

/// `len` iterations of a random-pair swap, *not* Fisher–Yates: this is a
/// known non-uniform permutation, but the exact output sequence is
/// consensus state, so the bug is part of the contract and must not be
/// "fixed".
fn shuffle(addrs: &mut [Address], seed: u64) {
    let len = addrs.len();
    if len < 2 {
        return;
    }
    let mut rng = Mt64::new(seed);
    for _ in 0..len {
        let i = (rng.next_u64() & 0x7fff_ffff_ffff_ffff) as usize % len;
        let j = (rng.next_u64() & 0x7fff_ffff_ffff_ffff) as usize % len;
        addrs.swap(i, j);
    }
}
