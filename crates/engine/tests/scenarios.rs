//! Crate-level scenario tests (SPEC_FULL §8's concrete scenarios and
//! boundary behaviors), exercising `Engine` end to end against a
//! `MemoryStore` with a real `Secp256k1Signer` and a scripted reference VM.

#[path = "support/mod.rs"]
mod support;

use std::sync::Arc;

use pex_config::EngineConfig;
use pex_engine::{Engine, Secp256k1Signer};
use pex_storage::{add_balance, get_account, CleanContext, KvStore, MemoryStore, StandbyQueue};
use pex_types::{Address, BlockContext, Ttr, TxRecordStatus, VmStatus, SYSTEM_ADDRESS, U256};

use support::{test_keypair, PayloadBuilder, ScriptedOutcome, ScriptedVm};

fn fund(store: &Arc<dyn KvStore>, addr: Address, amount: U256) {
    let clean = CleanContext::new(store.clone());
    let mut ctx = clean.with_rbt_copy();
    add_balance(&mut ctx, &addr, amount).unwrap();
    ctx.close(true);
    clean.close();
}

fn config(round_count: u32, parallelism: usize) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.round_count = round_count;
    config.parallelism = parallelism;
    config
}

fn queue_entries(store: &Arc<dyn KvStore>) -> Vec<Ttr> {
    let clean = CleanContext::new(store.clone());
    let mut ctx = clean.with_rbt_copy();
    let (start, end) = StandbyQueue::get_range(&mut ctx).unwrap();
    let entries = (start..end)
        .map(|pos| Ttr::from_bytes(&StandbyQueue::get(&mut ctx, pos).unwrap()).unwrap())
        .collect();
    ctx.close(false);
    clean.close();
    entries
}

#[test]
fn deterministic_reorder_across_independent_runs() {
    let run = || {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let (secret_a, addr_a) = test_keypair(1);
        let (secret_b, addr_b) = test_keypair(2);
        fund(&store, addr_a, U256::from(1_000u64));
        fund(&store, addr_b, U256::from(1_000u64));

        let mut engine =
            Engine::new(config(8, 4), store.clone(), Secp256k1Signer::new(), ScriptedVm::new());
        engine.set_context();
        engine.collect_tx(support::sign(&secret_a, PayloadBuilder::new().nonce(0).build()));
        engine.collect_tx(support::sign(&secret_b, PayloadBuilder::new().nonce(0).build()));
        engine.prepare(1, U256::ZERO);

        queue_entries(&store).into_iter().map(|ttr| ttr.sender()).collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn conflicting_writes_requeue_the_second_committer() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let (secret_a, addr_a) = test_keypair(3);
    let (secret_b, addr_b) = test_keypair(4);
    fund(&store, addr_a, U256::from(1_000u64));
    fund(&store, addr_b, U256::from(1_000u64));

    let tx_a = PayloadBuilder::new().nonce(0).build();
    let tx_b = PayloadBuilder::new().nonce(0).build();
    let hash_a = tx_a.content_hash();
    let hash_b = tx_b.content_hash();

    let same_slot = b"contended-slot".to_vec();
    let vm = ScriptedVm::new()
        .script(
            hash_a,
            ScriptedOutcome { writes: vec![(same_slot.clone(), vec![1])], ..Default::default() },
        )
        .script(hash_b, ScriptedOutcome { writes: vec![(same_slot, vec![2])], ..Default::default() });

    let mut engine = Engine::new(config(1, 4), store.clone(), Secp256k1Signer::new(), vm);
    engine.set_context();
    engine.collect_tx(support::sign(&secret_a, tx_a));
    engine.collect_tx(support::sign(&secret_b, tx_b));
    engine.prepare(1, U256::ZERO);
    assert_eq!(engine.standby_q_len(), 2);

    // Round 1: whichever of the two lands first in load order commits; the
    // other conflicts on the same short key and is requeued.
    engine.set_context();
    engine.execute(BlockContext::default());
    assert_eq!(engine.committed_txs().len(), 1);
    assert_eq!(engine.standby_q_len(), 1);

    // Round 2: the requeued transaction now has the slot to itself.
    engine.set_context();
    engine.execute(BlockContext::default());
    assert_eq!(engine.committed_txs().len(), 1);
    assert_eq!(engine.standby_q_len(), 0);
}

#[test]
fn insufficient_fee_is_rejected_without_touching_the_queue_or_nonce() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let (secret, addr) = test_keypair(5);
    fund(&store, addr, U256::from(10u64));

    let tx = PayloadBuilder::new().nonce(0).gas_limit(5).gas_price(U256::from(3u64)).build();

    let mut engine =
        Engine::new(config(8, 2), store.clone(), Secp256k1Signer::new(), ScriptedVm::new());
    engine.set_context();
    engine.collect_tx(support::sign(&secret, tx));
    engine.prepare(0, U256::ZERO);

    assert_eq!(engine.standby_q_len(), 0);
    assert_eq!(engine.committed_txs().len(), 1);
    let record = &engine.committed_txs()[0];
    assert_eq!(record.status, TxRecordStatus::Failed);
    assert_eq!(record.status_str.as_deref(), Some("not enough balance to pay gasfee"));
    assert_eq!(engine.gas_used_info().0, 0);

    let clean = CleanContext::new(store.clone());
    let mut ctx = clean.with_rbt_copy();
    assert_eq!(get_account(&mut ctx, &addr).unwrap().nonce, 0);
    ctx.close(false);
    clean.close();
}

#[test]
fn nonce_too_small_is_dropped_with_a_gas_penalty_and_no_record() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let (secret, addr) = test_keypair(6);
    fund(&store, addr, U256::from(1_000u64));

    let tx = PayloadBuilder::new().nonce(0).gas_limit(21_000).build();
    let hash = tx.content_hash();
    let vm = ScriptedVm::new().script(
        hash,
        ScriptedOutcome { status: Some(VmStatus::TxNonceTooSmall), ..Default::default() },
    );

    let mut engine = Engine::new(config(8, 2), store.clone(), Secp256k1Signer::new(), vm);
    engine.set_context();
    engine.collect_tx(support::sign(&secret, tx));
    engine.prepare(0, U256::ZERO);
    assert_eq!(engine.standby_q_len(), 1);

    engine.set_context();
    engine.execute(BlockContext::default());

    assert!(engine.committed_txs().is_empty());
    assert_eq!(engine.standby_q_len(), 0);
    assert_eq!(engine.gas_used_info().0, 21_000);
}

#[test]
fn system_account_receives_the_sum_of_prepared_fees() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let (s1, a1) = test_keypair(7);
    let (s2, a2) = test_keypair(8);
    let (s3, a3) = test_keypair(9);
    fund(&store, a1, U256::from(10_000u64));
    fund(&store, a2, U256::from(10_000u64));
    fund(&store, a3, U256::from(10_000u64));

    let mut engine =
        Engine::new(config(8, 4), store.clone(), Secp256k1Signer::new(), ScriptedVm::new());
    engine.set_context();
    engine.collect_tx(support::sign(
        &s1,
        PayloadBuilder::new().nonce(0).gas_limit(100).gas_price(U256::from(1u64)).build(),
    ));
    engine.collect_tx(support::sign(
        &s2,
        PayloadBuilder::new().nonce(0).gas_limit(200).gas_price(U256::from(1u64)).build(),
    ));
    engine.collect_tx(support::sign(
        &s3,
        PayloadBuilder::new().nonce(0).gas_limit(300).gas_price(U256::from(1u64)).build(),
    ));
    engine.prepare(0, U256::ZERO);

    let clean = CleanContext::new(store.clone());
    let mut ctx = clean.with_rbt_copy();
    assert_eq!(get_account(&mut ctx, &SYSTEM_ADDRESS).unwrap().balance, U256::from(600u64));
    assert_eq!(get_account(&mut ctx, &a1).unwrap().balance, U256::from(10_000u64 - 100));
    assert_eq!(get_account(&mut ctx, &a2).unwrap().balance, U256::from(10_000u64 - 200));
    assert_eq!(get_account(&mut ctx, &a3).unwrap().balance, U256::from(10_000u64 - 300));
    ctx.close(false);
    clean.close();
}

#[test]
fn outcome_is_identical_regardless_of_parallelism() {
    let build_and_run = |parallelism: usize| {
        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let (s1, a1) = test_keypair(10);
        let (s2, a2) = test_keypair(11);
        fund(&store, a1, U256::from(10_000u64));
        fund(&store, a2, U256::from(10_000u64));

        let mut engine = Engine::new(
            config(8, parallelism),
            store.clone(),
            Secp256k1Signer::new(),
            ScriptedVm::new(),
        );
        engine.set_context();
        engine.collect_tx(support::sign(&s1, PayloadBuilder::new().nonce(0).build()));
        engine.collect_tx(support::sign(&s2, PayloadBuilder::new().nonce(0).build()));
        engine.prepare(7, U256::ZERO);

        engine.set_context();
        engine.execute(BlockContext::default());

        let senders: Vec<_> = engine.committed_txs().iter().map(|r| r.from).collect();
        (senders, engine.gas_used_info(), engine.standby_q_len())
    };

    assert_eq!(build_and_run(1), build_and_run(8));
}

#[test]
fn empty_input_to_prepare_leaves_the_queue_untouched() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let mut engine =
        Engine::new(config(8, 2), store.clone(), Secp256k1Signer::new(), ScriptedVm::new());
    engine.set_context();
    engine.prepare(0, U256::ZERO);
    assert_eq!(engine.standby_q_len(), 0);
    assert!(engine.committed_txs().is_empty());
}

#[test]
fn empty_queue_at_execute_runs_no_rounds() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let mut engine =
        Engine::new(config(8, 2), store.clone(), Secp256k1Signer::new(), ScriptedVm::new());
    engine.set_context();
    engine.execute(BlockContext::default());
    assert!(engine.committed_txs().is_empty());
    assert_eq!(engine.gas_used_info(), (0, 0, U256::ZERO));
}
