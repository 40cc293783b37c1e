//! `metrics` counters/gauges for the engine (SPEC_FULL §12), following the
//! teacher's convention of a small set of named counters incremented at the
//! point a decision is made, rather than a dedicated metrics crate.

use metrics::{counter, gauge};

pub fn prepare_valid(count: u64) {
    counter!("engine_prepare_valid_total").increment(count);
}

pub fn prepare_invalid(count: u64) {
    counter!("engine_prepare_invalid_total").increment(count);
}

pub fn round_committed(count: u64) {
    counter!("engine_round_committed_total").increment(count);
}

pub fn round_requeued(count: u64) {
    counter!("engine_round_requeued_total").increment(count);
}

pub fn round_dropped(count: u64) {
    counter!("engine_round_dropped_total").increment(count);
}

pub fn standby_queue_depth(depth: u64) {
    gauge!("engine_standby_queue_depth").set(depth as f64);
}
