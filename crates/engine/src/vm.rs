use pex_storage::RabbitContext;
use pex_types::{Address, BlockContext, Ttr, VmStatus, B256};

/// A finished runner with its KV snapshot already closed, carrying just what
/// the commit collector (C6) needs to build a `TxRecord`.
pub(crate) struct CommittedRunner {
    pub ttr: Ttr,
    pub status: VmStatus,
    pub gas_used: u64,
    pub gas_refund: u64,
    pub out_data: Vec<u8>,
    pub created_address: Option<Address>,
    pub logs: Vec<RunnerLog>,
}

/// One emitted log, as produced by the VM, before the commit collector
/// stamps it with block/tx/log-index fields (SPEC_FULL §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Vec<u8>,
}

/// Per-transaction execution scratch (the glossary's "Runner"): the TTR being
/// run, its private KV snapshot, and the outputs the VM primitive fills in.
pub struct Runner {
    pub ttr: Ttr,
    pub ctx: RabbitContext,
    pub status: VmStatus,
    pub gas_used: u64,
    pub gas_refund: u64,
    pub out_data: Vec<u8>,
    pub created_address: Option<Address>,
    pub logs: Vec<RunnerLog>,
}

impl Runner {
    pub fn new(ttr: Ttr, ctx: RabbitContext) -> Self {
        Self {
            ttr,
            ctx,
            status: VmStatus::Success,
            gas_used: 0,
            gas_refund: 0,
            out_data: Vec::new(),
            created_address: None,
            logs: Vec::new(),
        }
    }
}

/// The injected VM primitive (SPEC_FULL §6): runs a transaction against its
/// runner's private snapshot and populates the runner's outputs and status.
pub trait VmPrimitive: Send + Sync {
    fn run_tx(&self, runner: &mut Runner, block: &BlockContext);
}
