//! Parallel, deterministic transaction execution engine for a blockchain
//! state machine: Prepare validates and enqueues, Execute runs bounded
//! rounds of optimistic parallel execution with serial conflict detection.
//!
//! [`Engine`] is the only type most callers need; `Signer` and `VmPrimitive`
//! are the two externally-injected collaborators (SPEC_FULL §6).

mod commit;
mod engine;
mod metrics;
mod pool;
mod prepare;
mod round;
mod signer;
mod vm;

pub use engine::Engine;
pub use pool::WorkerPool;
pub use signer::{RecoveryError, Secp256k1Signer, Signer};
pub use vm::{Runner, RunnerLog, VmPrimitive};
