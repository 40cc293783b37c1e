/// Outcome of running one transaction against the VM, or of the engine's own
/// conflict detection pass.
///
/// `FailedToCommit` is never produced by the VM itself — it's the round
/// executor's own verdict, reusing the same enum so the standby-queue update
/// pass (§4.5) can switch on one type regardless of who decided the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmStatus {
    Success,
    Reverted,
    OutOfGas,
    InvalidOpcode,
    /// Reserved for the round executor's conflict-detection pass.
    FailedToCommit,
    TxNonceTooLarge,
    TxNonceTooSmall,
    AccountNotExist,
}

impl VmStatus {
    /// True for the one status that means the transaction actually committed
    /// without reverting.
    pub fn is_success(self) -> bool {
        matches!(self, VmStatus::Success)
    }

    /// Transactions in this state go back on the standby queue (§4.5): they
    /// may succeed in a later round once whatever they conflicted with has
    /// committed, or a lower-nonce sibling has arrived.
    pub fn requeues(self) -> bool {
        matches!(self, VmStatus::FailedToCommit | VmStatus::TxNonceTooLarge)
    }

    /// Transactions in this state are dropped outright: removed from the
    /// queue, never requeued, never recorded as committed, but still billed
    /// their full gas limit as a penalty for invalid inclusion.
    pub fn drops(self) -> bool {
        matches!(self, VmStatus::AccountNotExist | VmStatus::TxNonceTooSmall)
    }

    /// Every other status (including `Reverted` / `OutOfGas` / `InvalidOpcode`)
    /// commits: the record is kept, but is marked "failed" rather than
    /// "successful".
    pub fn commits(self) -> bool {
        !self.requeues() && !self.drops()
    }
}
