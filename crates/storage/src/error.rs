use thiserror::Error;

/// A fault raised by a [`crate::KvStore`] backend.
///
/// Every method an engine phase calls through [`crate::RabbitContext`] or
/// [`crate::CleanContext`] is infallible in return position — a `StoreError`
/// reaching that boundary means the backing store itself is broken, not that
/// the transaction being processed was invalid, so those call sites `expect`
/// on it rather than threading a `Result` through the phase logic.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redb backend error: {0}")]
    Redb(#[from] redb::Error),
    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),
    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),
    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),
    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),
    #[error("standby queue header is {len} bytes, expected 16")]
    CorruptHeader { len: usize },
    #[error("account record failed to decode: {0}")]
    CorruptAccount(#[from] bincode::Error),
    #[error("requested balance decrease of {amount} exceeds balance {balance}")]
    InsufficientBalance { balance: String, amount: String },
}
