use crate::error::StoreError;

/// The engine's only requirement on persistence: a byte-keyed, byte-valued
/// store that can be read, written, and deleted from multiple threads.
///
/// Implementations own their own internal locking — callers never see a
/// transaction or cursor type, only `get`/`set`/`delete`. [`crate::RabbitContext`]
/// is built on top of this trait and is what the engine actually talks to.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;
}
