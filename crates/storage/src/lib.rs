mod account;
mod error;
mod kv;
mod memory;
mod queue;
mod rabbit;
mod redb_store;

pub use account::{account_exists, add_balance, get_account, set_account, sub_balance};
pub use error::StoreError;
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use queue::StandbyQueue;
pub use rabbit::{short_key, CleanContext, RabbitContext};
pub use redb_store::RedbStore;
