use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Balance and nonce for one address, as stored in the KV backend.
///
/// Absent accounts are treated as a zero-valued `Account` by the balance
/// helpers in `pex-storage`; this type itself carries no notion of
/// "exists vs. doesn't", that's a property of the KV lookup that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Account {
    pub balance: U256,
    pub nonce: u64,
}

impl Account {
    pub fn zero() -> Self {
        Self::default()
    }
}
