use std::{
    collections::{HashMap, HashSet},
    hash::Hasher,
    sync::Arc,
};

use twox_hash::XxHash64;

use crate::kv::KvStore;

/// Project a full KV key down to a 64-bit "short key" for cheap conflict
/// detection: false positives (two distinct keys colliding) are acceptable
/// and only cost a spurious requeue, false negatives must never happen, which
/// a deterministic non-cryptographic hash over the whole key guarantees.
pub fn short_key(key: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(key);
    hasher.finish()
}

enum Overlay {
    Write(Vec<u8>),
    Delete,
}

/// The root handle on a [`KvStore`]: no overlay, nothing to write back. Every
/// snapshot an engine phase works through is taken from one of these via
/// [`CleanContext::with_rbt_copy`].
pub struct CleanContext {
    base: Arc<dyn KvStore>,
}

impl CleanContext {
    pub fn new(base: Arc<dyn KvStore>) -> Self {
        Self { base }
    }

    /// Take a fresh [`RabbitContext`] snapshot over this store.
    pub fn with_rbt_copy(&self) -> RabbitContext {
        RabbitContext::new(self.base.clone())
    }

    /// Closes the context. A `CleanContext` never accumulates writes of its
    /// own, so there's nothing to flush — this exists so phase code has one
    /// symmetric open/close pair regardless of which context kind it holds.
    pub fn close(self) {}
}

/// A read/write snapshot over a [`KvStore`]: reads fall through to the base
/// store unless shadowed by a local overlay write or delete, and nothing
/// touches the base store until [`RabbitContext::close`] is called with
/// `write_back = true`.
///
/// Every key touched by `get`/`set`/`delete` — not just the ones written — is
/// recorded in first-touch order, which is what
/// [`RabbitContext::scan_all_short_keys`] replays for conflict detection.
pub struct RabbitContext {
    base: Arc<dyn KvStore>,
    overlay: HashMap<Vec<u8>, Overlay>,
    touched_set: HashSet<Vec<u8>>,
    touch_order: Vec<Vec<u8>>,
}

impl RabbitContext {
    pub fn new(base: Arc<dyn KvStore>) -> Self {
        Self {
            base,
            overlay: HashMap::new(),
            touched_set: HashSet::new(),
            touch_order: Vec::new(),
        }
    }

    fn touch(&mut self, key: &[u8]) {
        if self.touched_set.insert(key.to_vec()) {
            self.touch_order.push(key.to_vec());
        }
    }

    pub fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.touch(key);
        match self.overlay.get(key) {
            Some(Overlay::Write(value)) => Some(value.clone()),
            Some(Overlay::Delete) => None,
            None => self.base.get(key).expect("KV backend fault on read"),
        }
    }

    pub fn set(&mut self, key: &[u8], value: Vec<u8>) {
        self.touch(key);
        self.overlay.insert(key.to_vec(), Overlay::Write(value));
    }

    pub fn delete(&mut self, key: &[u8]) {
        self.touch(key);
        self.overlay.insert(key.to_vec(), Overlay::Delete);
    }

    /// True once this context itself has written or deleted `key` — distinct
    /// from having merely read it.
    pub fn is_dirty(&self, key: &[u8]) -> bool {
        self.overlay.contains_key(key)
    }

    /// Another snapshot over the same base store, independent of this one's
    /// overlay. Workers take one of these per transaction within a round so
    /// that one transaction's speculative writes never leak into another's
    /// reads before conflict detection runs.
    pub fn with_rbt_copy(&self) -> RabbitContext {
        RabbitContext::new(self.base.clone())
    }

    /// Every key this context touched, in first-touch order, as a short key
    /// plus whether this context wrote (vs. only read) it.
    pub fn scan_all_short_keys(&self) -> Vec<(u64, bool)> {
        self.touch_order
            .iter()
            .map(|key| (short_key(key), self.overlay.contains_key(key.as_slice())))
            .collect()
    }

    /// Consume the context, optionally applying its overlay to the base
    /// store. Each write lands via an independent `base.set`/`base.delete`
    /// call, so two contexts over disjoint key sets can close in either
    /// order with no coordination — the first-owner partitioning rule is
    /// what keeps those key sets disjoint in practice.
    pub fn close(self, write_back: bool) {
        if !write_back {
            return;
        }
        for (key, overlay) in self.overlay {
            match overlay {
                Overlay::Write(value) => {
                    self.base.set(&key, value).expect("KV backend fault on write-back")
                }
                Overlay::Delete => {
                    self.base.delete(&key).expect("KV backend fault on write-back")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn store() -> Arc<dyn KvStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn overlay_shadows_base_until_close() {
        let base = store();
        base.set(b"a", vec![1]).unwrap();

        let clean = CleanContext::new(base.clone());
        let mut rbt = clean.with_rbt_copy();
        rbt.set(b"a", vec![2]);
        assert_eq!(rbt.get(b"a"), Some(vec![2]));
        assert_eq!(base.get(b"a").unwrap(), Some(vec![1]));

        rbt.close(true);
        assert_eq!(base.get(b"a").unwrap(), Some(vec![2]));
    }

    #[test]
    fn discarded_overlay_never_reaches_base() {
        let base = store();
        let clean = CleanContext::new(base.clone());
        let mut rbt = clean.with_rbt_copy();
        rbt.set(b"a", vec![2]);
        rbt.close(false);
        assert_eq!(base.get(b"a").unwrap(), None);
    }

    #[test]
    fn scan_preserves_first_touch_order_and_dirty_flag() {
        let base = store();
        let clean = CleanContext::new(base);
        let mut rbt = clean.with_rbt_copy();
        rbt.get(b"read-only");
        rbt.set(b"written", vec![1]);
        rbt.get(b"read-only");

        let scanned = rbt.scan_all_short_keys();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0], (short_key(b"read-only"), false));
        assert_eq!(scanned[1], (short_key(b"written"), true));
    }
}
