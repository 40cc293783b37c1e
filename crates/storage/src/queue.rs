use crate::{error::StoreError, rabbit::RabbitContext};

const HEADER_KEY: &[u8] = b"sbq/header";
const ENTRY_PREFIX: &[u8] = b"sbq/entry/";

fn entry_key(pos: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(ENTRY_PREFIX.len() + 8);
    key.extend_from_slice(ENTRY_PREFIX);
    key.extend_from_slice(&pos.to_be_bytes());
    key
}

/// The persistent standby queue: a contiguous `[start, end)` range of
/// positions, each holding one serialized `Ttr`. `start` advances as entries
/// are delivered into a round, `end` advances as Prepare enqueues new ones —
/// neither position is ever reused.
pub struct StandbyQueue;

impl StandbyQueue {
    /// Read the `[start, end)` range from the 16-byte big-endian header, or
    /// `(0, 0)` if the queue has never been written to.
    pub fn get_range(ctx: &mut RabbitContext) -> Result<(u64, u64), StoreError> {
        match ctx.get(HEADER_KEY) {
            None => Ok((0, 0)),
            Some(bytes) if bytes.len() == 16 => {
                let start = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
                let end = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
                Ok((start, end))
            }
            Some(bytes) => Err(StoreError::CorruptHeader { len: bytes.len() }),
        }
    }

    pub fn set_range(ctx: &mut RabbitContext, start: u64, end: u64) {
        let mut bytes = Vec::with_capacity(16);
        bytes.extend_from_slice(&start.to_be_bytes());
        bytes.extend_from_slice(&end.to_be_bytes());
        ctx.set(HEADER_KEY, bytes);
    }

    pub fn get(ctx: &mut RabbitContext, pos: u64) -> Option<Vec<u8>> {
        ctx.get(&entry_key(pos))
    }

    pub fn put(ctx: &mut RabbitContext, pos: u64, entry: Vec<u8>) {
        ctx.set(&entry_key(pos), entry);
    }

    pub fn delete(ctx: &mut RabbitContext, pos: u64) {
        ctx.delete(&entry_key(pos));
    }
}
