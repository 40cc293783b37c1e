use thiserror::Error;

/// Failure decoding a previously-encoded value. Distinct from `StoreError` in
/// `pex-storage`: a decode failure is a property of the bytes themselves, not
/// of the backend that produced them.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to decode TTR: {source}")]
    Ttr {
        #[source]
        source: bincode::Error,
    },
}
