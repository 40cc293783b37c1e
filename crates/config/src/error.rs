use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to deserialize engine config: {0}")]
    Deserialize(#[source] serde_yaml::Error),
    #[error("engine config field `{field}` must be nonzero")]
    ZeroField { field: &'static str },
}
