use thiserror::Error;

use super::tier::TierName;

/// Cache-layer faults. These never reach callers of the read-through path;
/// they are logged and the read degrades to a direct fetch.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("tier `{tier}` is full ({limit} entries)")]
    Capacity { tier: TierName, limit: usize },
    #[error("failed to encode value for `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cached value for `{key}` does not decode into the requested type: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Capacity { .. } => "capacity",
            CacheError::Encode { .. } => "encode",
            CacheError::Decode { .. } => "decode",
        }
    }
}
