use thiserror::Error;

#[derive(Error, Debug)]
pub enum StriperError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Order {0} not found")]
    OrderNotFound(u64),
    #[error("Internal error: {0}")]
    InternalError(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDbError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, StriperError>;

/// Rejection reported by the remote payment API.
///
/// Declines, invalid requests and transport failures all end up here; callers
/// never branch on the cause, only on the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    /// HTTP status, when the API answered at all.
    pub status: Option<u16>,
    /// Remote error type, e.g. `card_error`.
    pub kind: Option<String>,
    /// Remote error code, e.g. `card_declined`.
    pub code: Option<String>,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            kind: None,
            code: None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status: err.status().map(|status| status.as_u16()),
            kind: None,
            code: None,
        }
    }
}
