use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DelverError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("fetch error: {0}")]
    Fetch(#[source] anyhow::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid graph payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DelverError>;
