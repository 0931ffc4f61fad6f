// src/error.rs
use alloy::primitives::Address;
use std::path::PathBuf;
use thiserror::Error;

/// The receipt could not be fetched from the RPC endpoint
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("RPC transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error: HTTP {status}")]
    Http { status: reqwest::StatusCode },

    #[error("malformed RPC response: {0}")]
    Body(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("transaction receipt not found for {tx_hash}")]
    NotFound { tx_hash: String },
}

/// A log matched the target signature but could not be decoded.
/// `index` is the position of the log inside the receipt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("log {index}: missing indexed `from` topic")]
    MissingTopic { index: usize },

    #[error("log {index}: invalid topic: {reason}")]
    InvalidTopic { index: usize, reason: String },

    #[error("log {index}: invalid data payload: {reason}")]
    InvalidData { index: usize, reason: String },
}

impl DecodeError {
    pub fn index(&self) -> usize {
        match self {
            Self::MissingTopic { index }
            | Self::InvalidTopic { index, .. }
            | Self::InvalidData { index, .. } => *index,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("scale must be non-zero")]
    ZeroScale,

    #[error("cumulative amount for {address} overflows uint256")]
    Overflow { address: Address },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required variable {var}")]
    Missing { var: &'static str },

    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}
