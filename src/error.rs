//! Error types for transaction decoding and coloring

use crate::types::{txid_to_hex, Hash};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of data: needed {needed} bytes at offset {offset}")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("Trailing data: {0} bytes left after transaction")]
    TrailingData(usize),

    #[error("Length {0} exceeds remaining data")]
    OversizedLength(u64),

    #[error("Invalid segwit flag: {0:#04x}")]
    InvalidSegwitFlag(u8),

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Transaction {} not found", txid_to_hex(.0))]
    NotFound(Hash),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error(
        "Node returned transaction {} when asked for {}",
        txid_to_hex(.actual),
        txid_to_hex(.requested)
    )]
    TxidMismatch { requested: Hash, actual: Hash },

    #[error("Malformed transaction: {0}")]
    Decode(#[from] DecodeError),
}

/// Reasons a marker payload is rejected. Never surfaced past the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkerError {
    #[error("Missing Open Assets tag")]
    MissingTag,

    #[error("Unsupported marker version")]
    UnsupportedVersion,

    #[error("Truncated marker payload")]
    Truncated,

    #[error("Invalid LEB128 quantity")]
    InvalidQuantity,

    #[error("{count} quantities for {preceding} preceding outputs")]
    TooManyQuantities { count: usize, preceding: usize },

    #[error("Trailing bytes after metadata")]
    TrailingData,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Invalid script: push of {needed} bytes at offset {offset} overruns script")]
    InvalidScript { offset: usize, needed: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColoringError {
    #[error("Unable to fetch transaction {}: {source}", txid_to_hex(.txid))]
    Fetch {
        txid: Hash,
        #[source]
        source: FetchError,
    },

    #[error("Output {index} of transaction {} spans more than one asset", txid_to_hex(.txid))]
    AmbiguousAsset { txid: Hash, index: u32 },

    #[error("Transaction {} has no output {index}", txid_to_hex(.txid))]
    InvalidOutputIndex { txid: Hash, index: u32 },
}

pub type Result<T> = std::result::Result<T, ColoringError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
