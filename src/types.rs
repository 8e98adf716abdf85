//! Core types for transaction coloring

use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash type: 256-bit hash, in serialized (internal) byte order
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Asset quantity: 0 means uncolored
pub type AssetQuantity = u64;

/// OutPoint: transaction hash × output index
///
/// This is the coordinate every colored-output lookup is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(hash: Hash, index: u32) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", txid_to_hex(&self.hash), self.index)
    }
}

/// Transaction Input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

/// Transaction Output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Natural,
    pub script_pubkey: ByteString,
}

/// Transaction: version × inputs × outputs × lock time
///
/// Witness data is consumed by the decoder but not retained; coloring never
/// looks at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// Asset identifier: Hash160 of the issuing script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 20]);

impl AssetId {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Colored Output: an output annotated with its asset identity
///
/// Either `asset_id` is `None` and `asset_quantity` is 0, or `asset_id` is set
/// and `asset_quantity` is positive. The constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredOutput {
    pub output: TransactionOutput,
    pub asset_id: Option<AssetId>,
    pub asset_quantity: AssetQuantity,
}

impl ColoredOutput {
    pub fn uncolored(output: TransactionOutput) -> Self {
        Self {
            output,
            asset_id: None,
            asset_quantity: 0,
        }
    }

    pub fn colored(
        output: TransactionOutput,
        asset_id: AssetId,
        asset_quantity: AssetQuantity,
    ) -> Self {
        if asset_quantity == 0 {
            return Self::uncolored(output);
        }
        Self {
            output,
            asset_id: Some(asset_id),
            asset_quantity,
        }
    }

    pub fn is_colored(&self) -> bool {
        self.asset_id.is_some()
    }

    pub fn value(&self) -> Natural {
        self.output.value
    }

    pub fn script_pubkey(&self) -> &ByteString {
        &self.output.script_pubkey
    }
}

/// Render a txid the way nodes display it (reversed byte order)
pub fn txid_to_hex(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Parse a displayed txid back into internal byte order
pub fn txid_from_hex(s: &str) -> Option<Hash> {
    let bytes = hex::decode(s).ok()?;
    let mut hash: Hash = bytes.try_into().ok()?;
    hash.reverse();
    Some(hash)
}
