//! Address rendering for console output

use crate::script::{classify_script, ScriptTemplate};
use crate::types::AssetId;
use base58check::ToBase58Check;
use serde::Deserialize;

/// Display string for scripts that decode but match no known template
pub const UNKNOWN_SCRIPT: &str = "Unknown script";

/// Display string for scripts that fail to decode
pub const INVALID_SCRIPT: &str = "Invalid script";

/// Base-58 version bytes of the network being queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AddressVersions {
    /// Pay-to-pubkey-hash addresses
    pub version_byte: u8,
    /// Pay-to-script-hash addresses, also used for asset addresses
    pub p2sh_version_byte: u8,
}

impl AddressVersions {
    pub const MAINNET: AddressVersions = AddressVersions {
        version_byte: 0,
        p2sh_version_byte: 5,
    };

    pub const TESTNET: AddressVersions = AddressVersions {
        version_byte: 111,
        p2sh_version_byte: 196,
    };
}

impl Default for AddressVersions {
    fn default() -> Self {
        Self::MAINNET
    }
}

/// Encode a 20-byte hash as a versioned base-58-check string
pub fn encode_address(hash: &[u8; 20], version: u8) -> String {
    hash[..].to_base58check(version)
}

/// Render a locking script as an address
///
/// Only pay-to-pubkey-hash is rendered; anything else that decodes is
/// [`UNKNOWN_SCRIPT`], and undecodable scripts are [`INVALID_SCRIPT`].
pub fn render_address(script: &[u8], versions: &AddressVersions) -> String {
    match classify_script(script) {
        Ok(ScriptTemplate::PayToPubkeyHash(hash)) => encode_address(&hash, versions.version_byte),
        Ok(_) => UNKNOWN_SCRIPT.to_string(),
        Err(_) => INVALID_SCRIPT.to_string(),
    }
}

/// Render an asset identifier as an asset address
pub fn render_asset_address(asset_id: &AssetId, versions: &AddressVersions) -> String {
    encode_address(asset_id.as_bytes(), versions.p2sh_version_byte)
}
