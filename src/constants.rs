//! Bitcoin and Open Assets constants

/// Satoshis per BTC
pub const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// Prevout index used by coinbase inputs
pub const COINBASE_INDEX: u32 = 0xffffffff;

/// Open Assets marker tag: "OA"
pub const MARKER_TAG: [u8; 2] = [0x4f, 0x41];

/// Open Assets protocol version 1.0 (little endian)
pub const MARKER_VERSION: [u8; 2] = [0x01, 0x00];

/// Maximum length of a LEB128 encoded asset quantity
pub const MAX_LEB128_BYTES: usize = 9;

/// Segwit serialization marker and flag bytes
pub const SEGWIT_MARKER: u8 = 0x00;
pub const SEGWIT_FLAG: u8 = 0x01;

/// JSON-RPC error code returned by bitcoind for unknown transactions
pub const RPC_INVALID_ADDRESS_OR_KEY: i32 = -5;

// Opcodes
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
