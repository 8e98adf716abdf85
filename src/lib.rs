//! # Colorcore
//!
//! Open Assets client library: reads chain state from a Bitcoin node and
//! classifies unspent outputs by colored-coin asset.
//!
//! ## Architecture
//!
//! - [`serialization`], [`script`], [`marker`]: bit-exact decoding of
//!   transactions, locking scripts and Open Assets marker payloads
//! - [`cache`]: colored outputs keyed by coordinate, shared by every query
//!   of one run
//! - [`coloring`]: the engine that walks transaction ancestry and assigns
//!   asset identifiers and quantities
//! - [`provider`]: where transactions come from (bitcoind RPC, or memory)
//! - [`address`], [`balance`], [`commands`], [`config`], [`logging`]: the
//!   command line client around the engine
//!
//! ## Usage
//!
//! ```rust
//! use colorcore::*;
//! use colorcore::marker::MarkerOutput;
//! use colorcore::script::{asset_id_from_script, p2pkh_script};
//!
//! let mut provider = MemoryProvider::new();
//!
//! // A coinbase paying to the future issuer
//! let funding = provider.insert(Transaction {
//!     version: 1,
//!     inputs: vec![TransactionInput {
//!         prevout: OutPoint::new([0; 32], COINBASE_INDEX),
//!         script_sig: vec![0x51, 0x51],
//!         sequence: 0xffffffff,
//!     }],
//!     outputs: vec![TransactionOutput {
//!         value: 10_000,
//!         script_pubkey: p2pkh_script(&[1; 20]),
//!     }],
//!     lock_time: 0,
//! });
//!
//! // Issue 1000 units to output 0
//! let marker = MarkerOutput { asset_quantities: vec![1000], metadata: vec![] };
//! let issuance = provider.insert(Transaction {
//!     version: 1,
//!     inputs: vec![TransactionInput {
//!         prevout: OutPoint::new(funding, 0),
//!         script_sig: vec![],
//!         sequence: 0xffffffff,
//!     }],
//!     outputs: vec![
//!         TransactionOutput { value: 600, script_pubkey: p2pkh_script(&[2; 20]) },
//!         TransactionOutput { value: 0, script_pubkey: marker.build_script() },
//!     ],
//!     lock_time: 0,
//! });
//!
//! let mut engine = ColoringEngine::new(&provider, OutputCache::new());
//! let output = engine.get_output(&issuance, 0).unwrap();
//! assert_eq!(output.asset_quantity, 1000);
//! assert_eq!(output.asset_id, Some(asset_id_from_script(&p2pkh_script(&[1; 20]))));
//! ```

pub mod types;
pub mod constants;
pub mod error;
pub mod serialization;
pub mod script;
pub mod address;
pub mod marker;
pub mod cache;
pub mod provider;
pub mod coloring;
pub mod balance;
pub mod config;
pub mod logging;
pub mod commands;

// Re-export commonly used types
pub use types::*;
pub use constants::*;
pub use error::{ColoringError, FetchError, Result};
pub use cache::OutputCache;
pub use coloring::{ColoringEngine, EngineConfig};
pub use provider::{MemoryProvider, RpcTransactionProvider, TransactionProvider};
