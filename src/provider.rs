//! Transaction sources
//!
//! The coloring engine only needs one capability from the node: fetch a
//! transaction by hash. [`RpcTransactionProvider`] does this over bitcoind's
//! JSON-RPC interface; [`MemoryProvider`] serves a fixed set of transactions
//! and counts fetches.

use crate::constants::RPC_INVALID_ADDRESS_OR_KEY;
use crate::error::FetchError;
use crate::serialization::{calculate_txid, deserialize_transaction_hex};
use crate::types::*;
use bitcoincore_rpc::{jsonrpc, Auth, Client, RpcApi};
use serde::Deserialize;
use serde_json::json;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Fetch raw transactions by hash
pub trait TransactionProvider {
    fn get_transaction(&self, txid: &Hash) -> Result<Transaction, FetchError>;
}

impl<P: TransactionProvider + ?Sized> TransactionProvider for &P {
    fn get_transaction(&self, txid: &Hash) -> Result<Transaction, FetchError> {
        (**self).get_transaction(txid)
    }
}

/// Credentials for the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcAuth {
    None,
    UserPass(String, String),
    CookieFile(PathBuf),
}

/// One entry of `listunspent`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnspentOutput {
    pub txid: String,
    pub vout: u32,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub confirmations: u32,
}

impl UnspentOutput {
    pub fn outpoint(&self) -> Option<OutPoint> {
        txid_from_hex(&self.txid).map(|hash| OutPoint::new(hash, self.vout))
    }
}

/// bitcoind JSON-RPC transaction source
pub struct RpcTransactionProvider {
    client: Client,
}

impl RpcTransactionProvider {
    pub fn new(url: &str, auth: RpcAuth) -> Result<Self, FetchError> {
        let auth = match auth {
            RpcAuth::None => Auth::None,
            RpcAuth::UserPass(user, pass) => Auth::UserPass(user, pass),
            RpcAuth::CookieFile(path) => Auth::CookieFile(path),
        };
        let client = Client::new(url, auth).map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// `listunspent minconf maxconf [addresses]`
    pub fn list_unspent(
        &self,
        min_conf: u32,
        max_conf: u32,
        addresses: Option<&[String]>,
    ) -> Result<Vec<UnspentOutput>, FetchError> {
        let mut args = vec![json!(min_conf), json!(max_conf)];
        if let Some(addresses) = addresses {
            args.push(json!(addresses));
        }
        self.client
            .call("listunspent", &args)
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

impl TransactionProvider for RpcTransactionProvider {
    fn get_transaction(&self, txid: &Hash) -> Result<Transaction, FetchError> {
        debug!(txid = %txid_to_hex(txid), "getrawtransaction");
        let raw: String = self
            .client
            .call("getrawtransaction", &[json!(txid_to_hex(txid))])
            .map_err(|e| match e {
                bitcoincore_rpc::Error::JsonRpc(jsonrpc::Error::Rpc(ref rpc))
                    if rpc.code == RPC_INVALID_ADDRESS_OR_KEY =>
                {
                    FetchError::NotFound(*txid)
                }
                other => FetchError::Transport(other.to_string()),
            })?;

        let tx = deserialize_transaction_hex(&raw)?;
        let actual = calculate_txid(&tx);
        if actual != *txid {
            return Err(FetchError::TxidMismatch {
                requested: *txid,
                actual,
            });
        }
        Ok(tx)
    }
}

/// In-memory transaction source with fetch counting
#[derive(Debug, Default)]
pub struct MemoryProvider {
    transactions: HashMap<Hash, Transaction>,
    fetches: RefCell<HashMap<Hash, usize>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction, keyed by its txid
    pub fn insert(&mut self, tx: Transaction) -> Hash {
        let txid = calculate_txid(&tx);
        self.transactions.insert(txid, tx);
        txid
    }

    /// Number of times `txid` was requested
    pub fn fetch_count(&self, txid: &Hash) -> usize {
        self.fetches.borrow().get(txid).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.borrow().values().sum()
    }
}

impl TransactionProvider for MemoryProvider {
    fn get_transaction(&self, txid: &Hash) -> Result<Transaction, FetchError> {
        *self.fetches.borrow_mut().entry(*txid).or_insert(0) += 1;
        self.transactions
            .get(txid)
            .cloned()
            .ok_or(FetchError::NotFound(*txid))
    }
}
