//! Command line surface
//!
//! Each subcommand is a variant of [`Command`] carrying its typed arguments;
//! [`Command::run`] dispatches to the matching handler.

use crate::balance::{render_table, summarize};
use crate::cache::OutputCache;
use crate::coloring::ColoringEngine;
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::provider::RpcTransactionProvider;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "colorcore",
    about = "Colorcore: The colored coins Open Asset client",
    version
)]
pub struct Cli {
    #[arg(
        long,
        short,
        env = "COLORCORE_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "the path to the configuration file"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(name = "getbalance")]
    GetBalance(GetBalanceArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Obtains the balance of the wallet or an address")]
pub struct GetBalanceArgs {
    #[arg(long, help = "Obtain the balance of this address only")]
    pub address: Option<String>,

    #[arg(
        long,
        default_value = "1",
        value_parser = parse_count,
        help = "The minimum number of confirmations (inclusive)"
    )]
    pub minconf: u32,

    #[arg(
        long,
        default_value = "9999999",
        value_parser = parse_count,
        help = "The maximum number of confirmations (inclusive)"
    )]
    pub maxconf: u32,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetBalance(_) => "getbalance",
        }
    }

    pub fn run(self, config: &Config) -> Result<()> {
        info!(command = self.name(), "running command");
        match self {
            Command::GetBalance(args) => get_balance(&args, config),
        }
    }
}

/// Confirmation counts accept any non-negative integer
pub fn parse_count(value: &str) -> std::result::Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("Value '{value}' is not a valid integer."))
}

/// Print the colored balance of the wallet, one row per address and asset
fn get_balance(args: &GetBalanceArgs, config: &Config) -> Result<()> {
    let provider = RpcTransactionProvider::new(&config.bitcoind.rpc_url, config.bitcoind.auth())
        .context("Failed to create RPC client")?;

    let addresses = args.address.clone().map(|address| vec![address]);
    let unspent = provider
        .list_unspent(args.minconf, args.maxconf, addresses.as_deref())
        .context("Failed to list unspent outputs")?;

    let mut engine = ColoringEngine::with_config(&provider, OutputCache::new(), config.coloring);
    let mut outputs = Vec::with_capacity(unspent.len());
    let mut failures = 0;
    for entry in &unspent {
        let outpoint = entry
            .outpoint()
            .with_context(|| format!("Node returned an invalid txid: {}", entry.txid))?;
        match engine.get_output(&outpoint.hash, outpoint.index) {
            Ok(output) => outputs.push(output),
            Err(e) => {
                error!(%outpoint, error = %e, "unable to color output");
                failures += 1;
            }
        }
    }

    let rows = summarize(&outputs, &config.environment);
    println!("{}", render_table(&rows));

    if failures > 0 {
        bail!("{failures} of {} unspent outputs could not be colored", unspent.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_getbalance_defaults() {
        let cli = Cli::try_parse_from(["colorcore", "getbalance"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        let Command::GetBalance(args) = cli.command;
        assert_eq!(args.address, None);
        assert_eq!(args.minconf, 1);
        assert_eq!(args.maxconf, 9999999);
    }

    #[test]
    fn test_parse_getbalance_arguments() {
        let cli = Cli::try_parse_from([
            "colorcore",
            "--config",
            "testnet.toml",
            "getbalance",
            "--address",
            "mzBc4XEFSdzCDcTxAgf6EZXgsZWpztRhef",
            "--minconf",
            "0",
            "--maxconf",
            "10",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("testnet.toml"));
        assert_eq!(cli.command.name(), "getbalance");
        let Command::GetBalance(args) = cli.command;
        assert_eq!(args.address.as_deref(), Some("mzBc4XEFSdzCDcTxAgf6EZXgsZWpztRhef"));
        assert_eq!(args.minconf, 0);
        assert_eq!(args.maxconf, 10);
    }

    #[test]
    fn test_parse_count_rejects_non_integers() {
        assert_eq!(parse_count("12"), Ok(12));
        assert_eq!(
            parse_count("abc"),
            Err("Value 'abc' is not a valid integer.".to_string())
        );
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn test_invalid_minconf_is_a_usage_error() {
        assert!(Cli::try_parse_from(["colorcore", "getbalance", "--minconf", "x"]).is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(Cli::try_parse_from(["colorcore", "sendasset"]).is_err());
    }
}
