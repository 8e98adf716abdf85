//! Open Assets coloring engine
//!
//! Assigns an asset identifier and quantity to every output of a
//! transaction, resolving the colors of its inputs first. Ancestors are
//! walked with an explicit stack rather than recursion, so long transfer
//! chains do not grow the call stack. Every colored transaction is written to
//! the [`OutputCache`] in one batch; a failed resolution leaves no entry for
//! the coordinate that failed.

use crate::cache::OutputCache;
use crate::error::{ColoringError, Result};
use crate::marker::{find_marker, parse_marker_at};
use crate::provider::TransactionProvider;
use crate::script::asset_id_from_script;
use crate::serialization::is_coinbase_input;
use crate::types::*;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Engine policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Carry colors 1:1 from input i to output i when a transaction has no
    /// valid marker. Off by default: no marker means no asset operation.
    #[serde(default)]
    pub propagate_without_marker: bool,
}

/// How the outputs of a fetched transaction are to be colored
#[derive(Debug, Clone, PartialEq, Eq)]
enum Plan {
    Marker { index: usize, quantities: Vec<AssetQuantity> },
    NoMarker,
}

impl Plan {
    fn for_transaction(txid: &Hash, tx: &Transaction) -> Self {
        let Some((index, payload)) = find_marker(tx) else {
            return Plan::NoMarker;
        };
        match parse_marker_at(payload, index) {
            Ok(marker) => Plan::Marker {
                index,
                quantities: marker.asset_quantities,
            },
            Err(e) => {
                warn!(
                    txid = %txid_to_hex(txid),
                    marker = index,
                    error = %e,
                    "ignoring malformed marker output"
                );
                Plan::NoMarker
            }
        }
    }
}

pub struct ColoringEngine<P> {
    provider: P,
    cache: OutputCache,
    config: EngineConfig,
}

impl<P: TransactionProvider> ColoringEngine<P> {
    pub fn new(provider: P, cache: OutputCache) -> Self {
        Self::with_config(provider, cache, EngineConfig::default())
    }

    pub fn with_config(provider: P, cache: OutputCache, config: EngineConfig) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &OutputCache {
        &self.cache
    }

    pub fn into_cache(self) -> OutputCache {
        self.cache
    }

    /// Color the output at `index` of transaction `txid`
    pub fn get_output(&mut self, txid: &Hash, index: u32) -> Result<ColoredOutput> {
        let outpoint = OutPoint::new(*txid, index);
        if let Some(output) = self.cache.get(&outpoint) {
            return Ok(output.clone());
        }
        if self.cache.output_count(txid).is_some() {
            return Err(ColoringError::InvalidOutputIndex { txid: *txid, index });
        }

        self.resolve(*txid)?;

        self.cache
            .get(&outpoint)
            .cloned()
            .ok_or(ColoringError::InvalidOutputIndex { txid: *txid, index })
    }

    /// Color `root` and every ancestor it depends on, deepest first
    fn resolve(&mut self, root: Hash) -> Result<()> {
        let mut fetched: HashMap<Hash, (Transaction, Plan)> = HashMap::new();
        let mut colored: HashSet<Hash> = HashSet::new();
        let mut stack = vec![root];

        while let Some(&txid) = stack.last() {
            if colored.contains(&txid) {
                stack.pop();
                continue;
            }

            if !fetched.contains_key(&txid) {
                let tx = self.fetch(&txid)?;
                let plan = Plan::for_transaction(&txid, &tx);
                fetched.insert(txid, (tx, plan));
            }

            let missing = match fetched.get(&txid) {
                Some((tx, plan)) => self.missing_inputs(tx, plan, &colored)?,
                None => Vec::new(),
            };

            if !missing.is_empty() {
                stack.extend(missing);
                continue;
            }

            if let Some((tx, plan)) = fetched.remove(&txid) {
                let outputs = self.color_outputs(&txid, &tx, &plan)?;
                self.cache.put_transaction(txid, outputs);
            }
            colored.insert(txid);
            stack.pop();
        }

        Ok(())
    }

    fn fetch(&self, txid: &Hash) -> Result<Transaction> {
        debug!(txid = %txid_to_hex(txid), "fetching transaction");
        self.provider
            .get_transaction(txid)
            .map_err(|source| ColoringError::Fetch { txid: *txid, source })
    }

    /// Inputs whose colors the plan needs
    fn required_inputs<'a>(
        &self,
        tx: &'a Transaction,
        plan: &Plan,
    ) -> &'a [TransactionInput] {
        match plan {
            Plan::Marker { .. } => &tx.inputs,
            Plan::NoMarker if self.config.propagate_without_marker => {
                &tx.inputs[..tx.inputs.len().min(tx.outputs.len())]
            }
            Plan::NoMarker => &[],
        }
    }

    /// Parent transactions that still have to be colored
    fn missing_inputs(
        &self,
        tx: &Transaction,
        plan: &Plan,
        colored: &HashSet<Hash>,
    ) -> Result<Vec<Hash>> {
        let mut missing = Vec::new();
        for input in self.required_inputs(tx, plan) {
            if is_coinbase_input(input) || self.cache.contains(&input.prevout) {
                continue;
            }
            let parent = input.prevout.hash;
            if colored.contains(&parent) {
                // the parent was colored but has no such output
                return Err(ColoringError::InvalidOutputIndex {
                    txid: parent,
                    index: input.prevout.index,
                });
            }
            if !missing.contains(&parent) {
                missing.push(parent);
            }
        }
        Ok(missing)
    }

    /// Colored outputs spent by the required inputs, in input order
    fn input_colors(&self, inputs: &[TransactionInput]) -> Result<Vec<ColoredOutput>> {
        inputs
            .iter()
            .map(|input| {
                if is_coinbase_input(input) {
                    return Ok(ColoredOutput::uncolored(TransactionOutput {
                        value: 0,
                        script_pubkey: Vec::new(),
                    }));
                }
                self.cache
                    .get(&input.prevout)
                    .cloned()
                    .ok_or(ColoringError::InvalidOutputIndex {
                        txid: input.prevout.hash,
                        index: input.prevout.index,
                    })
            })
            .collect()
    }

    fn color_outputs(
        &self,
        txid: &Hash,
        tx: &Transaction,
        plan: &Plan,
    ) -> Result<Vec<ColoredOutput>> {
        let inputs = self.input_colors(self.required_inputs(tx, plan))?;

        let colored = match plan {
            Plan::Marker { index, quantities } => match inputs.first() {
                None => None,
                Some(first) if !first.is_colored() => {
                    let asset_id = asset_id_from_script(first.script_pubkey());
                    debug!(
                        txid = %txid_to_hex(txid),
                        marker = index,
                        asset = %asset_id,
                        "issuance"
                    );
                    Some(issue(&tx.outputs, quantities, asset_id))
                }
                Some(_) => {
                    debug!(txid = %txid_to_hex(txid), marker = index, "transfer");
                    let outputs = transfer(&tx.outputs, quantities, &inputs)
                        .map_err(|index| ColoringError::AmbiguousAsset { txid: *txid, index })
                        .inspect_err(|e| warn!(error = %e, "rejecting transfer"))?;
                    if outputs.is_none() {
                        warn!(
                            txid = %txid_to_hex(txid),
                            "transfer exceeds colored inputs, treating outputs as uncolored"
                        );
                    }
                    outputs
                }
            },
            Plan::NoMarker if self.config.propagate_without_marker => {
                Some(propagate(&tx.outputs, &inputs))
            }
            Plan::NoMarker => None,
        };

        Ok(colored.unwrap_or_else(|| uncolored(&tx.outputs)))
    }
}

fn uncolored(outputs: &[TransactionOutput]) -> Vec<ColoredOutput> {
    outputs.iter().cloned().map(ColoredOutput::uncolored).collect()
}

/// Every output with a positive quantity receives the new asset
fn issue(
    outputs: &[TransactionOutput],
    quantities: &[AssetQuantity],
    asset_id: AssetId,
) -> Vec<ColoredOutput> {
    outputs
        .iter()
        .enumerate()
        .map(|(i, output)| {
            let quantity = quantities.get(i).copied().unwrap_or(0);
            ColoredOutput::colored(output.clone(), asset_id, quantity)
        })
        .collect()
}

/// Slice the concatenated input quantities into the output quantities
///
/// Returns `Ok(None)` when the outputs ask for more units than the inputs
/// carry, and `Err(index)` when output `index` would draw from two assets.
fn transfer(
    outputs: &[TransactionOutput],
    quantities: &[AssetQuantity],
    inputs: &[ColoredOutput],
) -> std::result::Result<Option<Vec<ColoredOutput>>, u32> {
    let mut sources = inputs
        .iter()
        .filter_map(|input| input.asset_id.map(|id| (id, input.asset_quantity)));
    let mut current: Option<(AssetId, AssetQuantity)> = None;
    let mut result = Vec::with_capacity(outputs.len());

    for (i, output) in outputs.iter().enumerate() {
        let quantity = quantities.get(i).copied().unwrap_or(0);
        let mut needed = quantity;
        let mut asset: Option<AssetId> = None;

        while needed > 0 {
            let (id, available) = match current {
                Some((id, available)) if available > 0 => (id, available),
                _ => match sources.next() {
                    Some(source) => source,
                    None => return Ok(None),
                },
            };
            if asset.is_some_and(|a| a != id) {
                return Err(i as u32);
            }
            asset = Some(id);
            let taken = available.min(needed);
            needed -= taken;
            current = Some((id, available - taken));
        }

        result.push(match asset {
            Some(id) => ColoredOutput::colored(output.clone(), id, quantity),
            None => ColoredOutput::uncolored(output.clone()),
        });
    }

    Ok(Some(result))
}

/// Output i takes the color of input i
fn propagate(outputs: &[TransactionOutput], inputs: &[ColoredOutput]) -> Vec<ColoredOutput> {
    outputs
        .iter()
        .enumerate()
        .map(|(i, output)| match inputs.get(i) {
            Some(ColoredOutput {
                asset_id: Some(id),
                asset_quantity,
                ..
            }) => ColoredOutput::colored(output.clone(), *id, *asset_quantity),
            _ => ColoredOutput::uncolored(output.clone()),
        })
        .collect()
}
