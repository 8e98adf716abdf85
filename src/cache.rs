//! Colored output cache
//!
//! Maps an output coordinate to its computed [`ColoredOutput`]. Entries are
//! never evicted or replaced: the first value stored for a coordinate wins and
//! later writers keep it. Lifetime is one process invocation.
//!
//! Transactions stored as a batch also record how many outputs they have, so
//! a query for an index past the end can be answered without a fetch.

use crate::types::*;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct OutputCache {
    outputs: HashMap<OutPoint, ColoredOutput>,
    output_counts: HashMap<Hash, usize>,
}

impl OutputCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, outpoint: &OutPoint) -> Option<&ColoredOutput> {
        self.outputs.get(outpoint)
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.outputs.contains_key(outpoint)
    }

    /// Store an entry unless one already exists; returns the stored entry
    pub fn put(&mut self, outpoint: OutPoint, output: ColoredOutput) -> &ColoredOutput {
        self.outputs.entry(outpoint).or_insert(output)
    }

    /// Store every output of one transaction
    pub fn put_transaction(&mut self, txid: Hash, outputs: Vec<ColoredOutput>) {
        self.output_counts.entry(txid).or_insert(outputs.len());
        for (index, output) in outputs.into_iter().enumerate() {
            self.put(OutPoint::new(txid, index as u32), output);
        }
    }

    /// Number of outputs of a transaction stored with [`Self::put_transaction`]
    pub fn output_count(&self, txid: &Hash) -> Option<usize> {
        self.output_counts.get(txid).copied()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
