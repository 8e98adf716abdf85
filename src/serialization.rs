//! Standard Bitcoin transaction decoding
//!
//! Layout: version (i32 LE), [segwit marker 0x00 + flag 0x01], input count
//! (CompactSize), inputs, output count (CompactSize), outputs, [witnesses],
//! lock time (u32 LE). The decoder is strict: truncation and trailing bytes
//! are both errors.

use crate::constants::*;
use crate::error::DecodeError;
use crate::types::*;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};

/// Cursor over a byte slice
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::UnexpectedEnd { offset: self.pos, needed: n });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    /// CompactSize: 1, 3, 5 or 9 bytes
    pub fn read_compact_size(&mut self) -> Result<u64, DecodeError> {
        match self.read_u8()? {
            0xfd => Ok(self.read_u16_le()? as u64),
            0xfe => Ok(self.read_u32_le()? as u64),
            0xff => self.read_u64_le(),
            n => Ok(n as u64),
        }
    }

    /// CompactSize length followed by that many bytes
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_length()?;
        self.read_bytes(len)
    }

    /// CompactSize used as a length or count; must fit in what is left
    pub fn read_length(&mut self) -> Result<usize, DecodeError> {
        let len = self.read_compact_size()?;
        if len > self.remaining() as u64 {
            return Err(DecodeError::OversizedLength(len));
        }
        Ok(len as usize)
    }
}

/// Decode a transaction from its raw serialized form
pub fn deserialize_transaction(data: &[u8]) -> Result<Transaction, DecodeError> {
    let mut reader = Reader::new(data);
    let version = reader.read_u32_le()? as i32;

    let mut segwit = false;
    if reader.peek_u8() == Some(SEGWIT_MARKER) {
        reader.read_u8()?;
        let flag = reader.read_u8()?;
        if flag != SEGWIT_FLAG {
            return Err(DecodeError::InvalidSegwitFlag(flag));
        }
        segwit = true;
    }

    let input_count = reader.read_length()?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(reader.read_bytes(32)?);
        let index = reader.read_u32_le()?;
        let script_sig = reader.read_var_bytes()?.to_vec();
        let sequence = reader.read_u32_le()?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = reader.read_length()?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = reader.read_u64_le()?;
        let script_pubkey = reader.read_var_bytes()?.to_vec();
        outputs.push(TransactionOutput { value, script_pubkey });
    }

    if segwit {
        for _ in 0..inputs.len() {
            let items = reader.read_length()?;
            for _ in 0..items {
                reader.read_var_bytes()?;
            }
        }
    }

    let lock_time = reader.read_u32_le()?;

    if !reader.is_empty() {
        return Err(DecodeError::TrailingData(reader.remaining()));
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// Decode a transaction from the hex string returned by `getrawtransaction`
pub fn deserialize_transaction_hex(s: &str) -> Result<Transaction, DecodeError> {
    let bytes = hex::decode(s.trim()).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
    deserialize_transaction(&bytes)
}

/// Append a CompactSize integer
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x10000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Serialize without witness data (the form the txid commits to)
pub fn serialize_transaction(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tx.version.to_le_bytes());

    write_compact_size(&mut buf, tx.inputs.len() as u64);
    for input in &tx.inputs {
        buf.extend_from_slice(&input.prevout.hash);
        buf.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_compact_size(&mut buf, input.script_sig.len() as u64);
        buf.extend_from_slice(&input.script_sig);
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_compact_size(&mut buf, tx.outputs.len() as u64);
    for output in &tx.outputs {
        buf.extend_from_slice(&output.value.to_le_bytes());
        write_compact_size(&mut buf, output.script_pubkey.len() as u64);
        buf.extend_from_slice(&output.script_pubkey);
    }

    buf.extend_from_slice(&tx.lock_time.to_le_bytes());
    buf
}

/// Txid: double SHA256 of the non-witness serialization
pub fn calculate_txid(tx: &Transaction) -> Hash {
    let mut engine = sha256d::Hash::engine();
    engine.input(&serialize_transaction(tx));
    sha256d::Hash::from_engine(engine).into_inner()
}

/// Coinbase inputs spend the null prevout
pub fn is_coinbase_input(input: &TransactionInput) -> bool {
    input.prevout.hash == [0u8; 32] && input.prevout.index == COINBASE_INDEX
}
