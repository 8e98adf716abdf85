//! Locking script decoding
//!
//! Scripts are never executed here; they are only split into instructions so
//! that standard templates and marker outputs can be recognized.

use crate::constants::*;
use crate::error::ScriptError;
use crate::types::*;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// A single decoded script instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    pub opcode: u8,
    /// Pushed bytes, for push opcodes only
    pub data: Option<&'a [u8]>,
}

/// Iterator over the instructions of a script
///
/// Yields an error (and then stops) when a push runs past the end of the script.
pub struct Instructions<'a> {
    script: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self {
            script,
            pos: 0,
            failed: false,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ScriptError> {
        if self.script.len() - self.pos < n {
            return Err(ScriptError::InvalidScript { offset: self.pos, needed: n });
        }
        let slice = &self.script[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn next_instruction(&mut self) -> Result<Instruction<'a>, ScriptError> {
        let opcode = self.take(1)?[0];
        let len = match opcode {
            0x01..=0x4b => opcode as usize,
            OP_PUSHDATA1 => self.take(1)?[0] as usize,
            OP_PUSHDATA2 => {
                let b = self.take(2)?;
                u16::from_le_bytes([b[0], b[1]]) as usize
            }
            OP_PUSHDATA4 => {
                let b = self.take(4)?;
                u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize
            }
            _ => return Ok(Instruction { opcode, data: None }),
        };
        let data = self.take(len)?;
        Ok(Instruction {
            opcode,
            data: Some(data),
        })
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.script.len() {
            return None;
        }
        let result = self.next_instruction();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Decode a whole script into instructions
pub fn parse_script(script: &[u8]) -> Result<Vec<Instruction<'_>>, ScriptError> {
    Instructions::new(script).collect()
}

/// Recognized locking script shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptTemplate {
    /// OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    PayToPubkeyHash([u8; 20]),
    /// OP_HASH160 <20 bytes> OP_EQUAL
    PayToScriptHash([u8; 20]),
    /// Anything else that decodes
    Unknown,
}

/// Classify a locking script
pub fn classify_script(script: &[u8]) -> Result<ScriptTemplate, ScriptError> {
    let instructions = parse_script(script)?;
    let template = match instructions.as_slice() {
        [
            Instruction { opcode: OP_DUP, .. },
            Instruction { opcode: OP_HASH160, .. },
            Instruction { data: Some(hash), .. },
            Instruction { opcode: OP_EQUALVERIFY, .. },
            Instruction { opcode: OP_CHECKSIG, .. },
        ] => match <[u8; 20]>::try_from(*hash) {
            Ok(hash) => ScriptTemplate::PayToPubkeyHash(hash),
            Err(_) => ScriptTemplate::Unknown,
        },
        [
            Instruction { opcode: OP_HASH160, .. },
            Instruction { data: Some(hash), .. },
            Instruction { opcode: OP_EQUAL, .. },
        ] => match <[u8; 20]>::try_from(*hash) {
            Ok(hash) => ScriptTemplate::PayToScriptHash(hash),
            Err(_) => ScriptTemplate::Unknown,
        },
        _ => ScriptTemplate::Unknown,
    };
    Ok(template)
}

/// HASH160: RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha256_hash = Sha256::digest(data);
    let ripemd160_hash = Ripemd160::digest(sha256_hash);
    let mut out = [0u8; 20];
    out.copy_from_slice(&ripemd160_hash);
    out
}

/// Asset identifier issued by a transaction whose first input spends `script`
pub fn asset_id_from_script(script: &ByteString) -> AssetId {
    AssetId(hash160(script))
}

/// Build a standard pay-to-pubkey-hash script
pub fn p2pkh_script(hash: &[u8; 20]) -> ByteString {
    let mut script = vec![OP_DUP, OP_HASH160, 0x14];
    script.extend_from_slice(hash);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}
