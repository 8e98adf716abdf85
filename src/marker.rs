//! Open Assets marker output
//!
//! A marker output is an `OP_RETURN` followed by a single data push whose
//! payload is:
//!
//! | field              | encoding                       |
//! |--------------------|--------------------------------|
//! | tag                | `0x4f 0x41` ("OA")             |
//! | version            | `0x01 0x00`                    |
//! | quantity count     | CompactSize                    |
//! | quantities         | LEB128, one per colored output |
//! | metadata length    | CompactSize                    |
//! | metadata           | raw bytes                      |

use crate::constants::*;
use crate::error::MarkerError;
use crate::script::Instructions;
use crate::serialization::Reader;
use crate::types::*;

/// Decoded marker payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOutput {
    pub asset_quantities: Vec<AssetQuantity>,
    pub metadata: ByteString,
}

impl MarkerOutput {
    /// Parse a marker payload (the bytes pushed after `OP_RETURN`)
    pub fn deserialize_payload(payload: &[u8]) -> Result<MarkerOutput, MarkerError> {
        let mut reader = Reader::new(payload);

        let tag = reader.read_bytes(2).map_err(|_| MarkerError::MissingTag)?;
        if tag != MARKER_TAG {
            return Err(MarkerError::MissingTag);
        }
        let version = reader.read_bytes(2).map_err(|_| MarkerError::Truncated)?;
        if version != MARKER_VERSION {
            return Err(MarkerError::UnsupportedVersion);
        }

        let count = reader.read_length().map_err(|_| MarkerError::Truncated)?;
        let mut asset_quantities = Vec::with_capacity(count);
        for _ in 0..count {
            asset_quantities.push(read_leb128(&mut reader)?);
        }

        let metadata = reader
            .read_var_bytes()
            .map_err(|_| MarkerError::Truncated)?
            .to_vec();

        if !reader.is_empty() {
            return Err(MarkerError::TrailingData);
        }

        Ok(MarkerOutput {
            asset_quantities,
            metadata,
        })
    }

    /// Serialize into a marker payload
    pub fn serialize_payload(&self) -> ByteString {
        let mut payload = Vec::new();
        payload.extend_from_slice(&MARKER_TAG);
        payload.extend_from_slice(&MARKER_VERSION);
        crate::serialization::write_compact_size(&mut payload, self.asset_quantities.len() as u64);
        for quantity in &self.asset_quantities {
            write_leb128(&mut payload, *quantity);
        }
        crate::serialization::write_compact_size(&mut payload, self.metadata.len() as u64);
        payload.extend_from_slice(&self.metadata);
        payload
    }

    /// Wrap the payload into an `OP_RETURN` locking script
    pub fn build_script(&self) -> ByteString {
        let payload = self.serialize_payload();
        let mut script = vec![OP_RETURN];
        match payload.len() {
            0..=0x4b => script.push(payload.len() as u8),
            0x4c..=0xff => {
                script.push(OP_PUSHDATA1);
                script.push(payload.len() as u8);
            }
            0x100..=0xffff => {
                script.push(OP_PUSHDATA2);
                script.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            }
            _ => {
                script.push(OP_PUSHDATA4);
                script.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            }
        }
        script.extend_from_slice(&payload);
        script
    }
}

/// Extract the marker payload from a locking script
///
/// Returns `None` unless the script is exactly `OP_RETURN <push>` and the
/// pushed data starts with the Open Assets tag.
pub fn parse_marker_script(script: &[u8]) -> Option<&[u8]> {
    let mut instructions = Instructions::new(script);
    let first = instructions.next()?.ok()?;
    if first.opcode != OP_RETURN {
        return None;
    }
    let payload = instructions.next()?.ok()?.data?;
    if instructions.next().is_some() {
        return None;
    }
    if payload.len() < MARKER_TAG.len() || payload[..MARKER_TAG.len()] != MARKER_TAG {
        return None;
    }
    Some(payload)
}

/// Locate the marker output of a transaction
///
/// The first output tagged as a marker is the marker, wherever it sits.
/// Returns its index together with its payload.
pub fn find_marker(tx: &Transaction) -> Option<(usize, &[u8])> {
    tx.outputs
        .iter()
        .enumerate()
        .find_map(|(i, output)| parse_marker_script(&output.script_pubkey).map(|p| (i, p)))
}

/// Parse the marker at `index` and check its quantities fit before it
pub fn parse_marker_at(payload: &[u8], index: usize) -> Result<MarkerOutput, MarkerError> {
    let marker = MarkerOutput::deserialize_payload(payload)?;
    if marker.asset_quantities.len() > index {
        return Err(MarkerError::TooManyQuantities {
            count: marker.asset_quantities.len(),
            preceding: index,
        });
    }
    Ok(marker)
}

/// Read an unsigned LEB128 integer of at most 9 bytes (63 bits)
pub fn read_leb128(reader: &mut Reader<'_>) -> Result<u64, MarkerError> {
    let mut result: u64 = 0;
    for i in 0..MAX_LEB128_BYTES {
        let byte = reader.read_u8().map_err(|_| MarkerError::Truncated)?;
        result |= ((byte & 0x7f) as u64) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result);
        }
    }
    Err(MarkerError::InvalidQuantity)
}

/// Append an unsigned LEB128 integer
pub fn write_leb128(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}
