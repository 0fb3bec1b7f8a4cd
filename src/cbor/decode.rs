//! Native CBOR header decoding and map walking.
//!
//! This is the witness-side mirror of the in-circuit scanner: the prover uses
//! it to derive expected public values, and tests use it to cross-check
//! gadget outputs. It follows the same first-match, stop-when-done discipline
//! as the constraint version so both sides agree on every offset.

use core::fmt;
use serde::{Deserialize, Serialize};

/// CBOR major types as they appear in the top three header bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorType {
    /// Major type 0, unsigned integer.
    Uint,
    /// Major type 1, negative integer.
    Nint,
    /// Major type 2, byte string.
    Bytes,
    /// Major type 3, text string.
    Text,
    /// Major type 4, array.
    Array,
    /// Major type 5, map.
    Map,
    /// Major type 6, tag.
    Tag,
    /// Major type 7, simple values and floats.
    Simple,
}

impl MajorType {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => MajorType::Uint,
            1 => MajorType::Nint,
            2 => MajorType::Bytes,
            3 => MajorType::Text,
            4 => MajorType::Array,
            5 => MajorType::Map,
            6 => MajorType::Tag,
            _ => MajorType::Simple,
        }
    }
}

/// Errors surfaced while walking a credential payload natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassParseError {
    /// The buffer ended before a complete header or value.
    UnexpectedEnd {
        /// Offset at which more bytes were required.
        at: usize,
    },
    /// A header used an additional-info encoding outside the supported set.
    UnsupportedHeader {
        /// Offset of the offending header byte.
        at: usize,
        /// The header byte itself.
        byte: u8,
    },
    /// A scanned map ended without matching one of the required keys.
    KeyNotFound {
        /// Index of the missing key in the scan's target list.
        target: usize,
    },
    /// A located value did not carry the expected major type.
    ValueTypeMismatch {
        /// Offset of the value header.
        at: usize,
    },
    /// A declared length exceeded a fixed capacity.
    LengthOutOfRange {
        /// Offset of the header declaring the length.
        at: usize,
    },
}

impl fmt::Display for PassParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassParseError::UnexpectedEnd { at } => {
                write!(f, "payload ended before offset {at}")
            }
            PassParseError::UnsupportedHeader { at, byte } => {
                write!(f, "unsupported header byte {byte:#04x} at offset {at}")
            }
            PassParseError::KeyNotFound { target } => {
                write!(f, "required key {target} not present in map")
            }
            PassParseError::ValueTypeMismatch { at } => {
                write!(f, "value at offset {at} has unexpected type")
            }
            PassParseError::LengthOutOfRange { at } => {
                write!(f, "length declared at offset {at} exceeds capacity")
            }
        }
    }
}

impl std::error::Error for PassParseError {}

/// Decoded CBOR item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Major type from the top three bits.
    pub major: MajorType,
    /// Decoded argument (small value or extension bytes).
    pub arg: u64,
    /// Number of header bytes consumed.
    pub size: usize,
}

/// Reads the item header at `at`, supporting the short form and 1-, 2- and
/// 4-byte argument extensions.
pub fn read_header(bytes: &[u8], at: usize) -> Result<Header, PassParseError> {
    let first = *bytes.get(at).ok_or(PassParseError::UnexpectedEnd { at })?;
    let major = MajorType::from_bits(first >> 5);
    let info = first & 0x1f;
    let (arg, size) = match info {
        0..=23 => (u64::from(info), 1),
        24 => {
            let ext = *bytes
                .get(at + 1)
                .ok_or(PassParseError::UnexpectedEnd { at: at + 1 })?;
            (u64::from(ext), 2)
        }
        25 => {
            let ext = bytes
                .get(at + 1..at + 3)
                .ok_or(PassParseError::UnexpectedEnd { at: at + 1 })?;
            (u64::from(u16::from_be_bytes([ext[0], ext[1]])), 3)
        }
        26 => {
            let ext = bytes
                .get(at + 1..at + 5)
                .ok_or(PassParseError::UnexpectedEnd { at: at + 1 })?;
            (
                u64::from(u32::from_be_bytes([ext[0], ext[1], ext[2], ext[3]])),
                5,
            )
        }
        _ => return Err(PassParseError::UnsupportedHeader { at, byte: first }),
    };
    Ok(Header { major, arg, size })
}

/// Returns the offset just past the item starting at `at`.
pub fn skip_item(bytes: &[u8], at: usize) -> Result<usize, PassParseError> {
    let header = read_header(bytes, at)?;
    let mut next = at + header.size;
    match header.major {
        MajorType::Uint | MajorType::Nint | MajorType::Simple => {}
        MajorType::Bytes | MajorType::Text => {
            next += header.arg as usize;
            if next > bytes.len() {
                return Err(PassParseError::UnexpectedEnd { at: next });
            }
        }
        MajorType::Array => {
            for _ in 0..header.arg {
                next = skip_item(bytes, next)?;
            }
        }
        MajorType::Map => {
            for _ in 0..header.arg {
                next = skip_item(bytes, next)?;
                next = skip_item(bytes, next)?;
            }
        }
        MajorType::Tag => {
            next = skip_item(bytes, next)?;
        }
    }
    Ok(next)
}

/// Walks the key/value pairs of a map whose first key starts at `pos` and
/// returns, for each target pattern, the offset at which the matched key's
/// value begins.
///
/// Matching is first-match-wins per target and the walk stops advancing once
/// every target is found, exactly like the in-circuit scanner.
pub fn scan_map(
    bytes: &[u8],
    pos: usize,
    entries: usize,
    targets: &[&[u8]],
) -> Result<Vec<usize>, PassParseError> {
    let mut offsets = vec![None; targets.len()];
    let mut cursor = pos;
    for _ in 0..entries {
        if offsets.iter().all(Option::is_some) {
            break;
        }
        let key = read_header(bytes, cursor)?;
        let key_len = match key.major {
            MajorType::Uint => key.size,
            MajorType::Text => key.size + key.arg as usize,
            _ => return Err(PassParseError::UnsupportedHeader { at: cursor, byte: bytes[cursor] }),
        };
        let value_pos = cursor + key_len;
        for (index, target) in targets.iter().enumerate() {
            if offsets[index].is_none()
                && bytes.len() >= cursor + target.len()
                && &bytes[cursor..cursor + target.len()] == *target
            {
                offsets[index] = Some(value_pos);
            }
        }
        if offsets.iter().all(Option::is_some) {
            break;
        }
        cursor = skip_item(bytes, value_pos)?;
    }
    offsets
        .into_iter()
        .enumerate()
        .map(|(target, offset)| offset.ok_or(PassParseError::KeyNotFound { target }))
        .collect()
}
