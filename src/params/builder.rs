use core::fmt;
use serde::{Deserialize, Serialize};

use super::{PassParams, CHUNK_BITS};

/// Largest payload capacity representable by the 16-bit declared lengths the
/// digest stages decompose.
const MAX_TBS_CAPACITY: usize = 65_526;

/// Largest credential-subject field capacity; the Pedersen stage commits to a
/// 64-byte fitted identity buffer.
const MAX_FIELD_CAPACITY: usize = 64;

/// Largest entry bound expressible as a short CBOR map header argument.
const MAX_MAP_ENTRIES: usize = 23;

/// Built-in parameter profiles mirroring the deployed circuit variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassProfile {
    /// The specification's example pass: 314-byte payload, 32-byte fields.
    Example,
    /// Live Ministry-of-Health passes: 355-byte payload, 64-byte fields.
    Live,
}

/// Validation failures reported by [`PassParamsBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamsError {
    /// Payload capacity is zero or exceeds the 16-bit length field.
    TbsCapacityOutOfRange,
    /// The claims anchor does not leave room for a map header before it or
    /// any claim bytes after it.
    ClaimsPosOutOfRange,
    /// A scan unroll bound is zero or above the short-header maximum.
    EntryBoundOutOfRange,
    /// Field capacity is zero or above the fitted-buffer maximum.
    FieldCapacityOutOfRange,
    /// Chunk width is zero or above the packing maximum.
    ChunkWidthOutOfRange,
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::TbsCapacityOutOfRange => {
                write!(f, "payload capacity outside 1..={MAX_TBS_CAPACITY}")
            }
            ParamsError::ClaimsPosOutOfRange => write!(f, "claims anchor outside the payload"),
            ParamsError::EntryBoundOutOfRange => {
                write!(f, "scan entry bound outside 1..={MAX_MAP_ENTRIES}")
            }
            ParamsError::FieldCapacityOutOfRange => {
                write!(f, "field capacity outside 1..={MAX_FIELD_CAPACITY}")
            }
            ParamsError::ChunkWidthOutOfRange => {
                write!(f, "chunk width outside 1..={CHUNK_BITS}")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

/// Builder used to assemble [`PassParams`] with validation.
#[derive(Debug, Clone)]
pub struct PassParamsBuilder {
    pub max_tbs_len: usize,
    pub claims_pos: usize,
    pub claim_entries: usize,
    pub vc_entries: usize,
    pub subject_entries: usize,
    pub max_array_items: usize,
    pub max_field_len: usize,
    pub chunk_bits: usize,
}

impl PassParamsBuilder {
    /// Returns a builder initialised with the example-pass profile.
    pub fn new() -> Self {
        Self::from_profile(PassProfile::Example)
    }

    /// Loads one of the built-in profiles.
    pub fn from_profile(profile: PassProfile) -> Self {
        match profile {
            PassProfile::Example => PassParamsBuilder {
                max_tbs_len: 314,
                claims_pos: 28,
                claim_entries: 5,
                vc_entries: 4,
                subject_entries: 3,
                max_array_items: 3,
                max_field_len: 32,
                chunk_bits: CHUNK_BITS,
            },
            PassProfile::Live => PassParamsBuilder {
                max_tbs_len: 355,
                claims_pos: 31,
                claim_entries: 5,
                vc_entries: 4,
                subject_entries: 3,
                max_array_items: 3,
                max_field_len: 64,
                chunk_bits: CHUNK_BITS,
            },
        }
    }

    /// Validates the assembled values and freezes them into [`PassParams`].
    pub fn build(self) -> Result<PassParams, ParamsError> {
        if self.max_tbs_len == 0 || self.max_tbs_len > MAX_TBS_CAPACITY {
            return Err(ParamsError::TbsCapacityOutOfRange);
        }
        if self.claims_pos == 0 || self.claims_pos >= self.max_tbs_len {
            return Err(ParamsError::ClaimsPosOutOfRange);
        }
        for bound in [
            self.claim_entries,
            self.vc_entries,
            self.subject_entries,
            self.max_array_items,
        ] {
            if bound == 0 || bound > MAX_MAP_ENTRIES {
                return Err(ParamsError::EntryBoundOutOfRange);
            }
        }
        if self.max_field_len == 0 || self.max_field_len > MAX_FIELD_CAPACITY {
            return Err(ParamsError::FieldCapacityOutOfRange);
        }
        if self.chunk_bits == 0 || self.chunk_bits > CHUNK_BITS {
            return Err(ParamsError::ChunkWidthOutOfRange);
        }
        Ok(PassParams::from_parts(
            self.max_tbs_len,
            self.claims_pos,
            self.claim_entries,
            self.vc_entries,
            self.subject_entries,
            self.max_array_items,
            self.max_field_len,
            self.chunk_bits,
        ))
    }
}

impl Default for PassParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
