#![forbid(unsafe_code)]

//! Canonical parameter registry for the pass circuits.
//!
//! [`PassParams`] is the single source of truth for every shape constant a
//! circuit variant depends on: buffer capacities, the claims-map anchor
//! position, scan unroll bounds and the output chunk width. All capacities
//! are compile-time-style constants from the constraint system's point of
//! view — two parameter sets describe two different circuits, never one
//! circuit with runtime configuration.
//!
//! Consumers are expected to go through [`PassParamsBuilder`], which offers
//! validated defaults and the two built-in profiles matching the credential
//! variants in the wild:
//!
//! | Profile | Payload capacity | Claims anchor | Field capacity |
//! |---------|------------------|---------------|----------------|
//! | [`PassProfile::Example`] | 314 bytes | 28 | 32 bytes |
//! | [`PassProfile::Live`] | 355 bytes | 31 | 64 bytes |
//!
//! The live anchor sits three bytes later because live passes carry a longer
//! key identifier in the COSE protected header.

mod builder;

pub use builder::{ParamsError, PassParamsBuilder, PassProfile};

use serde::{Deserialize, Serialize};

/// Number of bits packed into one public-output field chunk.
pub const CHUNK_BITS: usize = 248;

/// Validated circuit-shape parameters. Construct via [`PassParamsBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassParams {
    max_tbs_len: usize,
    claims_pos: usize,
    claim_entries: usize,
    vc_entries: usize,
    subject_entries: usize,
    max_array_items: usize,
    max_field_len: usize,
    chunk_bits: usize,
}

impl PassParams {
    pub(crate) fn from_parts(
        max_tbs_len: usize,
        claims_pos: usize,
        claim_entries: usize,
        vc_entries: usize,
        subject_entries: usize,
        max_array_items: usize,
        max_field_len: usize,
        chunk_bits: usize,
    ) -> Self {
        Self {
            max_tbs_len,
            claims_pos,
            claim_entries,
            vc_entries,
            subject_entries,
            max_array_items,
            max_field_len,
            chunk_bits,
        }
    }

    /// Capacity of the zero-padded `ToBeSigned` buffer in bytes.
    pub fn max_tbs_len(&self) -> usize {
        self.max_tbs_len
    }

    /// Offset of the first key of the CWT claims map inside `ToBeSigned`.
    pub fn claims_pos(&self) -> usize {
        self.claims_pos
    }

    /// Unroll bound for the CWT claims map scan.
    pub fn claim_entries(&self) -> usize {
        self.claim_entries
    }

    /// Unroll bound for the `vc` map scan.
    pub fn vc_entries(&self) -> usize {
        self.vc_entries
    }

    /// Unroll bound for the `credentialSubject` map scan.
    pub fn subject_entries(&self) -> usize {
        self.subject_entries
    }

    /// Unroll bound for text arrays skipped inside the `vc` map.
    pub fn max_array_items(&self) -> usize {
        self.max_array_items
    }

    /// Capacity of each extracted credential-subject field in bytes.
    pub fn max_field_len(&self) -> usize {
        self.max_field_len
    }

    /// Output chunk width in bits.
    pub fn chunk_bits(&self) -> usize {
        self.chunk_bits
    }

    /// Capacity of the `givenName ',' familyName ',' dob` buffer in bytes.
    pub fn concat_capacity(&self) -> usize {
        3 * self.max_field_len + 2
    }

    /// Number of SHA-256 blocks compressed for the payload digest.
    pub fn tbs_blocks(&self) -> usize {
        (self.max_tbs_len + 9).div_ceil(64)
    }

    /// Number of SHA-256 blocks compressed for the identity digest.
    pub fn concat_blocks(&self) -> usize {
        (self.concat_capacity() + 9).div_ceil(64)
    }

    /// Number of SHA-512 blocks compressed for the nullifier digest.
    pub fn nullifier_blocks(&self) -> usize {
        (self.concat_capacity() + 17).div_ceil(128)
    }
}
