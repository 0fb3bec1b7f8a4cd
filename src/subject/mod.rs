//! Credential-subject field extraction.
//!
//! Locates `givenName`, `familyName` and `dob` inside the
//! `credentialSubject` map and copies each value into a fixed-capacity,
//! zero-padded buffer together with its true length. The copy is driven by a
//! one-hot decomposition of the declared length, so a length above the
//! buffer capacity leaves no satisfying witness.
//!
//! Text headers may use the short form or the 1-byte length extension; live
//! passes carry names longer than 23 bytes.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::EqGadget;
use ark_relations::r1cs::SynthesisError;

use crate::cbor::{
    self, decompose_header, keys, scan_map, MajorType, PassParseError, TargetKey, ValueKind,
};
use crate::codec::{byte_lookup, eq_lanes, ge_flags, position_lanes};

/// One extracted field: fixed-capacity bytes, true length and the length's
/// one-hot lanes (reused by the concatenation stage).
#[derive(Clone)]
pub struct SubjectField<F: PrimeField> {
    /// Zero-padded field bytes, `capacity` entries.
    pub bytes: Vec<FpVar<F>>,
    /// Declared byte length of the field.
    pub len: FpVar<F>,
    /// One-hot lanes of `len` over `0..=capacity`.
    pub len_lanes: Vec<Boolean<F>>,
}

/// The three extracted credential-subject fields.
#[derive(Clone)]
pub struct CredentialSubject<F: PrimeField> {
    pub given_name: SubjectField<F>,
    pub family_name: SubjectField<F>,
    pub dob: SubjectField<F>,
}

/// Scans the credential-subject map starting at `pos` (first key offset) and
/// extracts the three fields into buffers of `capacity` bytes each.
pub fn read_credential_subject<F: PrimeField>(
    bytes: &[FpVar<F>],
    pos: &FpVar<F>,
    map_len: &FpVar<F>,
    max_entries: usize,
    max_array_items: usize,
    capacity: usize,
) -> Result<CredentialSubject<F>, SynthesisError> {
    let targets = [
        TargetKey {
            pattern: keys::KEY_GIVEN_NAME,
            kind: ValueKind::Text,
        },
        TargetKey {
            pattern: keys::KEY_FAMILY_NAME,
            kind: ValueKind::Text,
        },
        TargetKey {
            pattern: keys::KEY_DOB,
            kind: ValueKind::Text,
        },
    ];
    let located = scan_map(bytes, pos, map_len, max_entries, max_array_items, &targets)?;
    let given_name = read_text_field(bytes, &located[0].value_pos, capacity)?;
    let family_name = read_text_field(bytes, &located[1].value_pos, capacity)?;
    let dob = read_text_field(bytes, &located[2].value_pos, capacity)?;
    Ok(CredentialSubject {
        given_name,
        family_name,
        dob,
    })
}

/// Copies the text string whose header sits at `value_pos` into a
/// `capacity`-byte zero-padded buffer.
pub fn read_text_field<F: PrimeField>(
    bytes: &[FpVar<F>],
    value_pos: &FpVar<F>,
    capacity: usize,
) -> Result<SubjectField<F>, SynthesisError> {
    let header_lanes = position_lanes(value_pos, bytes.len())?;
    let header = decompose_header(&byte_lookup(&header_lanes, bytes, 0))?;
    let short = header.is_text.and(&header.arg_lt24)?;
    let long = header.is_text.and(&header.arg_is24)?;
    short
        .or(&long)?
        .enforce_equal(&Boolean::constant(true))?;
    let ext = byte_lookup(&header_lanes, bytes, 1);
    let len = FpVar::from(short) * &header.arg + FpVar::from(long.clone()) * &ext;
    let content_pos = value_pos + FpVar::one() + FpVar::from(long);
    let content_lanes = position_lanes(&content_pos, bytes.len())?;

    // Binding the length to its one-hot lanes is also the capacity check.
    let (len_lanes, lane_sum) = eq_lanes(&len, capacity + 1)?;
    lane_sum.enforce_equal(&FpVar::one())?;
    let len_ge = ge_flags(&len_lanes)?;

    let mut copied = Vec::with_capacity(capacity);
    for i in 0..capacity {
        let in_range = FpVar::from(len_ge[i + 1].clone());
        copied.push(in_range * byte_lookup(&content_lanes, bytes, i));
    }
    Ok(SubjectField {
        bytes: copied,
        len,
        len_lanes,
    })
}

/// Native mirror: reads the text string whose header sits at `at`, enforcing
/// the same capacity bound as the gadget.
pub fn read_text_native(
    bytes: &[u8],
    at: usize,
    capacity: usize,
) -> Result<Vec<u8>, PassParseError> {
    let header = cbor::read_header(bytes, at)?;
    if header.major != MajorType::Text {
        return Err(PassParseError::ValueTypeMismatch { at });
    }
    let len = header.arg as usize;
    if len > capacity {
        return Err(PassParseError::LengthOutOfRange { at });
    }
    let start = at + header.size;
    bytes
        .get(start..start + len)
        .map(<[u8]>::to_vec)
        .ok_or(PassParseError::UnexpectedEnd { at: start + len })
}
