//! Identity-string concatenation.
//!
//! Builds `givenName ',' familyName ',' dob` inside a fixed-capacity buffer.
//! The separators and the moving fields land at dynamic offsets, so every
//! byte of the output is a sum of position-selected contributions: the
//! given name writes at offset zero, the first comma at `g`, the family name
//! at `g + 1`, the second comma at `g + 1 + f` and the date of birth at
//! `g + f + 2`. Contributions are disjoint by construction, so plain
//! addition assembles the buffer.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_relations::r1cs::SynthesisError;

use crate::codec::position_lanes;
use crate::subject::CredentialSubject;

/// ASCII comma separating the identity fields.
const SEPARATOR: u8 = b',';

/// Concatenated identity string with its true length.
#[derive(Clone)]
pub struct ConcatOutput<F: PrimeField> {
    /// Zero-padded buffer of `3 * capacity + 2` bytes.
    pub bytes: Vec<FpVar<F>>,
    /// True combined length `g + f + d + 2`.
    pub len: FpVar<F>,
}

/// Concatenates the three extracted fields, each of capacity `capacity`.
pub fn concat_cred_subj<F: PrimeField>(
    subject: &CredentialSubject<F>,
    capacity: usize,
) -> Result<ConcatOutput<F>, SynthesisError> {
    let out_capacity = 3 * capacity + 2;
    let separator = FpVar::constant(F::from(u64::from(SEPARATOR)));

    let family_base = &subject.given_name.len + FpVar::one();
    let dob_base = &family_base + &subject.family_name.len + FpVar::one();
    let family_lanes = position_lanes(&family_base, out_capacity)?;
    let dob_lanes = position_lanes(&dob_base, out_capacity)?;

    let lane_fp = |lane: Option<&Boolean<F>>| match lane {
        Some(lane) => FpVar::from(lane.clone()),
        None => FpVar::zero(),
    };

    let mut bytes = Vec::with_capacity(out_capacity);
    for t in 0..out_capacity {
        let mut acc = FpVar::zero();
        // Given name occupies the prefix; its bytes are already masked to
        // the declared length.
        if t < capacity {
            acc += subject.given_name.bytes[t].clone();
        }
        // First comma at offset `g`.
        acc += lane_fp(subject.given_name.len_lanes.get(t)) * &separator;
        // Family name at `g + 1`.
        for (i, byte) in subject.family_name.bytes.iter().enumerate() {
            if i <= t {
                acc += lane_fp(family_lanes.get(t - i)) * byte;
            }
        }
        // Second comma at `dob_base - 1`.
        acc += lane_fp(dob_lanes.get(t + 1)) * &separator;
        // Date of birth at `g + f + 2`.
        for (i, byte) in subject.dob.bytes.iter().enumerate() {
            if i <= t {
                acc += lane_fp(dob_lanes.get(t - i)) * byte;
            }
        }
        bytes.push(acc);
    }

    let len = &subject.given_name.len
        + &subject.family_name.len
        + &subject.dob.len
        + FpVar::constant(F::from(2u64));
    Ok(ConcatOutput { bytes, len })
}
