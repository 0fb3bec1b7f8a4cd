//! The three pass circuit variants.
//!
//! Every variant shares one extraction core: allocate the padded payload,
//! derive the claims-map entry count from the header byte at the fixed
//! anchor, scan for `nbf`/`exp`/`vc`, descend into `credentialSubject`,
//! extract and concatenate the identity fields and hash the payload. The
//! variants differ only in which digest/commitment of the identity they
//! commit to and therefore in their public-input bundles.
//!
//! Public inputs are allocated in bundle order before any witness, so the
//! instance vector of each variant matches the `public_inputs` helpers of
//! the native bundles exactly.

use ark_bn254::Fr;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::{AllocVar, EqGadget, ToBitsGadget};
use ark_r1cs_std::uint8::UInt8;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::adder::bin_add;
use crate::cbor::{decompose_header, keys, scan_map, TargetKey, ValueKind};
use crate::codec::{
    bits_to_chunks_gadget, byte_lookup, fit_bytes, fp_to_bits_checked, le_bits_to_fp,
    position_lanes,
};
use crate::digest::{
    commit_gadget, concat_cred_subj, sha256_var, sha512_var, PedersenParameters, NULLIFIER_BITS,
    PEDERSEN_INPUT_BYTES,
};
use crate::params::PassParams;
use crate::subject::read_credential_subject;

use super::{PedersenIdentity, PubIdentity, Sha512Identity};

/// Wires shared by every circuit variant.
struct CoreWires {
    /// Payload digest bits in stream order.
    tbs_hash_bits: Vec<Boolean<Fr>>,
    /// Identity concatenation bit stream (full capacity).
    concat_bits: Vec<Boolean<Fr>>,
    /// True concatenation length in bytes.
    concat_len: FpVar<Fr>,
    /// Decoded `nbf` timestamp.
    nbf: FpVar<Fr>,
    /// Decoded `exp` timestamp.
    exp: FpVar<Fr>,
}

/// Allocates the payload and runs extraction through both SHA-256 digests.
fn synthesize_core(
    cs: ConstraintSystemRef<Fr>,
    params: &PassParams,
    to_be_signed: Option<&Vec<u8>>,
) -> Result<CoreWires, SynthesisError> {
    let max_len = params.max_tbs_len();
    let padded = match to_be_signed {
        Some(raw) => {
            Some(fit_bytes(raw, max_len).map_err(|_| SynthesisError::Unsatisfiable)?)
        }
        None => None,
    };

    let mut bytes = Vec::with_capacity(max_len);
    for i in 0..max_len {
        bytes.push(UInt8::new_witness(cs.clone(), || {
            padded
                .as_ref()
                .map(|buffer| buffer[i])
                .ok_or(SynthesisError::AssignmentMissing)
        })?);
    }
    let tbs_len = FpVar::new_witness(cs.clone(), || {
        to_be_signed
            .map(|raw| Fr::from(raw.len() as u64))
            .ok_or(SynthesisError::AssignmentMissing)
    })?;

    // Bit and field views of the same buffer.
    let mut tbs_bits = Vec::with_capacity(max_len * 8);
    let mut bytes_fp = Vec::with_capacity(max_len);
    for byte in &bytes {
        let le = byte.to_bits_le()?;
        bytes_fp.push(le_bits_to_fp(&le));
        let mut msb = le;
        msb.reverse();
        tbs_bits.extend(msb);
    }

    // Claims-map header at the fixed anchor.
    let claims_header = decompose_header(&bytes_fp[params.claims_pos() - 1])?;
    claims_header
        .is_map
        .and(&claims_header.arg_lt24)?
        .enforce_equal(&Boolean::constant(true))?;

    let claims = scan_map(
        &bytes_fp,
        &FpVar::constant(Fr::from(params.claims_pos() as u64)),
        &claims_header.arg,
        params.claim_entries(),
        params.max_array_items(),
        &[
            TargetKey {
                pattern: keys::KEY_NBF,
                kind: ValueKind::Uint,
            },
            TargetKey {
                pattern: keys::KEY_EXP,
                kind: ValueKind::Uint,
            },
            TargetKey {
                pattern: keys::KEY_VC,
                kind: ValueKind::Map,
            },
        ],
    )?;
    let nbf = read_timestamp(&bytes_fp, &claims[0].value_pos)?;
    let exp = read_timestamp(&bytes_fp, &claims[1].value_pos)?;

    // Descend into `vc`, then `credentialSubject`.
    let vc_pos = &claims[2].value_pos + FpVar::one();
    let subject_key = scan_map(
        &bytes_fp,
        &vc_pos,
        &claims[2].header_arg,
        params.vc_entries(),
        params.max_array_items(),
        &[TargetKey {
            pattern: keys::KEY_CREDENTIAL_SUBJECT,
            kind: ValueKind::Map,
        }],
    )?;
    subject_key[0]
        .header_arg
        .enforce_equal(&FpVar::constant(Fr::from(3u64)))?;
    let subject_pos = &subject_key[0].value_pos + FpVar::one();
    let subject = read_credential_subject(
        &bytes_fp,
        &subject_pos,
        &subject_key[0].header_arg,
        params.subject_entries(),
        params.max_array_items(),
        params.max_field_len(),
    )?;

    // Identity concatenation and its bit stream.
    let concat = concat_cred_subj(&subject, params.max_field_len())?;
    let mut concat_bits = Vec::with_capacity(concat.bytes.len() * 8);
    for byte in &concat.bytes {
        let mut bits = fp_to_bits_checked(byte, 8)?;
        bits.reverse();
        concat_bits.extend(bits);
    }

    let tbs_hash_bits = sha256_var(&tbs_bits, &tbs_len, max_len)?;

    Ok(CoreWires {
        tbs_hash_bits,
        concat_bits,
        concat_len: concat.len,
        nbf,
        exp,
    })
}

/// Decodes the 4-byte big-endian unsigned timestamp at `pos`, asserting the
/// CBOR header form.
fn read_timestamp(
    bytes_fp: &[FpVar<Fr>],
    pos: &FpVar<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let lanes = position_lanes(pos, bytes_fp.len())?;
    byte_lookup(&lanes, bytes_fp, 0)
        .enforce_equal(&FpVar::constant(Fr::from(0x1au64)))?;
    let mut value = FpVar::zero();
    for offset in 1..=4 {
        value = value * FpVar::constant(Fr::from(256u64)) + byte_lookup(&lanes, bytes_fp, offset);
    }
    Ok(value)
}

/// Allocates the opaque pass-through value: a witness bounded to 248 bits
/// whose bit-for-bit repacking is enforced equal to the public copy.
fn pass_through_data(
    cs: ConstraintSystemRef<Fr>,
    data: Option<Fr>,
    public: &FpVar<Fr>,
) -> Result<(), SynthesisError> {
    let witness =
        FpVar::new_witness(cs, || data.ok_or(SynthesisError::AssignmentMissing))?;
    let bits = fp_to_bits_checked(&witness, 248)?;
    le_bits_to_fp(&bits).enforce_equal(public)?;
    Ok(())
}

/// Packs digest bits and binds them to the allocated public chunks.
fn enforce_chunks(
    bits: &[Boolean<Fr>],
    chunk_bits: usize,
    public: &[FpVar<Fr>],
) -> Result<(), SynthesisError> {
    let chunks = bits_to_chunks_gadget(bits, chunk_bits)?;
    if chunks.len() != public.len() {
        return Err(SynthesisError::Unsatisfiable);
    }
    for (computed, declared) in chunks.iter().zip(public) {
        computed.enforce_equal(declared)?;
    }
    Ok(())
}

fn new_input_fr(
    cs: &ConstraintSystemRef<Fr>,
    value: Option<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    FpVar::new_input(cs.clone(), || value.ok_or(SynthesisError::AssignmentMissing))
}

fn chunk_count(bits: usize, chunk_bits: usize) -> usize {
    bits.div_ceil(chunk_bits)
}

/// Circuit exposing the raw SHA-256 identity digest.
///
/// Public inputs, in order: `credSubjHash` chunks, `toBeSignedHash` chunks,
/// `nbf`, `exp`, pass-through `data`.
#[derive(Clone)]
pub struct CredSubjHashCircuit {
    /// Circuit-shape constants.
    pub params: PassParams,
    /// Raw signed payload bytes.
    pub to_be_signed: Option<Vec<u8>>,
    /// Opaque pass-through value, below `2^248`.
    pub data: Option<Fr>,
    /// Expected public bundle, natively derived by the prover.
    pub expected: Option<PubIdentity>,
}

impl ConstraintSynthesizer<Fr> for CredSubjHashCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let chunk_bits = self.params.chunk_bits();
        let chunks = chunk_count(256, chunk_bits);

        let mut cred_subj_pub = Vec::with_capacity(chunks);
        let mut tbs_pub = Vec::with_capacity(chunks);
        for index in 0..chunks {
            cred_subj_pub.push(new_input_fr(
                &cs,
                self.expected
                    .as_ref()
                    .map(|e| super::hash_chunks(&e.cred_subj_hash, chunk_bits)[index]),
            )?);
        }
        for index in 0..chunks {
            tbs_pub.push(new_input_fr(
                &cs,
                self.expected
                    .as_ref()
                    .map(|e| super::hash_chunks(&e.to_be_signed_hash, chunk_bits)[index]),
            )?);
        }
        let nbf_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.nbf)))?;
        let exp_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.exp)))?;
        let data_pub = new_input_fr(&cs, self.data)?;

        let core = synthesize_core(cs.clone(), &self.params, self.to_be_signed.as_ref())?;
        let cred_subj_bits = sha256_var(
            &core.concat_bits,
            &core.concat_len,
            self.params.concat_capacity(),
        )?;

        enforce_chunks(&cred_subj_bits, chunk_bits, &cred_subj_pub)?;
        enforce_chunks(&core.tbs_hash_bits, chunk_bits, &tbs_pub)?;
        core.nbf.enforce_equal(&nbf_pub)?;
        core.exp.enforce_equal(&exp_pub)?;
        pass_through_data(cs, self.data, &data_pub)?;
        Ok(())
    }
}

/// Circuit exposing the Pedersen nullifier range.
///
/// Public inputs, in order: `nullifier_base`, `nullifier_blinded`,
/// `toBeSignedHash` chunks, `nbf`, `exp`, pass-through `data`.
#[derive(Clone)]
pub struct PedersenNullifierCircuit {
    /// Circuit-shape constants.
    pub params: PassParams,
    /// Deterministic commitment generators.
    pub pedersen: PedersenParameters,
    /// Raw signed payload bytes.
    pub to_be_signed: Option<Vec<u8>>,
    /// Prover-chosen blinding value.
    pub secret_index: Option<Fr>,
    /// Opaque pass-through value, below `2^248`.
    pub data: Option<Fr>,
    /// Expected public bundle, natively derived by the prover.
    pub expected: Option<PedersenIdentity>,
}

impl ConstraintSynthesizer<Fr> for PedersenNullifierCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let chunk_bits = self.params.chunk_bits();
        let chunks = chunk_count(256, chunk_bits);

        let base_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| e.range.base))?;
        let blinded_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| e.range.blinded))?;
        let mut tbs_pub = Vec::with_capacity(chunks);
        for index in 0..chunks {
            tbs_pub.push(new_input_fr(
                &cs,
                self.expected
                    .as_ref()
                    .map(|e| super::hash_chunks(&e.to_be_signed_hash, chunk_bits)[index]),
            )?);
        }
        let nbf_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.nbf)))?;
        let exp_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.exp)))?;
        let data_pub = new_input_fr(&cs, self.data)?;

        let core = synthesize_core(cs.clone(), &self.params, self.to_be_signed.as_ref())?;

        // Fit the identity stream to the 64-byte commitment input.
        let fitted_bits: Vec<Boolean<Fr>> = core
            .concat_bits
            .iter()
            .take(PEDERSEN_INPUT_BYTES * 8)
            .cloned()
            .collect();
        let (base, y) = commit_gadget(&self.pedersen, &fitted_bits)?;

        let secret = FpVar::new_witness(cs.clone(), || {
            self.secret_index.ok_or(SynthesisError::AssignmentMissing)
        })?;
        base.enforce_equal(&base_pub)?;
        (y + secret).enforce_equal(&blinded_pub)?;
        enforce_chunks(&core.tbs_hash_bits, chunk_bits, &tbs_pub)?;
        core.nbf.enforce_equal(&nbf_pub)?;
        core.exp.enforce_equal(&exp_pub)?;
        pass_through_data(cs, self.data, &data_pub)?;
        Ok(())
    }
}

/// Circuit exposing the 496-bit truncated SHA-512 nullifier and its blinded
/// ripple-carry sum.
///
/// Public inputs, in order: nullifier chunks, blinded sum chunks (carry
/// last), `toBeSignedHash` chunks, `nbf`, `exp`, pass-through `data`.
#[derive(Clone)]
pub struct Sha512NullifierCircuit {
    /// Circuit-shape constants.
    pub params: PassParams,
    /// Raw signed payload bytes.
    pub to_be_signed: Option<Vec<u8>>,
    /// Prover-chosen blinding value, below `2^248`.
    pub secret_index: Option<Fr>,
    /// Opaque pass-through value, below `2^248`.
    pub data: Option<Fr>,
    /// Expected public bundle, natively derived by the prover.
    pub expected: Option<Sha512Identity>,
}

impl ConstraintSynthesizer<Fr> for Sha512NullifierCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let chunk_bits = self.params.chunk_bits();
        let hash_chunks = chunk_count(256, chunk_bits);
        let nullifier_chunks = chunk_count(NULLIFIER_BITS, chunk_bits);

        let mut nullifier_pub = Vec::with_capacity(nullifier_chunks);
        for index in 0..nullifier_chunks {
            nullifier_pub.push(new_input_fr(
                &cs,
                self.expected.as_ref().map(|e| e.nullifier[index]),
            )?);
        }
        let mut blinded_pub = Vec::with_capacity(nullifier_chunks + 1);
        for index in 0..nullifier_chunks + 1 {
            blinded_pub.push(new_input_fr(
                &cs,
                self.expected.as_ref().map(|e| e.blinded[index]),
            )?);
        }
        let mut tbs_pub = Vec::with_capacity(hash_chunks);
        for index in 0..hash_chunks {
            tbs_pub.push(new_input_fr(
                &cs,
                self.expected
                    .as_ref()
                    .map(|e| super::hash_chunks(&e.to_be_signed_hash, chunk_bits)[index]),
            )?);
        }
        let nbf_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.nbf)))?;
        let exp_pub = new_input_fr(&cs, self.expected.as_ref().map(|e| Fr::from(e.exp)))?;
        let data_pub = new_input_fr(&cs, self.data)?;

        let core = synthesize_core(cs.clone(), &self.params, self.to_be_signed.as_ref())?;
        let digest = sha512_var(
            &core.concat_bits,
            &core.concat_len,
            self.params.concat_capacity(),
        )?;
        let nullifier_bits = &digest[..NULLIFIER_BITS];

        let secret = FpVar::new_witness(cs.clone(), || {
            self.secret_index.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let mut secret_bits = fp_to_bits_checked(&secret, 248)?;
        secret_bits.resize(NULLIFIER_BITS, Boolean::constant(false));
        let sum = bin_add(nullifier_bits, &secret_bits)?;

        enforce_chunks(nullifier_bits, chunk_bits, &nullifier_pub)?;
        enforce_chunks(&sum.sum, chunk_bits, &blinded_pub[..nullifier_chunks])?;
        FpVar::from(sum.carry).enforce_equal(&blinded_pub[nullifier_chunks])?;
        enforce_chunks(&core.tbs_hash_bits, chunk_bits, &tbs_pub)?;
        core.nbf.enforce_equal(&nbf_pub)?;
        core.exp.enforce_equal(&exp_pub)?;
        pass_through_data(cs, self.data, &data_pub)?;
        Ok(())
    }
}
