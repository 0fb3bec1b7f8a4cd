//! Witness-side evaluation and the top-level pass circuits.
//!
//! [`PassFacts`] walks a raw `ToBeSigned` payload natively and produces every
//! value the circuits expose publicly: the identity concatenation, both
//! SHA-256 digests, the timestamps and the nullifier material. The prover
//! uses it to fill public inputs; tests use it as the in-crate oracle against
//! the external reference verifier's values.
//!
//! Three circuit variants share the same extraction core and differ only in
//! the committed output bundle:
//!
//! * [`CredSubjHashCircuit`] — raw SHA-256 identity digest;
//! * [`PedersenNullifierCircuit`] — Baby-Jubjub commitment coordinates, the
//!   second blinded by `secret_index`;
//! * [`Sha512NullifierCircuit`] — 496-bit truncated SHA-512 nullifier and
//!   its blinded ripple-carry sum.
//!
//! Each variant's public-input order is a compatibility contract with the
//! on-chain verifier and must not be rearranged.

mod circuits;

pub use circuits::{CredSubjHashCircuit, PedersenNullifierCircuit, Sha512NullifierCircuit};

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use sha2::{Digest, Sha256, Sha512};

use crate::adder::bin_add_native;
use crate::cbor::{self, keys, MajorType, PassParseError};
use crate::codec::{bits_to_chunks, bytes_to_bits};
use crate::digest::{commit_native, PedersenParameters, NULLIFIER_BITS, PEDERSEN_INPUT_BYTES};
use crate::params::PassParams;
use crate::subject::read_text_native;

/// Working prime field of every circuit variant.
pub type CircuitField = Fr;

/// Everything the native walk recovers from a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassFacts {
    /// Extracted `givenName` bytes.
    pub given_name: Vec<u8>,
    /// Extracted `familyName` bytes.
    pub family_name: Vec<u8>,
    /// Extracted `dob` bytes.
    pub dob: Vec<u8>,
    /// `givenName ',' familyName ',' dob`.
    pub cred_subj_concat: Vec<u8>,
    /// SHA-256 over the concatenation.
    pub cred_subj_hash: [u8; 32],
    /// SHA-256 over the raw payload.
    pub to_be_signed_hash: [u8; 32],
    /// Not-before timestamp.
    pub nbf: u64,
    /// Expiry timestamp.
    pub exp: u64,
}

impl PassFacts {
    /// Walks a raw payload and derives every public value.
    pub fn derive(params: &PassParams, to_be_signed: &[u8]) -> Result<Self, PassParseError> {
        if to_be_signed.len() > params.max_tbs_len() {
            return Err(PassParseError::LengthOutOfRange { at: 0 });
        }
        let claims_pos = params.claims_pos();
        let claims = cbor::read_header(to_be_signed, claims_pos - 1)?;
        if claims.major != MajorType::Map {
            return Err(PassParseError::ValueTypeMismatch { at: claims_pos - 1 });
        }
        let offsets = cbor::scan_map_native(
            to_be_signed,
            claims_pos,
            claims.arg as usize,
            &[keys::KEY_NBF, keys::KEY_EXP, keys::KEY_VC],
        )?;
        let nbf = read_timestamp(to_be_signed, offsets[0])?;
        let exp = read_timestamp(to_be_signed, offsets[1])?;

        let vc = cbor::read_header(to_be_signed, offsets[2])?;
        if vc.major != MajorType::Map {
            return Err(PassParseError::ValueTypeMismatch { at: offsets[2] });
        }
        let subject_pos = cbor::scan_map_native(
            to_be_signed,
            offsets[2] + 1,
            vc.arg as usize,
            &[keys::KEY_CREDENTIAL_SUBJECT],
        )?[0];
        let subject = cbor::read_header(to_be_signed, subject_pos)?;
        if subject.major != MajorType::Map || subject.arg != 3 {
            return Err(PassParseError::ValueTypeMismatch { at: subject_pos });
        }
        let fields = cbor::scan_map_native(
            to_be_signed,
            subject_pos + 1,
            subject.arg as usize,
            &[keys::KEY_GIVEN_NAME, keys::KEY_FAMILY_NAME, keys::KEY_DOB],
        )?;
        let given_name = read_text_native(to_be_signed, fields[0], params.max_field_len())?;
        let family_name = read_text_native(to_be_signed, fields[1], params.max_field_len())?;
        let dob = read_text_native(to_be_signed, fields[2], params.max_field_len())?;

        let mut cred_subj_concat =
            Vec::with_capacity(given_name.len() + family_name.len() + dob.len() + 2);
        cred_subj_concat.extend_from_slice(&given_name);
        cred_subj_concat.push(b',');
        cred_subj_concat.extend_from_slice(&family_name);
        cred_subj_concat.push(b',');
        cred_subj_concat.extend_from_slice(&dob);

        Ok(Self {
            cred_subj_hash: Sha256::digest(&cred_subj_concat).into(),
            to_be_signed_hash: Sha256::digest(to_be_signed).into(),
            given_name,
            family_name,
            dob,
            cred_subj_concat,
            nbf,
            exp,
        })
    }

    /// The identity buffer fitted to the Pedersen input width: truncated or
    /// zero-padded to exactly 64 bytes.
    pub fn fitted_identity(&self) -> [u8; PEDERSEN_INPUT_BYTES] {
        let mut fitted = [0u8; PEDERSEN_INPUT_BYTES];
        let copied = self.cred_subj_concat.len().min(PEDERSEN_INPUT_BYTES);
        fitted[..copied].copy_from_slice(&self.cred_subj_concat[..copied]);
        fitted
    }
}

fn read_timestamp(bytes: &[u8], at: usize) -> Result<u64, PassParseError> {
    let header = cbor::read_header(bytes, at)?;
    // Claim timestamps are 4-byte unsigned arguments until 2106.
    if header.major != MajorType::Uint || header.size != 5 {
        return Err(PassParseError::ValueTypeMismatch { at });
    }
    Ok(header.arg)
}

/// Public bundle of the SHA-256 identity-hash mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubIdentity {
    /// SHA-256 over the identity concatenation.
    pub cred_subj_hash: [u8; 32],
    /// SHA-256 over the raw payload.
    pub to_be_signed_hash: [u8; 32],
    /// Not-before timestamp.
    pub nbf: u64,
    /// Expiry timestamp.
    pub exp: u64,
}

impl PubIdentity {
    /// Derives the bundle from a raw payload.
    pub fn derive(params: &PassParams, to_be_signed: &[u8]) -> Result<Self, PassParseError> {
        Ok(Self::from_facts(&PassFacts::derive(params, to_be_signed)?))
    }

    /// Projects the bundle out of already-derived facts.
    pub fn from_facts(facts: &PassFacts) -> Self {
        Self {
            cred_subj_hash: facts.cred_subj_hash,
            to_be_signed_hash: facts.to_be_signed_hash,
            nbf: facts.nbf,
            exp: facts.exp,
        }
    }

    /// The verifier-side public-input vector in circuit order, with the
    /// opaque pass-through value appended.
    pub fn public_inputs(&self, chunk_bits: usize, data: Fr) -> Vec<Fr> {
        let mut inputs = hash_chunks(&self.cred_subj_hash, chunk_bits);
        inputs.extend(hash_chunks(&self.to_be_signed_hash, chunk_bits));
        inputs.push(Fr::from(self.nbf));
        inputs.push(Fr::from(self.exp));
        inputs.push(data);
        inputs
    }
}

/// A nullifier pair: the unblinded commitment component and the component
/// offset by the prover's `secret_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullifierRange {
    /// Unblinded coordinate; stable across proofs for one identity.
    pub base: Fr,
    /// Blinded coordinate; varies with `secret_index`.
    pub blinded: Fr,
}

/// Public bundle of the Pedersen-commitment mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PedersenIdentity {
    /// Commitment coordinates, second blinded by `secret_index`.
    pub range: NullifierRange,
    /// SHA-256 over the raw payload.
    pub to_be_signed_hash: [u8; 32],
    /// Not-before timestamp.
    pub nbf: u64,
    /// Expiry timestamp.
    pub exp: u64,
}

impl PedersenIdentity {
    /// Derives the bundle from a raw payload and blinding value.
    pub fn derive(
        params: &PassParams,
        pedersen: &PedersenParameters,
        to_be_signed: &[u8],
        secret_index: Fr,
    ) -> Result<Self, PassParseError> {
        let facts = PassFacts::derive(params, to_be_signed)?;
        let (base, y) = commit_native(pedersen, &facts.fitted_identity());
        Ok(Self {
            range: NullifierRange {
                base,
                blinded: y + secret_index,
            },
            to_be_signed_hash: facts.to_be_signed_hash,
            nbf: facts.nbf,
            exp: facts.exp,
        })
    }

    /// The verifier-side public-input vector in circuit order.
    pub fn public_inputs(&self, chunk_bits: usize, data: Fr) -> Vec<Fr> {
        let mut inputs = vec![self.range.base, self.range.blinded];
        inputs.extend(hash_chunks(&self.to_be_signed_hash, chunk_bits));
        inputs.push(Fr::from(self.nbf));
        inputs.push(Fr::from(self.exp));
        inputs.push(data);
        inputs
    }
}

/// Public bundle of the SHA-512 truncation mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha512Identity {
    /// 496-bit truncated digest packed into chunks.
    pub nullifier: Vec<Fr>,
    /// `nullifier + secret_index` as 496 sum bits plus the carry chunk.
    pub blinded: Vec<Fr>,
    /// SHA-256 over the raw payload.
    pub to_be_signed_hash: [u8; 32],
    /// Not-before timestamp.
    pub nbf: u64,
    /// Expiry timestamp.
    pub exp: u64,
}

impl Sha512Identity {
    /// Derives the bundle from a raw payload and blinding value.
    ///
    /// `secret_index` must be sampled below `2^248` (31 random bytes); the
    /// circuit range-checks the same bound.
    pub fn derive(
        params: &PassParams,
        to_be_signed: &[u8],
        secret_index: Fr,
    ) -> Result<Self, PassParseError> {
        let facts = PassFacts::derive(params, to_be_signed)?;
        let digest = Sha512::digest(&facts.cred_subj_concat);
        let digest_bits = bytes_to_bits(&digest);
        let nullifier_bits = &digest_bits[..NULLIFIER_BITS];

        let mut secret_bits = secret_index.into_bigint().to_bits_le();
        secret_bits.resize(NULLIFIER_BITS, false);
        let (sum, carry) = bin_add_native(nullifier_bits, &secret_bits);

        let chunk_bits = params.chunk_bits();
        // The packing laws below cannot fail: widths are validated by the
        // params builder and no chunk carries bits past the stream end.
        let nullifier = bits_to_chunks(nullifier_bits, chunk_bits)
            .map_err(|_| PassParseError::LengthOutOfRange { at: 0 })?;
        let mut blinded = bits_to_chunks(&sum, chunk_bits)
            .map_err(|_| PassParseError::LengthOutOfRange { at: 0 })?;
        blinded.push(Fr::from(u64::from(carry)));
        Ok(Self {
            nullifier,
            blinded,
            to_be_signed_hash: facts.to_be_signed_hash,
            nbf: facts.nbf,
            exp: facts.exp,
        })
    }

    /// The verifier-side public-input vector in circuit order.
    pub fn public_inputs(&self, chunk_bits: usize, data: Fr) -> Vec<Fr> {
        let mut inputs = self.nullifier.clone();
        inputs.extend(self.blinded.iter().copied());
        inputs.extend(hash_chunks(&self.to_be_signed_hash, chunk_bits));
        inputs.push(Fr::from(self.nbf));
        inputs.push(Fr::from(self.exp));
        inputs.push(data);
        inputs
    }
}

/// Packs a digest into public-input chunks.
///
/// `chunk_bits` must be a builder-validated width; invalid widths yield an
/// empty vector.
pub fn hash_chunks(digest: &[u8], chunk_bits: usize) -> Vec<Fr> {
    bits_to_chunks(&bytes_to_bits(digest), chunk_bits).unwrap_or_default()
}
