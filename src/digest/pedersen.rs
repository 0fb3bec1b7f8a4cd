//! Pedersen commitment over Baby Jubjub.
//!
//! The identity nullifier commits to the 64-byte fitted identity buffer with
//! a fixed-base Pedersen construction: the 512-bit input splits into eight
//! 64-bit little-endian windows, each multiplying its own generator, and the
//! window sums accumulate to a single curve point whose affine coordinates
//! form the commitment. Generators derive from a fixed protocol seed so
//! prover and verifier agree without a setup ceremony.

use ark_ec::CurveGroup;
use ark_ed_on_bn254::constraints::EdwardsVar;
use ark_ed_on_bn254::{EdwardsProjective, Fq, Fr as EdScalar};
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::groups::CurveVar;
use ark_relations::r1cs::SynthesisError;
use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use ark_std::{UniformRand, Zero};

use crate::codec::bytes_to_bits;

/// Fitted identity buffer length committed by the nullifier.
pub const PEDERSEN_INPUT_BYTES: usize = 64;

/// Number of generator windows.
pub const PEDERSEN_WINDOWS: usize = 8;

/// Bits absorbed per window.
pub const PEDERSEN_WINDOW_BITS: usize = 64;

/// Protocol seed for generator derivation.
const PEDERSEN_SEED: [u8; 32] = *b"nzcp-snark.pedersen.generators.1";

/// Deterministically derived Pedersen generators.
#[derive(Debug, Clone)]
pub struct PedersenParameters {
    /// One generator per 64-bit input window.
    pub generators: Vec<EdwardsProjective>,
}

impl PedersenParameters {
    /// Derives the protocol generators from the fixed seed.
    pub fn setup() -> Self {
        let mut rng = StdRng::from_seed(PEDERSEN_SEED);
        let generators = (0..PEDERSEN_WINDOWS)
            .map(|_| EdwardsProjective::rand(&mut rng))
            .collect();
        Self { generators }
    }
}

/// Native commitment over the fitted identity buffer.
pub fn commit_native(params: &PedersenParameters, input: &[u8]) -> (Fq, Fq) {
    debug_assert_eq!(input.len(), PEDERSEN_INPUT_BYTES);
    let bits = bytes_to_bits(input);
    let mut acc = EdwardsProjective::zero();
    for (window, generator) in params.generators.iter().enumerate() {
        let mut scalar = 0u64;
        for (i, bit) in bits[window * PEDERSEN_WINDOW_BITS..(window + 1) * PEDERSEN_WINDOW_BITS]
            .iter()
            .enumerate()
        {
            if *bit {
                scalar |= 1u64 << i;
            }
        }
        acc += *generator * EdScalar::from(scalar);
    }
    let affine = acc.into_affine();
    (affine.x, affine.y)
}

/// In-circuit commitment over the fitted identity bit stream (512 bits,
/// stream order). Returns the affine coordinates of the commitment point.
pub fn commit_gadget(
    params: &PedersenParameters,
    bits: &[Boolean<Fq>],
) -> Result<(FpVar<Fq>, FpVar<Fq>), SynthesisError> {
    if bits.len() != PEDERSEN_INPUT_BYTES * 8 {
        return Err(SynthesisError::Unsatisfiable);
    }
    let mut acc = EdwardsVar::zero();
    for (window, generator) in params.generators.iter().enumerate() {
        let base = EdwardsVar::constant(*generator);
        let slice = &bits[window * PEDERSEN_WINDOW_BITS..(window + 1) * PEDERSEN_WINDOW_BITS];
        acc += base.scalar_mul_le(slice.iter())?;
    }
    Ok((acc.x, acc.y))
}
