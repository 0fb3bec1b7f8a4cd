use ark_ff::{BigInteger, Field, PrimeField};
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::{AllocVar, EqGadget, ToBitsGadget};
use ark_r1cs_std::uint8::UInt8;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::SynthesisError;

use super::native::MAX_CHUNK_BITS;

/// Expands one byte variable into its eight bits, most-significant first.
pub fn byte_to_bits_msb<F: PrimeField>(
    byte: &UInt8<F>,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let mut bits = byte.to_bits_le()?;
    bits.reverse();
    Ok(bits)
}

/// Expands a byte buffer into its bit stream, most-significant bit first
/// within each byte, matching [`super::bytes_to_bits`].
pub fn bytes_to_bits_msb<F: PrimeField>(
    bytes: &[UInt8<F>],
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        bits.extend(byte_to_bits_msb(byte)?);
    }
    Ok(bits)
}

/// Folds little-endian bits into a single field variable.
///
/// The caller guarantees `bits.len() <= MAX_CHUNK_BITS`, so the sum can never
/// wrap the modulus.
pub fn le_bits_to_fp<F: PrimeField>(bits: &[Boolean<F>]) -> FpVar<F> {
    let mut acc = FpVar::zero();
    let mut coeff = F::one();
    for bit in bits {
        acc += FpVar::from(bit.clone()) * FpVar::constant(coeff);
        coeff.double_in_place();
    }
    acc
}

/// Packs a Boolean bit stream into field chunks, mirroring
/// [`super::bits_to_chunks`].
pub fn bits_to_chunks_gadget<F: PrimeField>(
    bits: &[Boolean<F>],
    chunk_bits: usize,
) -> Result<Vec<FpVar<F>>, SynthesisError> {
    if chunk_bits == 0 || chunk_bits > MAX_CHUNK_BITS {
        return Err(SynthesisError::Unsatisfiable);
    }
    Ok(bits.chunks(chunk_bits).map(le_bits_to_fp).collect())
}

/// Decomposes a field variable into exactly `width` little-endian bits.
///
/// The bits are allocated as fresh witnesses and bound to the input by a
/// single repacking constraint; with `width <= MAX_CHUNK_BITS` the
/// decomposition is unique, so the input is simultaneously range-checked to
/// `width` bits.
pub fn fp_to_bits_checked<F: PrimeField>(
    fp: &FpVar<F>,
    width: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    if width > MAX_CHUNK_BITS {
        return Err(SynthesisError::Unsatisfiable);
    }
    let cs = fp.cs();
    let mut bits = Vec::with_capacity(width);
    for position in 0..width {
        bits.push(Boolean::new_witness(cs.clone(), || {
            fp.value().map(|value| value.into_bigint().get_bit(position))
        })?);
    }
    le_bits_to_fp(&bits).enforce_equal(fp)?;
    Ok(bits)
}

/// Applies the EVM byte/bit rearrangement to a byte-aligned Boolean stream,
/// mirroring [`super::evm_rearrange_bits`].
pub fn evm_rearrange_gadget<F: PrimeField>(
    bits: &[Boolean<F>],
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    if bits.len() % 8 != 0 {
        return Err(SynthesisError::Unsatisfiable);
    }
    let octets = bits.len() / 8;
    let mut rearranged = Vec::with_capacity(bits.len());
    for i in 0..octets {
        for j in 0..8 {
            rearranged.push(bits[8 * (octets - 1 - i) + (7 - j)].clone());
        }
    }
    Ok(rearranged)
}

/// Equality lanes `lanes[v] = (index == v)` for `v` in `0..len`, together
/// with their sum. The sum is *not* constrained; callers enforce it equal to
/// one where the index is required to be in range.
pub fn eq_lanes<F: PrimeField>(
    index: &FpVar<F>,
    len: usize,
) -> Result<(Vec<Boolean<F>>, FpVar<F>), SynthesisError> {
    let mut lanes = Vec::with_capacity(len);
    let mut sum = FpVar::zero();
    for v in 0..len {
        let lane = index.is_eq(&FpVar::constant(F::from(v as u64)))?;
        sum += FpVar::from(lane.clone());
        lanes.push(lane);
    }
    Ok((lanes, sum))
}

/// Equality lanes with the in-range requirement enforced unconditionally:
/// exactly one lane fires, so `index` is bound to `0..len`.
pub fn position_lanes<F: PrimeField>(
    index: &FpVar<F>,
    len: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let (lanes, sum) = eq_lanes(index, len)?;
    sum.enforce_equal(&FpVar::one())?;
    Ok(lanes)
}

/// Threshold flags derived from equality lanes: `ge[v] = (value >= v)` for
/// `v` in `0..=lanes.len()`, assuming the lanes one-hot encode `value` over
/// `0..lanes.len()`. `ge[0]` is constant true and `ge[lanes.len()]` is
/// constant false, the encodable maximum being `lanes.len() - 1`.
pub fn ge_flags<F: PrimeField>(lanes: &[Boolean<F>]) -> Result<Vec<Boolean<F>>, SynthesisError> {
    let n = lanes.len();
    let mut ge = vec![Boolean::constant(false); n + 1];
    for v in (1..n).rev() {
        ge[v] = ge[v + 1].or(&lanes[v])?;
    }
    ge[0] = Boolean::constant(true);
    Ok(ge)
}

/// Reads the byte at dynamic offset `base + shift` where `lanes` one-hot
/// encode `base`. Offsets past the end of the buffer contribute the zero
/// padding byte.
pub fn byte_lookup<F: PrimeField>(
    lanes: &[Boolean<F>],
    bytes: &[FpVar<F>],
    shift: usize,
) -> FpVar<F> {
    let mut acc = FpVar::zero();
    for (i, lane) in lanes.iter().enumerate() {
        if i + shift < bytes.len() {
            acc += FpVar::from(lane.clone()) * &bytes[i + shift];
        }
    }
    acc
}
