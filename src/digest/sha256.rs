//! Variable-length SHA-256 over a fixed-capacity message buffer.
//!
//! The gadget always compresses the worst-case number of blocks for the
//! declared capacity. Merkle–Damgård padding (the 0x80 byte, the zero fill
//! and the 64-bit big-endian bit length) is placed arithmetically from a
//! one-hot decomposition of the declared byte length, and the digest is
//! selected from the state following the final populated block. Bytes of the
//! buffer past the declared length never reach the compression input, so
//! attacker-controlled padding cannot influence the digest.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::{EqGadget, ToBitsGadget};
use ark_r1cs_std::uint32::UInt32;
use ark_relations::r1cs::SynthesisError;

use crate::codec::{eq_lanes, fp_to_bits_checked, ge_flags};

const H0: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
    0x5be0cd19,
];

const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4,
    0xab1c5ed5, 0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe,
    0x9bdc06a7, 0xc19bf174, 0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f,
    0x4a7484aa, 0x5cb0a9dc, 0x76f988da, 0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7,
    0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967, 0x27b70a85, 0x2e1b2138, 0x4d2c6dfc,
    0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85, 0xa2bfe8a1, 0xa81a664b,
    0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070, 0x19a4c116,
    0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7,
    0xc67178f2,
];

/// Logical right shift by `by` bits.
fn shr<F: PrimeField>(x: &UInt32<F>, by: usize) -> Result<UInt32<F>, SynthesisError> {
    let bits = x.to_bits_le();
    let mut shifted: Vec<Boolean<F>> = bits[by..].to_vec();
    shifted.resize(32, Boolean::constant(false));
    Ok(UInt32::from_bits_le(&shifted))
}

fn big_sigma0<F: PrimeField>(x: &UInt32<F>) -> Result<UInt32<F>, SynthesisError> {
    x.rotr(2).xor(&x.rotr(13))?.xor(&x.rotr(22))
}

fn big_sigma1<F: PrimeField>(x: &UInt32<F>) -> Result<UInt32<F>, SynthesisError> {
    x.rotr(6).xor(&x.rotr(11))?.xor(&x.rotr(25))
}

fn small_sigma0<F: PrimeField>(x: &UInt32<F>) -> Result<UInt32<F>, SynthesisError> {
    x.rotr(7).xor(&x.rotr(18))?.xor(&shr(x, 3)?)
}

fn small_sigma1<F: PrimeField>(x: &UInt32<F>) -> Result<UInt32<F>, SynthesisError> {
    x.rotr(17).xor(&x.rotr(19))?.xor(&shr(x, 10)?)
}

/// Bitwise choice: `(e AND f) XOR (NOT e AND g)`.
fn ch<F: PrimeField>(
    e: &UInt32<F>,
    f: &UInt32<F>,
    g: &UInt32<F>,
) -> Result<UInt32<F>, SynthesisError> {
    let eb = e.to_bits_le();
    let fb = f.to_bits_le();
    let gb = g.to_bits_le();
    let mut out = Vec::with_capacity(32);
    for i in 0..32 {
        let picked_f = eb[i].and(&fb[i])?;
        let picked_g = (eb[i].not()).and(&gb[i])?;
        out.push(picked_f.xor(&picked_g)?);
    }
    Ok(UInt32::from_bits_le(&out))
}

/// Bitwise majority: `(a AND b) XOR (a AND c) XOR (b AND c)`.
fn maj<F: PrimeField>(
    a: &UInt32<F>,
    b: &UInt32<F>,
    c: &UInt32<F>,
) -> Result<UInt32<F>, SynthesisError> {
    let ab = a.to_bits_le();
    let bb = b.to_bits_le();
    let cb = c.to_bits_le();
    let mut out = Vec::with_capacity(32);
    for i in 0..32 {
        let ab_i = ab[i].and(&bb[i])?;
        let ac_i = ab[i].and(&cb[i])?;
        let bc_i = bb[i].and(&cb[i])?;
        out.push(ab_i.xor(&ac_i)?.xor(&bc_i)?);
    }
    Ok(UInt32::from_bits_le(&out))
}

/// One compression round sequence over a 512-bit block given as sixteen
/// big-endian words.
fn compress<F: PrimeField>(
    state: &[UInt32<F>],
    words: &[UInt32<F>],
) -> Result<Vec<UInt32<F>>, SynthesisError> {
    let mut w = words.to_vec();
    for t in 16..64 {
        let s0 = small_sigma0(&w[t - 15])?;
        let s1 = small_sigma1(&w[t - 2])?;
        w.push(UInt32::addmany(&[
            w[t - 16].clone(),
            s0,
            w[t - 7].clone(),
            s1,
        ])?);
    }
    let mut a = state[0].clone();
    let mut b = state[1].clone();
    let mut c = state[2].clone();
    let mut d = state[3].clone();
    let mut e = state[4].clone();
    let mut f = state[5].clone();
    let mut g = state[6].clone();
    let mut h = state[7].clone();
    for t in 0..64 {
        let t1 = UInt32::addmany(&[
            h.clone(),
            big_sigma1(&e)?,
            ch(&e, &f, &g)?,
            UInt32::constant(K[t]),
            w[t].clone(),
        ])?;
        let t2 = UInt32::addmany(&[big_sigma0(&a)?, maj(&a, &b, &c)?])?;
        h = g;
        g = f;
        f = e;
        e = UInt32::addmany(&[d, t1.clone()])?;
        d = c;
        c = b;
        b = a;
        a = UInt32::addmany(&[t1, t2])?;
    }
    Ok(vec![
        UInt32::addmany(&[state[0].clone(), a])?,
        UInt32::addmany(&[state[1].clone(), b])?,
        UInt32::addmany(&[state[2].clone(), c])?,
        UInt32::addmany(&[state[3].clone(), d])?,
        UInt32::addmany(&[state[4].clone(), e])?,
        UInt32::addmany(&[state[5].clone(), f])?,
        UInt32::addmany(&[state[6].clone(), g])?,
        UInt32::addmany(&[state[7].clone(), h])?,
    ])
}

/// Digest of the declared-length prefix of a fixed-capacity message.
///
/// `message_bits` is the capacity buffer's bit stream (eight bits per byte,
/// most-significant first, `8 * max_len` entries) and `len` the declared
/// byte length. Returns the 256 digest bits in the same stream convention.
pub fn sha256_var<F: PrimeField>(
    message_bits: &[Boolean<F>],
    len: &FpVar<F>,
    max_len: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    if message_bits.len() != 8 * max_len {
        return Err(SynthesisError::Unsatisfiable);
    }
    let blocks = (max_len + 9).div_ceil(64);

    // One-hot of the declared length; the lane sum doubles as the
    // capacity bound.
    let (len_lanes, lane_sum) = eq_lanes(len, max_len + 1)?;
    lane_sum.enforce_equal(&FpVar::one())?;
    let ge = ge_flags(&len_lanes)?;
    let ge_at = |v: usize| {
        if v < ge.len() {
            ge[v].clone()
        } else {
            Boolean::constant(false)
        }
    };

    // Selector for the block holding the length field:
    // `len + 8` in `[64b, 64b + 64)`.
    let mut last_block = Vec::with_capacity(blocks);
    for b in 0..blocks {
        let lower = if b == 0 {
            Boolean::constant(true)
        } else {
            ge_at(64 * b - 8)
        };
        let upper = ge_at(64 * b + 56).not();
        last_block.push(lower.and(&upper)?);
    }

    // Big-endian 64-bit message bit length; only the low bits can be set for
    // capacities within the 16-bit range.
    let len_bits = fp_to_bits_checked(len, 16)?;
    let length_bit = |index: usize| {
        if index >= 3 && index - 3 < 16 {
            len_bits[index - 3].clone()
        } else {
            Boolean::constant(false)
        }
    };

    // Assemble the padded stream.
    let mut padded = Vec::with_capacity(blocks * 512);
    for i in 0..blocks * 64 {
        let in_range = ge_at(i + 1);
        let is_pad_byte = if i < len_lanes.len() {
            len_lanes[i].clone()
        } else {
            Boolean::constant(false)
        };
        let in_length_field = i % 64 >= 56;
        let block = i / 64;
        for j in 0..8 {
            let mut bit = if i < max_len {
                in_range.and(&message_bits[i * 8 + j])?
            } else {
                Boolean::constant(false)
            };
            if j == 0 {
                bit = bit.or(&is_pad_byte)?;
            }
            if in_length_field {
                let be_byte = i % 64 - 56;
                let source = length_bit((7 - be_byte) * 8 + (7 - j));
                bit = bit.or(&last_block[block].and(&source)?)?;
            }
            padded.push(bit);
        }
    }

    // Compress every block; mux the digest from the final populated one.
    let mut state: Vec<UInt32<F>> = H0.iter().map(|word| UInt32::constant(*word)).collect();
    let mut digest = vec![Boolean::<F>::constant(false); 256];
    for b in 0..blocks {
        let mut words = Vec::with_capacity(16);
        for t in 0..16 {
            let mut le: Vec<Boolean<F>> = padded[b * 512 + t * 32..b * 512 + (t + 1) * 32].to_vec();
            le.reverse();
            words.push(UInt32::from_bits_le(&le));
        }
        state = compress(&state, &words)?;
        let mut stream = Vec::with_capacity(256);
        for word in &state {
            let mut bits = word.to_bits_le();
            bits.reverse();
            stream.extend(bits);
        }
        for (slot, bit) in digest.iter_mut().zip(stream) {
            *slot = slot.or(&last_block[b].and(&bit)?)?;
        }
    }
    Ok(digest)
}
