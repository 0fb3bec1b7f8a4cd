//! Variable-length SHA-512 over a fixed-capacity message buffer.
//!
//! Same discipline as the SHA-256 gadget with the wider geometry: 1024-bit
//! blocks, 64-bit words, 80 rounds and a 128-bit length field. The nullifier
//! stage truncates the 512-bit digest to its first 496 bits (62 bytes) so
//! the value packs into two output chunks.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::{EqGadget, ToBitsGadget};
use ark_r1cs_std::uint64::UInt64;
use ark_relations::r1cs::SynthesisError;

use crate::codec::{eq_lanes, fp_to_bits_checked, ge_flags};

/// Width of the truncated nullifier digest in bits.
pub const NULLIFIER_BITS: usize = 496;

const H0: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

const K: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

fn shr<F: PrimeField>(x: &UInt64<F>, by: usize) -> Result<UInt64<F>, SynthesisError> {
    let bits = x.to_bits_le();
    let mut shifted: Vec<Boolean<F>> = bits[by..].to_vec();
    shifted.resize(64, Boolean::constant(false));
    Ok(UInt64::from_bits_le(&shifted))
}

fn big_sigma0<F: PrimeField>(x: &UInt64<F>) -> Result<UInt64<F>, SynthesisError> {
    x.rotr(28).xor(&x.rotr(34))?.xor(&x.rotr(39))
}

fn big_sigma1<F: PrimeField>(x: &UInt64<F>) -> Result<UInt64<F>, SynthesisError> {
    x.rotr(14).xor(&x.rotr(18))?.xor(&x.rotr(41))
}

fn small_sigma0<F: PrimeField>(x: &UInt64<F>) -> Result<UInt64<F>, SynthesisError> {
    x.rotr(1).xor(&x.rotr(8))?.xor(&shr(x, 7)?)
}

fn small_sigma1<F: PrimeField>(x: &UInt64<F>) -> Result<UInt64<F>, SynthesisError> {
    x.rotr(19).xor(&x.rotr(61))?.xor(&shr(x, 6)?)
}

fn ch<F: PrimeField>(
    e: &UInt64<F>,
    f: &UInt64<F>,
    g: &UInt64<F>,
) -> Result<UInt64<F>, SynthesisError> {
    let eb = e.to_bits_le();
    let fb = f.to_bits_le();
    let gb = g.to_bits_le();
    let mut out = Vec::with_capacity(64);
    for i in 0..64 {
        let picked_f = eb[i].and(&fb[i])?;
        let picked_g = (eb[i].not()).and(&gb[i])?;
        out.push(picked_f.xor(&picked_g)?);
    }
    Ok(UInt64::from_bits_le(&out))
}

fn maj<F: PrimeField>(
    a: &UInt64<F>,
    b: &UInt64<F>,
    c: &UInt64<F>,
) -> Result<UInt64<F>, SynthesisError> {
    let ab = a.to_bits_le();
    let bb = b.to_bits_le();
    let cb = c.to_bits_le();
    let mut out = Vec::with_capacity(64);
    for i in 0..64 {
        let ab_i = ab[i].and(&bb[i])?;
        let ac_i = ab[i].and(&cb[i])?;
        let bc_i = bb[i].and(&cb[i])?;
        out.push(ab_i.xor(&ac_i)?.xor(&bc_i)?);
    }
    Ok(UInt64::from_bits_le(&out))
}

fn compress<F: PrimeField>(
    state: &[UInt64<F>],
    words: &[UInt64<F>],
) -> Result<Vec<UInt64<F>>, SynthesisError> {
    let mut w = words.to_vec();
    for t in 16..80 {
        let s0 = small_sigma0(&w[t - 15])?;
        let s1 = small_sigma1(&w[t - 2])?;
        w.push(UInt64::addmany(&[
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
    for t in 0..80 {
        let t1 = UInt64::addmany(&[
            h.clone(),
            big_sigma1(&e)?,
            ch(&e, &f, &g)?,
            UInt64::constant(K[t]),
            w[t].clone(),
        ])?;
        let t2 = UInt64::addmany(&[big_sigma0(&a)?, maj(&a, &b, &c)?])?;
        h = g;
        g = f;
        f = e;
        e = UInt64::addmany(&[d, t1.clone()])?;
        d = c;
        c = b;
        b = a;
        a = UInt64::addmany(&[t1, t2])?;
    }
    Ok(vec![
        UInt64::addmany(&[state[0].clone(), a])?,
        UInt64::addmany(&[state[1].clone(), b])?,
        UInt64::addmany(&[state[2].clone(), c])?,
        UInt64::addmany(&[state[3].clone(), d])?,
        UInt64::addmany(&[state[4].clone(), e])?,
        UInt64::addmany(&[state[5].clone(), f])?,
        UInt64::addmany(&[state[6].clone(), g])?,
        UInt64::addmany(&[state[7].clone(), h])?,
    ])
}

/// Digest of the declared-length prefix of a fixed-capacity message; 512
/// digest bits in stream order.
pub fn sha512_var<F: PrimeField>(
    message_bits: &[Boolean<F>],
    len: &FpVar<F>,
    max_len: usize,
) -> Result<Vec<Boolean<F>>, SynthesisError> {
    if message_bits.len() != 8 * max_len {
        return Err(SynthesisError::Unsatisfiable);
    }
    let blocks = (max_len + 17).div_ceil(128);

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

    // `len + 16` in `[128b, 128b + 128)` selects the length-field block.
    let mut last_block = Vec::with_capacity(blocks);
    for b in 0..blocks {
        let lower = if b == 0 {
            Boolean::constant(true)
        } else {
            ge_at(128 * b - 16)
        };
        let upper = ge_at(128 * b + 112).not();
        last_block.push(lower.and(&upper)?);
    }

    let len_bits = fp_to_bits_checked(len, 16)?;
    let length_bit = |index: usize| {
        if index >= 3 && index - 3 < 16 {
            len_bits[index - 3].clone()
        } else {
            Boolean::constant(false)
        }
    };

    let mut padded = Vec::with_capacity(blocks * 1024);
    for i in 0..blocks * 128 {
        let in_range = ge_at(i + 1);
        let is_pad_byte = if i < len_lanes.len() {
            len_lanes[i].clone()
        } else {
            Boolean::constant(false)
        };
        let in_length_field = i % 128 >= 112;
        let block = i / 128;
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
                let be_byte = i % 128 - 112;
                let source = length_bit((15 - be_byte) * 8 + (7 - j));
                bit = bit.or(&last_block[block].and(&source)?)?;
            }
            padded.push(bit);
        }
    }

    let mut state: Vec<UInt64<F>> = H0.iter().map(|word| UInt64::constant(*word)).collect();
    let mut digest = vec![Boolean::<F>::constant(false); 512];
    for b in 0..blocks {
        let mut words = Vec::with_capacity(16);
        for t in 0..16 {
            let mut le: Vec<Boolean<F>> =
                padded[b * 1024 + t * 64..b * 1024 + (t + 1) * 64].to_vec();
            le.reverse();
            words.push(UInt64::from_bits_le(&le));
        }
        state = compress(&state, &words)?;
        let mut stream = Vec::with_capacity(512);
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
