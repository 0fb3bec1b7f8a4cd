//! Unrolled in-circuit map scanning.
//!
//! The scanner walks a CBOR map as a fixed sequence of constraint "steps",
//! one per possible entry up to the compile-time unroll bound. Every
//! conditional is an arithmetic selector: an activity flag (`step <
//! map_len`), a done flag (all targets matched) freezing the cursor, and
//! per-target first-match indicators. For each produced offset the circuit
//! has, by construction, asserted that the bytes before it equal the target
//! key pattern, and it additionally asserts that the value header carries the
//! expected major type. A malformed or mismatched payload leaves no
//! satisfying witness.
//!
//! Value skipping covers the shapes that occur in a credential before the
//! last target of each scan: unsigned integers (short and 1-, 2- and 4-byte
//! arguments), text and byte strings (short and 1-byte-extended lengths) and
//! arrays of at most `max_array_items` text strings. Maps never need to be
//! skipped — they are terminal targets — so a map value in skip position
//! makes the step's shape assertion fail instead.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::prelude::EqGadget;
use ark_relations::r1cs::SynthesisError;

use crate::codec::{byte_lookup, eq_lanes, fp_to_bits_checked, ge_flags, le_bits_to_fp};

/// Expected major type of a target key's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Unsigned integer (timestamps).
    Uint,
    /// Text string (credential-subject fields).
    Text,
    /// Nested map (`vc`, `credentialSubject`).
    Map,
}

/// A key the scanner must locate, as a compile-time byte pattern.
#[derive(Debug, Clone, Copy)]
pub struct TargetKey {
    /// Exact on-wire encoding of the key, header byte included.
    pub pattern: &'static [u8],
    /// Major type the value at the produced offset must carry.
    pub kind: ValueKind,
}

/// A located key: where its value starts and the value header's short
/// argument (the entry count for map-typed targets).
#[derive(Clone)]
pub struct MatchedKey<F: PrimeField> {
    /// Offset of the first byte of the value.
    pub value_pos: FpVar<F>,
    /// The value header's additional-info argument. For [`ValueKind::Map`]
    /// targets this is the asserted-short nested entry count; text targets
    /// re-read their header to handle extended lengths.
    pub header_arg: FpVar<F>,
}

/// Decomposed CBOR header byte selectors.
pub(crate) struct HeaderVar<F: PrimeField> {
    pub is_uint: Boolean<F>,
    pub is_bytes: Boolean<F>,
    pub is_text: Boolean<F>,
    pub is_array: Boolean<F>,
    pub is_map: Boolean<F>,
    /// Low five additional-info bits as a field value.
    pub arg: FpVar<F>,
    pub arg_lt24: Boolean<F>,
    pub arg_is24: Boolean<F>,
    pub arg_is25: Boolean<F>,
    pub arg_is26: Boolean<F>,
}

/// Splits a byte variable into major-type selectors and the additional-info
/// argument.
pub(crate) fn decompose_header<F: PrimeField>(
    byte: &FpVar<F>,
) -> Result<HeaderVar<F>, SynthesisError> {
    let bits = fp_to_bits_checked(byte, 8)?;
    let m0 = &bits[5];
    let m1 = &bits[6];
    let m2 = &bits[7];
    let not = |b: &Boolean<F>| b.not();
    let is_uint = not(m2).and(&not(m1))?.and(&not(m0))?;
    let is_bytes = not(m2).and(m1)?.and(&not(m0))?;
    let is_text = not(m2).and(m1)?.and(m0)?;
    let is_array = m2.and(&not(m1))?.and(&not(m0))?;
    let is_map = m2.and(&not(m1))?.and(m0)?;
    let arg = le_bits_to_fp(&bits[0..5]);
    // 24..=31 all carry bits 3 and 4; 24, 25 and 26 are the only extensions
    // the credential format uses.
    let arg_ge24 = bits[4].and(&bits[3])?;
    let arg_lt24 = arg_ge24.not();
    let low3_000 = not(&bits[2]).and(&not(&bits[1]))?.and(&not(&bits[0]))?;
    let low3_001 = not(&bits[2]).and(&not(&bits[1]))?.and(&bits[0])?;
    let low3_010 = not(&bits[2]).and(&bits[1])?.and(&not(&bits[0]))?;
    let arg_is24 = arg_ge24.and(&low3_000)?;
    let arg_is25 = arg_ge24.and(&low3_001)?;
    let arg_is26 = arg_ge24.and(&low3_010)?;
    Ok(HeaderVar {
        is_uint,
        is_bytes,
        is_text,
        is_array,
        is_map,
        arg,
        arg_lt24,
        arg_is24,
        arg_is25,
        arg_is26,
    })
}

/// Walks a map whose first key sits at `pos`, locating every target.
///
/// `bytes` is the field-variable view of the padded payload, `map_len` the
/// declared entry count (constrained to at most `max_entries`), and the
/// returned vector parallels `targets`.
pub fn scan_map<F: PrimeField>(
    bytes: &[FpVar<F>],
    pos: &FpVar<F>,
    map_len: &FpVar<F>,
    max_entries: usize,
    max_array_items: usize,
    targets: &[TargetKey],
) -> Result<Vec<MatchedKey<F>>, SynthesisError> {
    let buf_len = bytes.len();
    let true_const = Boolean::constant(true);

    // Bind the declared entry count to the unroll bound.
    let (len_lanes, len_sum) = eq_lanes(map_len, max_entries + 1)?;
    len_sum.enforce_equal(&FpVar::one())?;
    let len_ge = ge_flags(&len_lanes)?;

    let mut cursor = pos.clone();
    let mut done_prev = Boolean::constant(false);
    let mut found = vec![Boolean::<F>::constant(false); targets.len()];
    let mut match_count = vec![FpVar::<F>::zero(); targets.len()];
    let mut value_pos_acc = vec![FpVar::<F>::zero(); targets.len()];
    let mut header_arg_acc = vec![FpVar::<F>::zero(); targets.len()];

    for step in 0..max_entries {
        let active = len_ge[step + 1].clone();
        let live = active.and(&done_prev.not())?;

        // Key header at the cursor. The lanes are only meaningful on live
        // steps; frozen steps skip the in-range requirement.
        let (lanes, lane_sum) = eq_lanes(&cursor, buf_len)?;
        lane_sum.conditional_enforce_equal(&FpVar::one(), &live)?;
        let key_header = byte_lookup(&lanes, bytes, 0);
        let kh = decompose_header(&key_header)?;
        let key_shape_ok = kh.is_uint.or(&kh.is_text)?.and(&kh.arg_lt24)?;
        key_shape_ok.conditional_enforce_equal(&true_const, &live)?;
        let key_len = FpVar::one() + FpVar::from(kh.is_text.clone()) * &kh.arg;

        // First-match indicators per target.
        let mut step_matches = Vec::with_capacity(targets.len());
        for (index, target) in targets.iter().enumerate() {
            let mut conjuncts = Vec::with_capacity(target.pattern.len() + 2);
            for (offset, expected) in target.pattern.iter().enumerate() {
                let byte = byte_lookup(&lanes, bytes, offset);
                conjuncts.push(byte.is_eq(&FpVar::constant(F::from(u64::from(*expected))))?);
            }
            conjuncts.push(active.clone());
            conjuncts.push(found[index].not());
            step_matches.push(Boolean::kary_and(&conjuncts)?);
        }

        // Value header one past the key bytes.
        let value_pos = &cursor + &key_len;
        let (vlanes, vlane_sum) = eq_lanes(&value_pos, buf_len)?;
        vlane_sum.conditional_enforce_equal(&FpVar::one(), &live)?;
        let value_header = byte_lookup(&vlanes, bytes, 0);
        let vh = decompose_header(&value_header)?;
        let ext1 = byte_lookup(&vlanes, bytes, 1);

        for (index, target) in targets.iter().enumerate() {
            let matched = &step_matches[index];
            let kind_ok = match target.kind {
                ValueKind::Uint => vh.is_uint.clone(),
                ValueKind::Text => vh.is_text.clone(),
                ValueKind::Map => vh.is_map.and(&vh.arg_lt24)?,
            };
            kind_ok.conditional_enforce_equal(&true_const, matched)?;
            let matched_fp = FpVar::from(matched.clone());
            value_pos_acc[index] += &matched_fp * &value_pos;
            header_arg_acc[index] += &matched_fp * &vh.arg;
            match_count[index] += matched_fp;
            found[index] = found[index].or(matched)?;
        }

        let done = Boolean::kary_and(&found)?;
        let advancing = live.and(&done.not())?;

        // Skip length of the value, by recognized shape.
        let uint_small = vh.is_uint.and(&vh.arg_lt24)?;
        let uint_ext1 = vh.is_uint.and(&vh.arg_is24)?;
        let uint_ext2 = vh.is_uint.and(&vh.arg_is25)?;
        let uint_ext4 = vh.is_uint.and(&vh.arg_is26)?;
        let is_string = vh.is_text.or(&vh.is_bytes)?;
        let str_small = is_string.and(&vh.arg_lt24)?;
        let str_ext1 = is_string.and(&vh.arg_is24)?;
        let arr_small = vh.is_array.and(&vh.arg_lt24)?;

        // Bounded walk over an array of text strings.
        let (item_lanes, item_sum) = eq_lanes(&vh.arg, max_array_items + 1)?;
        let arr_live = advancing.and(&arr_small)?;
        item_sum.conditional_enforce_equal(&FpVar::one(), &arr_live)?;
        let item_ge = ge_flags(&item_lanes)?;
        let mut item_cursor = &value_pos + FpVar::one();
        for item in 0..max_array_items {
            let item_active = arr_live.and(&item_ge[item + 1])?;
            let (ilanes, ilane_sum) = eq_lanes(&item_cursor, buf_len)?;
            ilane_sum.conditional_enforce_equal(&FpVar::one(), &item_active)?;
            let item_header = byte_lookup(&ilanes, bytes, 0);
            let ih = decompose_header(&item_header)?;
            let item_ext = byte_lookup(&ilanes, bytes, 1);
            let item_short = ih.is_text.and(&ih.arg_lt24)?;
            let item_long = ih.is_text.and(&ih.arg_is24)?;
            item_short
                .or(&item_long)?
                .conditional_enforce_equal(&true_const, &item_active)?;
            let item_len = FpVar::one()
                + FpVar::from(item_short) * &ih.arg
                + FpVar::from(item_long) * (FpVar::one() + &item_ext);
            item_cursor += FpVar::from(item_active) * item_len;
        }
        let array_skip = &item_cursor - &value_pos;

        let shape_known = uint_small
            .or(&uint_ext1)?
            .or(&uint_ext2)?
            .or(&uint_ext4)?
            .or(&str_small)?
            .or(&str_ext1)?
            .or(&arr_small)?;
        shape_known.conditional_enforce_equal(&true_const, &advancing)?;

        let skip = FpVar::from(uint_small)
            + FpVar::from(uint_ext1) * FpVar::constant(F::from(2u64))
            + FpVar::from(uint_ext2) * FpVar::constant(F::from(3u64))
            + FpVar::from(uint_ext4) * FpVar::constant(F::from(5u64))
            + FpVar::from(str_small) * (FpVar::one() + &vh.arg)
            + FpVar::from(str_ext1) * (FpVar::constant(F::from(2u64)) + &ext1)
            + FpVar::from(arr_small) * array_skip;

        cursor += FpVar::from(advancing) * (key_len + skip);
        done_prev = done;
    }

    // Exactly one match per required target across the whole walk.
    let mut located = Vec::with_capacity(targets.len());
    for index in 0..targets.len() {
        match_count[index].enforce_equal(&FpVar::one())?;
        located.push(MatchedKey {
            value_pos: value_pos_acc[index].clone(),
            header_arg: header_arg_acc[index].clone(),
        });
    }
    Ok(located)
}
