//! Bit, byte and field-chunk conversions shared by every circuit stage.
//!
//! The codec fixes three protocol-wide conventions:
//!
//! * **Bit order** — a byte expands to eight bits most-significant first, and
//!   a buffer expands to the concatenation of its bytes' bit strings.
//! * **Chunk packing** — a bit stream packs into prime-field scalars of at
//!   most [`MAX_CHUNK_BITS`] bits, where stream bit `i` becomes bit
//!   `i % chunk_bits` (least-significant first) of chunk `i / chunk_bits`.
//!   The width bound leaves margin below the ~254-bit BN254 scalar modulus so
//!   packing never wraps.
//! * **EVM rearrangement** — the fixed permutation (whole-buffer byte
//!   reversal composed with per-byte bit reversal) that lets chunk-packed
//!   output decode as big-endian words on byte-oriented on-chain consumers.
//!   The permutation is an involution.
//!
//! [`native`] implements the conversions over plain bytes and `bool`s for
//! witness preparation and test oracles; [`gadgets`] mirrors them over
//! [`Boolean`](ark_r1cs_std::boolean::Boolean) and
//! [`FpVar`](ark_r1cs_std::fields::fp::FpVar) inside the constraint system.
//! The two halves are interchangeable bit for bit.

mod gadgets;
mod native;

pub use gadgets::{
    bits_to_chunks_gadget, byte_lookup, byte_to_bits_msb, bytes_to_bits_msb, eq_lanes,
    evm_rearrange_gadget, fp_to_bits_checked, ge_flags, le_bits_to_fp, position_lanes,
};
pub use native::{
    bits_to_bytes, bits_to_chunks, bytes_to_bits, chunks_to_bits, evm_rearrange,
    evm_rearrange_bits, fit_bytes, CodecError, CodecResult, MAX_CHUNK_BITS,
};
