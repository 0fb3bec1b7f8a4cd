use ark_ff::{BigInteger, PrimeField};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of bits a single field chunk may carry.
///
/// Chosen with margin below the ~254-bit BN254 scalar modulus so that a fully
/// populated chunk can never alias a different scalar.
pub const MAX_CHUNK_BITS: usize = 248;

/// Result alias for fallible codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors surfaced while converting between bytes, bits and chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodecError {
    /// An input buffer exceeded the declared fixed capacity.
    CapacityExceeded {
        /// Actual input length in bytes.
        len: usize,
        /// Declared capacity in bytes.
        max_len: usize,
    },
    /// The requested chunk width is zero or above [`MAX_CHUNK_BITS`].
    ChunkWidthInvalid {
        /// Requested width in bits.
        bits: usize,
    },
    /// A bit stream was not a whole number of bytes where one was required.
    UnalignedBitStream {
        /// Length of the offending stream in bits.
        bits: usize,
    },
    /// A chunk carried a set bit at or above the declared chunk width.
    ChunkOverflow {
        /// Index of the offending chunk.
        index: usize,
    },
}

impl CodecError {
    /// Creates a capacity-exceeded error helper.
    pub fn capacity_exceeded(len: usize, max_len: usize) -> Self {
        CodecError::CapacityExceeded { len, max_len }
    }

    /// Creates a chunk-width error helper.
    pub fn chunk_width_invalid(bits: usize) -> Self {
        CodecError::ChunkWidthInvalid { bits }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::CapacityExceeded { len, max_len } => {
                write!(f, "input of {len} bytes exceeds capacity {max_len}")
            }
            CodecError::ChunkWidthInvalid { bits } => {
                write!(f, "chunk width {bits} outside 1..={MAX_CHUNK_BITS}")
            }
            CodecError::UnalignedBitStream { bits } => {
                write!(f, "bit stream of {bits} bits is not byte aligned")
            }
            CodecError::ChunkOverflow { index } => {
                write!(f, "chunk {index} carries bits above the declared width")
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Expands a byte buffer into its bit stream, most-significant bit first
/// within each byte.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Collapses a byte-aligned bit stream back into bytes.
pub fn bits_to_bytes(bits: &[bool]) -> CodecResult<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(CodecError::UnalignedBitStream { bits: bits.len() });
    }
    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for octet in bits.chunks(8) {
        let mut byte = 0u8;
        for bit in octet {
            byte = (byte << 1) | u8::from(*bit);
        }
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Zero-pads `input` to exactly `max_len` bytes.
///
/// Inputs longer than the capacity are rejected; truncation is never silent.
pub fn fit_bytes(input: &[u8], max_len: usize) -> CodecResult<Vec<u8>> {
    if input.len() > max_len {
        return Err(CodecError::capacity_exceeded(input.len(), max_len));
    }
    let mut fitted = vec![0u8; max_len];
    fitted[..input.len()].copy_from_slice(input);
    Ok(fitted)
}

/// Packs a bit stream into field chunks of `chunk_bits` bits each.
///
/// Stream bit `i` lands on bit `i % chunk_bits` of chunk `i / chunk_bits`;
/// a final partial chunk packs the remaining bits at the low end.
pub fn bits_to_chunks<F: PrimeField>(bits: &[bool], chunk_bits: usize) -> CodecResult<Vec<F>> {
    if chunk_bits == 0 || chunk_bits > MAX_CHUNK_BITS {
        return Err(CodecError::chunk_width_invalid(chunk_bits));
    }
    let mut chunks = Vec::with_capacity(bits.len().div_ceil(chunk_bits));
    for group in bits.chunks(chunk_bits) {
        let mut le_bytes = [0u8; 32];
        for (i, bit) in group.iter().enumerate() {
            if *bit {
                le_bytes[i / 8] |= 1 << (i % 8);
            }
        }
        chunks.push(F::from_le_bytes_mod_order(&le_bytes));
    }
    Ok(chunks)
}

/// Unpacks field chunks back into a bit stream of `chunks.len() * chunk_bits`
/// bits, inverting [`bits_to_chunks`] for streams aligned on chunk
/// boundaries.
pub fn chunks_to_bits<F: PrimeField>(chunks: &[F], chunk_bits: usize) -> CodecResult<Vec<bool>> {
    if chunk_bits == 0 || chunk_bits > MAX_CHUNK_BITS {
        return Err(CodecError::chunk_width_invalid(chunk_bits));
    }
    let mut bits = Vec::with_capacity(chunks.len() * chunk_bits);
    for (index, chunk) in chunks.iter().enumerate() {
        let le = chunk.into_bigint().to_bits_le();
        if le.iter().skip(chunk_bits).any(|bit| *bit) {
            return Err(CodecError::ChunkOverflow { index });
        }
        for position in 0..chunk_bits {
            bits.push(le.get(position).copied().unwrap_or(false));
        }
    }
    Ok(bits)
}

/// Applies the EVM byte/bit rearrangement: reverses the byte order of the
/// whole buffer and the bit order within each byte.
pub fn evm_rearrange(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().map(|byte| byte.reverse_bits()).collect()
}

/// Bit-stream form of [`evm_rearrange`]; requires byte alignment.
pub fn evm_rearrange_bits(bits: &[bool]) -> CodecResult<Vec<bool>> {
    if bits.len() % 8 != 0 {
        return Err(CodecError::UnalignedBitStream { bits: bits.len() });
    }
    let octets = bits.len() / 8;
    let mut rearranged = Vec::with_capacity(bits.len());
    for i in 0..octets {
        for j in 0..8 {
            rearranged.push(bits[8 * (octets - 1 - i) + (7 - j)]);
        }
    }
    Ok(rearranged)
}
