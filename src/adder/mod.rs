//! Fixed-width binary addition with explicit carry-out.
//!
//! Operands are bit vectors in little-endian order so the carry ripples from
//! index 0 upward. The result carries `N + 1` bits: `N` sum bits plus the
//! final carry, making the output the exact integer sum of the operands.
//! Dropping the carry bit recovers addition modulo `2^N`. Addition is total;
//! the gadget introduces no assertions of its own.

use ark_ff::PrimeField;
use ark_r1cs_std::boolean::Boolean;
use ark_relations::r1cs::SynthesisError;

/// Sum and carry-out produced by [`bin_add`].
#[derive(Clone)]
pub struct BinSum<F: PrimeField> {
    /// Little-endian sum bits, one per operand bit.
    pub sum: Vec<Boolean<F>>,
    /// Final carry; `true` exactly when the integer sum needs `N + 1` bits.
    pub carry: Boolean<F>,
}

impl<F: PrimeField> BinSum<F> {
    /// Returns the full `N + 1`-bit little-endian result including the carry.
    pub fn into_bits(self) -> Vec<Boolean<F>> {
        let mut bits = self.sum;
        bits.push(self.carry);
        bits
    }
}

/// Ripple-carry addition of two equal-width little-endian bit vectors.
pub fn bin_add<F: PrimeField>(
    op1: &[Boolean<F>],
    op2: &[Boolean<F>],
) -> Result<BinSum<F>, SynthesisError> {
    if op1.len() != op2.len() {
        return Err(SynthesisError::Unsatisfiable);
    }
    let mut carry = Boolean::constant(false);
    let mut sum = Vec::with_capacity(op1.len());
    for (a, b) in op1.iter().zip(op2.iter()) {
        let a_xor_b = a.xor(b)?;
        sum.push(a_xor_b.xor(&carry)?);
        // carry_out = (a AND b) OR (carry AND (a XOR b))
        carry = a.and(b)?.or(&carry.and(&a_xor_b)?)?;
    }
    Ok(BinSum { sum, carry })
}

/// Native mirror of [`bin_add`] used by witness preparation and tests.
pub fn bin_add_native(op1: &[bool], op2: &[bool]) -> (Vec<bool>, bool) {
    debug_assert_eq!(op1.len(), op2.len());
    let mut carry = false;
    let mut sum = Vec::with_capacity(op1.len());
    for (a, b) in op1.iter().zip(op2.iter()) {
        sum.push(a ^ b ^ carry);
        carry = (*a && *b) || (carry && (*a ^ *b));
    }
    (sum, carry)
}
