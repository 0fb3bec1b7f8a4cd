mod _fixtures;

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::uint8::UInt8;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::ConstraintSystem;
use proptest::prelude::*;

use _fixtures::{
    EXAMPLE_CRED_SUBJ_CHUNKS, EXAMPLE_CRED_SUBJ_HASH, EXAMPLE_TBS_CHUNKS, EXAMPLE_TBS_HASH,
};
use nzcp_snark::codec::{
    bits_to_bytes, bits_to_chunks, bits_to_chunks_gadget, bytes_to_bits, bytes_to_bits_msb,
    chunks_to_bits, evm_rearrange, evm_rearrange_bits, evm_rearrange_gadget, fit_bytes,
    CodecError, MAX_CHUNK_BITS,
};

#[test]
fn bit_expansion_is_msb_first() {
    assert_eq!(
        bytes_to_bits(&[0b1000_0001]),
        vec![true, false, false, false, false, false, false, true]
    );
    assert_eq!(bits_to_bytes(&bytes_to_bits(&[0xde, 0xad])).unwrap(), vec![0xde, 0xad]);
}

#[test]
fn fit_bytes_pads_and_rejects() {
    let fitted = fit_bytes(&[1, 2, 3], 5).unwrap();
    assert_eq!(fitted, vec![1, 2, 3, 0, 0]);
    assert_eq!(
        fit_bytes(&[0; 6], 5),
        Err(CodecError::capacity_exceeded(6, 5))
    );
}

#[test]
fn chunk_width_bounds_are_enforced() {
    let bits = bytes_to_bits(&[0xff; 4]);
    assert!(matches!(
        bits_to_chunks::<Fr>(&bits, 0),
        Err(CodecError::ChunkWidthInvalid { .. })
    ));
    assert!(matches!(
        bits_to_chunks::<Fr>(&bits, MAX_CHUNK_BITS + 1),
        Err(CodecError::ChunkWidthInvalid { .. })
    ));
}

#[test]
fn known_digest_chunk_vectors() {
    for (hash_hex, expected) in [
        (EXAMPLE_CRED_SUBJ_HASH, EXAMPLE_CRED_SUBJ_CHUNKS),
        (EXAMPLE_TBS_HASH, EXAMPLE_TBS_CHUNKS),
    ] {
        let digest = hex::decode(hash_hex).unwrap();
        let chunks = bits_to_chunks::<Fr>(&bytes_to_bits(&digest), 248).unwrap();
        let expected: Vec<Fr> = expected
            .iter()
            .map(|decimal| decimal.parse().unwrap())
            .collect();
        assert_eq!(chunks, expected);

        // Gadget packing agrees with the native law.
        let bit_vars: Vec<Boolean<Fr>> = bytes_to_bits(&digest)
            .into_iter()
            .map(Boolean::constant)
            .collect();
        let chunk_vars = bits_to_chunks_gadget(&bit_vars, 248).unwrap();
        let values: Vec<Fr> = chunk_vars
            .iter()
            .map(|chunk| chunk.value().unwrap())
            .collect();
        assert_eq!(values, chunks);
    }
}

#[test]
fn evm_rearrangement_gadget_matches_native() {
    let bytes = [0x12u8, 0x34, 0xab, 0x00, 0xff];
    let cs = ConstraintSystem::<Fr>::new_ref();
    let byte_vars: Vec<UInt8<Fr>> = bytes
        .iter()
        .map(|byte| UInt8::new_witness(cs.clone(), || Ok(*byte)).expect("alloc"))
        .collect();
    let bit_vars = bytes_to_bits_msb(&byte_vars).expect("bits");
    let rearranged = evm_rearrange_gadget(&bit_vars).expect("rearrange");
    let values: Vec<bool> = rearranged
        .iter()
        .map(|bit| bit.value().expect("bit value"))
        .collect();
    assert_eq!(bits_to_bytes(&values).unwrap(), evm_rearrange(&bytes));
    assert!(cs.is_satisfied().expect("satisfiability"));
}

proptest! {
    #[test]
    fn chunk_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
        let bits = bytes_to_bits(&bytes);
        let chunks = bits_to_chunks::<Fr>(&bits, 248).unwrap();
        let recovered = chunks_to_bits(&chunks, 248).unwrap();
        // The recovered stream is padded up to the chunk boundary; the
        // prefix is the original and the tail is all zeros.
        prop_assert_eq!(&recovered[..bits.len()], &bits[..]);
        prop_assert!(recovered[bits.len()..].iter().all(|bit| !bit));
    }

    #[test]
    fn evm_rearrangement_is_an_involution(bytes in proptest::collection::vec(any::<u8>(), 0..96)) {
        let rearranged = evm_rearrange(&bytes);
        prop_assert_eq!(evm_rearrange(&rearranged), bytes.clone());

        let bits = bytes_to_bits(&bytes);
        let rearranged_bits = evm_rearrange_bits(&bits).unwrap();
        prop_assert_eq!(bits_to_bytes(&rearranged_bits).unwrap(), rearranged);
        prop_assert_eq!(evm_rearrange_bits(&rearranged_bits).unwrap(), bits);
    }
}
