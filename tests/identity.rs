mod _fixtures;

use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};

use _fixtures::{
    example_params, EXAMPLE_CRED_SUBJ_HASH, EXAMPLE_DOB, EXAMPLE_EXP, EXAMPLE_FAMILY_NAME,
    EXAMPLE_GIVEN_NAME, EXAMPLE_NBF, EXAMPLE_TBS, EXAMPLE_TBS_HASH,
};
use nzcp_snark::digest::PedersenParameters;
use nzcp_snark::{
    CredSubjHashCircuit, PassFacts, PedersenIdentity, PedersenNullifierCircuit, PubIdentity,
    Sha512Identity, Sha512NullifierCircuit,
};

fn is_satisfied(circuit: impl ConstraintSynthesizer<Fr>) -> bool {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone()).expect("synthesis");
    cs.is_satisfied().expect("satisfiability")
}

#[test]
fn native_facts_match_reference_verifier() {
    let params = example_params();
    let facts = PassFacts::derive(&params, &EXAMPLE_TBS).expect("derive");
    assert_eq!(facts.given_name, EXAMPLE_GIVEN_NAME.as_bytes());
    assert_eq!(facts.family_name, EXAMPLE_FAMILY_NAME.as_bytes());
    assert_eq!(facts.dob, EXAMPLE_DOB.as_bytes());
    assert_eq!(facts.cred_subj_concat, b"Jack,Sparrow,1960-04-16");
    assert_eq!(hex::encode(facts.cred_subj_hash), EXAMPLE_CRED_SUBJ_HASH);
    assert_eq!(hex::encode(facts.to_be_signed_hash), EXAMPLE_TBS_HASH);
    assert_eq!(facts.nbf, EXAMPLE_NBF);
    assert_eq!(facts.exp, EXAMPLE_EXP);
}

#[test]
fn cred_subj_hash_circuit_end_to_end() {
    let params = example_params();
    let expected = PubIdentity::derive(&params, &EXAMPLE_TBS).expect("derive");
    let data = Fr::from(0xdead_beefu64);

    assert!(is_satisfied(CredSubjHashCircuit {
        params: params.clone(),
        to_be_signed: Some(EXAMPLE_TBS.clone()),
        data: Some(data),
        expected: Some(expected.clone()),
    }));

    // A wrong public timestamp leaves no satisfying witness.
    let mut tampered = expected;
    tampered.exp += 1;
    assert!(!is_satisfied(CredSubjHashCircuit {
        params,
        to_be_signed: Some(EXAMPLE_TBS.clone()),
        data: Some(data),
        expected: Some(tampered),
    }));
}

#[test]
fn pedersen_nullifier_circuit_end_to_end() {
    let params = example_params();
    let pedersen = PedersenParameters::setup();
    let secret = Fr::from(0x5eed_1234_5678u64);
    let expected =
        PedersenIdentity::derive(&params, &pedersen, &EXAMPLE_TBS, secret).expect("derive");

    assert!(is_satisfied(PedersenNullifierCircuit {
        params,
        pedersen,
        to_be_signed: Some(EXAMPLE_TBS.clone()),
        secret_index: Some(secret),
        data: Some(Fr::from(7u64)),
        expected: Some(expected),
    }));
}

#[test]
fn pedersen_nullifier_blinding_properties() {
    let params = example_params();
    let pedersen = PedersenParameters::setup();
    let secret_a = Fr::from(1111u64);
    let secret_b = Fr::from(2222u64);

    let first =
        PedersenIdentity::derive(&params, &pedersen, &EXAMPLE_TBS, secret_a).expect("derive");
    let replay =
        PedersenIdentity::derive(&params, &pedersen, &EXAMPLE_TBS, secret_a).expect("derive");
    let reblinded =
        PedersenIdentity::derive(&params, &pedersen, &EXAMPLE_TBS, secret_b).expect("derive");

    // Fixed identity and fixed blinding reproduce the same range; a new
    // blinding value moves only the blinded coordinate.
    assert_eq!(first.range, replay.range);
    assert_eq!(first.range.base, reblinded.range.base);
    assert_ne!(first.range.blinded, reblinded.range.blinded);
}

#[test]
fn sha512_nullifier_circuit_end_to_end() {
    let params = example_params();
    let secret = Fr::from(0xfeed_f00du64);
    let expected = Sha512Identity::derive(&params, &EXAMPLE_TBS, secret).expect("derive");

    assert!(is_satisfied(Sha512NullifierCircuit {
        params: params.clone(),
        to_be_signed: Some(EXAMPLE_TBS.clone()),
        secret_index: Some(secret),
        data: Some(Fr::from(3u64)),
        expected: Some(expected.clone()),
    }));

    // The unblinded chunks are stable across blinding values.
    let reblinded =
        Sha512Identity::derive(&params, &EXAMPLE_TBS, Fr::from(1u64)).expect("derive");
    assert_eq!(expected.nullifier, reblinded.nullifier);
    assert_ne!(expected.blinded, reblinded.blinded);
}

#[test]
fn public_input_vectors_follow_bundle_order() {
    let params = example_params();
    let expected = PubIdentity::derive(&params, &EXAMPLE_TBS).expect("derive");
    let data = Fr::from(42u64);
    let inputs = expected.public_inputs(params.chunk_bits(), data);
    // Two chunks per digest, two timestamps, one pass-through value.
    assert_eq!(inputs.len(), 7);
    assert_eq!(inputs[4], Fr::from(EXAMPLE_NBF));
    assert_eq!(inputs[5], Fr::from(EXAMPLE_EXP));
    assert_eq!(inputs[6], data);
}
