mod _fixtures;

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};

use _fixtures::{
    EXAMPLE_DOB, EXAMPLE_FAMILY_NAME, EXAMPLE_GIVEN_NAME, EXAMPLE_SUBJECT_POS, EXAMPLE_TBS,
};
use nzcp_snark::subject::{read_credential_subject, SubjectField};

fn allocate_payload(cs: &ConstraintSystemRef<Fr>, bytes: &[u8]) -> Vec<FpVar<Fr>> {
    bytes
        .iter()
        .map(|byte| {
            FpVar::new_witness(cs.clone(), || Ok(Fr::from(u64::from(*byte)))).expect("alloc")
        })
        .collect()
}

fn assert_field(field: &SubjectField<Fr>, expected: &str, capacity: usize) {
    assert_eq!(
        field.len.value().unwrap(),
        Fr::from(expected.len() as u64)
    );
    let mut padded = expected.as_bytes().to_vec();
    padded.resize(capacity, 0);
    let actual: Vec<Fr> = field
        .bytes
        .iter()
        .map(|byte| byte.value().unwrap())
        .collect();
    let expected_fr: Vec<Fr> = padded
        .iter()
        .map(|byte| Fr::from(u64::from(*byte)))
        .collect();
    assert_eq!(actual, expected_fr);
}

#[test]
fn recovers_example_fields_with_lengths() {
    let capacity = 32;
    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &EXAMPLE_TBS);
    let pos = FpVar::constant(Fr::from((EXAMPLE_SUBJECT_POS + 1) as u64));
    let map_len = FpVar::new_witness(cs.clone(), || Ok(Fr::from(3u64))).expect("alloc");

    let subject =
        read_credential_subject(&bytes, &pos, &map_len, 3, 3, capacity).expect("reader");
    assert!(cs.is_satisfied().expect("satisfiability"));

    assert_field(&subject.given_name, EXAMPLE_GIVEN_NAME, capacity);
    assert_field(&subject.family_name, EXAMPLE_FAMILY_NAME, capacity);
    assert_field(&subject.dob, EXAMPLE_DOB, capacity);
}

#[test]
fn capacity_violation_is_unsatisfiable() {
    // An 8-byte capacity cannot hold the ten-byte date of birth.
    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &EXAMPLE_TBS);
    let pos = FpVar::constant(Fr::from((EXAMPLE_SUBJECT_POS + 1) as u64));
    let map_len = FpVar::new_witness(cs.clone(), || Ok(Fr::from(3u64))).expect("alloc");

    read_credential_subject(&bytes, &pos, &map_len, 3, 3, 8).expect("reader");
    assert!(!cs.is_satisfied().expect("satisfiability"));
}
