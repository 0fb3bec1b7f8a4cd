mod _fixtures;

use ark_bn254::Fr;
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::R1CSVar;
use ark_relations::r1cs::{ConstraintSystem, ConstraintSystemRef};

use _fixtures::{
    EXAMPLE_CLAIM_COUNT, EXAMPLE_CLAIMS_POS, EXAMPLE_EXP_POS, EXAMPLE_NBF_POS,
    EXAMPLE_SUBJECT_POS, EXAMPLE_TBS, EXAMPLE_VC_POS,
};
use nzcp_snark::cbor::{keys, scan_map, scan_map_native, TargetKey, ValueKind};

fn allocate_payload(cs: &ConstraintSystemRef<Fr>, bytes: &[u8]) -> Vec<FpVar<Fr>> {
    bytes
        .iter()
        .map(|byte| {
            FpVar::new_witness(cs.clone(), || Ok(Fr::from(u64::from(*byte)))).expect("alloc")
        })
        .collect()
}

const CLAIM_TARGETS: [TargetKey; 3] = [
    TargetKey {
        pattern: keys::KEY_NBF,
        kind: ValueKind::Uint,
    },
    TargetKey {
        pattern: keys::KEY_EXP,
        kind: ValueKind::Uint,
    },
    TargetKey {
        pattern: keys::KEY_VC,
        kind: ValueKind::Map,
    },
];

#[test]
fn native_walk_locates_example_claims() {
    let offsets = scan_map_native(
        &EXAMPLE_TBS,
        EXAMPLE_CLAIMS_POS,
        EXAMPLE_CLAIM_COUNT as usize,
        &[keys::KEY_NBF, keys::KEY_EXP, keys::KEY_VC],
    )
    .expect("native scan");
    assert_eq!(offsets, vec![EXAMPLE_NBF_POS, EXAMPLE_EXP_POS, EXAMPLE_VC_POS]);

    // The expiry timestamp's CBOR encoding sits at the produced offset.
    assert_eq!(
        &EXAMPLE_TBS[EXAMPLE_EXP_POS..EXAMPLE_EXP_POS + 5],
        &[26, 116, 80, 64, 10]
    );
}

#[test]
fn circuit_walk_locates_example_claims() {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &EXAMPLE_TBS);
    let pos = FpVar::constant(Fr::from(EXAMPLE_CLAIMS_POS as u64));
    let map_len =
        FpVar::new_witness(cs.clone(), || Ok(Fr::from(EXAMPLE_CLAIM_COUNT))).expect("alloc");

    let located = scan_map(&bytes, &pos, &map_len, 5, 3, &CLAIM_TARGETS).expect("scan");
    assert!(cs.is_satisfied().expect("satisfiability"));

    assert_eq!(
        located[0].value_pos.value().unwrap(),
        Fr::from(EXAMPLE_NBF_POS as u64)
    );
    assert_eq!(
        located[1].value_pos.value().unwrap(),
        Fr::from(EXAMPLE_EXP_POS as u64)
    );
    assert_eq!(
        located[2].value_pos.value().unwrap(),
        Fr::from(EXAMPLE_VC_POS as u64)
    );
    // The `vc` map declares four entries.
    assert_eq!(located[2].header_arg.value().unwrap(), Fr::from(4u64));
}

#[test]
fn circuit_walk_descends_into_vc() {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &EXAMPLE_TBS);
    let pos = FpVar::constant(Fr::from((EXAMPLE_VC_POS + 1) as u64));
    let map_len = FpVar::new_witness(cs.clone(), || Ok(Fr::from(4u64))).expect("alloc");

    let located = scan_map(
        &bytes,
        &pos,
        &map_len,
        4,
        3,
        &[TargetKey {
            pattern: keys::KEY_CREDENTIAL_SUBJECT,
            kind: ValueKind::Map,
        }],
    )
    .expect("scan");
    assert!(cs.is_satisfied().expect("satisfiability"));

    assert_eq!(
        located[0].value_pos.value().unwrap(),
        Fr::from(EXAMPLE_SUBJECT_POS as u64)
    );
    assert_eq!(located[0].header_arg.value().unwrap(), Fr::from(3u64));
}

#[test]
fn corrupted_key_byte_is_unsatisfiable() {
    let mut tampered = EXAMPLE_TBS.clone();
    tampered[EXAMPLE_VC_POS - 2] = b'x'; // "vc" -> "xc"

    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &tampered);
    let pos = FpVar::constant(Fr::from(EXAMPLE_CLAIMS_POS as u64));
    let map_len =
        FpVar::new_witness(cs.clone(), || Ok(Fr::from(EXAMPLE_CLAIM_COUNT))).expect("alloc");

    scan_map(&bytes, &pos, &map_len, 5, 3, &CLAIM_TARGETS).expect("scan");
    assert!(!cs.is_satisfied().expect("satisfiability"));
}

#[test]
fn overlong_declared_map_length_is_unsatisfiable() {
    let cs = ConstraintSystem::<Fr>::new_ref();
    let bytes = allocate_payload(&cs, &EXAMPLE_TBS);
    let pos = FpVar::constant(Fr::from(EXAMPLE_CLAIMS_POS as u64));
    let map_len = FpVar::new_witness(cs.clone(), || Ok(Fr::from(9u64))).expect("alloc");

    scan_map(&bytes, &pos, &map_len, 5, 3, &CLAIM_TARGETS).expect("scan");
    assert!(!cs.is_satisfied().expect("satisfiability"));
}
