use ark_bn254::Fr;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use nzcp_snark::digest::PedersenParameters;
use nzcp_snark::params::{PassParamsBuilder, PassProfile};
use nzcp_snark::{
    CredSubjHashCircuit, PedersenIdentity, PedersenNullifierCircuit, PubIdentity,
};

const EXAMPLE_TBS_HEX: &str = "\
846a5369676e6174757265314aa204456b65792d3101264059011fa501781e64\
69643a7765623a6e7a63702e636f76696431392e6865616c74682e6e7a051a61\
819a0a041a7450400a627663a46840636f6e7465787482782668747470733a2f\
2f7777772e77332e6f72672f323031382f63726564656e7469616c732f763178\
2a68747470733a2f2f6e7a63702e636f76696431392e6865616c74682e6e7a2f\
636f6e74657874732f76316776657273696f6e65312e302e3064747970658274\
56657269666961626c6543726564656e7469616c6f5075626c6963436f766964\
506173737163726564656e7469616c5375626a656374a369676976656e4e616d\
65644a61636b6a66616d696c794e616d656753706172726f7763646f626a3139\
36302d30342d3136075060a4f54d4e304332be33ad78b1eafa4b";

fn bench_cred_subj_hash(c: &mut Criterion) {
    let params = PassParamsBuilder::from_profile(PassProfile::Example)
        .build()
        .expect("example profile");
    let to_be_signed = hex::decode(EXAMPLE_TBS_HEX).expect("fixture hex");
    let expected = PubIdentity::derive(&params, &to_be_signed).expect("derive");

    let mut group = c.benchmark_group("synthesize");
    group.sample_size(10);
    group.bench_function("cred_subj_hash_example", |b| {
        b.iter_batched(
            || CredSubjHashCircuit {
                params: params.clone(),
                to_be_signed: Some(to_be_signed.clone()),
                data: Some(Fr::from(1u64)),
                expected: Some(expected.clone()),
            },
            |circuit| {
                let cs = ConstraintSystem::<Fr>::new_ref();
                circuit.generate_constraints(cs).expect("synthesis");
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_pedersen_nullifier(c: &mut Criterion) {
    let params = PassParamsBuilder::from_profile(PassProfile::Example)
        .build()
        .expect("example profile");
    let pedersen = PedersenParameters::setup();
    let to_be_signed = hex::decode(EXAMPLE_TBS_HEX).expect("fixture hex");
    let secret = Fr::from(77u64);
    let expected = PedersenIdentity::derive(&params, &pedersen, &to_be_signed, secret)
        .expect("derive");

    let mut group = c.benchmark_group("synthesize");
    group.sample_size(10);
    group.bench_function("pedersen_nullifier_example", |b| {
        b.iter_batched(
            || PedersenNullifierCircuit {
                params: params.clone(),
                pedersen: pedersen.clone(),
                to_be_signed: Some(to_be_signed.clone()),
                secret_index: Some(secret),
                data: Some(Fr::from(1u64)),
                expected: Some(expected.clone()),
            },
            |circuit| {
                let cs = ConstraintSystem::<Fr>::new_ref();
                circuit.generate_constraints(cs).expect("synthesis");
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_cred_subj_hash, bench_pedersen_nullifier);
criterion_main!(benches);
