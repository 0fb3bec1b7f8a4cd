#![forbid(unsafe_code)]

//! R1CS circuits proving facts about NZ COVID Pass credentials.
//!
//! A prover holds the raw `ToBeSigned` bytes of a COSE-signed CWT credential
//! and proves, without revealing the credential, that specific claims sit at
//! verifiably derived offsets inside its CBOR structure: the `nbf`/`exp`
//! timestamps and the `credentialSubject` identity fields. The circuits hash
//! the payload and the concatenated identity, optionally derive a
//! privacy-preserving nullifier, and commit to a small fixed-order bundle of
//! public field elements suitable for on-chain verification.
//!
//! Layer by layer:
//!
//! * [`codec`] — bit/byte/chunk conversions and the EVM rearrangement;
//! * [`adder`] — ripple-carry addition with carry-out;
//! * [`cbor`] — claim location, native and in-circuit;
//! * [`subject`] — credential-subject field extraction;
//! * [`digest`] — concatenation, SHA-2 sub-circuits, Pedersen commitment;
//! * [`identity`] — witness-side evaluation and the composed circuits;
//! * [`params`] — the validated circuit-shape registry.
//!
//! Everything is expressed as a static constraint graph over BN254's scalar
//! field: conditionals are arithmetic selectors, buffers carry compile-time
//! capacities beside declared lengths, and the single failure mode is an
//! unsatisfiable witness. Proving backends, signature verification and trust
//! policy live outside this crate.

pub mod adder;
pub mod cbor;
pub mod codec;
pub mod digest;
pub mod identity;
pub mod params;
pub mod subject;

pub use identity::{
    CircuitField, CredSubjHashCircuit, NullifierRange, PassFacts, PedersenIdentity,
    PedersenNullifierCircuit, PubIdentity, Sha512Identity, Sha512NullifierCircuit,
};
pub use params::{PassParams, PassParamsBuilder, PassProfile, CHUNK_BITS};
