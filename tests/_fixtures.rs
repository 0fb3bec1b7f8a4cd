#![allow(dead_code)]

use once_cell::sync::Lazy;

use nzcp_snark::params::{PassParams, PassParamsBuilder, PassProfile};

/// `ToBeSigned` of the NZCP specification's example pass, as decoded from
/// the published pass URI by the reference verifier.
pub const EXAMPLE_TBS_HEX: &str = "\
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

/// Independently computed SHA-256 over `Jack,Sparrow,1960-04-16`.
pub const EXAMPLE_CRED_SUBJ_HASH: &str =
    "5fb355822221720ea4ce6734e5a09e459d452574a19310c0cea7c141f43a3dab";

/// Independently computed SHA-256 over the example `ToBeSigned`.
pub const EXAMPLE_TBS_HASH: &str =
    "271ce33d671a2d3b816d788135f4343e14bc66802f8cd841faac939e8c11f3ee";

pub const EXAMPLE_GIVEN_NAME: &str = "Jack";
pub const EXAMPLE_FAMILY_NAME: &str = "Sparrow";
pub const EXAMPLE_DOB: &str = "1960-04-16";

pub const EXAMPLE_NBF: u64 = 1_635_883_530;
pub const EXAMPLE_EXP: u64 = 1_951_416_330;

/// Offsets established by the reference verifier for the example pass.
pub const EXAMPLE_CLAIMS_POS: usize = 28;
pub const EXAMPLE_CLAIM_COUNT: u64 = 5;
pub const EXAMPLE_NBF_POS: usize = 62;
pub const EXAMPLE_EXP_POS: usize = 68;
pub const EXAMPLE_VC_POS: usize = 76;
pub const EXAMPLE_SUBJECT_POS: usize = 246;

/// Chunk packings of the two digests, as consumed on-chain.
pub const EXAMPLE_CRED_SUBJ_CHUNKS: [&str; 2] = [
    "332803489704591243828114355286261993890678185647226483553216796488284950010",
    "213",
];
pub const EXAMPLE_TBS_CHUNKS: [&str; 2] = [
    "366677313775235426412199931337625106565467678080892143469223808086055532772",
    "119",
];

pub static EXAMPLE_TBS: Lazy<Vec<u8>> =
    Lazy::new(|| hex::decode(EXAMPLE_TBS_HEX).expect("fixture hex"));

pub fn example_params() -> PassParams {
    PassParamsBuilder::from_profile(PassProfile::Example)
        .build()
        .expect("example profile")
}
