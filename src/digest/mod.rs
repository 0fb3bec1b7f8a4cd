//! Concatenation, digest and commitment stages.
//!
//! Everything downstream of field extraction lives here: the identity-string
//! concatenation, the variable-length SHA-256/SHA-512 sub-circuits and the
//! Baby-Jubjub Pedersen commitment backing the privacy-preserving nullifier.
//! Digests are computed, never checked, inside the circuit; comparing them
//! against externally computed values is the caller's (or the verifier's)
//! concern.

mod concat;
mod pedersen;
mod sha256;
mod sha512;

pub use concat::{concat_cred_subj, ConcatOutput};
pub use pedersen::{
    commit_gadget, commit_native, PedersenParameters, PEDERSEN_INPUT_BYTES, PEDERSEN_WINDOWS,
    PEDERSEN_WINDOW_BITS,
};
pub use sha256::sha256_var;
pub use sha512::{sha512_var, NULLIFIER_BITS};
