//! Protocol key constants baked into the scanner.
//!
//! Each pattern is the exact CBOR encoding of the key as it appears on the
//! wire: CWT claim keys are single unsigned-integer bytes, credential keys
//! are text strings including their major-type-3 header byte.

/// CWT claim key `4` (`exp`).
pub const KEY_EXP: &[u8] = &[0x04];

/// CWT claim key `5` (`nbf`).
pub const KEY_NBF: &[u8] = &[0x05];

/// Text key `"vc"`.
pub const KEY_VC: &[u8] = &[0x62, b'v', b'c'];

/// Text key `"credentialSubject"`.
pub const KEY_CREDENTIAL_SUBJECT: &[u8] = &[
    0x71, b'c', b'r', b'e', b'd', b'e', b'n', b't', b'i', b'a', b'l', b'S', b'u', b'b', b'j',
    b'e', b'c', b't',
];

/// Text key `"givenName"`.
pub const KEY_GIVEN_NAME: &[u8] = &[0x69, b'g', b'i', b'v', b'e', b'n', b'N', b'a', b'm', b'e'];

/// Text key `"familyName"`.
pub const KEY_FAMILY_NAME: &[u8] = &[
    0x6a, b'f', b'a', b'm', b'i', b'l', b'y', b'N', b'a', b'm', b'e',
];

/// Text key `"dob"`.
pub const KEY_DOB: &[u8] = &[0x63, b'd', b'o', b'b'];
