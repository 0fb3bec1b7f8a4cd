//! CBOR claim location, native and in-circuit.
//!
//! The credential payload is a COSE `Sig_structure` whose CWT claims map
//! carries the timestamps and the `vc` object. This module knows how to find
//! the claims this protocol cares about:
//!
//! * [`keys`] — the fixed on-wire byte patterns of every scanned key;
//! * [`decode`] — native header decoding and map walking for witness
//!   preparation and test oracles;
//! * [`scanner`] — the unrolled constraint-system walk emitting
//!   pattern-asserted value offsets.
//!
//! Both walkers implement the same discipline (first match wins, the walk
//! freezes once every target is located), so a native offset and a gadget
//! offset never disagree on the same payload.

pub mod keys;

mod decode;
mod scanner;

pub(crate) use scanner::decompose_header;

pub use decode::{read_header, scan_map as scan_map_native, skip_item, Header, MajorType, PassParseError};
pub use scanner::{scan_map, MatchedKey, TargetKey, ValueKind};
