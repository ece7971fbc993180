//! Conventions shared by both panel protocols.
//!
//! The PowerLink and standard protocols use the same frame delimiters and the
//! same complement checksum; only the checksum span differs. Timestamp
//! encodings (reversed unix seconds, panel datetime bytes) are shared as well.

pub(crate) mod checksum;
pub(crate) mod timestamp;
