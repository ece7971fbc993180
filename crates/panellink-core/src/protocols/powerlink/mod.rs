//! Extended-protocol (`0xB0`) decoding.
//!
//! Layered like the other protocol modules: `layout` holds the byte offsets,
//! `reader` the bounds-checked access conventions, `parser` the pure
//! structural decode, `pages` the multi-page reassembly, `semantic` the
//! per-command interpretation and `decoder` the stateful orchestration.

pub(crate) mod decoder;
pub(crate) mod error;
pub(crate) mod layout;
pub(crate) mod pages;
pub(crate) mod parser;
pub(crate) mod reader;
pub(crate) mod semantic;
pub(crate) mod tables;
