//! Protocol decoders, one module per frame family.

pub(crate) mod common;
pub(crate) mod powerlink;
pub(crate) mod standard;
