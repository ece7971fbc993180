use thiserror::Error;

/// Errors returned by PowerLink frame reading and structural decoding.
///
/// Semantic problems (unknown commands, checksum mismatches, unrecognized
/// selectors) are deliberately not errors; only frames the structural decoder
/// cannot address safely are rejected.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("missing marker at offset {offset}: expected {expected:#04x}, got {found:#04x}")]
    MissingMarker {
        offset: usize,
        expected: u8,
        found: u8,
    },
}
