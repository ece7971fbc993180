//! Frame checksum engine.
//!
//! The panel link uses a complement checksum: sum all bytes, then
//! `0xFF - (sum % 0xFF)`, with a result of `0xFF` normalized to `0x00`.
//! Verification is advisory; a mismatch is reported as a flag on the decoded
//! message and never aborts decoding.

/// Frame start marker.
pub const START_MARKER: u8 = 0x0D;
/// Marker terminating the data section, before the checksum byte.
pub const END_DATA_MARKER: u8 = 0x43;
/// Frame end marker.
pub const END_MARKER: u8 = 0x0A;

/// Compute the checksum over `bytes`.
pub fn frame_checksum(bytes: &[u8]) -> u8 {
    let sum: u32 = bytes.iter().map(|b| u32::from(*b)).sum();
    let checksum = 0xFF - (sum % 0xFF);
    if checksum == 0xFF { 0x00 } else { checksum as u8 }
}

/// Verify a PowerLink frame: delimiters plus the embedded checksum, which
/// covers everything between the start marker and the checksum byte
/// (the end-of-data marker and message counter included).
pub fn verify_powerlink(frame: &[u8]) -> bool {
    verify_with_span(frame, frame.len().saturating_sub(2))
}

/// Verify a standard frame. Observed panel ACKs checksum only the bytes
/// between the start marker and the end-of-data marker.
pub fn verify_standard(frame: &[u8]) -> bool {
    verify_with_span(frame, frame.len().saturating_sub(3))
}

fn verify_with_span(frame: &[u8], span_end: usize) -> bool {
    if frame.len() < 5 {
        return false;
    }
    frame[0] == START_MARKER
        && frame[frame.len() - 3] == END_DATA_MARKER
        && frame[frame.len() - 1] == END_MARKER
        && frame_checksum(&frame[1..span_end]) == frame[frame.len() - 2]
}
