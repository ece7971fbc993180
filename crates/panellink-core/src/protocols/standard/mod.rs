//! Legacy (non-extended) frame decoding.
//!
//! Standard frames carry a single command byte and an opaque payload:
//! `[0x0D] [command] [payload...] [0x43] [checksum] [0x0A]`. The payload has
//! no further structure at this layer and is rendered as spaced hex.

use serde::Serialize;

use crate::protocols::common::checksum;
use crate::protocols::powerlink::error::FrameError;
use crate::protocols::powerlink::reader::FrameReader;
use crate::protocols::powerlink::tables::Label;

/// Minimum standard frame: markers, command and checksum with no payload.
const MIN_LEN: usize = 5;

/// Decoded legacy frame.
#[derive(Debug, Clone, Serialize)]
pub struct StandardMessage {
    pub command: u8,
    pub name: Label,
    /// Payload as spaced hex; empty for bare acknowledgements.
    pub data: String,
    pub checksum_ok: bool,
}

/// Decode one delimited legacy frame.
pub fn decode(frame: &[u8]) -> Result<StandardMessage, FrameError> {
    let reader = FrameReader::new(frame);
    reader.require_len(MIN_LEN)?;
    reader.expect_marker(0, checksum::START_MARKER)?;
    reader.expect_marker(frame.len() - 1, checksum::END_MARKER)?;

    let command = reader.read_u8(1)?;
    let data = reader.read_slice(2..frame.len() - 3)?;

    Ok(StandardMessage {
        command,
        name: command_name(command),
        data: data
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" "),
        checksum_ok: checksum::verify_standard(frame),
    })
}

fn command_name(command: u8) -> Label {
    match command {
        0x02 => Label::Known("ACK"),
        0x06 => Label::Known("HELLO"),
        0x08 => Label::Known("ACCESS_DENIED"),
        0x09 => Label::Known("EPROM_RW_MODE"),
        0x0F => Label::Known("EXIT_RW_MODE"),
        0x3C => Label::Known("EPROM_INFO"),
        0x3D => Label::Known("WRITE_CONFIG"),
        0x3E => Label::Known("READ_CONFIG"),
        0x3F => Label::Known("CONFIG_VALUE"),
        0xA1 => Label::Known("ARM_ALARM"),
        0xA2 => Label::Known("REQ_STATUS"),
        0xA5 => Label::Known("STATUS_UPDATE"),
        0xA6 => Label::Known("ZONE_TYPE"),
        0xAB => Label::Known("SET_DATETIME"),
        other => Label::Unknown(other),
    }
}
