//! Semantic decoders for response payloads.
//!
//! Dispatch is a closed match on the command byte; commands without a
//! dedicated decoder render their raw chunks through the generic path.
//! Decoders never fail the frame: a payload too short for its command's
//! layout degrades to [`DecodedPayload::Invalid`] with a reason string.

mod lookup;
mod settings;

use std::collections::BTreeMap;

use tracing::debug;

use super::layout;
use super::parser::{Chunk, DataChunk, StructuredResponse, hex_spaced};
use super::tables::{
    self, DEVICE_TYPE_ZONE, data_kind_name, index_name, system_state_name, zone_brightness_name,
    zone_status_name,
};
use crate::protocols::common::timestamp;
use crate::{DecodedPayload, GenericChunk, LogEvent, PartitionStatus, TimestampEntry, ZoneLastEvent};

/// Decode a reassembled response payload for its command.
pub(crate) fn decode(message: &StructuredResponse) -> DecodedPayload {
    match message.command {
        0x22 => capabilities(message),
        0x24 => panel_status(message),
        0x2A | 0x36 => event_log(message),
        layout::CMD_SETTINGS => settings::decode(message),
        0x3D => zone_temperatures(message),
        layout::CMD_LOOKUP => lookup::decode(message),
        0x4B => zone_last_events(message),
        0x51 => ask_me(message),
        0x52 => device_counts(message),
        0x64 => software_version(message),
        0x75 => timestamp_log(message),
        0x77 => zone_brightness(message),
        other => {
            debug!(command = other, "no semantic decoder, rendering raw chunks");
            generic(message)
        }
    }
}

/// Raw chunk rendering used for unknown commands and intermediate pages.
pub(crate) fn generic_chunks(chunks: &[Chunk]) -> Vec<GenericChunk> {
    chunks
        .iter()
        .map(|chunk| {
            let data = chunk.data();
            GenericChunk {
                kind: data_kind_name(data.data_type),
                index: data.index,
                index_name: index_name(data.index),
                length: data.length,
                data: data.hex_elements(),
            }
        })
        .collect()
}

fn generic(message: &StructuredResponse) -> DecodedPayload {
    DecodedPayload::Generic {
        chunks: generic_chunks(&message.chunks),
    }
}

fn first_chunk(message: &StructuredResponse) -> Result<&DataChunk, DecodedPayload> {
    message
        .chunks
        .first()
        .map(Chunk::data)
        .ok_or_else(|| invalid("no data chunk"))
}

fn invalid(reason: &str) -> DecodedPayload {
    DecodedPayload::Invalid {
        reason: reason.to_string(),
    }
}

/// ASCII rendering that drops non-ASCII bytes instead of failing.
pub(super) fn ascii_lossy(data: &[u8]) -> String {
    data.iter()
        .filter(|b| b.is_ascii())
        .map(|b| *b as char)
        .collect()
}

/// Capability counts are 2-byte little-endian values whose position in the
/// chunk selects the device class.
fn capabilities(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let mut capabilities = BTreeMap::new();
    for (idx, element) in chunk.elements.iter().enumerate() {
        let count = match element.as_slice() {
            [lo, hi] => u16::from_le_bytes([*lo, *hi]),
            [lo] => u16::from(*lo),
            _ => continue,
        };
        let Ok(idx) = u8::try_from(idx) else { break };
        capabilities.insert(index_name(idx).to_string(), count);
    }
    DecodedPayload::Capabilities { capabilities }
}

/// Panel clock plus one 4-byte status group per partition. Byte 0 of a group
/// is the arm state, byte 1 carries the status flag bits.
fn panel_status(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let flat = chunk.flat();
    if flat.len() < 18 {
        return invalid("status payload too short");
    }
    let datetime = timestamp::decode_panel_datetime(&flat[8..14]);
    let partitions = flat[16];

    let mut states = BTreeMap::new();
    for (idx, group) in flat[17..].chunks(4).enumerate() {
        let (state, flags) = match group {
            [state, flags, ..] => (*state, *flags),
            _ => break,
        };
        let Ok(partition) = u16::try_from(idx + 1) else {
            break;
        };
        states.insert(
            partition,
            PartitionStatus {
                state: system_state_name(state),
                ready: flags & 0x01 != 0,
                alarm_in_memory: flags & 0x02 != 0,
                trouble: flags & 0x04 != 0,
                bypass: flags & 0x08 != 0,
                last_10_secs: flags & 0x10 != 0,
                zone_event: flags & 0x20 != 0,
                status_changed: flags & 0x40 != 0,
                alarm_event: flags & 0x80 != 0,
            },
        );
    }
    DecodedPayload::PanelStatus {
        datetime,
        partitions,
        states,
    }
}

/// Event-log entries: 4-byte reversed timestamp, device type, zone id, a
/// reserved byte, then the event code. Zone ids are 1-based in the output
/// when the device type addresses a zone.
fn event_log(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let mut events = Vec::with_capacity(chunk.elements.len());
    for entry in &chunk.elements {
        if entry.len() < 8 {
            return invalid("truncated event entry");
        }
        let (device, zone, event) = (entry[4], entry[5], entry[7]);
        let zone = if device == DEVICE_TYPE_ZONE {
            zone.wrapping_add(1)
        } else {
            zone
        };
        events.push(LogEvent {
            datetime: timestamp::decode_reversed_timestamp(&entry[..4]),
            device: index_name(device),
            zone,
            event: tables::event_name(event),
        });
    }
    DecodedPayload::EventLog { events }
}

/// Per-zone temperature bytes: half-degree steps offset from -40.5 C, with
/// `0xFF` meaning no reading.
fn zone_temperatures(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let mut celsius = BTreeMap::new();
    for (zone, value) in chunk.flat().iter().enumerate() {
        let Ok(zone) = u16::try_from(zone + 1) else {
            break;
        };
        if *value != 0xFF {
            celsius.insert(zone, f64::from(*value) / 2.0 - 40.5);
        }
    }
    DecodedPayload::ZoneTemperatures {
        index: index_name(chunk.index),
        celsius,
    }
}

/// Per-zone light-level bytes, `0xFF` meaning no reading.
fn zone_brightness(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let mut zones = BTreeMap::new();
    for (zone, value) in chunk.flat().iter().enumerate() {
        let Ok(zone) = u16::try_from(zone + 1) else {
            break;
        };
        if *value != 0xFF {
            zones.insert(zone, zone_brightness_name(*value));
        }
    }
    DecodedPayload::ZoneBrightness {
        index: index_name(chunk.index),
        zones,
    }
}

/// 5-byte entries per zone: reversed timestamp plus a status code.
fn zone_last_events(message: &StructuredResponse) -> DecodedPayload {
    let mut zones = BTreeMap::new();
    let mut zone = 0u16;
    for chunk in &message.chunks {
        for entry in &chunk.data().elements {
            if entry.len() < 5 {
                return invalid("truncated zone entry");
            }
            zone = zone.saturating_add(1);
            zones.insert(
                zone,
                ZoneLastEvent {
                    datetime: timestamp::decode_reversed_timestamp(&entry[..4]),
                    status: zone_status_name(entry[4]),
                },
            );
        }
    }
    DecodedPayload::ZoneLastEvents { zones }
}

/// The panel lists command bytes it wants the peer to fetch.
fn ask_me(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    DecodedPayload::AskMe {
        commands: chunk.hex_elements(),
    }
}

fn device_counts(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    let flat = chunk.flat();
    let [unknown, sensors, keypads, keyfobs, sirens, pgms, ..] = flat.as_slice() else {
        return invalid("counts payload too short");
    };
    DecodedPayload::DeviceCounts {
        unknown: *unknown,
        sensors: *sensors,
        keypads: *keypads,
        keyfobs: *keyfobs,
        sirens: *sirens,
        pgms: *pgms,
    }
}

fn software_version(message: &StructuredResponse) -> DecodedPayload {
    let chunk = match first_chunk(message) {
        Ok(chunk) => chunk,
        Err(payload) => return payload,
    };
    DecodedPayload::SoftwareVersion {
        version: ascii_lossy(&chunk.flat()),
    }
}

/// Timestamped entries whose remainder has no known structure yet.
fn timestamp_log(message: &StructuredResponse) -> DecodedPayload {
    let mut entries = Vec::new();
    for chunk in &message.chunks {
        for entry in &chunk.data().elements {
            if entry.len() < 4 {
                return invalid("truncated log entry");
            }
            entries.push(TimestampEntry {
                datetime: timestamp::decode_reversed_timestamp(&entry[..4]),
                rest: hex_spaced(&entry[4..]),
            });
        }
    }
    DecodedPayload::TimestampLog { entries }
}
