//! Configuration-reply decoding (command `0x35`).
//!
//! The two-byte selector names the setting being read. A handful of
//! selectors have bespoke value layouts; everything else decodes through the
//! value-encoding byte the wire carries (zero-padded string, little-endian
//! words, and so on).

use std::collections::BTreeMap;

use tracing::debug;

use super::super::parser::{Chunk, DataChunk, StructuredResponse, hex_spaced};
use super::super::tables::{Label, setting_kind_name, zone_type_name};
use super::ascii_lossy;
use crate::{DecodedPayload, ScalarValue, SettingValue, SettingsPayload};

/// Settings-value encodings carried in the data-type byte of configuration
/// replies.
pub(super) const KIND_ZERO_PADDED_STRING: u8 = 0;
pub(super) const KIND_DIRECT_MAP_STRING: u8 = 1;
pub(super) const KIND_FF_PADDED_STRING: u8 = 2;
pub(super) const KIND_DOUBLE_LE_INT: u8 = 3;
pub(super) const KIND_INTEGER: u8 = 4;
pub(super) const KIND_STRING: u8 = 6;
pub(super) const KIND_SPACE_PADDED_STRING: u8 = 8;
pub(super) const KIND_SPACE_PADDED_STRING_LIST: u8 = 10;

pub(crate) fn decode(message: &StructuredResponse) -> DecodedPayload {
    let (Some(selector), Some(chunk)) = (message.params, message.chunks.first().map(Chunk::data))
    else {
        return DecodedPayload::Invalid {
            reason: "settings reply without selector or data".to_string(),
        };
    };
    let value = decode_value(selector, chunk);
    DecodedPayload::Settings(SettingsPayload {
        selector: hex_spaced(&selector),
        name: selector_name(selector),
        data_kind: setting_kind_name(chunk.data_type),
        length: chunk.length,
        value,
    })
}

fn decode_value(selector: [u8; 2], chunk: &DataChunk) -> SettingValue {
    match selector {
        [0x07, 0x00] => capability_map(&chunk.flat()),
        [0x08, 0x00] => user_codes(&chunk.flat()),
        [0x31, 0x00] => zone_types(&chunk.flat()),
        [0x32, 0x00] => zone_name_ids(&chunk.flat()),
        [0x45, 0x00] | [0x46, 0x00] => newline_list(&chunk.flat()),
        [0x54, 0x01] => network_config(&chunk.flat()),
        _ => {
            debug!(
                selector = %hex_spaced(&selector),
                data_type = chunk.data_type,
                "no bespoke settings decoder, using value encoding"
            );
            if chunk.data_type == KIND_INTEGER {
                decode_elementwise(chunk.data_type, &chunk.elements, 30)
            } else {
                decode_by_kind(chunk.data_type, &chunk.flat(), 16)
            }
        }
    }
}

/// Decode one flat payload according to its value encoding. `string_size`
/// sets the entry width for fixed-width string lists.
pub(super) fn decode_by_kind(data_type: u8, data: &[u8], string_size: usize) -> SettingValue {
    match data_type {
        KIND_ZERO_PADDED_STRING => scalar_str(ascii_lossy(data).trim_end_matches('\0')),
        KIND_DIRECT_MAP_STRING => scalar_str(&hex_plain(data)),
        KIND_FF_PADDED_STRING => scalar_str(&hex_plain(data).replace("ff", "")),
        KIND_DOUBLE_LE_INT => SettingValue::from_list(
            data.chunks(2)
                .map(|pair| {
                    let value = match *pair {
                        [lo, hi] => u16::from_le_bytes([lo, hi]),
                        [lo] => u16::from(lo),
                        [] | [_, _, ..] => 0,
                    };
                    ScalarValue::Int(i64::from(value))
                })
                .collect(),
        ),
        KIND_INTEGER => {
            SettingValue::from_list(data.iter().map(|b| ScalarValue::Int(i64::from(*b))).collect())
        }
        KIND_STRING => scalar_str(&ascii_lossy(data)),
        KIND_SPACE_PADDED_STRING => scalar_str(ascii_lossy(data).trim_end_matches(' ')),
        KIND_SPACE_PADDED_STRING_LIST => {
            // Fixed-width entries; NUL bytes appear in place of spaces on
            // some firmware and are dropped as well.
            let text = ascii_lossy(data);
            let width = string_size.max(1);
            SettingValue::from_list(
                text.as_bytes()
                    .chunks(width)
                    .map(|piece| {
                        String::from_utf8_lossy(piece)
                            .replace('\0', "")
                            .trim_end_matches(' ')
                            .to_string()
                    })
                    .filter(|piece| !piece.is_empty())
                    .map(ScalarValue::Str)
                    .collect(),
            )
        }
        _ => scalar_str(&hex_spaced(data)),
    }
}

/// Decode element-sliced payloads entry by entry, collapsing single results.
pub(super) fn decode_elementwise(
    data_type: u8,
    elements: &[Vec<u8>],
    string_size: usize,
) -> SettingValue {
    let mut values = Vec::with_capacity(elements.len());
    for element in elements {
        match decode_by_kind(data_type, element, string_size) {
            SettingValue::Scalar(value) => values.push(value),
            SettingValue::Empty => {}
            SettingValue::List(_) | SettingValue::Map(_) => {
                // Multi-valued entries have no nested rendering; keep hex.
                values.push(ScalarValue::Str(hex_spaced(element)));
            }
        }
    }
    SettingValue::from_list(values)
}

fn scalar_str(text: &str) -> SettingValue {
    SettingValue::Scalar(ScalarValue::Str(text.to_string()))
}

fn hex_plain(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Device-capacity pairs in selector order. The position table differs from
/// the chunk-index one (events and partitions swap places).
fn capability_map(data: &[u8]) -> SettingValue {
    const POSITIONS: [&str; 20] = [
        "REPEATERS",
        "X10",
        "SIRENS",
        "ZONES",
        "KEYPADS",
        "KEYFOBS",
        "USERCODES",
        "CAMERAS_A",
        "UNKNOWN_8",
        "POWERLINK",
        "TAGS",
        "CAMERAS_B",
        "PANEL",
        "UNKNOWN_13",
        "EVENTS",
        "PARTITIONS",
        "UNKNOWN_16",
        "UNKNOWN_17",
        "UNKNOWN_18",
        "UNKNOWN_19",
    ];
    let mut map = BTreeMap::new();
    for (idx, pair) in data.chunks_exact(2).enumerate() {
        let name = POSITIONS
            .get(idx)
            .map(|name| (*name).to_string())
            .unwrap_or_else(|| format!("Unknown-{idx}"));
        map.insert(
            name,
            ScalarValue::Int(i64::from(u16::from_le_bytes([pair[0], pair[1]]))),
        );
    }
    SettingValue::Map(map)
}

/// User PIN codes as 4-hex-digit strings, 1-based slot keys. Empty slots
/// (`0000`) are omitted.
fn user_codes(data: &[u8]) -> SettingValue {
    let mut map = BTreeMap::new();
    for (idx, pair) in data.chunks_exact(2).enumerate() {
        let code = hex_plain(pair);
        if code != "0000" {
            map.insert((idx + 1).to_string(), ScalarValue::Str(code));
        }
    }
    SettingValue::Map(map)
}

fn zone_types(data: &[u8]) -> SettingValue {
    SettingValue::from_list(
        data.iter()
            .map(|b| ScalarValue::Str(zone_type_name(*b).to_string()))
            .collect(),
    )
}

fn zone_name_ids(data: &[u8]) -> SettingValue {
    SettingValue::from_list(data.iter().map(|b| ScalarValue::Int(i64::from(*b))).collect())
}

/// Newline-separated name table, trailing spaces trimmed per entry.
fn newline_list(data: &[u8]) -> SettingValue {
    SettingValue::from_list(
        ascii_lossy(data)
            .split('\n')
            .map(|name| name.trim_end_matches(' '))
            .filter(|name| !name.is_empty())
            .map(|name| ScalarValue::Str(name.to_string()))
            .collect(),
    )
}

/// DHCP reply: three 6-byte groups (address, subnet, gateway), each rendered
/// as four dot-separated 3-hex-digit fields.
fn network_config(data: &[u8]) -> SettingValue {
    const FIELDS: [&str; 3] = ["IP", "Subnet", "Gateway"];
    let mut map = BTreeMap::new();
    for (group, name) in data.chunks_exact(6).zip(FIELDS) {
        let digits = hex_plain(group);
        let dotted = digits
            .as_bytes()
            .chunks(3)
            .map(|piece| String::from_utf8_lossy(piece).to_string())
            .collect::<Vec<_>>()
            .join(".");
        map.insert(name.to_string(), ScalarValue::Str(dotted));
    }
    SettingValue::Map(map)
}

/// Known configuration selectors. Unconfirmed entries keep the raw low byte
/// in [`Label::Unknown`] form.
pub(crate) fn selector_name(selector: [u8; 2]) -> Label {
    match selector {
        [0x00, 0x00] => Label::Known("COMMS_CS_REC1_ACCT"),
        [0x01, 0x00] => Label::Known("COMMS_CS_REC2_ACCT"),
        [0x02, 0x00] => Label::Known("PANEL_SERIAL_NO"),
        [0x03, 0x00] => Label::Known("COMMS_CS_REC1_IP"),
        [0x04, 0x00] => Label::Known("COMMS_CS_REC1_PORT"),
        [0x05, 0x00] => Label::Known("COMMS_CS_REC2_IP"),
        [0x06, 0x00] => Label::Known("COMMS_CS_REC2_PORT"),
        [0x07, 0x00] => Label::Known("CAPABILITIES"),
        [0x08, 0x00] => Label::Known("USER_CODES"),
        [0x0D, 0x00] => Label::Known("ZONE_NAMES"),
        [0x0F, 0x00] => Label::Known("DOWNLOAD_CODE"),
        [0x15, 0x01] => Label::Known("POWERLINK_SW_VERSION"),
        [0x18, 0x01] => Label::Known("EMAIL_REPORTED_EVENTS"),
        [0x19, 0x01] => Label::Known("SMS_REPORTED_EVENTS"),
        [0x1A, 0x01] => Label::Known("MMS_REPORTED_EVENTS"),
        [0x24, 0x00] => Label::Known("PANEL_EPROM_VERSION"),
        [0x27, 0x00] => Label::Known("TYPE_OFFSETS"),
        [0x28, 0x00] => Label::Known("CAPABILITIES2"),
        [0x2B, 0x00] => Label::Known("UNKNOWN_SOFTWARE_VERSION"),
        [0x2C, 0x00] => Label::Known("PANEL_DEFAULT_VERSION"),
        [0x2D, 0x00] => Label::Known("PANEL_SOFTWARE_VERSION"),
        [0x30, 0x00] => Label::Known("PARTITIONS_ENABLED"),
        [0x31, 0x00] => Label::Known("ASSIGNED_ZONE_TYPES"),
        [0x32, 0x00] => Label::Known("ASSIGNED_ZONE_NAMES"),
        [0x32, 0x01] => Label::Known("UNKNOWN_SW_VERSION"),
        [0x33, 0x00] => Label::Known("SOMETHING_ZONES"),
        [0x34, 0x00] => Label::Known("MAP_VALUE"),
        [0x35, 0x00] => Label::Known("MAP_VALUE_2"),
        [0x36, 0x00] => Label::Known("SOMETHING_ZONES_2"),
        [0x37, 0x00] => Label::Known("SOMETHING_32_OF"),
        [0x38, 0x00] => Label::Known("SOMETHING_32_OF_2"),
        [0x39, 0x00] => Label::Known("SOMETHING_8_OF"),
        [0x3C, 0x00] => Label::Known("PANEL_HARDWARE_VERSION"),
        [0x3D, 0x00] => Label::Known("PANEL_RSU_VERSION"),
        [0x3E, 0x00] => Label::Known("PANEL_BOOT_VERSION"),
        [0x42, 0x00] => Label::Known("CUSTOM_ZONE_NAMES"),
        [0x45, 0x00] => Label::Known("ZONE_NAMES2"),
        [0x46, 0x00] => Label::Known("CUSTOM_ZONE_NAMES2"),
        [0x47, 0x00] => Label::Known("H24_TIME_FORMAT"),
        [0x48, 0x00] => Label::Known("US_DATE_FORMAT"),
        [0x4E, 0x00] => Label::Known("PARTITIONS"),
        [0x50, 0x01] => Label::Known("TROUBLES"),
        [0x54, 0x00] => Label::Known("INSTALLER_CODE"),
        [0x54, 0x01] => Label::Known("DHCP_IP"),
        [0x55, 0x00] => Label::Known("MASTER_CODE"),
        [0x56, 0x00] => Label::Known("GUARD_CODE"),
        [0x58, 0x00] => Label::Known("EXIT_DELAY"),
        [0x5B, 0x00] => Label::Known("BYPASS_ARM"),
        [0x5B, 0x01] => Label::Known("KIDS_COME_HOME"),
        [0x61, 0x00] => Label::Known("DURESS_CODE"),
        [0x70, 0x01] => Label::Known("ENABLE_API"),
        [0x71, 0x01] => Label::Known("PANEL_SERIAL"),
        [0x73, 0x01] => Label::Known("HOME_AUTOMATION_SERVICE"),
        [0x74, 0x01] => Label::Known("ENABLE_SSH"),
        [0x7B, 0x01] => Label::Known("MAYBE_MAX_USER_CODES"),
        [0x80, 0x00] => Label::Known("COMMS_GPRS_APN"),
        [0x81, 0x00] => Label::Known("COMMS_GPRS_USER"),
        [0x82, 0x00] => Label::Known("COMMS_GPRS_PWD"),
        [0x85, 0x01] => Label::Known("SSL_FOR_IPMP"),
        [0x87, 0x01] => Label::Known("LOG_EMAIL_SEND_NOW"),
        [0x89, 0x01] => Label::Known("UNKNOWN_EMAIL"),
        [0x8A, 0x01] => Label::Known("UNKNOWN_PWD"),
        [0x8C, 0x00] => Label::Known("COMMS_CS_REC1_TELNO"),
        [0x8D, 0x00] => Label::Known("COMMS_CS_REC2_TELNO"),
        [0x8D, 0x01] => Label::Known("DNS_NAME"),
        [0x8E, 0x00] => Label::Known("COMMS_CS_REC12_SMS"),
        [0x8E, 0x01] => Label::Known("ABORT_TIME"),
        [0x8F, 0x01] => Label::Known("ENTRY_DELAY"),
        [0x9D, 0x01] => Label::Known("DO_NOT_USE"),
        [0xA4, 0x00] => Label::Known("EMAIL_ADDRESSES"),
        [0xA5, 0x00] => Label::Known("PHONE_NUMBERS"),
        [0xA6, 0x00] => Label::Known("VIEW_ON_DEMAND"),
        [0xA7, 0x00] => Label::Known("VIEW_ON_DEMAND_TIME_WINDOW"),
        [0xA8, 0x01] => Label::Known("LOG_FTP_SITE"),
        [0xA9, 0x01] => Label::Known("LOG_FTP_UID"),
        [0xAA, 0x01] => Label::Known("LOG_FTP_PWD"),
        [0xAE, 0x00] => Label::Known("DHCP_MODE"),
        [0xAF, 0x00] => Label::Known("POWERLINK_IP"),
        [0xB0, 0x00] => Label::Known("POWERLINK_SUBNET"),
        [0xB1, 0x00] => Label::Known("POWERLINK_GATEWAY"),
        [0xE2, 0x00] => Label::Known("USER_PARTITION_ACCESS"),
        [0xE5, 0x00] => Label::Known("USER_CODES2"),
        [0xE8, 0x00] => Label::Known("PANEL_LANGUAGE"),
        [0xE9, 0x00] => Label::Known("ACCEPTED_CHARS_UPPER"),
        [0xEA, 0x00] => Label::Known("ACCEPTED_CHARS_LOWER"),
        [0xEB, 0x00] => Label::Known("INVESTIGATE_MORE"),
        [low, _] => Label::Unknown(low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::powerlink::tables::MessageType;

    fn settings_response(selector: [u8; 2], data_type: u8, elements: Vec<Vec<u8>>) -> StructuredResponse {
        let length = elements.iter().map(|e| e.len() as u16).sum();
        StructuredResponse {
            message_type: MessageType::Response,
            command: 0x35,
            declared_length: 0,
            page: 0xFF,
            params: Some(selector),
            chunks: vec![Chunk::Data(DataChunk {
                data_type,
                index: 0xFF,
                length,
                elements,
            })],
            counter: 0,
        }
    }

    fn decoded(selector: [u8; 2], data_type: u8, elements: Vec<Vec<u8>>) -> SettingsPayload {
        match decode(&settings_response(selector, data_type, elements)) {
            DecodedPayload::Settings(payload) => payload,
            other => panic!("expected settings payload, got {other:?}"),
        }
    }

    #[test]
    fn serial_number_decodes_as_hex_string() {
        let payload = decoded([0x02, 0x00], 1, vec![vec![0xA0, 0x86, 0x01, 0x00]]);
        assert_eq!(payload.name, Label::Known("PANEL_SERIAL_NO"));
        assert_eq!(payload.data_kind, Label::Known("DIRECT_MAP_STRING"));
        assert_eq!(
            payload.value,
            SettingValue::Scalar(ScalarValue::Str("a0860100".to_string()))
        );
    }

    #[test]
    fn capability_positions_differ_from_chunk_indices() {
        let mut data = vec![0u8; 32];
        data[6] = 0x40; // ZONES = 64
        data[28] = 0x03; // PARTITIONS (position 14 is EVENTS here)
        data[30] = 0x02;
        let payload = decoded([0x07, 0x00], 16, vec![data]);
        let SettingValue::Map(map) = payload.value else {
            panic!("expected map");
        };
        assert_eq!(map.get("ZONES"), Some(&ScalarValue::Int(64)));
        assert_eq!(map.get("EVENTS"), Some(&ScalarValue::Int(3)));
        assert_eq!(map.get("PARTITIONS"), Some(&ScalarValue::Int(2)));
    }

    #[test]
    fn user_codes_skip_empty_slots() {
        let data = vec![0x60, 0x52, 0x00, 0x00, 0x12, 0x34];
        let payload = decoded([0x08, 0x00], 1, vec![data]);
        let SettingValue::Map(map) = payload.value else {
            panic!("expected map");
        };
        assert_eq!(map.get("1"), Some(&ScalarValue::Str("6052".to_string())));
        assert!(!map.contains_key("2"));
        assert_eq!(map.get("3"), Some(&ScalarValue::Str("1234".to_string())));
    }

    #[test]
    fn zone_type_assignments_resolve_names() {
        let payload = decoded([0x31, 0x00], 4, vec![vec![0x0B], vec![0x07], vec![0x63]]);
        assert_eq!(
            payload.value,
            SettingValue::List(vec![
                ScalarValue::Str("Fire".to_string()),
                ScalarValue::Str("Perimeter".to_string()),
                ScalarValue::Str("Unknown-99".to_string()),
            ])
        );
    }

    #[test]
    fn newline_lists_trim_and_skip_blanks() {
        let data = b"Front Door  \nGarage\n\n".to_vec();
        let payload = decoded([0x45, 0x00], 6, vec![data]);
        assert_eq!(
            payload.value,
            SettingValue::List(vec![
                ScalarValue::Str("Front Door".to_string()),
                ScalarValue::Str("Garage".to_string()),
            ])
        );
    }

    #[test]
    fn network_config_renders_dotted_hex() {
        let data = vec![
            0x19, 0x21, 0x68, 0x01, 0x00, 0x00, 0x25, 0x52, 0x55, 0x25, 0x50, 0x00, 0x19, 0x21,
            0x68, 0x00, 0x01, 0x00,
        ];
        let payload = decoded([0x54, 0x01], 1, vec![data]);
        let SettingValue::Map(map) = payload.value else {
            panic!("expected map");
        };
        assert_eq!(
            map.get("IP"),
            Some(&ScalarValue::Str("192.168.010.000".to_string()))
        );
        assert_eq!(
            map.get("Subnet"),
            Some(&ScalarValue::Str("255.255.255.000".to_string()))
        );
    }

    #[test]
    fn generic_integer_elements_collapse() {
        let payload = decoded([0x4E, 0x00], 4, vec![vec![0x03]]);
        assert_eq!(payload.value, SettingValue::Scalar(ScalarValue::Int(3)));
        assert_eq!(payload.name, Label::Known("PARTITIONS"));
    }

    #[test]
    fn generic_le_words_decode_as_ints() {
        let payload = decoded([0x04, 0x00], 3, vec![vec![0x26, 0x0B], vec![0x27, 0x0B]]);
        assert_eq!(
            payload.value,
            SettingValue::List(vec![ScalarValue::Int(2854), ScalarValue::Int(2855)])
        );
    }

    #[test]
    fn missing_selector_is_invalid() {
        let mut message = settings_response([0x02, 0x00], 1, vec![vec![0x01]]);
        message.params = None;
        assert!(matches!(decode(&message), DecodedPayload::Invalid { .. }));
    }
}
