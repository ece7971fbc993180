//! End-to-end decode checks against captured and hand-built frames.

use panellink_core::{
    DecodedMessage, DecodedPayload, FrameDecoder, Label, LinkMessage, ScalarValue, SettingValue,
};

/// Independent checksum: ones-complement of the byte sum modulo 255, with
/// 0xFF normalized to zero.
fn checksum(span: &[u8]) -> u8 {
    let sum: u32 = span.iter().map(|b| u32::from(*b)).sum();
    let value = 0xFFu8 - (sum % 0xFF) as u8;
    if value == 0xFF { 0x00 } else { value }
}

/// Wrap a body (discriminator through last data byte) into a delimited frame.
fn build_frame(body: &[u8]) -> Vec<u8> {
    let mut frame = vec![0x0D];
    frame.extend_from_slice(body);
    frame.push(0x07); // message counter
    frame.push(0x43);
    frame.push(checksum(&frame[1..]));
    frame.push(0x0A);
    frame
}

fn decode_response(decoder: &mut FrameDecoder, frame: &[u8]) -> panellink_core::ResponseMessage {
    match decoder.decode(frame).expect("frame decodes") {
        LinkMessage::Powerlink(DecodedMessage::Response(response)) => response,
        other => panic!("expected powerlink response, got {other:?}"),
    }
}

#[test]
fn standard_ack_frame() {
    let mut decoder = FrameDecoder::new();
    let frame = [0x0D, 0x02, 0x02, 0x02, 0x43, 0xF9, 0x0A];
    let LinkMessage::Standard(message) = decoder.decode(&frame).unwrap() else {
        panic!("expected standard message");
    };
    assert_eq!(message.command, 0x02);
    assert_eq!(message.name, Label::Known("ACK"));
    assert!(message.checksum_ok);
}

#[test]
fn settings_serial_number_strips_padding() {
    let mut decoder = FrameDecoder::new();
    // Selector 02 00, zero-padded string payload "PM360\0\0\0".
    let mut body = vec![
        0xB0, 0x03, 0x35, 0x10, 0xFF, 0x08, 0xFF, 0x0B, 0x02, 0x00, 0x00,
    ];
    body.extend(b"PM360\0\0\0");
    let frame = build_frame(&body);

    let response = decode_response(&mut decoder, &frame);
    assert_eq!(response.command_name, Label::Known("SETTINGS"));
    assert_eq!(response.selector.as_deref(), Some("02 00"));
    let DecodedPayload::Settings(payload) = response.payload else {
        panic!("expected settings payload, got {:?}", response.payload);
    };
    assert_eq!(payload.name, Label::Known("PANEL_SERIAL_NO"));
    assert_eq!(payload.data_kind, Label::Known("ZERO_PADDED_STRING"));
    assert_eq!(
        payload.value,
        SettingValue::Scalar(ScalarValue::Str("PM360".to_string()))
    );
}

#[test]
fn zone_temperatures_are_one_based_and_sparse() {
    let mut decoder = FrameDecoder::new();
    // One generic chunk, two zone bytes: 0x00 (reading) and 0xFF (absent).
    let body = [0xB0, 0x03, 0x3D, 0x06, 0xFF, 0x08, 0x03, 0x02, 0x00, 0xFF];
    let frame = build_frame(&body);

    let response = decode_response(&mut decoder, &frame);
    let DecodedPayload::ZoneTemperatures { index, celsius } = response.payload else {
        panic!("expected temperatures, got {:?}", response.payload);
    };
    assert_eq!(index, Label::Known("ZONES"));
    assert_eq!(celsius.len(), 1);
    assert_eq!(celsius.get(&1), Some(&(-40.5)));
    assert!(!celsius.contains_key(&2));
}

fn log_entry(ts: u32, device: u8, zone: u8, event: u8) -> Vec<u8> {
    let mut entry = ts.to_le_bytes().to_vec();
    entry.extend([device, zone, 0x00, event, 0x00, 0x00]);
    entry
}

fn log_page(message_type: u8, page: u8, entries: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = entries.concat();
    let mut body = vec![
        0xB0,
        message_type,
        0x2A,
        (payload.len() + 4) as u8,
        page,
        80, // ten-byte entries
        0xFF,
        payload.len() as u8,
    ];
    body.extend(payload);
    build_frame(&body)
}

#[test]
fn paged_event_log_keeps_arrival_order() {
    let mut decoder = FrameDecoder::new();
    let pages = [
        log_page(0x02, 0x01, &[log_entry(1_721_212_658, 0x0C, 0, 81)]),
        log_page(0x02, 0x02, &[log_entry(1_721_212_659, 0x03, 0x02, 85)]),
    ];
    for page in &pages {
        let held = decode_response(&mut decoder, page);
        assert!(matches!(held.payload, DecodedPayload::PagePending { .. }));
    }

    let terminal = log_page(0x03, 0xFF, &[log_entry(1_721_212_660, 0x0C, 0, 85)]);
    let done = decode_response(&mut decoder, &terminal);
    let DecodedPayload::EventLog { events } = done.payload else {
        panic!("expected event log, got {:?}", done.payload);
    };
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].event, Label::Known("Arm Home"));
    assert_eq!(events[0].datetime.as_deref(), Some("2024-07-17 10:37:38"));
    assert_eq!(events[1].device, Label::Known("ZONES"));
    assert_eq!(events[1].zone, 3);
    assert_eq!(events[2].event, Label::Known("Disarm"));
}

#[test]
fn json_rendering_is_tagged() {
    let mut decoder = FrameDecoder::new();
    let frame = log_page(0x03, 0xFF, &[log_entry(1_721_212_658, 0x0C, 0, 81)]);
    let message = decoder.decode(&frame).unwrap();
    let value = serde_json::to_value(&message).unwrap();

    assert_eq!(value["protocol"], "powerlink");
    assert_eq!(value["message_type"], "RESPONSE");
    assert_eq!(value["command_name"], "STANDARD_EVENT_LOG");
    assert_eq!(value["payload"]["kind"], "event_log");
    assert_eq!(value["payload"]["events"][0]["event"], "Arm Home");
}

#[test]
fn every_command_byte_decodes_to_something() {
    // Totality: any structurally valid response decodes without error. The
    // payload is long enough to cover the widest bespoke header (0x42).
    for command in 0u8..=255 {
        let mut decoder = FrameDecoder::new();
        let mut body = vec![0xB0, 0x03, command, 0x16, 0xFF, 0x08, 0x03, 0x12];
        body.extend(1u8..=18);
        let frame = build_frame(&body);
        let decoded = decoder.decode(&frame);
        assert!(decoded.is_ok(), "command {command:#04x} failed to decode");
    }
}

#[test]
fn reassembled_zone_payload_spans_more_than_255_zones() {
    let mut decoder = FrameDecoder::new();
    let mut first = vec![0xB0, 0x02, 0x3D, 134, 0x01, 0x08, 0x03, 130];
    first.extend(vec![0x51u8; 130]);
    let mut terminal = vec![0xB0, 0x03, 0x3D, 134, 0xFF, 0x08, 0x03, 130];
    terminal.extend(vec![0x51u8; 130]);

    let held = decode_response(&mut decoder, &build_frame(&first));
    assert!(matches!(held.payload, DecodedPayload::PagePending { .. }));

    let done = decode_response(&mut decoder, &build_frame(&terminal));
    let DecodedPayload::ZoneTemperatures { celsius, .. } = done.payload else {
        panic!("expected temperatures, got {:?}", done.payload);
    };
    assert_eq!(celsius.len(), 260);
    assert_eq!(celsius.get(&1), Some(&0.0));
    assert_eq!(celsius.get(&260), Some(&0.0));
}

#[test]
fn abandoned_pages_do_not_leak_into_other_commands() {
    let mut decoder = FrameDecoder::new();
    let orphan = log_page(0x02, 0x01, &[log_entry(1, 0x0C, 0, 1)]);
    decode_response(&mut decoder, &orphan);

    // Terminal frame for a different command must not see the 0x2A pages.
    let body = [0xB0, 0x03, 0x3D, 0x06, 0xFF, 0x08, 0x03, 0x02, 0x00, 0xFF];
    let frame = build_frame(&body);
    let response = decode_response(&mut decoder, &frame);
    let DecodedPayload::ZoneTemperatures { celsius, .. } = response.payload else {
        panic!("expected temperatures");
    };
    assert_eq!(celsius.len(), 1);
}
