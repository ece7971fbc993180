//! Lookup-table reply decoding (command `0x42`).
//!
//! Shares the settings selector space but carries entry bookkeeping (table
//! size, window position) and slices the payload into fixed-size entries.
//! Selectors holding string tables mis-declare their encoding as integer on
//! the wire, so a few get bespoke decoders.

use tracing::debug;

use super::super::parser::{Chunk, ParamChunk, StructuredResponse, hex_spaced};
use super::super::tables::setting_kind_name;
use super::settings::{decode_elementwise, selector_name};
use super::ascii_lossy;
use crate::{DecodedPayload, LookupPayload, ScalarValue, SettingValue};

pub(crate) fn decode(message: &StructuredResponse) -> DecodedPayload {
    let (Some(selector), Some(Chunk::Param(param))) = (message.params, message.chunks.first())
    else {
        return DecodedPayload::Invalid {
            reason: "lookup reply without selector or entry chunk".to_string(),
        };
    };
    let value = decode_value(selector, param);
    DecodedPayload::LookupTable(LookupPayload {
        selector: hex_spaced(&selector),
        name: selector_name(selector),
        data_kind: setting_kind_name(param.chunk.data_type),
        length: param.chunk.length,
        max_entries: param.max_entries,
        entries: param.entries,
        start_entry: param.start_entry,
        entry_size: param.chunk_size,
        value,
    })
}

fn decode_value(selector: [u8; 2], param: &ParamChunk) -> SettingValue {
    match selector {
        // String tables declared as integers on the wire.
        [0x80, 0x00] | [0x81, 0x00] | [0x82, 0x00] | [0xA4, 0x00] => {
            zero_padded_strings(&param.chunk.elements)
        }
        [0xA5, 0x00] => ff_terminated_strings(&param.chunk.elements),
        _ => {
            debug!(
                selector = %hex_spaced(&selector),
                data_type = param.chunk.data_type,
                "no bespoke lookup decoder, using value encoding"
            );
            decode_elementwise(
                param.chunk.data_type,
                &param.chunk.elements,
                usize::from(param.chunk_size),
            )
        }
    }
}

fn zero_padded_strings(elements: &[Vec<u8>]) -> SettingValue {
    SettingValue::from_list(
        elements
            .iter()
            .map(|entry| {
                ScalarValue::Str(ascii_lossy(entry).trim_end_matches('\0').to_string())
            })
            .collect(),
    )
}

/// Entries are digit nibbles padded with `0xFF`; rendering strips the pad
/// bytes from the hex form.
fn ff_terminated_strings(elements: &[Vec<u8>]) -> SettingValue {
    SettingValue::from_list(
        elements
            .iter()
            .map(|entry| {
                let hex: String = entry.iter().map(|b| format!("{b:02x}")).collect();
                ScalarValue::Str(hex.replace("ff", ""))
            })
            .collect(),
    )
}
