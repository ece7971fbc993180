//! Frame structural decoder.
//!
//! Splits a delimited PowerLink frame into header fields plus a list of data
//! chunks, without interpreting the payload. Requests, add/remove frames and
//! the response family use different layouts, and within the response family
//! commands `0x0F`, `0x35` and `0x42` have bespoke headers; all offsets live
//! in [`super::layout`]. Chunk payloads are re-sliced into fixed-width
//! elements according to the chunk's data type (`max(1, bit_width / 8)`
//! bytes per element).

use super::error::FrameError;
use super::layout;
use super::reader::FrameReader;
use super::tables::{MessageType, element_width};
use crate::protocols::common::checksum;

/// One logically contiguous run of same-typed values inside a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    pub data_type: u8,
    pub index: u8,
    pub length: u16,
    /// Fixed-width payload slices; flat layouts carry a single element.
    pub elements: Vec<Vec<u8>>,
}

impl DataChunk {
    /// Payload with element boundaries removed.
    pub fn flat(&self) -> Vec<u8> {
        self.elements.concat()
    }

    pub fn hex_elements(&self) -> Vec<String> {
        self.elements.iter().map(|e| hex_spaced(e)).collect()
    }
}

/// Chunk produced by the paged-lookup command `0x42`, carrying entry
/// bookkeeping on top of the plain chunk fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamChunk {
    pub max_entries: u16,
    pub entries: u16,
    pub start_entry: u16,
    /// Entry size in bytes (the wire carries bits).
    pub chunk_size: u16,
    pub chunk: DataChunk,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Data(DataChunk),
    Param(ParamChunk),
}

impl Chunk {
    pub fn index(&self) -> u8 {
        self.data().index
    }

    pub fn data(&self) -> &DataChunk {
        match self {
            Chunk::Data(chunk) => chunk,
            Chunk::Param(param) => &param.chunk,
        }
    }

    /// Append another chunk's payload to this one (same-index merge during
    /// page reassembly): elements extended, lengths summed.
    pub fn absorb(&mut self, other: &Chunk) {
        let dst = match self {
            Chunk::Data(chunk) => chunk,
            Chunk::Param(param) => &mut param.chunk,
        };
        let src = other.data();
        dst.elements.extend(src.elements.iter().cloned());
        dst.length = dst.length.saturating_add(src.length);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestData {
    Flat(Vec<u8>),
    Chunk(DataChunk),
}

/// Structural form of ADD / REMOVE / REQUEST frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRequest {
    pub message_type: MessageType,
    pub command: u8,
    pub declared_length: u8,
    pub has_params: bool,
    pub param_size: u8,
    pub data_type: Option<u8>,
    pub data_length: u16,
    pub data: RequestData,
    pub counter: u8,
}

/// Structural form of the response family (paged, final, unknown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredResponse {
    pub message_type: MessageType,
    pub command: u8,
    pub declared_length: u8,
    pub page: u8,
    /// Two-byte sub-selector carried by commands `0x35` and `0x42`.
    pub params: Option<[u8; 2]>,
    pub chunks: Vec<Chunk>,
    pub counter: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredMessage {
    Request(StructuredRequest),
    Response(StructuredResponse),
}

/// Structurally decode one delimited PowerLink frame.
pub fn parse_frame(frame: &[u8]) -> Result<StructuredMessage, FrameError> {
    let reader = FrameReader::new(frame);
    reader.require_len(layout::MIN_LEN)?;
    reader.expect_marker(0, checksum::START_MARKER)?;
    reader.expect_marker(frame.len() - 1, checksum::END_MARKER)?;

    let message_type = MessageType::from_code(reader.read_u8(layout::MESSAGE_TYPE_OFFSET)?);
    let command = reader.read_u8(layout::COMMAND_OFFSET)?;
    let declared_length = reader.read_u8(layout::DECLARED_LENGTH_OFFSET)?;
    let counter = reader.read_u8(frame.len() - layout::COUNTER_FROM_END)?;

    if message_type.is_request() {
        let request = match message_type {
            MessageType::Request => parse_request(&reader, message_type, command, declared_length)?,
            _ => parse_add_remove(&reader, message_type, command, declared_length)?,
        };
        return Ok(StructuredMessage::Request(StructuredRequest {
            counter,
            ..request
        }));
    }

    let response = parse_response(&reader, message_type, command, declared_length)?;
    Ok(StructuredMessage::Response(StructuredResponse {
        counter,
        ..response
    }))
}

fn parse_add_remove(
    reader: &FrameReader<'_>,
    message_type: MessageType,
    command: u8,
    declared_length: u8,
) -> Result<StructuredRequest, FrameError> {
    let data_type = reader.read_u8(layout::AR_DATA_TYPE_OFFSET)?;

    if reader.read_u8(layout::AR_FLAT_FLAG_OFFSET)? == layout::AR_FLAT_FLAG {
        let data_length = reader.read_u8(layout::AR_LENGTH_OFFSET)?;
        let start = layout::AR_DATA_OFFSET;
        let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
        return Ok(StructuredRequest {
            message_type,
            command,
            declared_length,
            has_params: false,
            param_size: 0,
            data_type: Some(data_type),
            data_length: u16::from(data_length),
            data: RequestData::Flat(data.to_vec()),
            counter: 0,
        });
    }

    let chunk_length = reader.read_u8(layout::AR_LENGTH_OFFSET)?;
    let start = layout::AR_DATA_OFFSET;
    let payload = reader.read_slice_clamped(start..start + usize::from(chunk_length))?;
    let chunk = DataChunk {
        data_type,
        index: reader.read_u8(layout::AR_CHUNK_INDEX_OFFSET)?,
        length: u16::from(chunk_length),
        elements: vec![payload.to_vec()],
    };
    Ok(StructuredRequest {
        message_type,
        command,
        declared_length,
        has_params: false,
        param_size: 0,
        data_type: Some(data_type),
        data_length: u16::from(declared_length.saturating_sub(4)),
        data: RequestData::Chunk(chunk),
        counter: 0,
    })
}

fn parse_request(
    reader: &FrameReader<'_>,
    message_type: MessageType,
    command: u8,
    declared_length: u8,
) -> Result<StructuredRequest, FrameError> {
    // Requests either carry typed parameters or a bare-length payload.
    if declared_length > 1 {
        let param_size = reader.read_u8(layout::REQ_PARAM_SIZE_OFFSET)?;
        let data_type = reader.read_u8(layout::REQ_DATA_TYPE_OFFSET)?;
        let data_length = reader.read_u8(layout::REQ_DATA_LENGTH_OFFSET)?;
        let start = layout::REQ_PARAM_DATA_OFFSET;
        let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
        return Ok(StructuredRequest {
            message_type,
            command,
            declared_length,
            has_params: true,
            param_size,
            data_type: Some(data_type),
            data_length: u16::from(data_length),
            data: RequestData::Flat(data.to_vec()),
            counter: 0,
        });
    }

    let start = layout::REQ_BARE_DATA_OFFSET;
    let data = reader.read_slice_clamped(start..start + usize::from(declared_length))?;
    Ok(StructuredRequest {
        message_type,
        command,
        declared_length,
        has_params: false,
        param_size: 0,
        data_type: None,
        data_length: u16::from(declared_length),
        data: RequestData::Flat(data.to_vec()),
        counter: 0,
    })
}

fn parse_response(
    reader: &FrameReader<'_>,
    message_type: MessageType,
    command: u8,
    declared_length: u8,
) -> Result<StructuredResponse, FrameError> {
    let page = reader.read_u8(layout::PAGE_OFFSET)?;
    let mut params = None;

    let chunks = if declared_length <= 1 {
        // Page byte only; nothing to chunk.
        Vec::new()
    } else if reader.read_u8(layout::RESP_CHUNK_FLAG_OFFSET)? == 0 {
        // Single flat chunk; the data type is signalled two bytes later and
        // the payload is not element-sliced.
        let data_length = reader.read_u8(layout::RESP_FLAT_LENGTH_OFFSET)?;
        let start = layout::RESP_FLAT_DATA_OFFSET;
        let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
        vec![Chunk::Data(DataChunk {
            data_type: 0,
            index: layout::NO_INDEX,
            length: u16::from(data_length),
            elements: vec![data.to_vec()],
        })]
    } else if command == layout::CMD_0F {
        // 0x0F carries no index byte; the type nibble sits at the chunk flag
        // offset and the payload starts two bytes later.
        let data_type = reader.read_u8(layout::CMD0F_DATA_TYPE_OFFSET)?;
        let data_length = declared_length.saturating_sub(layout::CMD0F_LENGTH_ADJUST);
        let start = layout::CMD0F_DATA_OFFSET;
        let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
        vec![Chunk::Data(DataChunk {
            data_type,
            index: layout::NO_INDEX,
            length: u16::from(data_length),
            elements: rechunk(data, element_width(data_type)),
        })]
    } else if command == layout::CMD_SETTINGS {
        let selector = reader.read_slice(layout::CMD35_PARAMS_RANGE)?;
        params = Some([selector[0], selector[1]]);
        let data_type = reader.read_u8(layout::CMD35_DATA_TYPE_OFFSET)?;
        let data_length = reader
            .read_u8(layout::CMD35_LENGTH_OFFSET)?
            .saturating_sub(layout::CMD35_LENGTH_ADJUST);
        let start = layout::CMD35_DATA_OFFSET;
        let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
        vec![Chunk::Data(DataChunk {
            data_type,
            index: layout::NO_INDEX,
            length: u16::from(data_length),
            elements: rechunk(data, element_width(data_type)),
        })]
    } else if command == layout::CMD_LOOKUP {
        let selector = reader.read_slice(layout::CMD42_PARAMS_RANGE)?;
        params = Some([selector[0], selector[1]]);
        let data_length = reader
            .read_u8(layout::CMD42_LENGTH_OFFSET)?
            .saturating_sub(layout::CMD42_LENGTH_ADJUST);
        let max_entries = reader.read_u16_le(layout::CMD42_MAX_ENTRIES_RANGE)?;
        let chunk_size = reader.read_u16_le(layout::CMD42_CHUNK_SIZE_RANGE)? / 8;
        let data_type = reader.read_u8(layout::CMD42_DATA_TYPE_OFFSET)?;
        let start_entry = reader.read_u16_le(layout::CMD42_START_ENTRY_RANGE)?;
        let entries = reader.read_u16_le(layout::CMD42_ENTRIES_RANGE)?;
        let elements = if chunk_size == 0 {
            Vec::new()
        } else {
            let start = layout::CMD42_DATA_OFFSET;
            let data = reader.read_slice_clamped(start..start + usize::from(data_length))?;
            rechunk(data, usize::from(chunk_size))
        };
        vec![Chunk::Param(ParamChunk {
            max_entries,
            entries,
            start_entry,
            chunk_size,
            chunk: DataChunk {
                data_type,
                index: layout::NO_INDEX,
                length: u16::from(data_length),
                elements,
            },
        })]
    } else {
        parse_sub_chunks(reader, declared_length)?
    };

    Ok(StructuredResponse {
        message_type,
        command,
        declared_length,
        page,
        params,
        chunks,
        counter: 0,
    })
}

/// Generic response layout: successive `{data_type, index, length, payload}`
/// sub-chunks while declared bytes remain.
fn parse_sub_chunks(
    reader: &FrameReader<'_>,
    declared_length: u8,
) -> Result<Vec<Chunk>, FrameError> {
    let mut chunks = Vec::new();
    let mut i = layout::RESP_CHUNK_ITER_START;
    let limit = usize::from(declared_length).saturating_sub(1);

    while i <= limit {
        if i + 4 > reader.len() {
            break;
        }
        let data_type = reader.read_u8(i + 1)?;
        let index = reader.read_u8(i + 2)?;
        let length = reader.read_u8(i + 3)?;
        let payload = reader.read_slice_clamped(i + 4..i + 4 + usize::from(length))?;
        chunks.push(Chunk::Data(DataChunk {
            data_type,
            index,
            length: u16::from(length),
            elements: rechunk(payload, element_width(data_type)),
        }));
        i += 4 + usize::from(length);
    }
    Ok(chunks)
}

fn rechunk(data: &[u8], width: usize) -> Vec<Vec<u8>> {
    data.chunks(width.max(1)).map(<[u8]>::to_vec).collect()
}

pub(crate) fn hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
