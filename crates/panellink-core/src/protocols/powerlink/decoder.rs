//! Stateful PowerLink decode orchestrator.
//!
//! Ties the structural parser, paged reassembly and semantic decoding
//! together. Intermediate pages are acknowledged with a raw chunk rendering
//! and accumulated; the terminal frame triggers reassembly before its
//! command's semantic decoder runs.

use tracing::{debug, warn};

use super::layout;
use super::pages::PageStore;
use super::parser::{self, RequestData, StructuredRequest, StructuredResponse, hex_spaced};
use super::semantic;
use super::tables::{MessageType, command_name};
use crate::protocols::common::checksum;
use crate::{
    DecodedMessage, DecodedPayload, FrameError, RequestMessage, RequestPayload, ResponseMessage,
};

/// Decoder for the extended (`0xB0`) protocol family. Holds the paged
/// accumulator, so all frames of one conversation must share an instance.
#[derive(Debug)]
pub struct PowerlinkDecoder {
    pages: PageStore,
}

impl Default for PowerlinkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PowerlinkDecoder {
    pub fn new() -> Self {
        Self {
            pages: PageStore::new(),
        }
    }

    /// Decode one delimited frame. Only structural problems error out;
    /// checksum mismatches are reported on the decoded message.
    pub fn decode(&mut self, frame: &[u8]) -> Result<DecodedMessage, FrameError> {
        let checksum_ok = checksum::verify_powerlink(frame);
        if !checksum_ok {
            warn!(len = frame.len(), "frame checksum mismatch");
        }

        match parser::parse_frame(frame)? {
            parser::StructuredMessage::Request(request) => {
                Ok(DecodedMessage::Request(render_request(request, checksum_ok)))
            }
            parser::StructuredMessage::Response(response)
                if response.message_type == MessageType::PagedResponse =>
            {
                Ok(DecodedMessage::Response(
                    self.hold_page(response, checksum_ok),
                ))
            }
            parser::StructuredMessage::Response(response) => {
                let response = if self.pages.has_active(response.command) {
                    self.pages.reassemble(response.command, response)
                } else {
                    response
                };
                let payload = semantic::decode(&response);
                Ok(DecodedMessage::Response(render_response(
                    response,
                    payload,
                    checksum_ok,
                )))
            }
        }
    }

    /// Store an intermediate page and report it as pending. Some firmware
    /// stamps every page of a sequence with the terminal page number; those
    /// pages are renumbered past the highest page seen so far.
    fn hold_page(&mut self, response: StructuredResponse, checksum_ok: bool) -> ResponseMessage {
        let mut page_no = response.page;
        if page_no == layout::FINAL_PAGE {
            page_no = self.pages.next_page_number(response.command);
            debug!(
                command = response.command,
                page_no, "renumbering terminal-stamped page"
            );
        }
        let pending = DecodedPayload::PagePending {
            chunks: semantic::generic_chunks(&response.chunks),
        };
        self.pages.add_page(response.command, page_no, response.clone());
        render_response(response, pending, checksum_ok)
    }
}

fn render_request(request: StructuredRequest, checksum_ok: bool) -> RequestMessage {
    let data = match request.data {
        RequestData::Chunk(ref chunk) => {
            RequestPayload::Chunk(semantic::generic_chunks(&[super::parser::Chunk::Data(
                chunk.clone(),
            )]).remove(0))
        }
        RequestData::Flat(ref bytes) if request.has_params && request.param_size > 0 => {
            RequestPayload::Params(
                bytes
                    .chunks(usize::from(request.param_size))
                    .map(hex_spaced)
                    .collect(),
            )
        }
        RequestData::Flat(ref bytes) => RequestPayload::Hex(hex_spaced(bytes)),
    };
    RequestMessage {
        message_type: request.message_type,
        command: request.command,
        command_name: command_name(request.command),
        length: request.data_length,
        data,
        counter: request.counter,
        checksum_ok,
    }
}

fn render_response(
    response: StructuredResponse,
    payload: DecodedPayload,
    checksum_ok: bool,
) -> ResponseMessage {
    ResponseMessage {
        message_type: response.message_type,
        command: response.command,
        command_name: command_name(response.command),
        selector: response.params.map(|p| hex_spaced(&p)),
        page: response.page,
        length: response.declared_length,
        payload,
        counter: response.counter,
        checksum_ok,
    }
}
