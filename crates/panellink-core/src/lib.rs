//! PanelLink core library for decoding alarm-panel serial traffic.
//!
//! This crate implements the offline decode pipeline used by the CLI:
//! delimited frames feed the frame router, which drives protocol decoders
//! (layout/reader/parser) and paged reassembly, then renders the result into
//! a serializable message model. Parsing is byte-oriented and side-effect
//! free; the only state is the paged-response accumulator owned by the
//! decoder. Protocol conventions are captured in readers and layout tables so
//! parsers stay minimal.
//!
//! Invariants:
//! - Every structurally valid frame decodes to something; unknown commands
//!   fall back to a generic chunk rendering, never an error.
//! - Checksum failures are reported alongside the decoded message, not as
//!   decode errors.
//! - Paged responses are reassembled statefully per command before semantic
//!   decoding.
//!
//! Version française (résumé):
//! Cette crate fournit le cœur de décodage hors ligne : trames -> routeur ->
//! décodeurs de protocoles (layout/reader/parser) -> modèle sérialisable.
//! Les commandes inconnues retombent sur un rendu générique, les erreurs de
//! somme de contrôle sont signalées sans bloquer le décodage, et les réponses
//! paginées sont réassemblées avant interprétation.
//!
//! # Examples
//! ```
//! use panellink_core::{FrameDecoder, LinkMessage};
//!
//! let mut decoder = FrameDecoder::new();
//! let frame = [0x0D, 0x02, 0x02, 0x02, 0x43, 0xF9, 0x0A];
//! match decoder.decode(&frame)? {
//!     LinkMessage::Standard(msg) => assert!(msg.checksum_ok),
//!     LinkMessage::Powerlink(_) => unreachable!(),
//! }
//! # Ok::<(), panellink_core::FrameError>(())
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

mod protocols;

pub use protocols::powerlink::decoder::PowerlinkDecoder;
pub use protocols::powerlink::error::FrameError;
pub use protocols::powerlink::tables::{Label, MessageType};
pub use protocols::standard::StandardMessage;

/// Command discriminator selecting the extended-protocol decode path.
pub const POWERLINK_DISCRIMINATOR: u8 = protocols::powerlink::layout::DISCRIMINATOR;

/// One decoded frame, routed by protocol family.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "protocol", rename_all = "snake_case")]
pub enum LinkMessage {
    Powerlink(DecodedMessage),
    Standard(StandardMessage),
}

/// Fully decoded PowerLink frame, either direction.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DecodedMessage {
    Request(RequestMessage),
    Response(ResponseMessage),
}

/// Decoded ADD / REQUEST / REMOVE frame.
#[derive(Debug, Clone, Serialize)]
pub struct RequestMessage {
    /// Frame direction and layout family.
    pub message_type: MessageType,
    pub command: u8,
    pub command_name: Label,
    /// Payload length in bytes as decoded from the frame.
    pub length: u16,
    pub data: RequestPayload,
    pub counter: u8,
    pub checksum_ok: bool,
}

/// Request payload rendering. Parameterized requests group the payload into
/// fixed-size entries; enrollment add/remove frames may carry a structured
/// chunk instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestPayload {
    Hex(String),
    Params(Vec<String>),
    Chunk(GenericChunk),
}

/// Decoded RESPONSE or PAGED_RESPONSE frame.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMessage {
    pub message_type: MessageType,
    pub command: u8,
    pub command_name: Label,
    /// Two-byte sub-selector as spaced hex, for settings and lookup replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub page: u8,
    pub length: u8,
    pub payload: DecodedPayload,
    pub counter: u8,
    pub checksum_ok: bool,
}

/// Semantic payload of a response, keyed by the command that produced it.
/// Commands without a dedicated decoder render as [`DecodedPayload::Generic`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodedPayload {
    /// Raw chunk rendering for commands without a semantic decoder.
    Generic { chunks: Vec<GenericChunk> },
    /// Intermediate page of a multi-page response, held for reassembly.
    PagePending { chunks: Vec<GenericChunk> },
    /// Device-capacity table (command `0x22`).
    Capabilities { capabilities: BTreeMap<String, u16> },
    /// Panel clock and per-partition arm state (command `0x24`).
    PanelStatus {
        #[serde(skip_serializing_if = "Option::is_none")]
        datetime: Option<String>,
        partitions: u8,
        states: BTreeMap<u16, PartitionStatus>,
    },
    /// Event log entries (commands `0x2A` and `0x36`).
    EventLog { events: Vec<LogEvent> },
    /// Per-zone temperatures in Celsius, 1-based zone ids (command `0x3D`).
    /// Reassembled payloads can address more zones than one page carries, so
    /// zone ids are `u16`.
    ZoneTemperatures {
        index: Label,
        celsius: BTreeMap<u16, f64>,
    },
    /// Per-zone light level, 1-based zone ids (command `0x77`).
    ZoneBrightness {
        index: Label,
        zones: BTreeMap<u16, Label>,
    },
    /// Last status change per zone (command `0x4B`).
    ZoneLastEvents { zones: BTreeMap<u16, ZoneLastEvent> },
    /// Commands the panel wants fetched (command `0x51`).
    AskMe { commands: Vec<String> },
    /// Enrolled device counts (command `0x52`).
    DeviceCounts {
        unknown: u8,
        sensors: u8,
        keypads: u8,
        keyfobs: u8,
        sirens: u8,
        pgms: u8,
    },
    /// Panel software version string (command `0x64`).
    SoftwareVersion { version: String },
    /// Timestamped raw log entries (command `0x75`).
    TimestampLog { entries: Vec<TimestampEntry> },
    /// Configuration value reply (command `0x35`).
    Settings(SettingsPayload),
    /// Configuration table reply with entry bookkeeping (command `0x42`).
    LookupTable(LookupPayload),
    /// Payload too short or malformed for its command's semantic decoder.
    Invalid { reason: String },
}

/// Raw rendering of one data chunk: type and index names resolved, payload
/// as spaced-hex elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenericChunk {
    pub kind: Label,
    pub index: u8,
    pub index_name: Label,
    pub length: u16,
    pub data: Vec<String>,
}

/// Arm state and status flags for one partition.
#[derive(Debug, Clone, Serialize)]
pub struct PartitionStatus {
    pub state: Label,
    pub ready: bool,
    pub alarm_in_memory: bool,
    pub trouble: bool,
    pub bypass: bool,
    pub last_10_secs: bool,
    pub zone_event: bool,
    pub status_changed: bool,
    pub alarm_event: bool,
}

/// One event-log entry. `zone` is 1-based when the entry addresses a zone
/// device and otherwise carries the raw wire value.
#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    pub device: Label,
    pub zone: u8,
    pub event: Label,
}

/// Most recent status change for one zone.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneLastEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    pub status: Label,
}

/// Timestamp plus undecoded remainder, for log commands whose entry format
/// is only partially known.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    pub rest: String,
}

/// Decoded settings reply.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsPayload {
    /// Selector as spaced hex, e.g. `"54 01"`.
    pub selector: String,
    pub name: Label,
    pub data_kind: Label,
    pub length: u16,
    pub value: SettingValue,
}

/// Decoded lookup-table reply. Extends the settings shape with the entry
/// bookkeeping the wire carries for table reads.
#[derive(Debug, Clone, Serialize)]
pub struct LookupPayload {
    pub selector: String,
    pub name: Label,
    pub data_kind: Label,
    pub length: u16,
    pub max_entries: u16,
    pub entries: u16,
    pub start_entry: u16,
    /// Entry size in bytes.
    pub entry_size: u16,
    pub value: SettingValue,
}

/// Normalized settings value. Single-element lists collapse to a scalar;
/// an empty payload serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Empty,
    Scalar(ScalarValue),
    List(Vec<ScalarValue>),
    Map(BTreeMap<String, ScalarValue>),
}

impl SettingValue {
    /// Collapse a list to its shape invariants: empty becomes
    /// [`SettingValue::Empty`], one element becomes a scalar.
    pub fn from_list(mut values: Vec<ScalarValue>) -> Self {
        match values.len() {
            0 => SettingValue::Empty,
            1 => SettingValue::Scalar(values.remove(0)),
            _ => SettingValue::List(values),
        }
    }
}

/// Leaf value inside a settings payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Str(String),
    Int(i64),
}

/// Stateful frame router. Owns the paged-response accumulator, so frames
/// from one conversation must all pass through the same instance.
///
/// # Examples
/// ```
/// use panellink_core::{DecodedMessage, FrameDecoder, LinkMessage};
///
/// let mut decoder = FrameDecoder::new();
/// let frame = [
///     0x0D, 0xB0, 0x03, 0x52, 0x0B, 0xFF, 0x08, 0xFF, 0x06, 0x19, 0x08, 0x00,
///     0x02, 0x01, 0x01, 0xFA, 0x43, 0x7D, 0x0A,
/// ];
/// let LinkMessage::Powerlink(DecodedMessage::Response(msg)) = decoder.decode(&frame)? else {
///     unreachable!()
/// };
/// assert_eq!(msg.command, 0x52);
/// # Ok::<(), panellink_core::FrameError>(())
/// ```
#[derive(Debug, Default)]
pub struct FrameDecoder {
    powerlink: PowerlinkDecoder,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one delimited frame. Errors only on structural problems
    /// (truncation, missing markers); checksum state is carried in the
    /// decoded message.
    pub fn decode(&mut self, frame: &[u8]) -> Result<LinkMessage, FrameError> {
        if frame.get(protocols::powerlink::layout::DISCRIMINATOR_OFFSET)
            == Some(&POWERLINK_DISCRIMINATOR)
        {
            Ok(LinkMessage::Powerlink(self.powerlink.decode(frame)?))
        } else {
            Ok(LinkMessage::Standard(protocols::standard::decode(frame)?))
        }
    }
}
