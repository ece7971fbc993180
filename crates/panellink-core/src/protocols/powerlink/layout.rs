//! Byte offsets and protocol constants for PowerLink frames.
//!
//! These tables are the source of truth for the structural decoder. Offsets
//! are absolute within the delimited frame (start marker at offset 0) and were
//! verified against panel captures; the response family additionally branches
//! on command id because several commands use bespoke layouts.

/// Discriminator byte distinguishing PowerLink frames from standard frames.
pub const DISCRIMINATOR: u8 = 0xB0;

pub const DISCRIMINATOR_OFFSET: usize = 1;
pub const MESSAGE_TYPE_OFFSET: usize = 2;
pub const COMMAND_OFFSET: usize = 3;
pub const DECLARED_LENGTH_OFFSET: usize = 4;

/// Page number of a response (0xFF conventionally marks the terminal page).
pub const PAGE_OFFSET: usize = 5;
pub const FINAL_PAGE: u8 = 0xFF;

/// Offset of the message counter, counted from the end of the frame (the
/// trailer is counter, end-of-data marker, checksum, end marker).
pub const COUNTER_FROM_END: usize = 4;

// ADD / REMOVE layouts. Byte 10 equal to 0xFF selects the flat form.
pub const AR_DATA_TYPE_OFFSET: usize = 9;
pub const AR_FLAT_FLAG_OFFSET: usize = 10;
pub const AR_CHUNK_INDEX_OFFSET: usize = 10;
pub const AR_LENGTH_OFFSET: usize = 11;
pub const AR_DATA_OFFSET: usize = 12;
pub const AR_FLAT_FLAG: u8 = 0xFF;

// REQUEST layouts.
pub const REQ_PARAM_SIZE_OFFSET: usize = 5;
pub const REQ_DATA_TYPE_OFFSET: usize = 7;
pub const REQ_DATA_LENGTH_OFFSET: usize = 9;
pub const REQ_PARAM_DATA_OFFSET: usize = 10;
pub const REQ_BARE_DATA_OFFSET: usize = 5;

// Response family.
/// A zero chunk byte at this offset selects the single-flat-chunk layout.
pub const RESP_CHUNK_FLAG_OFFSET: usize = 6;
pub const RESP_FLAT_LENGTH_OFFSET: usize = 11;
pub const RESP_FLAT_DATA_OFFSET: usize = 12;
/// First sub-chunk of the generic layout (the leading byte is the page).
pub const RESP_CHUNK_ITER_START: usize = 5;

// Command 0x0F: no index byte, type nibble at the chunk flag offset.
pub const CMD_0F: u8 = 0x0F;
pub const CMD0F_DATA_TYPE_OFFSET: usize = 6;
pub const CMD0F_DATA_OFFSET: usize = 8;
pub const CMD0F_LENGTH_ADJUST: u8 = 4;

// Command 0x35 (settings): two-byte selector, then one typed chunk.
pub const CMD_SETTINGS: u8 = 0x35;
pub const CMD35_LENGTH_OFFSET: usize = 8;
pub const CMD35_PARAMS_RANGE: std::ops::Range<usize> = 9..11;
pub const CMD35_DATA_TYPE_OFFSET: usize = 11;
pub const CMD35_DATA_OFFSET: usize = 12;
pub const CMD35_LENGTH_ADJUST: u8 = 3;

// Command 0x42 (paged lookup): richer header carrying entry bookkeeping.
pub const CMD_LOOKUP: u8 = 0x42;
pub const CMD42_LENGTH_OFFSET: usize = 8;
pub const CMD42_PARAMS_RANGE: std::ops::Range<usize> = 9..11;
pub const CMD42_MAX_ENTRIES_RANGE: std::ops::Range<usize> = 11..13;
pub const CMD42_CHUNK_SIZE_RANGE: std::ops::Range<usize> = 13..15;
pub const CMD42_DATA_TYPE_OFFSET: usize = 17;
pub const CMD42_START_ENTRY_RANGE: std::ops::Range<usize> = 19..21;
pub const CMD42_ENTRIES_RANGE: std::ops::Range<usize> = 21..23;
pub const CMD42_DATA_OFFSET: usize = 23;
pub const CMD42_LENGTH_ADJUST: u8 = 14;

/// Index value used when a layout carries no index byte.
pub const NO_INDEX: u8 = 0xFF;

/// Shortest frame the structural decoder accepts: five header bytes plus the
/// four trailer bytes (counter, end-of-data, checksum, end marker).
pub const MIN_LEN: usize = DECLARED_LENGTH_OFFSET + 1 + COUNTER_FROM_END;
