//! Lookup tables mapping wire codes to symbolic names.
//!
//! Every lookup in this module is total: codes outside the known range resolve
//! to [`Label::Unknown`] rather than failing, so a frame from unreleased
//! firmware still decodes to something usable. Tables were lifted from panel
//! captures and firmware dumps; names marked with a trailing number are codes
//! whose meaning has not been confirmed.

use serde::{Serialize, Serializer};

/// Result of a code-to-name lookup. Unknown codes keep their numeric value and
/// render as `Unknown-{code}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Known(&'static str),
    Unknown(u8),
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Known(name) => f.write_str(name),
            Label::Unknown(code) => write!(f, "Unknown-{code}"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Frame message type, selecting the request or response structural layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Add,
    Request,
    PagedResponse,
    Response,
    Remove,
    Unknown,
}

impl MessageType {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => MessageType::Add,
            1 => MessageType::Request,
            2 => MessageType::PagedResponse,
            3 => MessageType::Response,
            4 => MessageType::Remove,
            _ => MessageType::Unknown,
        }
    }

    /// Requests (and the add/remove variants) use the flat request layout;
    /// everything else takes the response layout.
    pub fn is_request(self) -> bool {
        matches!(
            self,
            MessageType::Add | MessageType::Request | MessageType::Remove
        )
    }
}

/// Width in bytes of one payload element for a chunk data type. The data type
/// encodes a bit width; widths under one byte degenerate to single bytes.
pub fn element_width(data_type: u8) -> usize {
    (usize::from(data_type) / 8).max(1)
}

/// Name of a chunk data type (bit-width encoding).
pub fn data_kind_name(data_type: u8) -> Label {
    match data_type {
        0 => Label::Known("UNKNOWN"),
        1 => Label::Known("BITS"),
        4 => Label::Known("NIBBLE"),
        8 => Label::Known("BYTES"),
        16 => Label::Known("WORD16"),
        24 => Label::Known("WORD24"),
        32 => Label::Known("WORD32"),
        40 => Label::Known("WORD40"),
        48 => Label::Known("WORD48"),
        56 => Label::Known("WORD56"),
        64 => Label::Known("WORD64"),
        72 => Label::Known("WORD72"),
        80 => Label::Known("WORD80"),
        88 => Label::Known("WORD88"),
        96 => Label::Known("WORD96"),
        104 => Label::Known("WORD104"),
        112 => Label::Known("WORD112"),
        other => Label::Unknown(other),
    }
}

/// Name of a settings-value encoding (carried by configuration replies in
/// place of a bit width).
pub fn setting_kind_name(data_type: u8) -> Label {
    match data_type {
        0 => Label::Known("ZERO_PADDED_STRING"),
        1 => Label::Known("DIRECT_MAP_STRING"),
        2 => Label::Known("FF_PADDED_STRING"),
        3 => Label::Known("DOUBLE_LE_INT"),
        4 => Label::Known("INTEGER"),
        6 => Label::Known("STRING"),
        8 => Label::Known("SPACE_PADDED_STRING"),
        10 => Label::Known("SPACE_PADDED_STRING_LIST"),
        other => Label::Unknown(other),
    }
}

/// PowerLink command name.
pub fn command_name(command: u8) -> Label {
    match command {
        0x01 => Label::Known("ZONE01"),
        0x02 => Label::Known("ZONE02"),
        0x04 => Label::Known("ZONE04"),
        0x05 => Label::Known("ZONE05"),
        0x06 => Label::Known("INVALID_COMMAND"),
        0x07 => Label::Known("ZONE07"),
        0x0F => Label::Known("UNKNOWN0F"),
        0x11 => Label::Known("ZONES11"),
        0x12 => Label::Known("ZONES12"),
        0x13 => Label::Known("ZONES13"),
        0x14 => Label::Known("ZONES14"),
        0x15 => Label::Known("ZONES15"),
        0x16 => Label::Known("ZONES16"),
        0x17 => Label::Known("REQUEST_LIST"),
        0x18 => Label::Known("SENSOR_DETECTION"),
        0x19 => Label::Known("BYPASSES"),
        0x1D => Label::Known("ENROLLED"),
        0x1F => Label::Known("DEVICE_TYPES"),
        0x21 => Label::Known("ASSIGNED_NAMES"),
        0x22 => Label::Known("SYSTEM_CAPABILITIES"),
        0x24 => Label::Known("PANEL_STATUS"),
        0x27 => Label::Known("CAMERA27"),
        0x2A => Label::Known("STANDARD_EVENT_LOG"),
        0x2B => Label::Known("UNKNOWN2B"),
        0x2D => Label::Known("ASSIGNED_ZONE_TYPES"),
        0x35 => Label::Known("SETTINGS"),
        0x36 => Label::Known("LEGACY_EVENT_LOG"),
        0x37 => Label::Known("LAST_EVENT37"),
        0x3A => Label::Known("ZONE3A"),
        0x3D => Label::Known("ZONE_TEMPS"),
        0x40 => Label::Known("ZONE40"),
        0x42 => Label::Known("SETTINGS_LOOKUP"),
        0x43 => Label::Known("ZONE43"),
        0x49 => Label::Known("ZONE49"),
        0x4B => Label::Known("ZONE_LAST_EVENT"),
        0x4E => Label::Known("ZONE4E"),
        0x4F => Label::Known("ZONE4F"),
        0x50 => Label::Known("ZONE50"),
        0x51 => Label::Known("ASK_ME"),
        0x52 => Label::Known("DEVICE_COUNTS"),
        0x53 => Label::Known("CAMERA53"),
        0x59 => Label::Known("GSM_STATUS"),
        0x64 => Label::Known("PANEL_SOFTWARE_VERSION"),
        0x69 => Label::Known("PANEL_EPROM_AND_SW_VERSION"),
        0x6A => Label::Known("KEEP_ALIVE"),
        0x75 => Label::Known("SOME_LOG"),
        0x77 => Label::Known("ZONE_BRIGHTNESS"),
        other => Label::Unknown(other),
    }
}

/// Chunk index category (device class the chunk describes).
pub fn index_name(index: u8) -> Label {
    match index {
        0 => Label::Known("REPEATERS"),
        1 => Label::Known("X10"),
        2 => Label::Known("SIRENS"),
        3 => Label::Known("ZONES"),
        4 => Label::Known("KEYPADS"),
        5 => Label::Known("KEYFOBS"),
        6 => Label::Known("USERCODES"),
        7 => Label::Known("CAMERAS_A"),
        9 => Label::Known("POWERLINK"),
        10 => Label::Known("TAGS"),
        11 => Label::Known("CAMERAS_B"),
        12 => Label::Known("PANEL"),
        14 => Label::Known("PARTITIONS"),
        17 => Label::Known("EVENTS"),
        255 => Label::Known("NA"),
        other => Label::Unknown(other),
    }
}

/// Device-type byte of event-log entries that addresses a zone.
pub const DEVICE_TYPE_ZONE: u8 = 3;

/// Zone last-event status code.
pub fn zone_status_name(code: u8) -> Label {
    match code {
        0 => Label::Known("NA"),
        1 => Label::Known("OPEN"),
        2 => Label::Known("CLOSED"),
        3 => Label::Known("MOTION"),
        4 => Label::Known("CHECKIN"),
        other => Label::Unknown(other),
    }
}

/// Zone brightness category (three lux levels).
pub fn zone_brightness_name(code: u8) -> Label {
    match code {
        0 => Label::Known("DARKNESS"),
        1 => Label::Known("PARTIAL_LIGHT"),
        2 => Label::Known("DAYLIGHT"),
        other => Label::Unknown(other),
    }
}

/// Partition arm/ready states reported by the panel status message.
/// Codes 14-15 and 22-31 exist on the wire but have no confirmed meaning.
const SYSTEM_STATES: [&str; 22] = [
    "Disarmed",
    "ExitDelay_ArmHome",
    "ExitDelay_ArmAway",
    "EntryDelay",
    "Stay",
    "Armed",
    "UserTest",
    "Downloading",
    "Programming",
    "Installer",
    "Home Bypass",
    "Away Bypass",
    "Ready",
    "NotReady",
    "??",
    "??",
    "Disarm",
    "ExitDelay",
    "ExitDelay",
    "EntryDelay",
    "StayInstant",
    "ArmedInstant",
];

pub fn system_state_name(code: u8) -> Label {
    SYSTEM_STATES
        .get(usize::from(code))
        .map(|name| Label::Known(name))
        .unwrap_or(Label::Unknown(code))
}

/// Zone type assignments (settings selector `31 00`).
pub const ZONE_TYPE_NAMES: [&str; 17] = [
    "Non-Alarm",
    "Emergency",
    "Flood",
    "Gas",
    "Delay 1",
    "Delay 2",
    "Interior-Follow",
    "Perimeter",
    "Perimeter-Follow",
    "24 Hours Silent",
    "24 Hours Audible",
    "Fire",
    "Interior",
    "Home Delay",
    "Temperature",
    "Outdoor",
    "16",
];

pub fn zone_type_name(code: u8) -> Label {
    ZONE_TYPE_NAMES
        .get(usize::from(code))
        .map(|name| Label::Known(name))
        .unwrap_or(Label::Unknown(code))
}

/// Event-log event names, indexed by event-type byte. The tail of the table
/// is reserved on PowerMaster firmware and reported as `n/a`.
const EVENT_NAMES: [&str; 177] = [
    "None",
    "Interior Alarm",
    "Perimeter Alarm",
    "Delay Alarm",
    "24h Silent Alarm",
    "24h Audible Alarm",
    "Tamper",
    "Control Panel Tamper",
    "Tamper Alarm",
    "Tamper Alarm",
    "Communication Loss",
    "Panic From Keyfob",
    "Panic From Control Panel",
    "Duress",
    "Confirm Alarm",
    "General Trouble",
    "General Trouble Restore",
    "Interior Restore",
    "Perimeter Restore",
    "Delay Restore",
    "24h Silent Restore",
    "24h Audible Restore",
    "Tamper Restore",
    "Control Panel Tamper Restore",
    "Tamper Restore",
    "Tamper Restore",
    "Communication Restore",
    "Cancel Alarm",
    "General Restore",
    "Trouble Restore",
    "Not used",
    "Recent Close",
    "Fire",
    "Fire Restore",
    "Not Active",
    "Emergency",
    "Remove User",
    "Disarm Latchkey",
    "Confirm Alarm Emergency",
    "Supervision (Inactive)",
    "Supervision Restore (Active)",
    "Low Battery",
    "Low Battery Restore",
    "AC Fail",
    "AC Restore",
    "Control Panel Low Battery",
    "Control Panel Low Battery Restore",
    "RF Jamming",
    "RF Jamming Restore",
    "Communications Failure",
    "Communications Restore",
    "Telephone Line Failure",
    "Telephone Line Restore",
    "Auto Test",
    "Fuse Failure",
    "Fuse Restore",
    "Keyfob Low Battery",
    "Keyfob Low Battery Restore",
    "Engineer Reset",
    "Battery Disconnect",
    "1-Way Keypad Low Battery",
    "1-Way Keypad Low Battery Restore",
    "1-Way Keypad Inactive",
    "1-Way Keypad Restore Active",
    "Low Battery Ack",
    "Clean Me",
    "Fire Trouble",
    "Low Battery",
    "Battery Restore",
    "AC Fail",
    "AC Restore",
    "Supervision (Inactive)",
    "Supervision Restore (Active)",
    "Gas Alert",
    "Gas Alert Restore",
    "Gas Trouble",
    "Gas Trouble Restore",
    "Flood Alert",
    "Flood Alert Restore",
    "X-10 Trouble",
    "X-10 Trouble Restore",
    "Arm Home",
    "Arm Away",
    "Quick Arm Home",
    "Quick Arm Away",
    "Disarm",
    "Fail To Auto-Arm",
    "Enter To Test Mode",
    "Exit From Test Mode",
    "Force Arm",
    "Auto Arm",
    "Instant Arm",
    "Bypass",
    "Fail To Arm",
    "Door Open",
    "Communication Established By Control Panel",
    "System Reset",
    "Installer Programming",
    "Wrong Password",
    "Not Sys Event",
    "Not Sys Event",
    "Extreme Hot Alert",
    "Extreme Hot Alert Restore",
    "Freeze Alert",
    "Freeze Alert Restore",
    "Human Cold Alert",
    "Human Cold Alert Restore",
    "Human Hot Alert",
    "Human Hot Alert Restore",
    "Temperature Sensor Trouble",
    "Temperature Sensor Trouble Restore",
    "PIR Mask",
    "PIR Mask Restore",
    "Repeater low battery",
    "Repeater low battery restore",
    "Repeater inactive",
    "Repeater inactive restore",
    "Repeater tamper",
    "Repeater tamper restore",
    "Siren test end",
    "Devices test end",
    "One way comm. trouble",
    "One way comm. trouble restore",
    "Sensor outdoor alarm",
    "Sensor outdoor restore",
    "Guard sensor alarmed",
    "Guard sensor alarmed restore",
    "Date time change",
    "System shutdown",
    "System power up",
    "Missed Reminder",
    "Pendant test fail",
    "Basic KP inactive",
    "Basic KP inactive restore",
    "Basic KP tamper",
    "Basic KP tamper Restore",
    "Heat",
    "Heat restore",
    "LE Heat Trouble",
    "CO alarm",
    "CO alarm restore",
    "CO trouble",
    "CO trouble restore",
    "Exit Installer",
    "Enter Installer",
    "Self test trouble",
    "Self test restore",
    "Confirm panic event",
    "n/a",
    "Soak test fail",
    "Fire Soak test fail",
    "Gas Soak test fail",
    // 152..=176: reserved on PowerMaster firmware.
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
    "n/a",
];

pub fn event_name(code: u8) -> Label {
    EVENT_NAMES
        .get(usize::from(code))
        .map(|name| Label::Known(name))
        .unwrap_or(Label::Unknown(code))
}
