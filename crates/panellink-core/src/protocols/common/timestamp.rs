//! Panel timestamp encodings.
//!
//! Event records carry unix timestamps as four little-endian bytes ("reversed"
//! relative to the wire dump). The panel clock message instead encodes a local
//! datetime as raw bytes: seconds, minutes, hours, day, month, two-digit year
//! offset from 2000. Both are rendered as `YYYY-MM-DD HH:MM:SS` to match the
//! panel's own log display.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Decode a 4-byte little-endian unix timestamp into a rendered UTC datetime.
/// Returns `None` when the seconds value is outside the representable range.
pub fn decode_reversed_timestamp(bytes: &[u8]) -> Option<String> {
    let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let secs = u32::from_le_bytes(raw);
    let dt = OffsetDateTime::from_unix_timestamp(i64::from(secs)).ok()?;
    Some(render(
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    ))
}

/// Decode the panel datetime byte layout `ss mn hh dd mm yy` (year + 2000).
/// Returns `None` for impossible calendar values.
pub fn decode_panel_datetime(bytes: &[u8]) -> Option<String> {
    let b = bytes.get(..6)?;
    let year = 2000 + i32::from(b[5]);
    let month = Month::try_from(b[4]).ok()?;
    let date = Date::from_calendar_date(year, month, b[3]).ok()?;
    let clock = Time::from_hms(b[2], b[1], b[0]).ok()?;
    let dt = PrimitiveDateTime::new(date, clock);
    Some(render(
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    ))
}

fn render(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> String {
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
}

#[cfg(test)]
mod tests {
    use super::{decode_panel_datetime, decode_reversed_timestamp};

    #[test]
    fn reversed_timestamp_is_little_endian() {
        // 0x66979ef2 = 1721212658 = 2024-07-17 10:37:38 UTC, sent low byte first.
        let rendered = decode_reversed_timestamp(&[0xF2, 0x9E, 0x97, 0x66]).unwrap();
        assert_eq!(rendered, "2024-07-17 10:37:38");
    }

    #[test]
    fn reversed_timestamp_short_input() {
        assert_eq!(decode_reversed_timestamp(&[0x00, 0x01]), None);
    }

    #[test]
    fn panel_datetime_layout() {
        // ss mn hh dd mm yy
        let rendered = decode_panel_datetime(&[0x07, 0x11, 0x11, 0x1B, 0x06, 0x18]).unwrap();
        assert_eq!(rendered, "2024-06-27 17:17:07");
    }

    #[test]
    fn panel_datetime_rejects_impossible_dates() {
        assert_eq!(decode_panel_datetime(&[0, 0, 0, 32, 1, 24]), None);
        assert_eq!(decode_panel_datetime(&[0, 0, 0, 1, 13, 24]), None);
    }
}
