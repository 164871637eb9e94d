//! `YYYYMMDDTHHMMSS` timestamps used by TIME headers and folder listings.

use chrono::NaiveDateTime;

use crate::constants::TIMESTAMP_LEN;
use crate::error::{ObexError, ObexResult};

/// chrono format of the compact ISO 8601 timestamps the module uses.
pub const XML_DATETIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Format a timestamp as `YYYYMMDDTHHMMSS`.
pub fn encode_xml_datetime(value: &NaiveDateTime) -> String {
    value.format(XML_DATETIME_FORMAT).to_string()
}

/// Parse a `YYYYMMDDTHHMMSS` timestamp.
///
/// Anything past the first 15 characters (a trailing `Z`, for instance) is
/// ignored; shorter input is rejected.
pub fn decode_xml_datetime(s: &str) -> ObexResult<NaiveDateTime> {
    let head = s
        .get(..TIMESTAMP_LEN)
        .ok_or_else(|| ObexError::InvalidTimestamp(s.to_string()))?;
    NaiveDateTime::parse_from_str(head, XML_DATETIME_FORMAT)
        .map_err(|_| ObexError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_decode_xml_datetime() {
        let dt = decode_xml_datetime("20020101T001650").unwrap();
        assert_eq!(dt.year(), 2002);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 1);
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (0, 16, 50));
        assert_eq!(encode_xml_datetime(&dt), "20020101T001650");
    }

    #[test]
    fn test_decode_ignores_suffix() {
        let dt = decode_xml_datetime("20231224T235959Z").unwrap();
        assert_eq!(encode_xml_datetime(&dt), "20231224T235959");
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert_eq!(
            decode_xml_datetime("20020101T0016"),
            Err(ObexError::InvalidTimestamp("20020101T0016".to_string()))
        );
        assert!(decode_xml_datetime("").is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_xml_datetime("2002x101T001650").is_err());
        assert!(decode_xml_datetime("20021301T001650").is_err());
    }
}
