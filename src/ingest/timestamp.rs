use chrono::{DateTime, NaiveDateTime, ParseError};
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_with::DeserializeAs;

const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const SHORT_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"];

/// Parse a wall-clock timestamp.
///
/// RFC 3339 timestamps keep their local time and drop the offset.
pub fn parse(text: &str) -> Result<NaiveDateTime, ParseError> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.naive_local());
    }
    FORMATS
        .iter()
        .chain(&SHORT_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        // Report the error of the full format:
        .map_or_else(|| NaiveDateTime::parse_from_str(text, FORMATS[0]), Ok)
}

/// [`serde_with`] adapter for [`parse`].
pub struct FlexibleTimestamp;

impl<'de> DeserializeAs<'de, NaiveDateTime> for FlexibleTimestamp {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text)
            .map_err(|error| D::Error::custom(format!("invalid timestamp `{text}`: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn expected() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(2, 30, 0).unwrap()
    }

    #[test]
    fn test_space_separated() -> Result<(), ParseError> {
        assert_eq!(parse("2024-03-10 02:30:00")?, expected());
        assert_eq!(parse("2024-03-10 02:30")?, expected());
        assert_eq!(parse("2024-03-10 02:30:00.000")?, expected());
        Ok(())
    }

    #[test]
    fn test_iso() -> Result<(), ParseError> {
        assert_eq!(parse("2024-03-10T02:30:00")?, expected());
        assert_eq!(parse("2024-03-10T02:30")?, expected());
        Ok(())
    }

    #[test]
    fn test_rfc3339_keeps_wall_clock() -> Result<(), ParseError> {
        assert_eq!(parse("2024-03-10T02:30:00-08:00")?, expected());
        assert_eq!(parse("2024-03-10T02:30:00Z")?, expected());
        Ok(())
    }

    #[test]
    fn test_invalid() {
        assert!(parse("10/03/2024 02:30").is_err());
        assert!(parse("").is_err());
    }
}
