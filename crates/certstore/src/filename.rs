//! Certificate file naming
//!
//! File format:
//! ```text
//! <id>_<unix-nanos>.pdf
//! ```
//!
//! The id may not contain `_` or `.`; the timestamp may be negative.

use chrono::{DateTime, TimeZone, Utc};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::{pair, separated_pair, terminated},
    IResult,
};

use crate::error::{Error, Result};

/// Extension of every stored certificate
pub const EXTENSION: &str = ".pdf";

/// Build the file name for version `timestamp` of certificate `id`
///
/// Fails with [`Error::InvalidId`] unless [`from_file_name`] would give `id`
/// back, so a name that is written can always be loaded again.
pub fn to_file_name(id: &str, timestamp: DateTime<Utc>) -> Result<String> {
    if !is_valid_id(id) {
        return Err(Error::InvalidId(id.to_string()));
    }
    let nanos = timestamp
        .timestamp_nanos_opt()
        .ok_or(Error::TimestampOutOfRange(timestamp))?;
    Ok(format!("{}_{}{}", id, nanos, EXTENSION))
}

/// Recover `(id, timestamp)` from a file name produced by [`to_file_name`]
pub fn from_file_name(name: &str) -> Result<(String, DateTime<Utc>)> {
    match all_consuming(file_name)(name) {
        Ok((_, (id, nanos))) => Ok((id.to_string(), Utc.timestamp_nanos(nanos))),
        Err(_) => Err(Error::InvalidFileName(name.to_string())),
    }
}

fn is_valid_id(candidate: &str) -> bool {
    all_consuming(id)(candidate).is_ok() && !candidate.contains(['/', '\\'])
}

fn file_name(input: &str) -> IResult<&str, (&str, i64)> {
    terminated(separated_pair(id, char('_'), nanos), tag(EXTENSION))(input)
}

fn id(input: &str) -> IResult<&str, &str> {
    take_till1(|c| c == '_' || c == '.')(input)
}

fn nanos(input: &str) -> IResult<&str, i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), str::parse::<i64>)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_file_name() {
        let ts = Utc.timestamp_nanos(1_700_000_000_123_456_789);
        assert_eq!(
            to_file_name("a1b2c3d4", ts).unwrap(),
            "a1b2c3d4_1700000000123456789.pdf"
        );
    }

    #[test]
    fn test_to_file_name_rejects_unparseable_ids() {
        let ts = Utc.timestamp_nanos(1);
        for id in ["", "a_b", "a.b", "_", "nested/id", "win\\id"] {
            let result = to_file_name(id, ts);
            assert!(
                matches!(result, Err(Error::InvalidId(ref bad)) if bad == id),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_accepted_ids_parse_back() {
        let ts = Utc.timestamp_nanos(-42);
        for id in ["a", "A-1", "3f2a9c", "ünïcode"] {
            let name = to_file_name(id, ts).unwrap();
            assert_eq!(from_file_name(&name).unwrap(), (id.to_string(), ts));
        }
    }

    #[test]
    fn test_from_file_name() {
        let (id, ts) = from_file_name("a1b2c3d4_1700000000123456789.pdf").unwrap();
        assert_eq!(id, "a1b2c3d4");
        assert_eq!(ts, Utc.timestamp_nanos(1_700_000_000_123_456_789));
    }

    #[test]
    fn test_from_file_name_negative_timestamp() {
        let (id, ts) = from_file_name("old_-5.pdf").unwrap();
        assert_eq!(id, "old");
        assert_eq!(ts, Utc.timestamp_nanos(-5));
    }

    #[test]
    fn test_from_file_name_invalid() {
        for name in [
            "",
            "noseparator.pdf",
            "id_123",
            "id_123.txt",
            "id_12a.pdf",
            "id_with_underscore_1.pdf",
            "_123.pdf",
            "id_123.pdf.bak",
        ] {
            let result = from_file_name(name);
            assert!(
                matches!(result, Err(Error::InvalidFileName(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_from_file_name_overflow() {
        let result = from_file_name("id_99999999999999999999.pdf");
        assert!(matches!(result, Err(Error::InvalidFileName(_))));
    }
}
