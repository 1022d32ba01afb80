use {
    crate::constants::ISO8601_COMPACT_FORMAT,
    chrono::{
        format::{ParseError, ParseResult},
        DateTime, NaiveDateTime, Utc,
    },
    lazy_static::lazy_static,
    regex::Regex,
};

lazy_static! {
    /// ISO 8601 basic format timestamp, UTC only: `yyyyMMdd'T'HHmmss'Z'`
    static ref ISO_8601_COMPACT_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})
        (?P<month>0[1-9]|1[0-2])
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3])
        (?P<minute>[0-5][0-9])
        (?P<second>[0-5][0-9])
        Z$").unwrap();

    static ref INVALID: ParseError = NaiveDateTime::parse_from_str("", ISO8601_COMPACT_FORMAT).unwrap_err();
}

/// Strict parsing of the compact timestamps used by `x-amz-date` and `X-Amz-Date`.
pub(crate) trait ParseCompactISO8601<T> {
    fn parse_from_compact_iso8601(s: &str) -> ParseResult<T>;
}

impl ParseCompactISO8601<DateTime<Utc>> for DateTime<Utc> {
    fn parse_from_compact_iso8601(s: &str) -> ParseResult<DateTime<Utc>> {
        // The regex rejects anything chrono would otherwise be lenient about (signs, extra digits,
        // offsets other than Z); chrono then rejects impossible calendar dates like February 30.
        if !ISO_8601_COMPACT_REGEX.is_match(s) {
            return Err(*INVALID);
        }

        let naive = NaiveDateTime::parse_from_str(s, ISO8601_COMPACT_FORMAT)?;
        Ok(naive.and_utc())
    }
}
