use {
    crate::{
        constants::{ISO8601_COMPACT_FORMAT, ISO8601_DATE_FORMAT},
        PresignError,
    },
    chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc},
    lazy_static::lazy_static,
    regex::{Captures, Regex},
    std::str::FromStr,
};

lazy_static! {
    /// ISO 8601 timestamp format, basic or extended, with optional fractional seconds.
    static ref ISO_8601_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})-?
        (?P<month>0[1-9]|1[0-2])-?
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3]):?
        (?P<minute>[0-5][0-9]):?
        (?P<second>[0-5][0-9])
        (?:\.(?P<fraction>\d{1,9}))?
        (?P<offset>[-+](?:[01][0-9]|2[0-3]):?[0-5][0-9]|Z)$").unwrap();
}

/// Parse a caller-supplied signing instant.
pub trait ParseISO8601: Sized {
    /// Parse `s` as ISO 8601, e.g. `20240101T000000Z` or `2024-01-01T09:00:00.250+09:00`.
    fn parse_from_iso8601(s: &str) -> Result<Self, PresignError>;
}

impl ParseISO8601 for DateTime<Utc> {
    fn parse_from_iso8601(s: &str) -> Result<Self, PresignError> {
        let invalid = || PresignError::InvalidTimestamp(format!("Invalid ISO 8601 timestamp: {}", s.escape_debug()));
        let cap = ISO_8601_REGEX.captures(s).ok_or_else(invalid)?;

        let year = capture_number::<i32>(&cap, "year").ok_or_else(invalid)?;
        let month = capture_number::<u32>(&cap, "month").ok_or_else(invalid)?;
        let day = capture_number::<u32>(&cap, "day").ok_or_else(invalid)?;
        let naive_date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

        let hour = capture_number::<u32>(&cap, "hour").ok_or_else(invalid)?;
        let minute = capture_number::<u32>(&cap, "minute").ok_or_else(invalid)?;
        let second = capture_number::<u32>(&cap, "second").ok_or_else(invalid)?;
        let nanos = match cap.name("fraction") {
            // Right-pad to nanoseconds: ".25" is 250_000_000ns.
            Some(fraction) => u32::from_str(&format!("{:0<9}", fraction.as_str())).map_err(|_| invalid())?,
            None => 0,
        };
        let naive_time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(invalid)?;

        let offset_str = cap.name("offset").map(|m| m.as_str()).ok_or_else(invalid)?;
        let offset_secs = if offset_str == "Z" {
            0
        } else {
            // Must be [+-]HHMM once the colon is removed.
            let offset_condensed = offset_str.replace(':', "");
            let (sign_str, hm) = offset_condensed.split_at(1);
            let (hour_off_str, minute_off_str) = hm.split_at(2);
            let sign = if sign_str == "-" { -1 } else { 1 };

            let hour = i32::from_str(hour_off_str).map_err(|_| invalid())?;
            let min = i32::from_str(minute_off_str).map_err(|_| invalid())?;
            sign * (hour * 3600 + min * 60)
        };

        let offset = FixedOffset::east_opt(offset_secs).ok_or_else(invalid)?;
        let local =
            NaiveDateTime::new(naive_date, naive_time).and_local_timezone(offset).single().ok_or_else(invalid)?;
        Ok(local.with_timezone(&Utc))
    }
}

fn capture_number<T: FromStr>(cap: &Captures, name: &str) -> Option<T> {
    cap.name(name).and_then(|m| T::from_str(m.as_str()).ok())
}

/// SigV4 renderings of a signing instant.
pub trait FormatSigV4 {
    /// Format as a compact UTC timestamp, `YYYYMMDD'T'HHMMSS'Z'`. Fractional seconds are dropped.
    fn to_sigv4_timestamp(&self) -> String;

    /// Format as the credential scope date, `YYYYMMDD`.
    fn to_sigv4_date(&self) -> String;

    /// The same instant with any fractional seconds removed.
    fn truncate_to_seconds(&self) -> Self;
}

impl FormatSigV4 for DateTime<Utc> {
    fn to_sigv4_timestamp(&self) -> String {
        self.format(ISO8601_COMPACT_FORMAT).to_string()
    }

    fn to_sigv4_date(&self) -> String {
        self.format(ISO8601_DATE_FORMAT).to_string()
    }

    fn truncate_to_seconds(&self) -> Self {
        self.with_nanosecond(0).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{FormatSigV4, ParseISO8601},
        crate::PresignError,
        chrono::{DateTime, TimeZone, Timelike, Utc},
    };

    #[test]
    fn check_compact_formats() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(dt.to_sigv4_timestamp(), "20240101T000000Z");
        assert_eq!(dt.to_sigv4_date(), "20240101");

        let dt = Utc.with_ymd_and_hms(2001, 2, 3, 15, 16, 17).unwrap();
        assert_eq!(dt.to_sigv4_timestamp(), "20010203T151617Z");
        assert_eq!(dt.to_sigv4_date(), "20010203");
    }

    #[test]
    fn check_fraction_dropped() {
        let dt = DateTime::<Utc>::from_timestamp(981_213_377, 123_456_789).unwrap();
        assert_eq!(dt.to_sigv4_timestamp(), "20010203T151617Z");

        let truncated = dt.truncate_to_seconds();
        assert_eq!(truncated.nanosecond(), 0);
        assert_eq!(truncated.timestamp(), dt.timestamp());
    }

    #[test_log::test]
    fn check_parse_iso8601() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for s in [
            "20240101T000000Z",
            "2024-01-01T00:00:00Z",
            "2024-01-01T09:00:00+09:00",
            "2023-12-31T19:00:00-0500",
            "20231231T190000-05:00",
        ] {
            assert_eq!(DateTime::<Utc>::parse_from_iso8601(s).unwrap(), expected, "{}", s);
        }

        let dt = DateTime::<Utc>::parse_from_iso8601("2024-01-01T00:00:00.25Z").unwrap();
        assert_eq!(dt.nanosecond(), 250_000_000);
        assert_eq!(dt.truncate_to_seconds(), expected);
    }

    #[test_log::test]
    fn check_parse_iso8601_invalid() {
        for s in [
            "",
            "2024-01-01",
            "2024-01-01T00:00:00",
            "2024-02-30T00:00:00Z",
            "2024-01-01T24:00:00Z",
            "2024-01-01T00:00:00+24:00",
            "2024-01-01T00:00:00.Z",
        ] {
            match DateTime::<Utc>::parse_from_iso8601(s) {
                Err(PresignError::InvalidTimestamp(msg)) => assert!(msg.starts_with("Invalid ISO 8601 timestamp: ")),
                other => panic!("Expected InvalidTimestamp for {:?}; got {:?}", s, other),
            }
        }
    }
}
