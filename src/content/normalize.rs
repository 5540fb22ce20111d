//! Field normalization shared by the content encoders.
//!
//! Raw form values arrive untrimmed and untyped. Encoders never look at a raw
//! value directly; they go through these helpers so that "empty" means the
//! same thing for every content type.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Naive (offset-less) date/time layouts accepted for event start/end.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// iCalendar UTC date-time layout (`YYYYMMDDThhmmssZ`).
const ICAL_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Trim surrounding whitespace.
#[inline]
pub fn trimmed(value: &str) -> &str {
    value.trim()
}

/// Remove every whitespace character, including interior ones.
///
/// Used for phone numbers, where `+1 555 0100` and `+15550100` are the same
/// number.
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Parse the longest numeric prefix of a trimmed value.
///
/// Accepts `[+-]?(digits[.digits]|.digits)([eE][+-]?digits)?` and ignores
/// whatever follows, so `"12.5deg"` parses as `12.5`. Returns `None` when no
/// numeric prefix exists or the value is not finite.
///
/// ## Example
///
/// ```
/// use qrforge::content::normalize::parse_leading_float;
///
/// assert_eq!(parse_leading_float(" -74.0060 "), Some(-74.006));
/// assert_eq!(parse_leading_float("45deg"), Some(45.0));
/// assert_eq!(parse_leading_float("abc"), None);
/// ```
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let s = value.trim();
    let bytes = s.as_bytes();
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = count_digits(end);
    end += int_digits;
    let mut mantissa_digits = int_digits;

    if bytes.get(end) == Some(&b'.') {
        let frac_digits = count_digits(end + 1);
        if mantissa_digits + frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format a coordinate using the shortest representation that round-trips.
///
/// Negative zero prints as `0`. Magnitudes of at least `1e21` or below
/// `1e-6` switch to exponent form with a signed exponent (`1e+21`,
/// `1.5e-7`), as browsers print numbers.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{:e}", value);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    value.to_string()
}

/// Parse an event date/time into UTC.
///
/// Values with an explicit offset (`2024-05-01T10:00:00+02:00`, `...Z`) are
/// converted from that offset. Naive values (`2024-05-01T10:00`, as produced
/// by a `datetime-local` input) are interpreted in `offset_minutes` east of
/// UTC. A bare date is midnight UTC.
pub fn parse_event_datetime(value: &str, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let s = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            let offset = FixedOffset::east_opt(offset_minutes.checked_mul(60)?)?;
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Convert an event date/time to iCalendar UTC form.
///
/// Unparseable input is returned trimmed but otherwise unchanged, so the
/// user's text still reaches the payload.
pub fn format_ical_datetime(value: &str, offset_minutes: i32) -> String {
    match parse_event_datetime(value, offset_minutes) {
        Some(dt) => dt.format(ICAL_UTC_FORMAT).to_string(),
        None => value.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace() {
        assert_eq!(strip_whitespace(" +1 555\t0100 \n"), "+15550100");
        assert_eq!(strip_whitespace("   "), "");
    }

    #[test]
    fn test_parse_leading_float_plain() {
        assert_eq!(parse_leading_float("40.7128"), Some(40.7128));
        assert_eq!(parse_leading_float("-74.0060"), Some(-74.006));
        assert_eq!(parse_leading_float("+3"), Some(3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("7."), Some(7.0));
    }

    #[test]
    fn test_parse_leading_float_prefix() {
        assert_eq!(parse_leading_float("12.5abc"), Some(12.5));
        assert_eq!(parse_leading_float("1e3x"), Some(1000.0));
        assert_eq!(parse_leading_float("2e"), Some(2.0));
        assert_eq!(parse_leading_float("3.2.1"), Some(3.2));
    }

    #[test]
    fn test_parse_leading_float_rejects() {
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("inf"), None);
        assert_eq!(parse_leading_float("NaN"), None);
        assert_eq!(parse_leading_float("1e400"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(40.7128), "40.7128");
        assert_eq!(format_number(-74.006), "-74.006");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn test_format_number_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(999999999999999900000.0), "999999999999999900000");
    }

    #[test]
    fn test_format_ical_datetime_naive_utc() {
        assert_eq!(format_ical_datetime("2024-05-01T10:30", 0), "20240501T103000Z");
        assert_eq!(format_ical_datetime("2024-05-01 10:30:15", 0), "20240501T103015Z");
    }

    #[test]
    fn test_format_ical_datetime_naive_with_offset() {
        // 10:30 at UTC+2 is 08:30 UTC
        assert_eq!(format_ical_datetime("2024-05-01T10:30", 120), "20240501T083000Z");
        // 23:00 at UTC-5 rolls into the next day
        assert_eq!(format_ical_datetime("2024-12-31T23:00", -300), "20250101T040000Z");
    }

    #[test]
    fn test_format_ical_datetime_explicit_offset() {
        assert_eq!(
            format_ical_datetime("2024-05-01T10:30:00+02:00", 0),
            "20240501T083000Z"
        );
        assert_eq!(format_ical_datetime("2024-05-01T10:30:00Z", 600), "20240501T103000Z");
    }

    #[test]
    fn test_format_ical_datetime_date_only() {
        assert_eq!(format_ical_datetime("2024-05-01", 120), "20240501T000000Z");
    }

    #[test]
    fn test_format_ical_datetime_fallback_raw() {
        assert_eq!(format_ical_datetime("  next tuesday ", 0), "next tuesday");
        assert_eq!(format_ical_datetime("2024-13-45T10:00", 0), "2024-13-45T10:00");
    }
}
