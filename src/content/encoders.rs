//! Payload encoders, one per content type.
//!
//! Every encoder is a pure function from raw field values to the canonical
//! payload string consumed by scanner apps. A missing required field yields
//! the empty string, never an error.
//!
//! | Type | Output |
//! |------|--------|
//! | url | `https://example.com` (scheme added when absent) |
//! | text | trimmed text |
//! | phone | `tel:+15550100` |
//! | sms | `sms:<n>` or `smsto:<n>:<body>` |
//! | email | `mailto:<addr>?subject=..&body=..` |
//! | wifi | `WIFI:T:WPA;S:<ssid>;P:<pass>;;` |
//! | vcard | vCard 3.0 block |
//! | location | `geo:<lat>,<lng>` |
//! | event | `VCALENDAR`/`VEVENT` block |

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::escape::escape_wifi_field;
use super::normalize::{format_ical_datetime, format_number, parse_leading_float, strip_whitespace, trimmed};

/// Bytes left as-is in `mailto:` components: alphanumerics plus
/// `- _ . ! ~ * ' ( )`, the same set browsers keep for URI components.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Line separator for the multi-line vCard and iCalendar payloads.
const LINE_SEPARATOR: &str = "\n";

/// Wi-Fi authentication type as written in the `T:` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WifiEncryption {
    /// WPA/WPA2/WPA3 personal (default for any unrecognized value)
    #[default]
    Wpa,
    /// Legacy WEP
    Wep,
    /// Open network
    NoPass,
}

impl WifiEncryption {
    /// Resolve a raw form value. Only the exact strings `WEP` and `nopass`
    /// select something other than WPA.
    pub fn from_field(value: &str) -> Self {
        match value {
            "WEP" => WifiEncryption::Wep,
            "nopass" => WifiEncryption::NoPass,
            _ => WifiEncryption::Wpa,
        }
    }

    /// Value written after `T:`.
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiEncryption::Wpa => "WPA",
            WifiEncryption::Wep => "WEP",
            WifiEncryption::NoPass => "nopass",
        }
    }
}

/// True when `value` starts with `<letter>[letters/digits/+.-]*://`.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Website URL. Prefixes `https://` when the value carries no scheme.
///
/// ```
/// use qrforge::content::encoders::build_url;
///
/// assert_eq!(build_url("example.com"), "https://example.com");
/// assert_eq!(build_url("ftp://x"), "ftp://x");
/// assert_eq!(build_url("   "), "");
/// ```
pub fn build_url(value: &str) -> String {
    let v = trimmed(value);
    if v.is_empty() {
        return String::new();
    }
    if has_scheme(v) {
        v.to_string()
    } else {
        format!("https://{}", v)
    }
}

/// Free text, trimmed, otherwise verbatim.
pub fn build_text(value: &str) -> String {
    trimmed(value).to_string()
}

/// `tel:` URI with all whitespace removed from the number.
pub fn build_phone(number: &str) -> String {
    let n = strip_whitespace(number);
    if n.is_empty() {
        return String::new();
    }
    format!("tel:{}", n)
}

/// `smsto:<number>:<body>` when a body is given, `sms:<number>` otherwise.
pub fn build_sms(number: &str, body: &str) -> String {
    let n = strip_whitespace(number);
    if n.is_empty() {
        return String::new();
    }
    let b = trimmed(body);
    if b.is_empty() {
        format!("sms:{}", n)
    } else {
        format!("smsto:{}:{}", n, b)
    }
}

/// `mailto:` URI. Address, subject and body are percent-encoded
/// independently; empty subject/body are left out of the query.
pub fn build_email(address: &str, subject: &str, body: &str) -> String {
    let a = trimmed(address);
    if a.is_empty() {
        return String::new();
    }

    let mut uri = format!("mailto:{}", encode_component(a));
    let params: Vec<String> = [("subject", trimmed(subject)), ("body", trimmed(body))]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{}={}", key, encode_component(value)))
        .collect();

    if !params.is_empty() {
        uri.push('?');
        uri.push_str(&params.join("&"));
    }
    uri
}

/// `WIFI:` network configuration string.
///
/// The password is only written for secured networks, and only when
/// non-empty.
///
/// ```
/// use qrforge::content::encoders::build_wifi;
///
/// assert_eq!(
///     build_wifi(r#"Home "Net""#, "p,w", "WPA"),
///     r#"WIFI:T:WPA;S:Home \"Net\";P:p\,w;;"#
/// );
/// ```
pub fn build_wifi(ssid: &str, password: &str, encryption: &str) -> String {
    let s = trimmed(ssid);
    if s.is_empty() {
        return String::new();
    }

    let enc = WifiEncryption::from_field(encryption);
    let mut out = format!("WIFI:T:{};S:{};", enc.as_str(), escape_wifi_field(s));

    let p = trimmed(password);
    if enc != WifiEncryption::NoPass && !p.is_empty() {
        out.push_str("P:");
        out.push_str(&escape_wifi_field(p));
        out.push(';');
    }

    out.push(';');
    out
}

/// vCard 3.0 contact card. `FN` and `N` both carry the full name; `TEL`,
/// `EMAIL` and `ORG` lines appear only for non-empty fields.
pub fn build_vcard(name: &str, phone: &str, email: &str, org: &str) -> String {
    let n = trimmed(name);
    if n.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", n),
        format!("N:{}", n),
    ];

    let tel = strip_whitespace(phone);
    if !tel.is_empty() {
        lines.push(format!("TEL:{}", tel));
    }
    let mail = trimmed(email);
    if !mail.is_empty() {
        lines.push(format!("EMAIL:{}", mail));
    }
    let organization = trimmed(org);
    if !organization.is_empty() {
        lines.push(format!("ORG:{}", organization));
    }

    lines.push("END:VCARD".to_string());
    lines.join(LINE_SEPARATOR)
}

/// `geo:` URI. Both coordinates must parse as finite numbers.
pub fn build_location(latitude: &str, longitude: &str) -> String {
    match (parse_leading_float(latitude), parse_leading_float(longitude)) {
        (Some(lat), Some(lng)) => format!("geo:{},{}", format_number(lat), format_number(lng)),
        _ => String::new(),
    }
}

/// iCalendar event.
///
/// Start and end are converted to `YYYYMMDDThhmmssZ`; a value that does not
/// parse as a date/time is written as typed. `offset_minutes` is the UTC
/// offset used for naive (offset-less) date/times.
pub fn build_event(
    title: &str,
    start: &str,
    end: &str,
    location: &str,
    description: &str,
    offset_minutes: i32,
) -> String {
    let t = trimmed(title);
    if t.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY:{}", t),
    ];

    if !trimmed(start).is_empty() {
        lines.push(format!("DTSTART:{}", format_ical_datetime(start, offset_minutes)));
    }
    if !trimmed(end).is_empty() {
        lines.push(format!("DTEND:{}", format_ical_datetime(end, offset_minutes)));
    }
    let loc = trimmed(location);
    if !loc.is_empty() {
        lines.push(format!("LOCATION:{}", loc));
    }
    let desc = trimmed(description);
    if !desc.is_empty() {
        lines.push(format!("DESCRIPTION:{}", desc));
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines.join(LINE_SEPARATOR)
}
