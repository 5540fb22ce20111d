//! Character escaping for the `WIFI:` configuration string.
//!
//! The Wi-Fi config format uses `;` as field terminator and `:` as key
//! separator, so the characters `\ ; " ,` inside a value must each be
//! prefixed with a backslash. URI-scheme payloads (`mailto:` etc.) rely on
//! percent-encoding of their components instead and never come through here.

/// Characters that must be backslash-escaped inside a Wi-Fi field.
///
/// Backslash comes first so that escapes added for the other characters are
/// not escaped a second time.
const WIFI_SPECIAL: [char; 4] = ['\\', ';', '"', ','];

/// Escape a single Wi-Fi field value (SSID or password).
///
/// Not idempotent: escaping an already escaped value escapes the
/// backslashes again. Callers escape each field exactly once.
///
/// ## Example
///
/// ```
/// use qrforge::content::escape::escape_wifi_field;
///
/// assert_eq!(escape_wifi_field(r#"Home "Net""#), r#"Home \"Net\""#);
/// assert_eq!(escape_wifi_field("a;b,c"), r"a\;b\,c");
/// ```
pub fn escape_wifi_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if WIFI_SPECIAL.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
