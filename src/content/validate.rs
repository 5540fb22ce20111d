//! Content validation: required fields and the global length cap.

use serde::{Deserialize, Serialize};

use super::{ContentFields, ContentType};

/// Longest payload, in characters, that is still accepted for rendering.
pub const MAX_PAYLOAD_CHARS: usize = 2000;

/// Stable identifier for a user-facing validation message.
///
/// The key strings never change, so callers can localize them. The English
/// text from [`MessageKey::default_message`] is a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum MessageKey {
    UrlRequired,
    TextRequired,
    PhoneRequired,
    SmsRequired,
    EmailRequired,
    WifiRequired,
    VcardRequired,
    LocationRequired,
    EventRequired,
    /// Fallback for content type tags with no message of their own
    FieldsRequired,
    ContentTooLong,
}

impl MessageKey {
    /// Every key, in declaration order.
    pub const ALL: [MessageKey; 11] = [
        MessageKey::UrlRequired,
        MessageKey::TextRequired,
        MessageKey::PhoneRequired,
        MessageKey::SmsRequired,
        MessageKey::EmailRequired,
        MessageKey::WifiRequired,
        MessageKey::VcardRequired,
        MessageKey::LocationRequired,
        MessageKey::EventRequired,
        MessageKey::FieldsRequired,
        MessageKey::ContentTooLong,
    ];

    /// Stable key string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::UrlRequired => "content.url.required",
            MessageKey::TextRequired => "content.text.required",
            MessageKey::PhoneRequired => "content.phone.required",
            MessageKey::SmsRequired => "content.sms.required",
            MessageKey::EmailRequired => "content.email.required",
            MessageKey::WifiRequired => "content.wifi.required",
            MessageKey::VcardRequired => "content.vcard.required",
            MessageKey::LocationRequired => "content.location.required",
            MessageKey::EventRequired => "content.event.required",
            MessageKey::FieldsRequired => "content.fields.required",
            MessageKey::ContentTooLong => "content.too_long",
        }
    }

    /// Look a key up by its string form.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    /// English message text.
    pub fn default_message(&self) -> &'static str {
        match self {
            MessageKey::UrlRequired => "Enter a website URL.",
            MessageKey::TextRequired => "Enter some text.",
            MessageKey::PhoneRequired | MessageKey::SmsRequired => "Enter a phone number.",
            MessageKey::EmailRequired => "Enter an email address.",
            MessageKey::WifiRequired => "Enter the network name (SSID).",
            MessageKey::VcardRequired => "Enter at least a name.",
            MessageKey::LocationRequired => "Enter latitude and longitude.",
            MessageKey::EventRequired => "Enter an event title.",
            MessageKey::FieldsRequired => "Please fill in the required fields.",
            MessageKey::ContentTooLong => "Content is too long (max 2000 characters).",
        }
    }
}

impl From<MessageKey> for &'static str {
    fn from(key: MessageKey) -> Self {
        key.as_str()
    }
}

impl TryFrom<String> for MessageKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MessageKey::from_key(&value).ok_or_else(|| format!("unknown message key '{}'", value))
    }
}

/// Verdict on the current content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    /// Reason for rejection; `None` when `valid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_key: Option<MessageKey>,
}

impl ValidationResult {
    /// Content accepted.
    pub const fn ok() -> Self {
        Self {
            valid: true,
            message_key: None,
        }
    }

    /// Content rejected for the given reason.
    pub const fn rejected(key: MessageKey) -> Self {
        Self {
            valid: false,
            message_key: Some(key),
        }
    }
}

/// Judge an already-computed payload.
///
/// `missing` is the key reported when the payload is empty.
pub fn check_payload(payload: &str, missing: MessageKey) -> ValidationResult {
    if payload.is_empty() {
        ValidationResult::rejected(missing)
    } else if payload.chars().count() > MAX_PAYLOAD_CHARS {
        ValidationResult::rejected(MessageKey::ContentTooLong)
    } else {
        ValidationResult::ok()
    }
}

/// Validate the fields of `content_type`.
///
/// The payload is always re-derived from the fields, never taken from a
/// cache, since fields may have changed since it was last encoded.
pub fn validate(content_type: ContentType, fields: &ContentFields) -> ValidationResult {
    let payload = content_type.encode(fields);
    check_payload(&payload, content_type.missing_message())
}

/// Validate by raw type tag.
///
/// Unknown tags are encoded as `url` but report the generic
/// [`MessageKey::FieldsRequired`] when empty.
pub fn validate_tag(tag: &str, fields: &ContentFields) -> ValidationResult {
    match ContentType::from_tag(tag) {
        Some(content_type) => validate(content_type, fields),
        None => {
            let payload = ContentType::Url.encode(fields);
            check_payload(&payload, MessageKey::FieldsRequired)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_keys_unique() {
        let mut keys: Vec<&str> = MessageKey::ALL.iter().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), MessageKey::ALL.len());
    }

    #[test]
    fn test_message_key_round_trip_by_string() {
        for key in MessageKey::ALL {
            assert_eq!(MessageKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(MessageKey::from_key("nope"), None);
    }

    #[test]
    fn test_message_key_serializes_as_string() {
        let json = serde_json::to_string(&MessageKey::WifiRequired).unwrap();
        assert_eq!(json, "\"content.wifi.required\"");
    }

    #[test]
    fn test_check_payload_empty() {
        let result = check_payload("", MessageKey::TextRequired);
        assert!(!result.valid);
        assert_eq!(result.message_key, Some(MessageKey::TextRequired));
    }

    #[test]
    fn test_check_payload_length_cap() {
        let at_cap = "a".repeat(MAX_PAYLOAD_CHARS);
        assert_eq!(check_payload(&at_cap, MessageKey::TextRequired), ValidationResult::ok());

        let over = "a".repeat(MAX_PAYLOAD_CHARS + 1);
        assert_eq!(
            check_payload(&over, MessageKey::TextRequired),
            ValidationResult::rejected(MessageKey::ContentTooLong)
        );
    }

    #[test]
    fn test_length_counts_characters() {
        // 2000 multi-byte characters are still within the cap
        let wide = "é".repeat(MAX_PAYLOAD_CHARS);
        assert!(check_payload(&wide, MessageKey::TextRequired).valid);
    }

    #[test]
    fn test_validate_required_fields_per_type() {
        let fields = ContentFields::default();
        for content_type in ContentType::ALL {
            let result = validate(content_type, &fields);
            assert!(!result.valid, "{:?} should be invalid when empty", content_type);
            assert_eq!(result.message_key, Some(content_type.missing_message()));
        }
    }

    #[test]
    fn test_validate_whitespace_only_is_invalid() {
        let mut fields = ContentFields::default();
        fields.wifi.ssid = "   ".into();
        fields.text.text = "\t\n".into();
        assert!(!validate(ContentType::Wifi, &fields).valid);
        assert!(!validate(ContentType::Text, &fields).valid);
    }

    #[test]
    fn test_validate_too_long_regardless_of_type() {
        let mut fields = ContentFields::default();
        fields.text.text = "x".repeat(2500);
        assert_eq!(
            validate(ContentType::Text, &fields),
            ValidationResult::rejected(MessageKey::ContentTooLong)
        );
        fields.url.url = "x".repeat(2500);
        assert_eq!(
            validate(ContentType::Url, &fields),
            ValidationResult::rejected(MessageKey::ContentTooLong)
        );
    }

    #[test]
    fn test_validate_tag_unknown_uses_url_and_generic_key() {
        let mut fields = ContentFields::default();
        assert_eq!(
            validate_tag("barcode", &fields),
            ValidationResult::rejected(MessageKey::FieldsRequired)
        );
        fields.url.url = "example.com".into();
        assert!(validate_tag("barcode", &fields).valid);
    }

    #[test]
    fn test_validate_rederives_payload() {
        let mut fields = ContentFields::default();
        fields.phone.number = "555".into();
        assert!(validate(ContentType::Phone, &fields).valid);
        fields.phone.number.clear();
        assert!(!validate(ContentType::Phone, &fields).valid);
    }
}
