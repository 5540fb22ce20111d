//! # Content Types
//!
//! Turns structured user intent into the payload string encoded in the QR
//! symbol.
//!
//! ## Overview
//!
//! Each [`ContentType`] owns one field set inside [`ContentFields`], one
//! encoder from [`encoders`] and one "required" message from
//! [`validate::MessageKey`]. The three are tied together by a single lookup
//! table, so adding a content type means adding one variant and one table
//! row.
//!
//! Field sets for every type live side by side. Switching the active type
//! does not clear what was typed for the others.
//!
//! ## Example
//!
//! ```
//! use qrforge::content::{ContentFields, ContentType};
//!
//! let mut fields = ContentFields::default();
//! fields.wifi.ssid = "HomeNet".into();
//! fields.wifi.password = "hunter2".into();
//!
//! assert_eq!(
//!     ContentType::Wifi.encode(&fields),
//!     "WIFI:T:WPA;S:HomeNet;P:hunter2;;"
//! );
//! assert!(ContentType::Wifi.validate(&fields).valid);
//! ```

pub mod encoders;
pub mod escape;
pub mod normalize;
pub mod validate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use validate::{MAX_PAYLOAD_CHARS, MessageKey, ValidationResult};

/// Raw field values keyed by field name, as submitted by a form or CLI.
pub type FieldSet = BTreeMap<String, String>;

/// Semantic category of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Url,
    Text,
    Phone,
    Sms,
    Email,
    Wifi,
    Vcard,
    Location,
    Event,
}

/// A field name that does not belong to the content type it was set on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{field}' for content type '{content_type}'")]
pub struct UnknownField {
    pub content_type: ContentType,
    pub field: String,
}

// ============================================================================
// FIELD SETS
// ============================================================================

/// Website URL fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlFields {
    pub url: String,
}

/// Free text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFields {
    pub text: String,
}

/// Phone number fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneFields {
    pub number: String,
}

/// SMS fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsFields {
    pub number: String,
    pub body: String,
}

/// Email fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailFields {
    pub address: String,
    pub subject: String,
    pub body: String,
}

/// Wi-Fi credential fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiFields {
    pub ssid: String,
    pub password: String,
    /// `WPA`, `WEP` or `nopass`; anything else means WPA.
    pub encryption: String,
}

/// Contact card fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcardFields {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub org: String,
}

/// Geolocation fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationFields {
    pub latitude: String,
    pub longitude: String,
}

/// Calendar event fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFields {
    pub title: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    /// UTC offset of naive start/end values, in minutes east of UTC.
    pub tz_offset_minutes: i32,
}

/// Field sets for every content type.
///
/// Owned by whoever collects user input; the encoders only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFields {
    pub url: UrlFields,
    pub text: TextFields,
    pub phone: PhoneFields,
    pub sms: SmsFields,
    pub email: EmailFields,
    pub wifi: WifiFields,
    pub vcard: VcardFields,
    pub location: LocationFields,
    pub event: EventFields,
}

impl ContentFields {
    /// Build field sets with only `content_type`'s fields filled from `set`.
    pub fn from_field_set(content_type: ContentType, set: &FieldSet) -> Result<Self, UnknownField> {
        let mut fields = Self::default();
        for (name, value) in set {
            fields.set(content_type, name, value)?;
        }
        Ok(fields)
    }

    /// Set one raw field value by name.
    pub fn set(&mut self, content_type: ContentType, field: &str, value: &str) -> Result<(), UnknownField> {
        let slot = match (content_type, field) {
            (ContentType::Url, "url") => &mut self.url.url,
            (ContentType::Text, "text") => &mut self.text.text,
            (ContentType::Phone, "number") => &mut self.phone.number,
            (ContentType::Sms, "number") => &mut self.sms.number,
            (ContentType::Sms, "body") => &mut self.sms.body,
            (ContentType::Email, "address") => &mut self.email.address,
            (ContentType::Email, "subject") => &mut self.email.subject,
            (ContentType::Email, "body") => &mut self.email.body,
            (ContentType::Wifi, "ssid") => &mut self.wifi.ssid,
            (ContentType::Wifi, "password") => &mut self.wifi.password,
            (ContentType::Wifi, "encryption") => &mut self.wifi.encryption,
            (ContentType::Vcard, "name") => &mut self.vcard.name,
            (ContentType::Vcard, "phone") => &mut self.vcard.phone,
            (ContentType::Vcard, "email") => &mut self.vcard.email,
            (ContentType::Vcard, "org") => &mut self.vcard.org,
            (ContentType::Location, "latitude") => &mut self.location.latitude,
            (ContentType::Location, "longitude") => &mut self.location.longitude,
            (ContentType::Event, "title") => &mut self.event.title,
            (ContentType::Event, "start") => &mut self.event.start,
            (ContentType::Event, "end") => &mut self.event.end,
            (ContentType::Event, "location") => &mut self.event.location,
            (ContentType::Event, "description") => &mut self.event.description,
            (ContentType::Event, "tz_offset_minutes") => {
                self.event.tz_offset_minutes = value.trim().parse().unwrap_or(0);
                return Ok(());
            }
            _ => {
                return Err(UnknownField {
                    content_type,
                    field: field.to_string(),
                });
            }
        };
        *slot = value.to_string();
        Ok(())
    }
}

// ============================================================================
// LOOKUP TABLE
// ============================================================================

/// Everything the engine knows about one content type.
pub struct ContentHandler {
    pub content_type: ContentType,
    /// Wire tag (`"wifi"`).
    pub tag: &'static str,
    /// Human-readable label (`"Wi-Fi"`).
    pub label: &'static str,
    /// Field names accepted by [`ContentFields::set`].
    pub fields: &'static [&'static str],
    /// Reported when the payload comes out empty.
    pub missing: MessageKey,
    encode: fn(&ContentFields) -> String,
}

/// Indexed by `ContentType as usize`.
static HANDLERS: [ContentHandler; 9] = [
    ContentHandler {
        content_type: ContentType::Url,
        tag: "url",
        label: "URL",
        fields: &["url"],
        missing: MessageKey::UrlRequired,
        encode: |f| encoders::build_url(&f.url.url),
    },
    ContentHandler {
        content_type: ContentType::Text,
        tag: "text",
        label: "Text",
        fields: &["text"],
        missing: MessageKey::TextRequired,
        encode: |f| encoders::build_text(&f.text.text),
    },
    ContentHandler {
        content_type: ContentType::Phone,
        tag: "phone",
        label: "Phone",
        fields: &["number"],
        missing: MessageKey::PhoneRequired,
        encode: |f| encoders::build_phone(&f.phone.number),
    },
    ContentHandler {
        content_type: ContentType::Sms,
        tag: "sms",
        label: "SMS",
        fields: &["number", "body"],
        missing: MessageKey::SmsRequired,
        encode: |f| encoders::build_sms(&f.sms.number, &f.sms.body),
    },
    ContentHandler {
        content_type: ContentType::Email,
        tag: "email",
        label: "Email",
        fields: &["address", "subject", "body"],
        missing: MessageKey::EmailRequired,
        encode: |f| encoders::build_email(&f.email.address, &f.email.subject, &f.email.body),
    },
    ContentHandler {
        content_type: ContentType::Wifi,
        tag: "wifi",
        label: "Wi-Fi",
        fields: &["ssid", "password", "encryption"],
        missing: MessageKey::WifiRequired,
        encode: |f| encoders::build_wifi(&f.wifi.ssid, &f.wifi.password, &f.wifi.encryption),
    },
    ContentHandler {
        content_type: ContentType::Vcard,
        tag: "vcard",
        label: "Contact",
        fields: &["name", "phone", "email", "org"],
        missing: MessageKey::VcardRequired,
        encode: |f| encoders::build_vcard(&f.vcard.name, &f.vcard.phone, &f.vcard.email, &f.vcard.org),
    },
    ContentHandler {
        content_type: ContentType::Location,
        tag: "location",
        label: "Location",
        fields: &["latitude", "longitude"],
        missing: MessageKey::LocationRequired,
        encode: |f| encoders::build_location(&f.location.latitude, &f.location.longitude),
    },
    ContentHandler {
        content_type: ContentType::Event,
        tag: "event",
        label: "Event",
        fields: &["title", "start", "end", "location", "description", "tz_offset_minutes"],
        missing: MessageKey::EventRequired,
        encode: |f| {
            encoders::build_event(
                &f.event.title,
                &f.event.start,
                &f.event.end,
                &f.event.location,
                &f.event.description,
                f.event.tz_offset_minutes,
            )
        },
    },
];

impl ContentType {
    /// Every content type, in table order.
    pub const ALL: [ContentType; 9] = [
        ContentType::Url,
        ContentType::Text,
        ContentType::Phone,
        ContentType::Sms,
        ContentType::Email,
        ContentType::Wifi,
        ContentType::Vcard,
        ContentType::Location,
        ContentType::Event,
    ];

    /// Table row for this type.
    pub fn handler(self) -> &'static ContentHandler {
        &HANDLERS[self as usize]
    }

    /// Wire tag.
    pub fn tag(self) -> &'static str {
        self.handler().tag
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        self.handler().label
    }

    /// Field names for this type.
    pub fn field_names(self) -> &'static [&'static str] {
        self.handler().fields
    }

    /// Message reported when required fields are empty.
    pub fn missing_message(self) -> MessageKey {
        self.handler().missing
    }

    /// Strict tag lookup (case-sensitive).
    pub fn from_tag(tag: &str) -> Option<Self> {
        HANDLERS.iter().find(|h| h.tag == tag).map(|h| h.content_type)
    }

    /// Tag lookup that falls back to [`ContentType::Url`] for unknown tags.
    pub fn resolve(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or(ContentType::Url)
    }

    /// Encode this type's fields into a payload (empty when incomplete).
    pub fn encode(self, fields: &ContentFields) -> String {
        (self.handler().encode)(fields)
    }

    /// Validate this type's fields.
    pub fn validate(self, fields: &ContentFields) -> ValidationResult {
        validate::validate(self, fields)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.to_lowercase()).ok_or_else(|| {
            let known: Vec<&str> = HANDLERS.iter().map(|h| h.tag).collect();
            format!("unknown content type '{}' (expected one of: {})", s, known.join(", "))
        })
    }
}

/// Encode by raw type tag; unknown tags use the `url` encoder.
pub fn encode_tag(tag: &str, fields: &ContentFields) -> String {
    ContentType::resolve(tag).encode(fields)
}
