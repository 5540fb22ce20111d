//! HTTP handlers for the server.

pub mod designs;
pub mod health;
pub mod payload;
pub mod render;

use axum::{Json, http::StatusCode};
use serde::Serialize;

use crate::content::{ContentFields, ContentType, FieldSet};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            success: None,
            error: message.into(),
        }),
    )
}

/// Resolve a raw type tag and field set.
///
/// Unknown tags fall back to `url`. Event fields without an explicit
/// offset take `default_tz_offset`.
pub fn resolve_fields(
    tag: &str,
    set: &FieldSet,
    default_tz_offset: i32,
) -> Result<(ContentType, ContentFields), ApiError> {
    let content_type = ContentType::resolve(tag);
    let mut fields = ContentFields::from_field_set(content_type, set)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    if content_type == ContentType::Event && !set.contains_key("tz_offset_minutes") {
        fields.event.tz_offset_minutes = default_tz_offset;
    }
    Ok((content_type, fields))
}
