//! Payload API handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::content::validate::validate_tag;
use crate::content::{FieldSet, MessageKey};

use super::super::state::AppState;
use super::{ApiError, resolve_fields};

/// Request body for POST /api/payload.
#[derive(Debug, Deserialize)]
pub struct PayloadRequest {
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub fields: FieldSet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadResponse {
    pub payload: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_key: Option<MessageKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Handle POST /api/payload - encode and validate content fields.
pub async fn encode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PayloadRequest>,
) -> Result<Json<PayloadResponse>, ApiError> {
    let (content_type, fields) =
        resolve_fields(&req.content_type, &req.fields, state.encoding.tz_offset_minutes)?;

    let payload = content_type.encode(&fields);
    let verdict = validate_tag(&req.content_type, &fields);

    Ok(Json(PayloadResponse {
        payload,
        valid: verdict.valid,
        message_key: verdict.message_key,
        message: verdict.message_key.map(|key| key.default_message().to_string()),
    }))
}
