//! Render API handler.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::content::validate::validate_tag;
use crate::content::{ContentFields, ContentType, FieldSet, MessageKey};
use crate::design::DesignOptions;
use crate::render::{
    ImageFormat, RasterRenderer, RenderGate, RenderOutcome, RenderRequest, RendererInstance,
};

use super::super::state::AppState;
use super::{ApiError, api_error, resolve_fields};

/// Request body for POST /api/render.
#[derive(Debug, Deserialize)]
pub struct RenderBody {
    #[serde(rename = "type", default)]
    pub content_type: String,
    #[serde(default)]
    pub fields: FieldSet,
    #[serde(default)]
    pub options: DesignOptions,
    #[serde(default)]
    pub format: ImageFormat,
}

/// 422 body for content that cannot be rendered.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidContent {
    pub error: String,
    pub message_key: MessageKey,
}

fn invalid(key: MessageKey) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(InvalidContent {
            error: key.default_message().to_string(),
            message_key: key,
        }),
    )
        .into_response()
}

/// Handle POST /api/render - render content as PNG or SVG.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RenderBody>,
) -> Result<axum::response::Response, ApiError> {
    let (content_type, fields) =
        resolve_fields(&body.content_type, &body.fields, state.encoding.tz_offset_minutes)?;

    // Unknown tags report the generic key rather than the url one.
    if let Some(key) = validate_tag(&body.content_type, &fields).message_key {
        return Ok(invalid(key));
    }

    let format = body.format;
    let options = body.options;
    // Rasterizing is CPU-bound; keep it off the async workers.
    let rendered = tokio::task::spawn_blocking(move || {
        render_bytes(content_type, &fields, &options, format)
    })
    .await
    .map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Processing error: {}", e),
        )
    })?;

    let bytes = match rendered {
        Ok(bytes) => bytes,
        Err(response) => return Ok(response),
    };

    debug!(%content_type, format = format.extension(), bytes = bytes.len(), "rendered");
    Ok(([(header::CONTENT_TYPE, format.mime_type())], bytes).into_response())
}

/// Run the render gate once and pull the artifact bytes.
fn render_bytes(
    content_type: ContentType,
    fields: &ContentFields,
    options: &DesignOptions,
    format: ImageFormat,
) -> Result<Vec<u8>, axum::response::Response> {
    let mut gate = RenderGate::new(RasterRenderer);
    let outcome = gate.generate_now(RenderRequest {
        content_type,
        fields,
        options,
    });

    match (outcome, gate.instance()) {
        (RenderOutcome::Rendered { .. }, Some(instance)) => instance.image_bytes(format).map_err(|e| {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }),
        (RenderOutcome::Invalid(key), _) => Err(invalid(key)),
        _ => {
            let message = gate
                .message()
                .map(|m| m.text())
                .unwrap_or(crate::render::RENDER_FAILED_MESSAGE);
            Err(api_error(StatusCode::BAD_REQUEST, message).into_response())
        }
    }
}
