//! Saved design handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::design::DesignSnapshot;
use crate::store::{DesignId, SaveDesign, StoreError, StoredDesign};

use super::super::state::AppState;
use super::{ApiError, ErrorBody, api_error};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Request body for POST /api/designs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub options: Option<DesignSnapshot>,
    #[serde(default)]
    pub image_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub id: DesignId,
    pub url: String,
}

/// Decode a `data:image/png;base64,...` URL. Anything else yields `None`.
pub fn decode_png_data_url(data_url: &str) -> Option<Vec<u8>> {
    let encoded = data_url.strip_prefix(PNG_DATA_URL_PREFIX)?;
    if encoded.is_empty() {
        return None;
    }
    STANDARD.decode(encoded).ok()
}

fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::MissingData => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                success: Some(false),
                error: e.to_string(),
            }),
        ),
        StoreError::InvalidId => api_error(StatusCode::BAD_REQUEST, e.to_string()),
        StoreError::NotFound => api_error(StatusCode::NOT_FOUND, e.to_string()),
        StoreError::Serde(_) => {
            warn!(error = %e, "stored design unreadable");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid design file")
        }
        StoreError::Io(_) => {
            warn!(error = %e, "design store I/O failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    success: Some(false),
                    error: "Could not save design".to_string(),
                }),
            )
        }
    }
}

/// Handle POST /api/designs - save a design.
pub async fn save(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, ApiError> {
    let image_png = req.image_base64.as_deref().and_then(decode_png_data_url);
    if req.image_base64.is_some() && image_png.is_none() {
        warn!("ignoring malformed image data URL");
    }

    let stored = state
        .store
        .save(SaveDesign {
            data: req.data,
            options: req.options.unwrap_or_default(),
            image_png,
        })
        .await
        .map_err(store_error)?;

    Ok(Json(SaveResponse {
        success: true,
        url: format!("/api/designs/{}", stored.id),
        id: stored.id,
    }))
}

/// Handle GET /api/designs/:id - fetch a saved design.
pub async fn fetch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StoredDesign>, ApiError> {
    let id = DesignId::parse(&id).map_err(store_error)?;
    let stored = state.store.fetch(&id).await.map_err(store_error)?;
    Ok(Json(stored))
}
