//! Axum route handler for the background removal API.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::background::color::Color;
use crate::background::feather::PostProcessing;
use crate::background::methods::{
    remove_background_png, RemovalConfig, RemovalMethod, RemovalOptions,
};
use crate::background::RemovalError;
use crate::errors::AppError;
use crate::state::AppState;

pub const MISSING_FIELDS: &str = "Missing required fields: imageUrl and method are required";

const DEFAULT_TOLERANCE: f64 = 30.0;
const DEFAULT_EDGE_THRESHOLD: f64 = 128.0;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBackgroundRequest {
    pub image_url: Option<String>,
    pub method: Option<String>,
    #[serde(default)]
    pub config: RemovalSettings,
}

/// Untyped wire settings. Converted to a `RemovalConfig` once the method is known.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalSettings {
    pub target_color: Option<String>,
    pub tolerance: Option<f64>,
    pub edge_threshold: Option<f64>,
    pub mask_path: Option<String>,
    #[serde(default)]
    pub smooth_edges: bool,
    pub feather_amount: Option<f64>,
}

impl RemovalSettings {
    pub fn into_options(self, method: RemovalMethod) -> Result<RemovalOptions, RemovalError> {
        let config = match method {
            RemovalMethod::ColorBased => RemovalConfig::ColorBased {
                target_color: match self.target_color.as_deref() {
                    Some(hex) => hex.parse()?,
                    None => Color::WHITE,
                },
                tolerance: self.tolerance.unwrap_or(DEFAULT_TOLERANCE),
            },
            RemovalMethod::EdgeBased => RemovalConfig::EdgeBased {
                edge_threshold: self.edge_threshold.unwrap_or(DEFAULT_EDGE_THRESHOLD),
            },
            RemovalMethod::BorderHeuristic => RemovalConfig::BorderHeuristic,
            RemovalMethod::Manual => match self.mask_path {
                Some(mask_path) if !mask_path.trim().is_empty() => {
                    RemovalConfig::Manual { mask_path }
                }
                _ => return Err(RemovalError::MissingMask),
            },
        };

        Ok(RemovalOptions {
            config,
            post: PostProcessing {
                smooth_edges: self.smooth_edges,
                feather_amount: self.feather_amount.unwrap_or(0.0),
            },
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBackgroundResponse {
    /// `data:image/png;base64,...`
    pub transparent_image_url: String,
    pub original_image_url: String,
    pub method: RemovalMethod,
    /// Milliseconds from request receipt to encoded result.
    pub processing_time: u64,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/remove-background
///
/// Validates the request, downloads the source image once, removes the background
/// off the async runtime and returns the result as a PNG data URI.
pub async fn handle_remove_background(
    State(state): State<AppState>,
    payload: Result<Json<RemoveBackgroundRequest>, JsonRejection>,
) -> Result<Json<RemoveBackgroundResponse>, AppError> {
    let started = Instant::now();
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let (Some(image_url), Some(method)) = (non_empty(request.image_url), non_empty(request.method))
    else {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    };

    let method: RemovalMethod = method.parse()?;
    let options = request.config.into_options(method)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("remove_background", %request_id, %method);

    process(state, image_url, method, options, started)
        .instrument(span)
        .await
        .map(Json)
}

async fn process(
    state: AppState,
    image_url: String,
    method: RemovalMethod,
    options: RemovalOptions,
    started: Instant,
) -> Result<RemoveBackgroundResponse, AppError> {
    let source = state.fetcher.fetch(&image_url).await?;

    let png = tokio::task::spawn_blocking(move || remove_background_png(&source, &options))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let processing_time = started.elapsed().as_millis() as u64;
    info!(
        "Background removed: {} bytes PNG in {}ms",
        png.len(),
        processing_time
    );

    Ok(RemoveBackgroundResponse {
        transparent_image_url: format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&png)),
        original_image_url: image_url,
        method,
        processing_time,
    })
}
