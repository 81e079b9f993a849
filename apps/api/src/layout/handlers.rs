//! Axum route handlers for the Layout API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query,
    },
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::illustrations::{apply_layout_to_illustrations, Illustration};
use crate::layout::templates::{get_layout_config, LayoutConfig, LayoutType};

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub count: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IllustrationsBody {
    pub illustrations: Vec<Illustration>,
}

fn parse_layout(raw: &str) -> Result<LayoutType, AppError> {
    raw.parse::<LayoutType>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// GET /api/layout/:layout_type?count=N
pub async fn handle_get_layout(
    Path(layout_type): Path<String>,
    query: Result<Query<CountQuery>, QueryRejection>,
) -> Result<Json<LayoutConfig>, AppError> {
    let layout_type = parse_layout(&layout_type)?;
    let Query(params) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(Json(get_layout_config(layout_type, params.count)))
}

/// POST /api/layout/:layout_type/apply
pub async fn handle_apply_layout(
    Path(layout_type): Path<String>,
    payload: Result<Json<IllustrationsBody>, JsonRejection>,
) -> Result<Json<IllustrationsBody>, AppError> {
    let layout_type = parse_layout(&layout_type)?;
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    Ok(Json(IllustrationsBody {
        illustrations: apply_layout_to_illustrations(&body.illustrations, layout_type),
    }))
}
