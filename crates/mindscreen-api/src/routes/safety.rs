use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use mindscreen_instruments::{ResponseSet, SafetyFlag};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SafetyBody {
    /// instrument id -> responses
    responses: BTreeMap<String, ResponseSet>,
}

pub async fn check_safety(
    State(state): State<AppState>,
    Json(body): Json<SafetyBody>,
) -> Result<Json<Vec<SafetyFlag>>, ApiError> {
    let flags = mindscreen_instruments::check_safety(&state.registry, &body.responses)?;
    if !flags.is_empty() {
        tracing::warn!(flags = flags.len(), "safety rules triggered");
    }
    Ok(Json(flags))
}
