use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use mindscreen_instruments::ComparisonResult;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CompareBody {
    /// instrument id -> total score
    totals: BTreeMap<String, i32>,
}

pub async fn compare_severity(
    State(state): State<AppState>,
    Json(body): Json<CompareBody>,
) -> Result<Json<ComparisonResult>, ApiError> {
    Ok(Json(mindscreen_instruments::compare_severity(
        &state.registry,
        &body.totals,
    )?))
}
