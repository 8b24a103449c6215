use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use mindscreen_instruments::scoring::ScoreDiagnostics;
use mindscreen_instruments::{
    Interpretation, ResponseSet, SafetyFlag, ScoreResult, Scored, check_safety, interpret, score,
};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResponsesBody {
    responses: ResponseSet,
}

pub async fn score_responses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResponsesBody>,
) -> Result<Json<Scored>, ApiError> {
    Ok(Json(score(&state.registry, &id, &body.responses)?))
}

pub async fn interpret_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ScoreResult>,
) -> Result<Json<Interpretation>, ApiError> {
    Ok(Json(interpret(&state.registry, &id, &body)?))
}

/// Everything a results page needs for one completed questionnaire.
#[derive(Serialize)]
pub struct Assessment {
    instrument_id: String,
    score: ScoreResult,
    interpretation: Interpretation,
    diagnostics: ScoreDiagnostics,
    safety_flags: Vec<SafetyFlag>,
}

pub async fn assess(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResponsesBody>,
) -> Result<Json<Assessment>, ApiError> {
    let registry = &state.registry;
    let scored = score(registry, &id, &body.responses)?;
    let interpretation = interpret(registry, &id, &scored.score)?;
    let safety_flags = check_safety(registry, &BTreeMap::from([(id.clone(), body.responses)]))?;

    Ok(Json(Assessment {
        instrument_id: id,
        score: scored.score,
        interpretation,
        diagnostics: scored.diagnostics,
        safety_flags,
    }))
}
