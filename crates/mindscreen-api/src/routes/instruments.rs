use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use mindscreen_instruments::document::LocalizedText;
use mindscreen_instruments::instrument::InstrumentDefinition;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct InstrumentSummary {
    id: String,
    title: LocalizedText,
    description: LocalizedText,
    item_count: usize,
}

pub async fn list_instruments(State(state): State<AppState>) -> Json<Vec<InstrumentSummary>> {
    let instruments: Vec<InstrumentSummary> = state
        .registry
        .instruments()
        .map(|i| InstrumentSummary {
            id: i.id.clone(),
            title: i.title.clone(),
            description: i.description.clone(),
            item_count: i.items.len(),
        })
        .collect();
    Json(instruments)
}

/// Full definition, for a presentation layer to build its form from.
pub async fn get_instrument_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstrumentDefinition>, ApiError> {
    let instrument = state.registry.get(&id)?;
    Ok(Json(instrument.clone()))
}
