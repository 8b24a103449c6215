use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::instrument::{InstrumentDefinition, ScoringRule};

/// Item id -> selected option value, as submitted for one instrument.
pub type ResponseSet = BTreeMap<String, i32>;

/// A computed score. The `type` tag tells callers which shape they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreResult {
    Total {
        total: i32,
        max: i32,
    },
    ByCategory {
        categories: BTreeMap<String, CategoryScore>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryScore {
    pub score: i32,
    pub max: i32,
}

/// What the calculator left out of a score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreDiagnostics {
    /// Response keys that name no item of the instrument. Excluded from scoring.
    pub unknown_items: Vec<String>,
    /// Scored items with no response. Counted as 0.
    pub unanswered_items: Vec<String>,
}

impl ScoreDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.unknown_items.is_empty() && self.unanswered_items.is_empty()
    }
}

/// A score together with its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Scored {
    pub score: ScoreResult,
    pub diagnostics: ScoreDiagnostics,
}

/// A response value that is not one of the item's declared options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub item_id: String,
    pub value: i32,
    pub allowed: Vec<i32>,
    pub message: String,
}

/// Compute the score for `responses`.
///
/// Missing items count as 0 and unknown keys are ignored, so partial input
/// always scores. Values are not checked against the option domain here; see
/// [`validate_responses`].
pub fn calculate(instrument: &InstrumentDefinition, responses: &ResponseSet) -> ScoreResult {
    match &instrument.scoring {
        ScoringRule::Sum { items, max_score } => ScoreResult::Total {
            total: sum_items(items, responses),
            max: *max_score,
        },
        ScoringRule::CategorySum { categories } => ScoreResult::ByCategory {
            categories: categories
                .iter()
                .map(|(name, rule)| {
                    let score = sum_items(&rule.items, responses).saturating_mul(rule.multiplier);
                    (
                        name.clone(),
                        CategoryScore {
                            score,
                            max: rule.max_score,
                        },
                    )
                })
                .collect(),
        },
    }
}

fn sum_items(items: &[String], responses: &ResponseSet) -> i32 {
    items
        .iter()
        .map(|id| responses.get(id).copied().unwrap_or(0))
        .fold(0, i32::saturating_add)
}

/// Every response to a known item whose value is not a declared option.
pub fn validate_responses(
    instrument: &InstrumentDefinition,
    responses: &ResponseSet,
) -> Vec<ValidationError> {
    responses
        .iter()
        .filter_map(|(item_id, &value)| {
            let item = instrument.item(item_id)?;
            if item.accepts(value) {
                return None;
            }
            let allowed = item.allowed_values();
            Some(ValidationError {
                item_id: item_id.clone(),
                value,
                message: format!(
                    "{}: item '{}' has no option with value {} (allowed: {:?})",
                    instrument.id, item_id, value, allowed,
                ),
                allowed,
            })
        })
        .collect()
}

pub fn diagnose(instrument: &InstrumentDefinition, responses: &ResponseSet) -> ScoreDiagnostics {
    let unknown_items = responses
        .keys()
        .filter(|id| instrument.item(id).is_none())
        .cloned()
        .collect();
    let unanswered_items = instrument
        .scoring
        .scored_items()
        .into_iter()
        .filter(|id| !responses.contains_key(*id))
        .map(str::to_string)
        .collect();

    ScoreDiagnostics {
        unknown_items,
        unanswered_items,
    }
}
