use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::band::BandSet;
use crate::document::LocalizedText;
use crate::error::InstrumentError;
use crate::instrument::{InstrumentDefinition, InterpretationConfig, ScoringRule};
use crate::scoring::ScoreResult;

/// The band a score landed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResolvedBand {
    pub score: i32,
    pub max: i32,
    pub low: i32,
    pub high: i32,
    pub label: LocalizedText,
    pub description: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum Interpretation {
    Total(ResolvedBand),
    /// Categories with no bands configured are absent.
    ByCategory {
        categories: BTreeMap<String, ResolvedBand>,
    },
}

impl Interpretation {
    /// The single band of a total-score interpretation.
    pub fn total(&self) -> Option<&ResolvedBand> {
        match self {
            Interpretation::Total(band) => Some(band),
            Interpretation::ByCategory { .. } => None,
        }
    }

    pub fn category(&self, name: &str) -> Option<&ResolvedBand> {
        match self {
            Interpretation::Total(_) => None,
            Interpretation::ByCategory { categories } => categories.get(name),
        }
    }
}

/// Map `score` onto the instrument's interpretation bands.
pub fn resolve(
    instrument: &InstrumentDefinition,
    score: &ScoreResult,
) -> Result<Interpretation, InstrumentError> {
    match (&instrument.interpretation, score) {
        (InterpretationConfig::Bands(set), ScoreResult::Total { total, max }) => {
            if *max != set.max() {
                return Err(mismatch(
                    instrument,
                    format!("score max {max} differs from configured max {}", set.max()),
                ));
            }
            resolve_in(instrument, None, set, *total).map(Interpretation::Total)
        }
        (InterpretationConfig::ByCategory(sets), ScoreResult::ByCategory { categories }) => {
            let ScoringRule::CategorySum { categories: rules } = &instrument.scoring else {
                return Err(mismatch(instrument, "instrument is not category-scored".to_string()));
            };

            let mut resolved = BTreeMap::new();
            for (name, category_score) in categories {
                if !rules.contains_key(name) {
                    return Err(mismatch(instrument, format!("unknown category '{name}'")));
                }
                let Some(set) = sets.get(name) else {
                    continue;
                };
                if category_score.max != set.max() {
                    return Err(mismatch(
                        instrument,
                        format!(
                            "category '{name}' max {} differs from configured max {}",
                            category_score.max,
                            set.max()
                        ),
                    ));
                }
                let band = resolve_in(instrument, Some(name.as_str()), set, category_score.score)?;
                resolved.insert(name.clone(), band);
            }
            Ok(Interpretation::ByCategory {
                categories: resolved,
            })
        }
        (InterpretationConfig::Bands(_), ScoreResult::ByCategory { .. }) => Err(mismatch(
            instrument,
            "expected a total score, got per-category scores".to_string(),
        )),
        (InterpretationConfig::ByCategory(_), ScoreResult::Total { .. }) => Err(mismatch(
            instrument,
            "expected per-category scores, got a total score".to_string(),
        )),
    }
}

fn resolve_in(
    instrument: &InstrumentDefinition,
    category: Option<&str>,
    set: &BandSet,
    score: i32,
) -> Result<ResolvedBand, InstrumentError> {
    let band = set
        .find(score)
        .ok_or_else(|| InstrumentError::OutOfRange {
            instrument_id: instrument.id.clone(),
            category: category.map(str::to_string),
            score,
            max: set.max(),
        })?;

    Ok(ResolvedBand {
        score,
        max: set.max(),
        low: band.low,
        high: band.high,
        label: band.label.clone(),
        description: band.description.clone(),
    })
}

fn mismatch(instrument: &InstrumentDefinition, reason: String) -> InstrumentError {
    InstrumentError::ScoreMismatch {
        instrument_id: instrument.id.clone(),
        reason,
    }
}
