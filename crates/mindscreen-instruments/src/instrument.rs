use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use ts_rs::TS;

use crate::band::{Band, BandSet};
use crate::document::{
    BandDocument, CategoryDocument, InstrumentDocument, InterpretationDocument, ItemDocument,
    LocalizedText, ScoringDocument,
};
use crate::error::ConfigError;

/// A validated questionnaire definition.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct InstrumentDefinition {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub timeframe: Option<LocalizedText>,
    pub items: Vec<ItemDefinition>,
    pub scoring: ScoringRule,
    pub interpretation: InterpretationConfig,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ItemDefinition {
    pub id: String,
    pub text: LocalizedText,
    pub options: Vec<ItemOption>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ItemOption {
    pub value: i32,
    pub label: LocalizedText,
}

/// How responses become a score. Resolved from the `type` field at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringRule {
    Sum {
        items: Vec<String>,
        max_score: i32,
    },
    #[serde(rename = "sum_by_category")]
    CategorySum {
        categories: BTreeMap<String, CategoryRule>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CategoryRule {
    pub items: Vec<String>,
    pub multiplier: i32,
    pub max_score: i32,
}

/// Interpretation bands, shaped to match the [`ScoringRule`].
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum InterpretationConfig {
    Bands(BandSet),
    ByCategory(BTreeMap<String, BandSet>),
}

impl InstrumentDefinition {
    pub fn item(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|i| i.id == id)
    }
}

impl ItemDefinition {
    pub fn accepts(&self, value: i32) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    pub fn allowed_values(&self) -> Vec<i32> {
        self.options.iter().map(|o| o.value).collect()
    }

    /// Highest selectable value. Items always have at least one option and
    /// option values are never negative.
    pub fn max_value(&self) -> i32 {
        self.options.iter().map(|o| o.value).max().unwrap_or(0)
    }
}

impl ScoringRule {
    /// Every item id that contributes to the score, in rule order.
    pub fn scored_items(&self) -> Vec<&str> {
        match self {
            ScoringRule::Sum { items, .. } => items.iter().map(String::as_str).collect(),
            ScoringRule::CategorySum { categories } => categories
                .values()
                .flat_map(|c| c.items.iter().map(String::as_str))
                .collect(),
        }
    }
}

impl TryFrom<InstrumentDocument> for InstrumentDefinition {
    type Error = ConfigError;

    fn try_from(doc: InstrumentDocument) -> Result<Self, ConfigError> {
        let id = doc.id;
        let items = build_items(&id, doc.items)?;
        let scoring = build_scoring(&id, &items, doc.scoring)?;
        let interpretation = build_interpretation(&id, &scoring, doc.interpretation)?;

        Ok(InstrumentDefinition {
            id,
            title: doc.title,
            description: doc.description,
            timeframe: doc.timeframe,
            items,
            scoring,
            interpretation,
        })
    }
}

fn build_items(
    instrument_id: &str,
    docs: Vec<ItemDocument>,
) -> Result<Vec<ItemDefinition>, ConfigError> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(docs.len());

    for doc in docs {
        if !seen.insert(doc.id.clone()) {
            return Err(ConfigError::DuplicateItem {
                instrument_id: instrument_id.to_string(),
                item_id: doc.id,
            });
        }
        if doc.options.is_empty() {
            return Err(ConfigError::EmptyOptions {
                instrument_id: instrument_id.to_string(),
                item_id: doc.id,
            });
        }

        let mut values = HashSet::new();
        for option in &doc.options {
            if option.value < 0 {
                return Err(ConfigError::NegativeOption {
                    instrument_id: instrument_id.to_string(),
                    item_id: doc.id,
                    value: option.value,
                });
            }
            if !values.insert(option.value) {
                return Err(ConfigError::DuplicateOption {
                    instrument_id: instrument_id.to_string(),
                    item_id: doc.id,
                    value: option.value,
                });
            }
        }

        items.push(ItemDefinition {
            id: doc.id,
            text: doc.text,
            options: doc
                .options
                .into_iter()
                .map(|o| ItemOption {
                    value: o.value,
                    label: o.label,
                })
                .collect(),
        });
    }

    Ok(items)
}

/// Checks that every referenced item exists exactly once and returns the
/// highest raw sum those items can reach.
fn achievable_raw(
    instrument_id: &str,
    items: &[ItemDefinition],
    item_ids: &[String],
) -> Result<i32, ConfigError> {
    let mut seen = HashSet::new();
    let mut total: i32 = 0;
    for item_id in item_ids {
        if !seen.insert(item_id.as_str()) {
            return Err(ConfigError::DuplicateScoringItem {
                instrument_id: instrument_id.to_string(),
                item_id: item_id.clone(),
            });
        }
        let item = items.iter().find(|i| &i.id == item_id).ok_or_else(|| {
            ConfigError::UnknownScoringItem {
                instrument_id: instrument_id.to_string(),
                item_id: item_id.clone(),
            }
        })?;
        total = total.saturating_add(item.max_value());
    }
    Ok(total)
}

fn resolve_max(
    instrument_id: &str,
    category: Option<&str>,
    declared: Option<i32>,
    achievable: i32,
) -> Result<i32, ConfigError> {
    match declared {
        Some(declared) if declared < achievable => Err(ConfigError::MaxBelowAchievable {
            instrument_id: instrument_id.to_string(),
            category: category.map(str::to_string),
            declared,
            achievable,
        }),
        Some(declared) => Ok(declared),
        None => Ok(achievable),
    }
}

fn build_scoring(
    instrument_id: &str,
    items: &[ItemDefinition],
    doc: ScoringDocument,
) -> Result<ScoringRule, ConfigError> {
    match doc {
        ScoringDocument::Sum {
            items: item_ids,
            max_score,
        } => {
            let achievable = achievable_raw(instrument_id, items, &item_ids)?;
            let max_score = resolve_max(instrument_id, None, max_score, achievable)?;
            Ok(ScoringRule::Sum {
                items: item_ids,
                max_score,
            })
        }
        ScoringDocument::SumByCategory { categories } => {
            let mut rules = BTreeMap::new();
            for (name, CategoryDocument { items: item_ids, multiplier, max_score }) in categories {
                if multiplier <= 0 {
                    return Err(ConfigError::InvalidMultiplier {
                        instrument_id: instrument_id.to_string(),
                        category: name,
                        multiplier,
                    });
                }
                let achievable =
                    achievable_raw(instrument_id, items, &item_ids)?.saturating_mul(multiplier);
                let max_score =
                    resolve_max(instrument_id, Some(name.as_str()), max_score, achievable)?;
                rules.insert(
                    name,
                    CategoryRule {
                        items: item_ids,
                        multiplier,
                        max_score,
                    },
                );
            }
            Ok(ScoringRule::CategorySum { categories: rules })
        }
    }
}

fn band_set(
    instrument_id: &str,
    category: Option<&str>,
    docs: Vec<BandDocument>,
    max: i32,
) -> Result<BandSet, ConfigError> {
    BandSet::new(docs.into_iter().map(Band::from).collect(), max).map_err(|source| {
        ConfigError::Band {
            instrument_id: instrument_id.to_string(),
            category: category.map(str::to_string),
            source,
        }
    })
}

fn build_interpretation(
    instrument_id: &str,
    scoring: &ScoringRule,
    doc: InterpretationDocument,
) -> Result<InterpretationConfig, ConfigError> {
    match (scoring, doc) {
        (ScoringRule::Sum { max_score, .. }, InterpretationDocument::Bands(bands)) => Ok(
            InterpretationConfig::Bands(band_set(instrument_id, None, bands, *max_score)?),
        ),
        (ScoringRule::CategorySum { categories }, InterpretationDocument::ByCategory(by_cat)) => {
            let mut sets = BTreeMap::new();
            for (name, bands) in by_cat {
                let rule = categories.get(&name).ok_or_else(|| ConfigError::UnknownCategory {
                    instrument_id: instrument_id.to_string(),
                    category: name.clone(),
                })?;
                let set = band_set(instrument_id, Some(name.as_str()), bands, rule.max_score)?;
                sets.insert(name, set);
            }
            Ok(InterpretationConfig::ByCategory(sets))
        }
        (ScoringRule::Sum { .. }, InterpretationDocument::ByCategory(_)) => {
            Err(ConfigError::InterpretationShape {
                instrument_id: instrument_id.to_string(),
                expected: "a flat band list",
            })
        }
        (ScoringRule::CategorySum { .. }, InterpretationDocument::Bands(_)) => {
            Err(ConfigError::InterpretationShape {
                instrument_id: instrument_id.to_string(),
                expected: "a mapping keyed by category",
            })
        }
    }
}
