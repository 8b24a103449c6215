//! Raw configuration documents as they appear on disk.
//!
//! These are deserialized straight from YAML or JSON and carry no guarantees
//! beyond field presence. [`Registry::load`](crate::registry::Registry::load)
//! turns them into validated definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::safety::Severity;

/// Display text keyed by language code (e.g. `id`, `en`).
///
/// The engine never looks inside; the presentation layer picks the language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocalizedText(pub BTreeMap<String, String>);

impl LocalizedText {
    pub fn get(&self, lang: &str) -> Option<&str> {
        self.0.get(lang).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LocalizedText {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(lang, text)| (lang.to_string(), text.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentDocument {
    pub id: String,
    #[serde(default)]
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub timeframe: Option<LocalizedText>,
    pub items: Vec<ItemDocument>,
    pub scoring: ScoringDocument,
    pub interpretation: InterpretationDocument,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemDocument {
    pub id: String,
    #[serde(default)]
    pub text: LocalizedText,
    pub options: Vec<OptionDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionDocument {
    pub value: i32,
    #[serde(default)]
    pub label: LocalizedText,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScoringDocument {
    Sum {
        items: Vec<String>,
        #[serde(default)]
        max_score: Option<i32>,
    },
    SumByCategory {
        categories: BTreeMap<String, CategoryDocument>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDocument {
    pub items: Vec<String>,
    #[serde(default = "default_multiplier")]
    pub multiplier: i32,
    #[serde(default)]
    pub max_score: Option<i32>,
}

fn default_multiplier() -> i32 {
    1
}

/// Either a flat band list (sum scoring) or bands per category.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InterpretationDocument {
    Bands(Vec<BandDocument>),
    ByCategory(BTreeMap<String, Vec<BandDocument>>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BandDocument {
    /// Inclusive `[low, high]`.
    pub range: [i32; 2],
    #[serde(default)]
    pub label: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyDocument {
    #[serde(default)]
    pub instruments: Vec<SafetyRuleDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SafetyRuleDocument {
    /// Instrument id.
    pub id: String,
    pub item: String,
    pub threshold: i32,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub message: LocalizedText,
    pub action: String,
}

/// Severity tiers shared across instruments, and where each instrument's
/// totals cross into each tier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrosswalkDocument {
    /// Tier names, least to most severe.
    #[serde(default)]
    pub tiers: Vec<String>,
    /// instrument id -> tier name -> lowest total in that tier.
    #[serde(default)]
    pub instruments: BTreeMap<String, BTreeMap<String, i32>>,
}
