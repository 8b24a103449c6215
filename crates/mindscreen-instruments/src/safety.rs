use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::document::{LocalizedText, SafetyDocument};
use crate::error::{ConfigError, InstrumentError};
use crate::instrument::InstrumentDefinition;
use crate::registry::Registry;
use crate::scoring::{self, ResponseSet};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Severity {
    Low,
    Moderate,
    #[default]
    High,
    Critical,
}

/// A threshold on a single item that flags acute risk, whatever the total.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SafetyRule {
    pub instrument_id: String,
    pub item_id: String,
    pub threshold: i32,
    pub severity: Severity,
    pub message: LocalizedText,
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafetyFlag {
    pub instrument_id: String,
    pub item_id: String,
    pub value: i32,
    pub threshold: i32,
    pub severity: Severity,
    pub message: LocalizedText,
    pub action: String,
}

impl SafetyRule {
    /// Fires when the triggering item was answered with a value at or above
    /// the threshold.
    pub fn check(&self, responses: &ResponseSet) -> Option<SafetyFlag> {
        let value = *responses.get(&self.item_id)?;
        (value >= self.threshold).then(|| SafetyFlag {
            instrument_id: self.instrument_id.clone(),
            item_id: self.item_id.clone(),
            value,
            threshold: self.threshold,
            severity: self.severity,
            message: self.message.clone(),
            action: self.action.clone(),
        })
    }
}

pub(crate) fn build_rules<'a>(
    doc: SafetyDocument,
    lookup: impl Fn(&str) -> Option<&'a InstrumentDefinition>,
) -> Result<Vec<SafetyRule>, ConfigError> {
    let mut rules = Vec::with_capacity(doc.instruments.len());

    for (index, rule) in doc.instruments.into_iter().enumerate() {
        let instrument =
            lookup(rule.id.as_str()).ok_or_else(|| ConfigError::UnknownSafetyInstrument {
                index,
                instrument_id: rule.id.clone(),
            })?;
        let item = instrument
            .item(&rule.item)
            .ok_or_else(|| ConfigError::UnknownSafetyItem {
                index,
                instrument_id: rule.id.clone(),
                item_id: rule.item.clone(),
            })?;

        if rule.threshold > item.max_value() {
            tracing::warn!(
                instrument = %rule.id,
                item = %rule.item,
                threshold = rule.threshold,
                max_option = item.max_value(),
                "safety threshold is above every option and can never fire"
            );
        }

        rules.push(SafetyRule {
            instrument_id: rule.id,
            item_id: rule.item,
            threshold: rule.threshold,
            severity: rule.severity,
            message: rule.message,
            action: rule.action,
        });
    }

    Ok(rules)
}

/// Check every configured safety rule against the submitted responses.
///
/// Every submitted value must be one of its item's declared options, as for
/// scoring. Flags come back in configuration order, one per firing rule, with
/// no deduplication. Instruments missing from `responses_by_instrument` simply
/// produce no flags.
pub fn evaluate(
    registry: &Registry,
    responses_by_instrument: &BTreeMap<String, ResponseSet>,
) -> Result<Vec<SafetyFlag>, InstrumentError> {
    for (instrument_id, responses) in responses_by_instrument {
        let instrument = registry.get(instrument_id)?;
        let errors = scoring::validate_responses(instrument, responses);
        if !errors.is_empty() {
            return Err(InstrumentError::Validation(errors));
        }
    }

    Ok(registry
        .safety_rules()
        .iter()
        .filter_map(|rule| {
            responses_by_instrument
                .get(&rule.instrument_id)
                .and_then(|responses| rule.check(responses))
        })
        .collect())
}
