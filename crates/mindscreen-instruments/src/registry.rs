use std::collections::HashMap;

use tracing::info;

use crate::crosswalk::SeverityCrosswalk;
use crate::error::{ConfigError, InstrumentError};
use crate::instrument::InstrumentDefinition;
use crate::safety::{self, SafetyRule};
use crate::source::ConfigBundle;

/// Every loaded instrument, safety rule and severity cut point.
///
/// Built once and never mutated. Hosts share it behind an `Arc`; tests build
/// as many independent registries as they like.
#[derive(Debug, Clone)]
pub struct Registry {
    instruments: Vec<InstrumentDefinition>,
    index: HashMap<String, usize>,
    safety_rules: Vec<SafetyRule>,
    crosswalk: SeverityCrosswalk,
}

impl Registry {
    /// Validate `bundle` and build a registry from it.
    ///
    /// Fails on the first problem found: duplicate ids, bands that do not
    /// partition their score range, rules pointing at unknown instruments or
    /// items, and the other cases listed on [`ConfigError`].
    pub fn load(bundle: ConfigBundle) -> Result<Self, ConfigError> {
        let mut instruments = Vec::with_capacity(bundle.instruments.len());
        let mut index = HashMap::with_capacity(bundle.instruments.len());

        for doc in bundle.instruments {
            let definition = InstrumentDefinition::try_from(doc)?;
            if index.contains_key(&definition.id) {
                return Err(ConfigError::DuplicateInstrument(definition.id));
            }
            index.insert(definition.id.clone(), instruments.len());
            instruments.push(definition);
        }

        let lookup = |id: &str| index.get(id).map(|&i| &instruments[i]);
        let safety_rules = safety::build_rules(bundle.safety, lookup)?;
        let crosswalk = SeverityCrosswalk::from_document(bundle.crosswalk, lookup)?;

        info!(
            instruments = instruments.len(),
            safety_rules = safety_rules.len(),
            severity_tiers = crosswalk.tiers().len(),
            "instrument registry loaded"
        );

        Ok(Self {
            instruments,
            index,
            safety_rules,
            crosswalk,
        })
    }

    pub fn get(&self, id: &str) -> Result<&InstrumentDefinition, InstrumentError> {
        self.index
            .get(id)
            .map(|&i| &self.instruments[i])
            .ok_or_else(|| InstrumentError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Instruments in load order.
    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentDefinition> {
        self.instruments.iter()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Safety rules in configuration order.
    pub fn safety_rules(&self) -> &[SafetyRule] {
        &self.safety_rules
    }

    pub fn crosswalk(&self) -> &SeverityCrosswalk {
        &self.crosswalk
    }
}
