//! mindscreen-instruments
//!
//! Configuration-driven scoring engine for mental-health screening
//! questionnaires. Pure data and pure functions: instruments, bands, safety
//! rules and severity tiers all come from documents loaded once into a
//! [`Registry`]; every operation after that is side-effect free.

pub mod band;
pub mod crosswalk;
pub mod document;
pub mod error;
pub mod instrument;
pub mod interpret;
pub mod registry;
pub mod safety;
pub mod scoring;
pub mod source;

use std::collections::BTreeMap;

pub use crosswalk::ComparisonResult;
pub use error::{ConfigError, InstrumentError};
pub use interpret::Interpretation;
pub use registry::Registry;
pub use safety::SafetyFlag;
pub use scoring::{ResponseSet, ScoreResult, Scored};
pub use source::ConfigBundle;

/// Build a registry from parsed configuration documents.
pub fn load_instruments(bundle: ConfigBundle) -> Result<Registry, ConfigError> {
    Registry::load(bundle)
}

/// Score one instrument's responses.
///
/// Every response to a known item must be one of that item's declared option
/// values. Unknown item ids are excluded from the score and reported in
/// [`Scored::diagnostics`].
pub fn score(
    registry: &Registry,
    instrument_id: &str,
    responses: &ResponseSet,
) -> Result<Scored, InstrumentError> {
    let instrument = registry.get(instrument_id)?;

    let errors = scoring::validate_responses(instrument, responses);
    if !errors.is_empty() {
        return Err(InstrumentError::Validation(errors));
    }

    let diagnostics = scoring::diagnose(instrument, responses);
    if !diagnostics.unknown_items.is_empty() {
        tracing::debug!(
            instrument = %instrument_id,
            unknown = ?diagnostics.unknown_items,
            "ignoring responses to unknown items"
        );
    }

    Ok(Scored {
        score: scoring::calculate(instrument, responses),
        diagnostics,
    })
}

/// Map a score onto the instrument's interpretation bands.
pub fn interpret(
    registry: &Registry,
    instrument_id: &str,
    score: &ScoreResult,
) -> Result<Interpretation, InstrumentError> {
    interpret::resolve(registry.get(instrument_id)?, score)
}

/// Evaluate every configured safety rule against responses keyed by
/// instrument id.
pub fn check_safety(
    registry: &Registry,
    responses_by_instrument: &BTreeMap<String, ResponseSet>,
) -> Result<Vec<SafetyFlag>, InstrumentError> {
    safety::evaluate(registry, responses_by_instrument)
}

/// Compare severity tiers of instrument totals keyed by instrument id.
pub fn compare_severity(
    registry: &Registry,
    totals_by_instrument: &BTreeMap<String, i32>,
) -> Result<ComparisonResult, InstrumentError> {
    crosswalk::compare(registry.crosswalk(), totals_by_instrument)
}
