use std::path::PathBuf;

use thiserror::Error;

use crate::band::BandError;
use crate::scoring::ValidationError;

/// Errors raised while building a [`Registry`](crate::registry::Registry).
///
/// Any of these aborts the load; a registry is never returned half-built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("duplicate instrument id: {0}")]
    DuplicateInstrument(String),

    #[error("duplicate item '{item_id}' in instrument '{instrument_id}'")]
    DuplicateItem {
        instrument_id: String,
        item_id: String,
    },

    #[error("item '{item_id}' in instrument '{instrument_id}' lists option value {value} twice")]
    DuplicateOption {
        instrument_id: String,
        item_id: String,
        value: i32,
    },

    #[error("item '{item_id}' in instrument '{instrument_id}' has no options")]
    EmptyOptions {
        instrument_id: String,
        item_id: String,
    },

    #[error("item '{item_id}' in instrument '{instrument_id}' has negative option value {value}")]
    NegativeOption {
        instrument_id: String,
        item_id: String,
        value: i32,
    },

    #[error("scoring rule of '{instrument_id}' references unknown item '{item_id}'")]
    UnknownScoringItem {
        instrument_id: String,
        item_id: String,
    },

    #[error("category '{category}' of '{instrument_id}' has multiplier {multiplier}; it must be positive")]
    InvalidMultiplier {
        instrument_id: String,
        category: String,
        multiplier: i32,
    },

    #[error("scoring rule of '{instrument_id}' lists item '{item_id}' more than once")]
    DuplicateScoringItem {
        instrument_id: String,
        item_id: String,
    },

    #[error("declared max_score {declared} of '{instrument_id}' is below the achievable maximum {achievable}")]
    MaxBelowAchievable {
        instrument_id: String,
        category: Option<String>,
        declared: i32,
        achievable: i32,
    },

    #[error("interpretation of '{instrument_id}' must be {expected} to match its scoring rule")]
    InterpretationShape {
        instrument_id: String,
        expected: &'static str,
    },

    #[error("interpretation of '{instrument_id}' names category '{category}' which the scoring rule does not define")]
    UnknownCategory {
        instrument_id: String,
        category: String,
    },

    #[error("invalid bands for '{instrument_id}'{}: {source}", category_suffix(.category))]
    Band {
        instrument_id: String,
        category: Option<String>,
        #[source]
        source: BandError,
    },

    #[error("safety rule #{index} references unknown instrument '{instrument_id}'")]
    UnknownSafetyInstrument { index: usize, instrument_id: String },

    #[error("safety rule #{index} references unknown item '{item_id}' of '{instrument_id}'")]
    UnknownSafetyItem {
        index: usize,
        instrument_id: String,
        item_id: String,
    },

    #[error("invalid severity crosswalk: {0}")]
    Crosswalk(#[from] CrosswalkError),
}

fn category_suffix(category: &Option<String>) -> String {
    match category {
        Some(c) => format!(" (category '{c}')"),
        None => String::new(),
    }
}

/// Problems with the cross-instrument severity tier configuration.
#[derive(Debug, Error)]
pub enum CrosswalkError {
    #[error("tier '{0}' is declared more than once")]
    DuplicateTier(String),

    #[error("instrument '{0}' is not registered")]
    UnknownInstrument(String),

    #[error("instrument '{0}' is not sum-scored and has no single total to classify")]
    NotSumScored(String),

    #[error("instrument '{instrument_id}' uses undeclared tier '{tier}'")]
    UnknownTier { instrument_id: String, tier: String },

    #[error("instrument '{0}' declares no cut points")]
    NoCutPoints(String),

    #[error("lowest tier of '{instrument_id}' must start at 0, found {found}")]
    FirstCutNotZero { instrument_id: String, found: i32 },

    #[error("cut points of '{instrument_id}' must strictly increase in tier order (tier '{tier}' starts at {value})")]
    NotIncreasing {
        instrument_id: String,
        tier: String,
        value: i32,
    },

    #[error("cut point {value} of '{instrument_id}' exceeds max score {max}")]
    CutAboveMax {
        instrument_id: String,
        value: i32,
        max: i32,
    },
}

/// Per-request errors returned by the scoring, interpretation, safety and
/// comparison operations.
#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("unknown instrument: {0}")]
    NotFound(String),

    #[error("{} response value(s) outside the declared options", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("score {score} of '{instrument_id}'{} is outside [0, {max}]", category_suffix(.category))]
    OutOfRange {
        instrument_id: String,
        category: Option<String>,
        score: i32,
        max: i32,
    },

    #[error("score shape does not match instrument '{instrument_id}': {reason}")]
    ScoreMismatch {
        instrument_id: String,
        reason: String,
    },
}
