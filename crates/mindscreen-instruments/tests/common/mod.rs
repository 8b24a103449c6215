#![allow(dead_code)]

use std::path::PathBuf;

use mindscreen_instruments::document::{CrosswalkDocument, InstrumentDocument, SafetyDocument};
use mindscreen_instruments::source::{self, Format};
use mindscreen_instruments::{ConfigBundle, Registry, ResponseSet};

/// Two items scored 0-3, sum rule, max 6, bands [0,2] and [3,6].
pub const Q2: &str = r#"
id: Q2
title: { en: "Two-item screen" }
items:
  - id: item1
    text: { en: "First" }
    options: &opts
      - { value: 0, label: { en: "Never" } }
      - { value: 1, label: { en: "Sometimes" } }
      - { value: 2, label: { en: "Often" } }
      - { value: 3, label: { en: "Always" } }
  - id: item2
    text: { en: "Second" }
    options: *opts
scoring:
  type: sum
  items: [item1, item2]
  max_score: 6
interpretation:
  - range: [0, 2]
    label: { en: "negative" }
    description: { en: "No further action." }
  - range: [3, 6]
    label: { en: "positive" }
    description: { en: "Follow up." }
"#;

/// Category-scored instrument. `tension` has bands; `fatigue` deliberately
/// has none. `tension` uses multiplier 2 and `fatigue` the default of 1.
pub const MOOD: &str = r#"
id: mood
items:
  - id: t1
    options: &opts
      - { value: 0 }
      - { value: 1 }
      - { value: 2 }
  - id: t2
    options: *opts
  - id: f1
    options: *opts
  - id: extra
    options: *opts
scoring:
  type: sum_by_category
  categories:
    tension:
      items: [t1, t2]
      multiplier: 2
    fatigue:
      items: [f1]
interpretation:
  tension:
    - range: [0, 3]
      label: { en: "low" }
    - range: [4, 8]
      label: { en: "high" }
"#;

pub fn instrument(yaml: &str) -> InstrumentDocument {
    source::parse(yaml, Format::Yaml).unwrap()
}

pub fn safety(yaml: &str) -> SafetyDocument {
    source::parse(yaml, Format::Yaml).unwrap()
}

pub fn crosswalk(yaml: &str) -> CrosswalkDocument {
    source::parse(yaml, Format::Yaml).unwrap()
}

pub fn registry(instruments: &[&str]) -> Registry {
    let bundle = instruments
        .iter()
        .fold(ConfigBundle::new(), |b, yaml| b.with_instrument(instrument(yaml)));
    Registry::load(bundle).unwrap()
}

pub fn responses(pairs: &[(&str, i32)]) -> ResponseSet {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// The sample configuration shipped at the workspace root.
pub fn sample_config_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
}
