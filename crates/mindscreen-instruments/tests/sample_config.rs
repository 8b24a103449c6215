mod common;

use std::collections::BTreeMap;
use std::fs;

use common::{responses, sample_config_dir, Q2};
use mindscreen_instruments::safety::Severity;
use mindscreen_instruments::source::{self, Format};
use mindscreen_instruments::{
    check_safety, compare_severity, interpret, load_instruments, score, ConfigError, Registry,
    ScoreResult,
};
use tempfile::TempDir;

fn sample_registry() -> Registry {
    load_instruments(source::from_dir(sample_config_dir()).unwrap()).unwrap()
}

#[test]
fn sample_config_loads() {
    let registry = sample_registry();
    let ids: Vec<_> = registry.instruments().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["dass21", "gad7", "phq2", "phq9"]);
    assert_eq!(registry.safety_rules().len(), 2);
    assert!(registry.crosswalk().covers("phq9"));
    assert!(registry.crosswalk().covers("gad7"));
}

#[test]
fn phq2_positive_screen() {
    let registry = sample_registry();
    let scored = score(&registry, "phq2", &responses(&[("phq2_1", 2), ("phq2_2", 1)])).unwrap();
    assert_eq!(scored.score, ScoreResult::Total { total: 3, max: 6 });

    let interp = interpret(&registry, "phq2", &scored.score).unwrap();
    assert_eq!(interp.total().unwrap().label.get("en"), Some("Positive"));
    assert_eq!(interp.total().unwrap().label.get("id"), Some("Positif"));
}

#[test]
fn phq9_bands_cover_full_range() {
    let registry = sample_registry();
    for (total, label) in [(0, "Minimal"), (9, "Mild"), (10, "Moderate"), (19, "Moderately severe"), (27, "Severe")] {
        let interp = interpret(&registry, "phq9", &ScoreResult::Total { total, max: 27 }).unwrap();
        assert_eq!(interp.total().unwrap().label.get("en"), Some(label), "total {total}");
    }
}

#[test]
fn dass21_scores_three_doubled_subscales() {
    let registry = sample_registry();
    let all_threes: BTreeMap<String, i32> =
        (1..=21).map(|i| (format!("dass21_{i}"), 3)).collect();

    let scored = score(&registry, "dass21", &all_threes).unwrap();
    let ScoreResult::ByCategory { categories } = &scored.score else {
        panic!("expected category scores");
    };
    for name in ["depression", "anxiety", "stress"] {
        assert_eq!(categories[name].score, 42);
        assert_eq!(categories[name].max, 42);
    }

    let interp = interpret(&registry, "dass21", &scored.score).unwrap();
    assert_eq!(
        interp.category("stress").unwrap().label.get("en"),
        Some("Extremely severe")
    );
}

#[test]
fn phq9_item_nine_raises_critical_flag() {
    let registry = sample_registry();
    let input = BTreeMap::from([("phq9".to_string(), responses(&[("phq9_9", 1)]))]);

    let flags = check_safety(&registry, &input).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].severity, Severity::Critical);
    assert_eq!(flags[0].action, "crisis_referral");
}

#[test]
fn phq9_moderate_vs_gad7_minimal() {
    let registry = sample_registry();
    let totals = BTreeMap::from([("gad7".to_string(), 3), ("phq9".to_string(), 12)]);

    let result = compare_severity(&registry, &totals).unwrap();
    assert_eq!(result.placement("phq9").unwrap().tier, "moderate");
    assert_eq!(result.placement("gad7").unwrap().tier, "minimal");
    let pair = result.pair("gad7", "phq9").unwrap();
    assert_ne!(pair.left_tier, pair.right_tier);
}

#[test]
fn from_dir_reads_json_and_yaml_and_skips_other_files() {
    let dir = TempDir::new().unwrap();
    let instruments = dir.path().join("instruments");
    fs::create_dir(&instruments).unwrap();
    fs::write(instruments.join("q2.yml"), Q2).unwrap();
    fs::write(instruments.join("README.md"), "not config").unwrap();

    let json = serde_json::json!({
        "id": "single",
        "items": [{ "id": "a", "options": [{ "value": 0 }, { "value": 1 }] }],
        "scoring": { "type": "sum", "items": ["a"] },
        "interpretation": [{ "range": [0, 1], "label": { "en": "any" } }]
    });
    fs::write(instruments.join("single.json"), json.to_string()).unwrap();
    fs::write(
        dir.path().join("safety.json"),
        r#"{ "instruments": [{ "id": "single", "item": "a", "threshold": 1, "action": "notify" }] }"#,
    )
    .unwrap();

    let registry = load_instruments(source::from_dir(dir.path()).unwrap()).unwrap();
    let ids: Vec<_> = registry.instruments().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["Q2", "single"]);
    assert_eq!(registry.safety_rules().len(), 1);
    assert!(registry.crosswalk().is_empty());
}

#[test]
fn from_dir_fails_on_malformed_file() {
    let dir = TempDir::new().unwrap();
    let instruments = dir.path().join("instruments");
    fs::create_dir(&instruments).unwrap();
    fs::write(instruments.join("broken.yaml"), "id: [unclosed").unwrap();

    let err = source::from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { path, .. } if path.ends_with("broken.yaml")));
}

#[test]
fn from_dir_requires_instruments_directory() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        source::from_dir(dir.path()),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn parse_rejects_unsupported_extension() {
    let err = source::read_file::<mindscreen_instruments::document::SafetyDocument>(
        std::path::Path::new("rules.toml"),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn inline_json_documents_parse() {
    let doc: mindscreen_instruments::document::CrosswalkDocument =
        source::parse(r#"{ "tiers": ["low", "high"] }"#, Format::Json).unwrap();
    assert_eq!(doc.tiers, ["low", "high"]);
    assert!(doc.instruments.is_empty());
}
