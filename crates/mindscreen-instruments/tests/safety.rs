mod common;

use std::collections::BTreeMap;

use common::{instrument, responses, safety, MOOD, Q2};
use mindscreen_instruments::safety::Severity;
use mindscreen_instruments::{check_safety, ConfigBundle, InstrumentError, Registry, ResponseSet};

const RULES: &str = r#"
instruments:
  - id: Q2
    item: item2
    threshold: 2
    severity: critical
    message: { en: "Reach out for support now." }
    action: crisis_line
  - id: mood
    item: t1
    threshold: 1
    message: { en: "Talk to someone." }
    action: follow_up
  - id: Q2
    item: item2
    threshold: 3
    severity: moderate
    message: { en: "Repeat check." }
    action: rescreen
"#;

fn registry() -> Registry {
    Registry::load(
        ConfigBundle::new()
            .with_instrument(instrument(Q2))
            .with_instrument(instrument(MOOD))
            .with_safety(safety(RULES)),
    )
    .unwrap()
}

fn by_instrument(entries: &[(&str, ResponseSet)]) -> BTreeMap<String, ResponseSet> {
    entries
        .iter()
        .map(|(id, r)| (id.to_string(), r.clone()))
        .collect()
}

#[test]
fn no_flags_below_threshold() {
    let registry = registry();
    let input = by_instrument(&[
        ("Q2", responses(&[("item1", 3), ("item2", 1)])),
        ("mood", responses(&[("t1", 0)])),
    ]);
    assert!(check_safety(&registry, &input).unwrap().is_empty());
}

#[test]
fn flipping_trigger_item_flips_only_its_rule() {
    let registry = registry();
    let below = by_instrument(&[
        ("Q2", responses(&[("item1", 0), ("item2", 1)])),
        ("mood", responses(&[("t1", 0), ("t2", 2)])),
    ]);
    let above = by_instrument(&[
        ("Q2", responses(&[("item1", 0), ("item2", 1)])),
        ("mood", responses(&[("t1", 1), ("t2", 2)])),
    ]);

    assert!(check_safety(&registry, &below).unwrap().is_empty());

    let flags = check_safety(&registry, &above).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].instrument_id, "mood");
    assert_eq!(flags[0].item_id, "t1");
    assert_eq!(flags[0].action, "follow_up");
    // severity defaults to high
    assert_eq!(flags[0].severity, Severity::High);
}

#[test]
fn all_firing_rules_are_returned_in_config_order() {
    let registry = registry();
    let input = by_instrument(&[
        ("Q2", responses(&[("item2", 3)])),
        ("mood", responses(&[("t1", 2)])),
    ]);

    let flags = check_safety(&registry, &input).unwrap();
    let actions: Vec<_> = flags.iter().map(|f| f.action.as_str()).collect();
    assert_eq!(actions, ["crisis_line", "follow_up", "rescreen"]);
    assert_eq!(flags[0].severity, Severity::Critical);
    assert_eq!(flags[0].value, 3);
    assert_eq!(flags[0].threshold, 2);
    assert_eq!(flags[0].message.get("en"), Some("Reach out for support now."));
}

#[test]
fn absent_instruments_raise_no_flags() {
    let registry = registry();
    let input = by_instrument(&[("mood", responses(&[("t1", 2)]))]);

    let flags = check_safety(&registry, &input).unwrap();
    assert_eq!(flags.len(), 1);
    assert_eq!(flags[0].instrument_id, "mood");

    assert!(check_safety(&registry, &BTreeMap::new()).unwrap().is_empty());
}

#[test]
fn unanswered_trigger_item_raises_no_flag() {
    let registry = registry();
    let input = by_instrument(&[("Q2", responses(&[("item1", 3)]))]);
    assert!(check_safety(&registry, &input).unwrap().is_empty());
}

#[test]
fn unknown_instrument_is_not_found() {
    let registry = registry();
    let input = by_instrument(&[("phq9", responses(&[("phq9_9", 3)]))]);
    assert!(matches!(
        check_safety(&registry, &input),
        Err(InstrumentError::NotFound(id)) if id == "phq9"
    ));
}

#[test]
fn out_of_domain_value_is_rejected_not_flagged() {
    let registry = registry();
    let input = by_instrument(&[("Q2", responses(&[("item2", 99)]))]);

    let Err(InstrumentError::Validation(errors)) = check_safety(&registry, &input) else {
        panic!("expected a validation error");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].item_id, "item2");
    assert_eq!(errors[0].value, 99);
    assert_eq!(errors[0].allowed, [0, 1, 2, 3]);
}

#[test]
fn severity_orders_from_low_to_critical() {
    assert!(Severity::Low < Severity::Moderate);
    assert!(Severity::Moderate < Severity::High);
    assert!(Severity::High < Severity::Critical);
}
