//! Selection store, summaries and query building working together.

use demographic_filter::compiler::{build_query, describe, group};
use demographic_filter::{
    CandidateRecord, DemographicOption, FieldMapping, FilterConfig, MatcherBuilder,
    SelectionStore, ToggleOutcome,
};

#[test]
fn test_toggle_twice_restores_selection() {
    let mut store = SelectionStore::new();
    store.toggle("options", "18-24", "age_group");
    store.toggle("options", "Female", "gender");
    let before = store.selections().to_vec();

    assert_eq!(store.toggle("options", "Asian", "race"), ToggleOutcome::Added);
    assert_eq!(store.toggle("options", "Asian", "race"), ToggleOutcome::Removed);
    assert_eq!(store.selections(), before.as_slice());
}

#[test]
fn test_cap_from_config() {
    let config = FilterConfig::new().with_max_selections(2);
    let mut store = SelectionStore::from_config(&config);

    store.toggle("options", "18-24", "age_group");
    store.toggle("options", "Female", "gender");
    let before = store.selections().to_vec();

    assert_eq!(
        store.toggle("options", "Asian", "race"),
        ToggleOutcome::RejectedAtCap { limit: 2 }
    );
    assert_eq!(store.len(), 2);
    assert_eq!(store.selections(), before.as_slice());
}

#[test]
fn test_store_drives_matcher_and_summary() {
    let mut store = SelectionStore::new();
    store.toggle("options", "18-24", "age_group");
    store.toggle("options", "25-34", "age_group");
    store.toggle("options", "Female", "gender");

    let grouped = group(store.selections());
    assert_eq!(grouped.group_count(), 2);
    assert_eq!(
        describe(store.selections()),
        "Age Group: 18-24 OR 25-34 AND Gender: Female"
    );

    let filter = MatcherBuilder::new().compile(store.selections()).unwrap();
    let profile = CandidateRecord::new()
        .with_field("age_group", "25-34")
        .with_field("gender", "female");
    assert!(filter.matches(&profile));

    let query = build_query(store.selections(), &FieldMapping::with_defaults()).unwrap();
    assert_eq!(
        query.where_clause().unwrap(),
        "(\"age_group\" = ANY($p1)) AND (\"gender\" = ANY($p2))"
    );
}

#[test]
fn test_restoring_persisted_alert_filter() {
    let persisted = r#"[
        {"category": "options", "value": "Female", "demo": "gender"},
        {"category": "options", "value": "Female", "demo": "gender"},
        {"category": "options", "value": "Asian", "demo": "race"}
    ]"#;
    let selections: Vec<DemographicOption> = serde_json::from_str(persisted).unwrap();

    let mut store = SelectionStore::new();
    assert_eq!(store.set_selections(selections), 1);
    assert_eq!(store.count_for_category("options"), 2);
    assert!(store.is_selected("options", "Asian"));
}
