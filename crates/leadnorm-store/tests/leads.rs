use leadnorm_core::domain::{FieldMap, LeadId};
use leadnorm_store::error::StoreErrorKind;
use leadnorm_store::repo::LeadNew;
use leadnorm_store::Store;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn insert(store: &Store, id: &str, pairs: &[(&str, &str)]) {
    store
        .leads()
        .upsert(
            1_700_000_000,
            LeadNew {
                id: Some(LeadId::new(id).expect("id")),
                fields: fields(pairs),
            },
        )
        .expect("upsert");
}

#[test]
fn upsert_then_get_roundtrip() {
    let store = store();
    let lead = store
        .leads()
        .upsert(
            100,
            LeadNew {
                id: None,
                fields: fields(&[("nombres", "JUAN"), ("ciudad", "bogota")]),
            },
        )
        .expect("upsert");
    assert!(!lead.id.as_str().is_empty());
    assert_eq!(lead.created_at, 100);
    assert!(lead.normalized_at.is_none());

    let fetched = store
        .leads()
        .get(&lead.id)
        .expect("get")
        .expect("lead exists");
    assert_eq!(fetched, lead);
}

#[test]
fn upsert_replaces_fields_and_keeps_normalization() {
    let store = store();
    insert(&store, "lead-1", &[("nombres", "JUAN")]);
    let id = LeadId::new("lead-1").expect("id");
    store
        .leads()
        .apply_normalization(200, &id, &fields(&[("nombres", "Juan")]))
        .expect("apply");

    let updated = store
        .leads()
        .upsert(
            300,
            LeadNew {
                id: Some(id.clone()),
                fields: fields(&[("nombres", "PEDRO")]),
            },
        )
        .expect("upsert again");
    assert_eq!(updated.fields.get("nombres").map(String::as_str), Some("PEDRO"));
    assert_eq!(updated.created_at, 1_700_000_000);
    assert_eq!(updated.updated_at, 300);
    assert_eq!(updated.normalized_at, Some(200));
    assert_eq!(store.leads().count().expect("count"), 1);
}

#[test]
fn apply_normalization_sets_timestamp_and_data() {
    let store = store();
    insert(&store, "lead-1", &[("ciudad", "bogota")]);
    let id = LeadId::new("lead-1").expect("id");

    let lead = store
        .leads()
        .apply_normalization(500, &id, &fields(&[("ciudad", "Bogota D.C.")]))
        .expect("apply");
    assert_eq!(lead.normalized_at, Some(500));
    assert_eq!(lead.updated_at, 500);
    assert_eq!(
        lead.normalized_data,
        Some(fields(&[("ciudad", "Bogota D.C.")]))
    );
    assert_eq!(lead.fields.get("ciudad").map(String::as_str), Some("bogota"));
}

#[test]
fn apply_normalization_on_missing_lead_is_not_found() {
    let store = store();
    let id = LeadId::new("ghost").expect("id");
    let err = store
        .leads()
        .apply_normalization(1, &id, &FieldMap::new())
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn scan_pages_until_a_short_page() {
    let store = store();
    for index in 0..5 {
        insert(&store, &format!("lead-{index}"), &[("nombres", "ANA")]);
    }

    let first = store.leads().scan_page(None, 2, None).expect("page 1");
    assert_eq!(first.leads.len(), 2);
    let cursor = first.last_evaluated.expect("cursor");
    assert_eq!(cursor.as_str(), "lead-1");

    let second = store
        .leads()
        .scan_page(Some(&cursor), 2, None)
        .expect("page 2");
    let cursor = second.last_evaluated.expect("cursor");
    assert_eq!(cursor.as_str(), "lead-3");

    let third = store
        .leads()
        .scan_page(Some(&cursor), 2, None)
        .expect("page 3");
    assert_eq!(third.leads.len(), 1);
    assert!(third.last_evaluated.is_none());
}

#[test]
fn scan_projects_requested_fields() {
    let store = store();
    insert(
        &store,
        "lead-1",
        &[("nombres", "ANA"), ("telefono", "300"), ("ciudad", "cali")],
    );
    let projection = vec!["nombres".to_string(), "ciudad".to_string()];
    let page = store
        .leads()
        .scan_page(None, 10, Some(&projection))
        .expect("scan");
    let lead = &page.leads[0];
    assert_eq!(lead.fields.len(), 2);
    assert!(!lead.fields.contains_key("telefono"));
}

#[test]
fn corrupt_field_document_is_invalid_data() {
    let store = store();
    store
        .connection()
        .execute(
            "INSERT INTO leads (lead_id, fields, created_at, updated_at)
             VALUES ('bad', '[1, 2]', 0, 0);",
            [],
        )
        .expect("insert raw");
    let err = store
        .leads()
        .get(&LeadId::new("bad").expect("id"))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::InvalidData);
}
