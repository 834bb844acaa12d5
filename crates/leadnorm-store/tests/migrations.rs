use leadnorm_store::Store;

#[test]
fn migrations_apply_once() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.migrate().expect("migrate again");

    assert_eq!(store.schema_version().expect("schema version"), 1);
    let tables: i64 = store
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('leads', 'normalization_config');",
            [],
            |row| row.get(0),
        )
        .expect("tables");
    assert_eq!(tables, 2);
}

#[test]
fn file_backed_store_persists_between_opens() {
    let temp = tempfile::TempDir::new().expect("tempdir");
    let path = temp.path().join("leads.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .settings()
            .put(1, "normalization-settings", "{\"batchSize\":2}")
            .expect("put");
    }
    let store = Store::open(&path).expect("reopen");
    store.migrate().expect("migrate");
    let stored = store
        .settings()
        .get("normalization-settings")
        .expect("get");
    assert_eq!(stored.as_deref(), Some("{\"batchSize\":2}"));
}
