mod support;

use support::{date_of, TestRoot};

#[test]
fn stray_record_moves_to_canonical_file() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/14.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"a","content":"misfiled","completed":true}],"migrated":true}"#,
    )?;
    let store = root.store();

    let loaded = store.load_with_report(&date_of("2024-03-15"))?;
    assert_eq!(loaded.record.tasks.len(), 1);
    assert_eq!(loaded.record.tasks[0].content, "misfiled");
    assert!(loaded.reconciled_from.is_some());
    assert!(loaded.migration.is_none());

    assert_eq!(root.month_files("2024", "03"), ["15.json"]);
    let raw = root.read_day("2024-03-15")?;
    assert_eq!(raw["date"], "2024-03-15");
    assert_eq!(raw["tasks"][0]["id"], "a");
    Ok(())
}

#[test]
fn canonical_file_is_preferred_over_stray() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/15.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"real","content":"canonical"}],"migrated":true}"#,
    )?;
    root.write_file(
        "2024/03/old.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"stray","content":"stray"}],"migrated":true}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    assert_eq!(record.tasks[0].id, "real");
    assert_eq!(root.month_files("2024", "03"), ["15.json", "old.json"]);
    Ok(())
}

#[test]
fn canonical_file_content_date_is_overridden() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/15.json",
        r#"{"date":"2024-03-16","tasks":[],"migrated":true}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    assert_eq!(record.date, "2024-03-15");
    Ok(())
}

#[test]
fn corrupt_neighbours_are_skipped_during_lookup() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/01.json", "not json at all")?;
    root.write_file("2024/03/02.json", r#"{"date": 42}"#)?;
    root.write_file(
        "2024/03/03.json",
        r#"{"date":"2024-03-20","tasks":[{"id":"x","content":"found"}],"migrated":true}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-20"))?;
    assert_eq!(record.tasks[0].content, "found");
    assert_eq!(
        root.month_files("2024", "03"),
        ["01.json", "02.json", "20.json"]
    );
    Ok(())
}

#[test]
fn stray_previous_day_feeds_migration_without_moving() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/misc.json",
        r#"{"date":"2024-03-14","tasks":[{"id":"p","content":"carry me"}],"migrated":true}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    assert_eq!(record.tasks[0].id, "p");
    assert!(root.path().join("2024/03/misc.json").exists());
    assert!(!root.day_path("2024-03-14").exists());
    Ok(())
}

#[test]
fn first_stray_by_file_name_wins() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/b.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"from-b"}],"migrated":true}"#,
    )?;
    root.write_file(
        "2024/03/a.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"from-a"}],"migrated":true}"#,
    )?;
    let store = root.store();

    let loaded = store.load_with_report(&date_of("2024-03-15"))?;
    assert_eq!(loaded.record.tasks[0].id, "from-a");
    assert_eq!(
        loaded.reconciled_from.as_deref(),
        Some(root.path().join("2024/03/a.json").as_path())
    );
    assert_eq!(root.month_files("2024", "03"), ["15.json", "b.json"]);
    Ok(())
}
