mod support;

use dayplan::{StoreOptions, TaskDraft};
use support::{date_of, TestRoot};

const PREVIOUS_DAY: &str = r#"{
  "date": "2024-03-14",
  "tasks": [
    {"id": "1", "content": "finished", "priority": "normal", "completed": true},
    {"id": "2", "content": "still open", "priority": "urgent", "completed": false}
  ],
  "migrated": true
}"#;

#[test]
fn incomplete_tasks_move_forward_once() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", PREVIOUS_DAY)?;
    let store = root.store();
    let day = date_of("2024-03-15");

    let record = store.load(&day)?;
    assert_eq!(record.tasks.len(), 1);
    let carried = &record.tasks[0];
    assert_eq!(carried.id, "2");
    assert_eq!(carried.content, "still open");
    assert_eq!(carried.from_date.map(|d| d.format()).as_deref(), Some("2024-03-14"));
    assert_eq!(record.migrated, Some(true));

    let raw = root.read_day("2024-03-15")?;
    assert_eq!(raw["tasks"][0]["from_date"], "2024-03-14");
    assert_eq!(raw["migrated"], true);

    let again = store.load(&day)?;
    assert_eq!(again.tasks.len(), 1);
    Ok(())
}

#[test]
fn tasks_added_later_to_previous_day_are_not_pulled_again(
) -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", PREVIOUS_DAY)?;
    let store = root.store();

    store.load(&date_of("2024-03-15"))?;
    store.add_task(&date_of("2024-03-14"), TaskDraft::new("late addition"))?;

    let record = store.load(&date_of("2024-03-15"))?;
    assert_eq!(record.tasks.len(), 1);
    assert_eq!(record.tasks[0].id, "2");
    Ok(())
}

#[test]
fn existing_id_is_not_duplicated() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", PREVIOUS_DAY)?;
    root.write_file(
        "2024/03/15.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"2","content":"created here"}],"migrated":false}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    assert_eq!(record.tasks.len(), 1);
    assert_eq!(record.tasks[0].content, "created here");
    assert!(record.tasks[0].from_date.is_none());
    assert_eq!(record.migrated, Some(true));
    Ok(())
}

#[test]
fn record_without_flag_is_migrated_on_load() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", PREVIOUS_DAY)?;
    root.write_file(
        "2024/03/15.json",
        r#"{"date":"2024-03-15","tasks":[{"id":"7","content":"mine"}]}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    let ids: Vec<&str> = record.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["7", "2"]);
    Ok(())
}

#[test]
fn migration_does_not_chain_past_one_day() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file(
        "2024/03/13.json",
        r#"{"date":"2024-03-13","tasks":[{"id":"old","content":"two days back"}],"migrated":true}"#,
    )?;
    let store = root.store();

    let record = store.load(&date_of("2024-03-15"))?;
    assert!(record.tasks.is_empty());
    assert!(!root.day_path("2024-03-14").exists());
    Ok(())
}

#[test]
fn corrupt_previous_day_still_marks_migrated() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", "][")?;
    let store = root.store();

    let loaded = store.load_with_report(&date_of("2024-03-15"))?;
    assert_eq!(loaded.migration.map(|report| report.migrated), Some(0));
    assert_eq!(root.read_day("2024-03-15")?["migrated"], true);
    Ok(())
}

#[test]
fn simple_variant_never_migrates() -> Result<(), Box<dyn std::error::Error>> {
    let root = TestRoot::new();
    root.write_file("2024/03/14.json", PREVIOUS_DAY)?;
    let store = root.store_with(StoreOptions::simple());

    let record = store.load(&date_of("2024-03-15"))?;
    assert!(record.tasks.is_empty());
    assert_eq!(record.migrated, None);
    assert!(!root.day_path("2024-03-15").exists());

    store.add_task(&date_of("2024-03-15"), TaskDraft::new("fresh"))?;
    let raw = root.read_day("2024-03-15")?;
    assert!(raw.get("migrated").is_none());
    assert_eq!(raw["tasks"].as_array().map(|tasks| tasks.len()), Some(1));
    Ok(())
}
