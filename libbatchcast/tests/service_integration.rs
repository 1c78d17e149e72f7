//! Integration tests for BatchService
//!
//! Drives the public API end to end: import, edit, slot assignment and
//! batch scheduling.

use chrono::{NaiveDate, Weekday};
use libbatchcast::service::events::Event;
use libbatchcast::service::validation::Validator;
use libbatchcast::{BatchService, Config, Platform, PostPatch, PostStatus, TimeSlot};
use std::fs;
use tempfile::TempDir;

fn service() -> BatchService {
    BatchService::from_config(Config::default_config()).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A draft that passes every validation rule
fn ready_patch() -> PostPatch {
    PostPatch::new()
        .content("ready text")
        .platforms(vec![Platform::Instagram])
        .scheduled_date(date(2024, 12, 20))
        .scheduled_time("09:00")
}

#[test]
fn test_empty_draft_reports_all_missing_fields() {
    let mut service = service();
    let id = service.store_mut().add(None, None, None);

    let draft = service.store().get(&id).unwrap();
    let errors = service.store().validator().validate(draft);

    assert_eq!(
        errors,
        vec![
            "Content is required",
            "Select at least one platform",
            "Schedule date and time required",
        ]
    );
    assert_eq!(draft.status, PostStatus::Draft);
    assert!(draft.errors.is_empty());
}

#[test]
fn test_twitter_limit_message() {
    let mut service = service();
    let id = service
        .store_mut()
        .add(Some("x".repeat(300)), Some(vec![Platform::Twitter]), None);

    let draft = service.store().get(&id).unwrap();
    let errors = Validator::default().validate(draft);

    assert!(errors
        .iter()
        .any(|e| e.contains("twitter") && e.contains("280")));
    assert_eq!(draft.character_count[&Platform::Twitter], 300);
}

#[test]
fn test_update_makes_draft_ready() {
    let mut service = service();
    let id = service.store_mut().add(None, None, None);

    assert!(service.store_mut().update(&id, ready_patch()));

    let draft = service.store().get(&id).unwrap();
    assert!(draft.errors.is_empty());
    assert_eq!(draft.status, PostStatus::Ready);
    assert_eq!(draft.character_count[&Platform::Instagram], 10);
}

#[test]
fn test_update_unknown_id_is_noop() {
    let mut service = service();
    service.store_mut().add(Some("kept".to_string()), None, None);

    assert!(!service.store_mut().update("missing", ready_patch()));
    assert!(!service.store_mut().delete("missing"));
    assert!(service.store_mut().duplicate("missing").is_none());
    assert_eq!(service.store().len(), 1);
}

#[test]
fn test_duplicate_scheduled_draft_starts_over() {
    let mut service = service();
    let id = service.store_mut().add(None, None, None);
    service.store_mut().update(&id, ready_patch());
    service.schedule_all_ready();

    let copy_id = service.store_mut().duplicate(&id).unwrap();

    let source = service.store().get(&id).unwrap().clone();
    let copy = service.store().get(&copy_id).unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.content, source.content);
    assert_eq!(copy.platforms, source.platforms);
    assert_eq!(copy.media, source.media);
    assert_eq!(source.status, PostStatus::Scheduled);
    assert_eq!(copy.status, PostStatus::Draft);
    assert_eq!(service.store().posts().last().unwrap().id, copy_id);
}

#[test]
fn test_csv_quoted_platforms() {
    let mut service = service();
    let ids = service.import_csv(
        "content,platforms,date,time\n\"Hello world\",\"instagram,twitter\",\"2024-12-20\",\"09:00\"\n",
    );

    assert_eq!(ids.len(), 1);
    let draft = service.store().get(&ids[0]).unwrap();
    assert_eq!(draft.content, "Hello world");
    assert_eq!(draft.platforms, vec![Platform::Instagram, Platform::Twitter]);
    assert_eq!(draft.scheduled_date, Some(date(2024, 12, 20)));
    assert_eq!(draft.scheduled_time.as_deref(), Some("09:00"));
    assert_eq!(draft.status, PostStatus::Draft);
}

#[test]
fn test_csv_unknown_platform_still_imported() {
    let mut service = service();
    let ids = service.import_csv("text,platform\nHi there,myspace\n");

    assert_eq!(ids.len(), 1);
    assert!(service.store().get(&ids[0]).unwrap().platforms.is_empty());
}

#[test]
fn test_slot_cycles_days_then_weeks() {
    let mut service = service();
    service
        .slots_mut()
        .add(TimeSlot {
            id: "mon-wed".to_string(),
            name: "Mon/Wed".to_string(),
            time: "08:00".to_string(),
            days: vec![Weekday::Mon, Weekday::Wed],
            platforms: vec![Platform::Linkedin],
            is_default: false,
        })
        .unwrap();

    let ids: Vec<String> = (0..3)
        .map(|i| service.store_mut().add(Some(format!("post {}", i)), None, None))
        .collect();

    // 2024-12-16 is a Monday
    let updated = service
        .apply_slot_on("mon-wed", &ids, date(2024, 12, 16))
        .unwrap();
    assert_eq!(updated, 3);

    let dates: Vec<NaiveDate> = ids
        .iter()
        .map(|id| service.store().get(id).unwrap().scheduled_date.unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![date(2024, 12, 16), date(2024, 12, 18), date(2024, 12, 23)]
    );

    for id in &ids {
        let draft = service.store().get(id).unwrap();
        assert_eq!(draft.platforms, vec![Platform::Linkedin]);
        assert_eq!(draft.status, PostStatus::Ready);
    }
}

#[test]
fn test_schedule_all_ready_leaves_others_alone() {
    let mut service = service();
    let ready = service.store_mut().add(None, None, None);
    service.store_mut().update(&ready, ready_patch());
    let incomplete = service
        .store_mut()
        .add(Some("no schedule".to_string()), Some(vec![Platform::Threads]), None);
    service
        .store_mut()
        .update(&incomplete, PostPatch::new().content("still no schedule"));

    let scheduled = service.schedule_all_ready();

    assert_eq!(scheduled, vec![ready.clone()]);
    assert_eq!(
        service.store().get(&ready).unwrap().status,
        PostStatus::Scheduled
    );
    assert_eq!(
        service.store().get(&incomplete).unwrap().status,
        PostStatus::Draft
    );
    assert!(service.schedule_all_ready().is_empty());
}

#[test]
fn test_validate_is_repeatable() {
    let mut service = service();
    let id = service
        .store_mut()
        .add(Some("y".repeat(600)), Some(vec![Platform::Threads, Platform::Twitter]), None);

    let draft = service.store().get(&id).unwrap();
    let validator = service.store().validator();
    assert_eq!(validator.validate(draft), validator.validate(draft));
}

#[test]
fn test_selection_cleared_on_delete() {
    let mut service = service();
    let a = service.store_mut().add(None, None, None);
    let b = service.store_mut().add(None, None, None);
    service.store_mut().select_all();

    service.store_mut().delete(&a);

    assert_eq!(service.store().selected_ids(), vec![b.clone()]);
    assert_eq!(service.stats().selected, 1);
    assert_eq!(service.store_mut().delete_selected(), 1);
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn test_import_files_reports_each_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv = temp_dir.path().join("posts.csv");
    let json = temp_dir.path().join("posts.json");
    let pdf = temp_dir.path().join("posts.pdf");
    fs::write(&csv, "content,platforms\nOne,twitter\nTwo,facebook\n").unwrap();
    fs::write(
        &json,
        r#"[{"content": "Three", "platforms": "tiktok", "date": "2024-12-20", "time": "18:00"}]"#,
    )
    .unwrap();
    fs::write(&pdf, "%PDF").unwrap();

    let mut service = service();
    let mut events = service.subscribe();

    let reports = service
        .import_files(&[pdf.clone(), csv.clone(), json.clone()])
        .await;

    assert_eq!(reports.len(), 3);
    assert!(!reports[0].success);
    assert_eq!(reports[0].message, "Unsupported file type: .pdf");
    assert!(reports[1].success);
    assert_eq!(reports[1].message, "Imported 2 posts");
    assert_eq!(reports[2].draft_ids.len(), 1);
    assert_eq!(service.store().len(), 3);

    let json_draft = service.store().get(&reports[2].draft_ids[0]).unwrap();
    assert_eq!(json_draft.platforms, vec![Platform::Tiktok]);
    assert_eq!(json_draft.scheduled_date, Some(date(2024, 12, 20)));

    assert!(matches!(
        events.recv().await.unwrap(),
        Event::ImportStarted { files } if files.len() == 3
    ));
    assert!(matches!(
        events.recv().await.unwrap(),
        Event::ImportFileFailed { .. }
    ));
    assert_eq!(
        events.recv().await.unwrap(),
        Event::ImportFileCompleted {
            file: csv.display().to_string(),
            drafts: 2,
        }
    );
}

#[tokio::test]
async fn test_import_missing_file_is_processing_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.csv");

    let mut service = service();
    let reports = service.import_files(&[missing]).await;

    assert!(!reports[0].success);
    assert!(reports[0].message.starts_with("Failed to process file"));
    assert!(service.store().is_empty());
}
