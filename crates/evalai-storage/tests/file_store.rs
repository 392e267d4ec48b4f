//! JSON file store behaviour on a real filesystem.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use evalai_core::manager::{EvaluationManager, EvaluationRequest};
use evalai_core::model::{AppState, EvaluationResult, Subject, UploadedFile};
use evalai_core::scoring::RandomScorer;
use evalai_core::store::SCHEMA_VERSION;
use evalai_core::traits::{NoopNotifier, StateStore};
use evalai_storage::{DiskFile, JsonFileStore};

fn sample_state() -> AppState {
    let at = Utc.with_ymd_and_hms(2024, 9, 2, 14, 0, 0).unwrap();
    AppState {
        subjects: vec![Subject {
            id: "math".into(),
            name: "Math".into(),
            created_at: at,
            scheme_file: None,
        }],
        results: vec![EvaluationResult {
            id: "r1".into(),
            student_name: "Grace".into(),
            student_id: "STU1725285600000".into(),
            subject: "Math".into(),
            file_name: "grace.txt".into(),
            marks: 72,
            max_marks: 100,
            percentage: 72,
            passed: true,
            uploaded_at: at,
            evaluated_at: at,
            comments: Some("Automatic evaluation based on default criteria".into()),
            manually_evaluated: None,
        }],
        uploaded_files: vec![UploadedFile {
            file_name: "grace.txt".into(),
            content: "compilers".into(),
            subject: "Math".into(),
            student_name: "Grace".into(),
            student_id: "STU1725285600000".into(),
            result_id: "r1".into(),
        }],
    }
}

#[test]
fn roundtrip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path(), "evalai_pro_data");
    let state = sample_state();

    store.save(&state).unwrap();
    assert!(store.path().exists());
    assert_eq!(store.load(), state);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["schemaVersion"], SCHEMA_VERSION);
    assert_eq!(raw["results"][0]["studentId"], "STU1725285600000");
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("not-yet-created"), "state");
    assert_eq!(store.load(), AppState::default());
}

#[test]
fn corrupt_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path(), "state");
    std::fs::write(store.path(), "{\"subjects\": [").unwrap();
    assert_eq!(store.load(), AppState::default());

    std::fs::write(store.path(), [0xff, 0xfe, 0x00]).unwrap();
    assert_eq!(store.load(), AppState::default());
}

#[test]
fn save_overwrites_and_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("nested/data"), "state");

    store.save(&sample_state()).unwrap();
    store.save(&AppState::default()).unwrap();
    assert_eq!(store.load(), AppState::default());

    let leftovers: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("state.json")]);
}

#[tokio::test]
async fn manager_over_file_store_and_disk_files() {
    let dir = tempfile::tempdir().unwrap();
    let scripts = dir.path().join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    std::fs::write(scripts.join("lin.txt"), "answer one").unwrap();
    std::fs::write(scripts.join("hopper.md"), "answer two").unwrap();

    let store = Arc::new(JsonFileStore::new(dir.path().join("data"), "evalai_pro_data"));
    let mut manager = EvaluationManager::open(
        store.clone(),
        Arc::new(RandomScorer::seeded(3)),
        Arc::new(NoopNotifier),
    );
    let subject = manager.create_subject("Biology").unwrap();
    let files = vec![
        DiskFile::new(scripts.join("lin.txt")),
        DiskFile::new(scripts.join("missing.txt")),
        DiskFile::new(scripts.join("hopper.md")),
    ];
    let outcome = manager
        .evaluate_automatically(
            &EvaluationRequest {
                subject_id: Some(subject.id.clone()),
                student_name: None,
                student_id: None,
                pass_threshold: 35,
            },
            &files,
        )
        .await
        .unwrap();

    assert_eq!(outcome.evaluated.len(), 2);
    assert_eq!(outcome.failures[0].file_name, "missing.txt");

    let reloaded = store.load();
    assert_eq!(&reloaded, manager.state());
    let names: Vec<_> = reloaded
        .results
        .iter()
        .map(|r| r.student_name.as_str())
        .collect();
    assert_eq!(names, vec!["lin", "hopper"]);

    assert!(manager.clear_all(|| true).unwrap());
    assert_eq!(store.load(), AppState::default());
}
