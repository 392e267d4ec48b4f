//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// An `evalai` command isolated inside `dir`, with its data under `data_dir`.
fn evalai_with_data_dir(dir: &Path, data_dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("evalai").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("EVALAI_DATA_DIR")
        .env_remove("EVALAI_PASS_THRESHOLD")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

/// An `evalai` command isolated inside `dir`.
fn evalai(dir: &Path) -> Command {
    evalai_with_data_dir(dir, &dir.join("data"))
}

fn results_json(dir: &Path) -> Vec<serde_json::Value> {
    let output = evalai(dir)
        .args(["results", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add_subject(dir: &Path, name: &str) {
    evalai(dir)
        .args(["subject", "add", name])
        .assert()
        .success();
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    evalai(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created evalai.toml"));
    assert!(dir.path().join("evalai.toml").exists());

    evalai(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn subject_add_and_list() {
    let dir = TempDir::new().unwrap();

    evalai(dir.path())
        .args(["subject", "add", "Mathematics"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Subject \"Mathematics\" created successfully",
        ));

    evalai(dir.path())
        .args(["subject", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mathematics"))
        .stdout(predicate::str::contains("0%"));
}

#[test]
fn duplicate_subject_fails() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");

    evalai(dir.path())
        .args(["subject", "add", "MATH"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("subject already exists"));
}

#[test]
fn evaluate_single_script() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");
    std::fs::write(dir.path().join("script1.txt"), "2 + 2 = 4").unwrap();

    evalai(dir.path())
        .args(["evaluate", "--subject", "math", "--pass-threshold", "35", "script1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 file(s) evaluated successfully"));

    let results = results_json(dir.path());
    assert_eq!(results.len(), 1);
    let r = &results[0];
    assert_eq!(r["subject"], "Math");
    assert_eq!(r["studentName"], "script1");
    assert_eq!(r["maxMarks"], 100);
    let marks = r["marks"].as_u64().unwrap();
    assert_eq!(r["passed"].as_bool().unwrap(), marks >= 35);
}

#[test]
fn evaluate_without_files_fails() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");

    evalai(dir.path())
        .args(["evaluate", "--subject", "Math"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("please select files to upload"));
}

#[test]
fn evaluate_unknown_subject_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.txt"), "x").unwrap();

    evalai(dir.path())
        .args(["evaluate", "--subject", "Nope", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("subject not found"));
}

#[test]
fn unreadable_script_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");
    std::fs::write(dir.path().join("good.txt"), "ok").unwrap();

    evalai(dir.path())
        .args(["evaluate", "--subject", "Math", "missing.txt", "good.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FAILED: missing.txt"))
        .stderr(predicate::str::contains("1 file(s) could not be evaluated"));

    let results = results_json(dir.path());
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["fileName"], "good.txt");
}

#[test]
fn scheme_must_be_pdf() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Physics");
    std::fs::write(dir.path().join("scheme.txt"), "rubric").unwrap();
    std::fs::write(dir.path().join("scheme.pdf"), "%PDF-1.4 rubric").unwrap();

    evalai(dir.path())
        .args(["scheme", "--subject", "Physics", "scheme.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF file only"));

    evalai(dir.path())
        .args(["scheme", "--subject", "Physics", "scheme.pdf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scheme of evaluation uploaded"));

    evalai(dir.path())
        .args(["subject", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scheme.pdf"));
}

#[test]
fn review_with_unparseable_marks() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");
    std::fs::write(dir.path().join("ada.txt"), "answer").unwrap();
    evalai(dir.path())
        .args(["evaluate", "--subject", "Math", "ada.txt"])
        .assert()
        .success();
    let id = results_json(dir.path())[0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    evalai(dir.path())
        .args(["review", &id, "--marks", "abc", "--comments", "Illegible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0/100 (0%) FAIL"));

    let r = &results_json(dir.path())[0];
    assert_eq!(r["id"], id.as_str());
    assert_eq!(r["marks"], 0);
    assert_eq!(r["percentage"], 0);
    assert_eq!(r["passed"], false);
    assert_eq!(r["manuallyEvaluated"], true);
    assert_eq!(r["comments"], "Illegible");
}

#[test]
fn review_unknown_result_fails() {
    let dir = TempDir::new().unwrap();

    evalai(dir.path())
        .args(["review", "does-not-exist", "--marks", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no uploaded script"));
}

#[test]
fn search_filters_results() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");
    for name in ["alice.txt", "bob.txt"] {
        std::fs::write(dir.path().join(name), "x").unwrap();
    }
    evalai(dir.path())
        .args(["evaluate", "--subject", "Math", "alice.txt", "bob.txt"])
        .assert()
        .success();

    evalai(dir.path())
        .args(["results", "--search", "ALI"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice"))
        .stdout(predicate::str::contains("bob").not());

    evalai(dir.path())
        .args(["results", "--search", "zzz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));
}

#[test]
fn export_writes_dated_file() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");

    evalai(dir.path())
        .args(["export", "--output", "exports"])
        .assert()
        .success()
        .stdout(predicate::str::contains("evalai_export_"));

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("exports"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("evalai_export_"));
    assert!(entries[0].ends_with(".json"));

    let exported: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("exports").join(&entries[0])).unwrap(),
    )
    .unwrap();
    assert_eq!(exported["subjects"][0]["name"], "Math");
    assert_eq!(exported["results"], serde_json::json!([]));
    assert_eq!(exported["uploadedFiles"], serde_json::json!([]));
}

#[test]
fn clear_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    add_subject(dir.path(), "Math");

    evalai(dir.path())
        .arg("clear")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted"));

    evalai(dir.path())
        .args(["clear", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All data cleared successfully"));

    evalai(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total evaluations:  0"))
        .stdout(predicate::str::contains("Subjects:           0"));
}

#[test]
fn seeded_scorer_is_reproducible() {
    let marks_for = |dir: &Path| {
        std::fs::write(
            dir.join("evalai.toml"),
            "pass_threshold = 50\n\n[scorer]\ntype = \"random\"\nseed = 11\n",
        )
        .unwrap();
        add_subject(dir, "Math");
        std::fs::write(dir.join("a.txt"), "x").unwrap();
        evalai(dir)
            .args(["evaluate", "--subject", "Math", "a.txt"])
            .assert()
            .success();
        let r = results_json(dir).remove(0);
        assert_eq!(
            r["passed"].as_bool().unwrap(),
            r["percentage"].as_u64().unwrap() >= 50
        );
        r["marks"].clone()
    };

    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    assert_eq!(marks_for(first.path()), marks_for(second.path()));
}

#[test]
fn invalid_threshold_in_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("evalai.toml"), "pass_threshold = 101\n").unwrap();

    evalai(dir.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass_threshold"));
}

#[test]
fn unwritable_data_dir_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    evalai_with_data_dir(dir.path(), &blocker.join("sub"))
        .args(["subject", "add", "Math"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("created successfully").not())
        .stderr(predicate::str::contains("failed to save data"));
}

#[test]
fn stats_names_the_scorer() {
    let dir = TempDir::new().unwrap();

    evalai(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scorer:             random"));
}
