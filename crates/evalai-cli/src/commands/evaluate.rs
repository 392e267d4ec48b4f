//! The `evalai evaluate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use evalai_core::manager::EvaluationRequest;
use evalai_storage::DiskFile;

use super::{pass_threshold, subject_id, Context};

pub async fn execute(
    ctx: &Context,
    subject: &str,
    student_name: Option<String>,
    student_id: Option<String>,
    threshold: Option<u32>,
    files: Vec<PathBuf>,
) -> Result<()> {
    let (config, mut manager) = ctx.open()?;
    let request = EvaluationRequest {
        subject_id: Some(subject_id(&manager, subject)?),
        student_name,
        student_id,
        pass_threshold: pass_threshold(threshold, &config)?,
    };
    let files: Vec<DiskFile> = files.into_iter().map(DiskFile::new).collect();

    let outcome = manager.evaluate_automatically(&request, &files).await?;

    if !outcome.evaluated.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Result Id", "Student", "Student Id", "File", "Marks", "Status"]);
        for r in &outcome.evaluated {
            table.add_row(vec![
                Cell::new(&r.id),
                Cell::new(&r.student_name),
                Cell::new(&r.student_id),
                Cell::new(&r.file_name),
                Cell::new(format!("{}/{} ({}%)", r.marks, r.max_marks, r.percentage)),
                Cell::new(if r.passed { "PASS" } else { "FAIL" }),
            ]);
        }
        println!("{table}");
    }

    for failure in &outcome.failures {
        eprintln!("  FAILED: {}: {}", failure.file_name, failure.error);
    }
    anyhow::ensure!(
        outcome.failures.is_empty(),
        "{} file(s) could not be evaluated",
        outcome.failures.len()
    );
    Ok(())
}
