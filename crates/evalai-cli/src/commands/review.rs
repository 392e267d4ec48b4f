//! The `evalai review` command.

use anyhow::Result;

use evalai_core::manager::ManualReview;

use super::{pass_threshold, Context};

pub fn execute(
    ctx: &Context,
    result_id: &str,
    marks: String,
    max_marks: String,
    comments: String,
    threshold: Option<u32>,
) -> Result<()> {
    let (config, mut manager) = ctx.open()?;
    let review = ManualReview {
        marks,
        max_marks,
        comments,
        pass_threshold: pass_threshold(threshold, &config)?,
    };

    let Some(file) = manager.uploaded_file_for_result(result_id).cloned() else {
        anyhow::bail!("no uploaded script for result {result_id}");
    };
    if let Some(updated) = manager.submit_manual_evaluation(Some(&file), &review)? {
        println!(
            "{} ({}): {}/{} ({}%) {}",
            updated.student_name,
            updated.student_id,
            updated.marks,
            updated.max_marks,
            updated.percentage,
            if updated.passed { "PASS" } else { "FAIL" }
        );
    }
    Ok(())
}
