//! The `evalai results` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use evalai_core::model::EvaluationResult;

use super::Context;

pub fn execute(ctx: &Context, search: Option<&str>, format: &str) -> Result<()> {
    let (_, manager) = ctx.open()?;
    let view = manager.search(search.unwrap_or(""));

    match format {
        "json" => {
            let matches: Vec<&EvaluationResult> = view.iter().collect();
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        "text" => {
            if view.count() == 0 {
                println!("No results found.");
                return Ok(());
            }
            let mut table = Table::new();
            table.set_header(vec![
                "Result Id",
                "Student",
                "Student Id",
                "Subject",
                "File",
                "Marks",
                "Status",
                "Manual",
                "Evaluated",
            ]);
            for r in view.iter() {
                table.add_row(vec![
                    Cell::new(&r.id),
                    Cell::new(&r.student_name),
                    Cell::new(&r.student_id),
                    Cell::new(&r.subject),
                    Cell::new(&r.file_name),
                    Cell::new(format!("{}/{} ({}%)", r.marks, r.max_marks, r.percentage)),
                    Cell::new(if r.passed { "PASS" } else { "FAIL" }),
                    Cell::new(if r.is_manual() { "yes" } else { "" }),
                    Cell::new(r.evaluated_at.format("%Y-%m-%d")),
                ]);
            }
            println!("{table}");
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}
