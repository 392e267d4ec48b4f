//! The `evalai stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let (_, manager) = ctx.open()?;
    let overall = manager.overall_stats();

    println!("Total evaluations:  {}", overall.total_evaluations);
    println!("Passed:             {}", overall.passed);
    println!("Failed:             {}", overall.failed);
    println!("Overall pass rate:  {}%", overall.pass_rate);
    println!("Manual evaluations: {}", overall.manual_evaluations);
    println!(
        "Subjects:           {} ({} with scheme)",
        overall.subjects, overall.schemes_uploaded
    );
    println!("Scorer:             {}", manager.scorer_name());

    if manager.subjects().is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Submissions", "Passed", "Pass Rate"]);
    for subject in manager.subjects() {
        let stats = manager.subject_stats(&subject.name);
        table.add_row(vec![
            Cell::new(&subject.name),
            Cell::new(stats.total),
            Cell::new(stats.passed),
            Cell::new(format!("{}%", stats.pass_rate)),
        ]);
    }
    println!("\n{table}");
    Ok(())
}
