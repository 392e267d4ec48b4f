//! The `evalai subject` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::Context;

pub fn add(ctx: &Context, name: &str) -> Result<()> {
    let (_, mut manager) = ctx.open()?;
    let subject = manager.create_subject(name)?;
    println!("Subject id: {}", subject.id);
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let (_, manager) = ctx.open()?;

    if manager.subjects().is_empty() {
        println!("No subjects yet. Run `evalai subject add <NAME>` to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Subject",
        "Id",
        "Created",
        "Submissions",
        "Passed",
        "Pass Rate",
        "Scheme",
    ]);
    for subject in manager.subjects() {
        let stats = manager.subject_stats(&subject.name);
        table.add_row(vec![
            Cell::new(&subject.name),
            Cell::new(&subject.id),
            Cell::new(subject.created_at.format("%Y-%m-%d")),
            Cell::new(stats.total),
            Cell::new(stats.passed),
            Cell::new(format!("{}%", stats.pass_rate)),
            Cell::new(
                subject
                    .scheme_file
                    .as_ref()
                    .map(|s| s.name.as_str())
                    .unwrap_or("-"),
            ),
        ]);
    }
    println!("{table}");
    Ok(())
}
