//! The `evalai export` command.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::Utc;

use evalai_core::store::{export_file_name, export_json};

use super::Context;

pub fn execute(ctx: &Context, output: PathBuf) -> Result<()> {
    let (_, manager) = ctx.open()?;
    let bytes = export_json(manager.state())?;

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let path = output.join(export_file_name(Utc::now().date_naive()));
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    println!("Data exported to {}", path.display());
    Ok(())
}
