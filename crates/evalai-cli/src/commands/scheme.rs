//! The `evalai scheme` command.

use std::path::PathBuf;

use anyhow::Result;

use evalai_storage::DiskFile;

use super::{subject_id, Context};

pub async fn execute(ctx: &Context, subject: &str, file: PathBuf) -> Result<()> {
    let (_, mut manager) = ctx.open()?;
    let id = subject_id(&manager, subject)?;
    let file = DiskFile::new(file);
    manager.attach_scheme(&id, &file).await?;
    Ok(())
}
