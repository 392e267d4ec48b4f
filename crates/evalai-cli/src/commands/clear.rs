//! The `evalai clear` command.

use std::io::{BufRead, Write};

use anyhow::Result;

use super::Context;

pub fn execute(ctx: &Context, yes: bool) -> Result<()> {
    let (_, mut manager) = ctx.open()?;
    let cleared = manager.clear_all(|| yes || confirm_on_stdin())?;
    if !cleared {
        println!("Aborted, nothing was deleted.");
    }
    Ok(())
}

fn confirm_on_stdin() -> bool {
    print!("This will permanently delete all your data. Type 'yes' to continue: ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => answer.trim().eq_ignore_ascii_case("yes"),
        Err(_) => false,
    }
}
