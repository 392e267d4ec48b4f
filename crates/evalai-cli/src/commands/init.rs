//! The `evalai init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("evalai.toml").exists() {
        println!("evalai.toml already exists, skipping.");
    } else {
        std::fs::write("evalai.toml", SAMPLE_CONFIG)?;
        println!("Created evalai.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: evalai subject add \"Mathematics\"");
    println!("  2. Run: evalai evaluate --subject Mathematics scripts/*.txt");
    println!("  3. Run: evalai stats");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# evalai configuration

data_dir = "./evalai-data"
storage_key = "evalai_pro_data"
pass_threshold = 35

# The random scorer assigns placeholder marks; set a seed for reproducible runs.
[scorer]
type = "random"
# seed = 42
"#;
