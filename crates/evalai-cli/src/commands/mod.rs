//! Subcommand implementations.

pub mod clear;
pub mod evaluate;
pub mod export;
pub mod init;
pub mod results;
pub mod review;
pub mod scheme;
pub mod stats;
pub mod subject;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use evalai_core::manager::EvaluationManager;
use evalai_core::traits::{Notice, NoticeLevel, Notifier};
use evalai_storage::config::load_config_from;
use evalai_storage::{create_scorer, EvalaiConfig};

/// Global options shared by every subcommand.
pub struct Context {
    pub config_path: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl Context {
    /// Load the configuration, applying command-line overrides.
    pub fn config(&self) -> Result<EvalaiConfig> {
        let mut config = load_config_from(self.config_path.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    /// Open the evaluation manager over the configured store.
    pub fn open(&self) -> Result<(EvalaiConfig, EvaluationManager)> {
        let config = self.config()?;
        let manager = EvaluationManager::open(
            Arc::new(config.store()),
            Arc::from(create_scorer(&config.scorer)),
            Arc::new(ConsoleNotifier),
        );
        Ok((config, manager))
    }
}

/// Prints success notices. Failures surface as command errors instead.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.description),
            NoticeLevel::Error => tracing::debug!("{}: {}", notice.title, notice.description),
        }
    }
}

/// Resolve the pass threshold from a flag or the config.
pub fn pass_threshold(flag: Option<u32>, config: &EvalaiConfig) -> Result<u32> {
    let threshold = flag.unwrap_or(config.pass_threshold);
    anyhow::ensure!(
        threshold <= 100,
        "pass threshold must be between 0 and 100, got {threshold}"
    );
    Ok(threshold)
}

/// Find a subject id by name, ignoring case.
pub fn subject_id(manager: &EvaluationManager, name: &str) -> Result<String> {
    manager
        .find_subject_by_name(name)
        .map(|s| s.id.clone())
        .ok_or_else(|| anyhow::anyhow!("subject not found: {name}"))
}
