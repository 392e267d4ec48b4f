//! Configuration loading and scorer factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use evalai_core::manager::DEFAULT_PASS_THRESHOLD;
use evalai_core::scoring::RandomScorer;
use evalai_core::store::DEFAULT_STORAGE_KEY;
use evalai_core::traits::Scorer;

use crate::file::JsonFileStore;

/// Which scoring strategy to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScorerConfig {
    /// Placeholder scorer that draws a random mark.
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for ScorerConfig {
    fn default() -> Self {
        ScorerConfig::Random { seed: None }
    }
}

/// Top-level evalai configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalaiConfig {
    /// Directory holding the persisted state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Name the state is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Percentage at or above which a result passes.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    #[serde(default)]
    pub scorer: ScorerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./evalai-data")
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_pass_threshold() -> u32 {
    DEFAULT_PASS_THRESHOLD
}

impl Default for EvalaiConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            pass_threshold: default_pass_threshold(),
            scorer: ScorerConfig::default(),
        }
    }
}

impl EvalaiConfig {
    /// The file store this configuration points at.
    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_dir, &self.storage_key)
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.pass_threshold <= 100,
            "pass_threshold must be between 0 and 100, got {}",
            self.pass_threshold
        );
        anyhow::ensure!(
            !self.storage_key.trim().is_empty(),
            "storage_key must not be empty"
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        // Substituted values are inserted verbatim, never expanded again.
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Apply `EVALAI_*` overrides, looking variables up through `lookup`.
fn apply_env_overrides(
    config: &mut EvalaiConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(dir) = lookup("EVALAI_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(threshold) = lookup("EVALAI_PASS_THRESHOLD") {
        config.pass_threshold = threshold
            .trim()
            .parse()
            .with_context(|| format!("invalid EVALAI_PASS_THRESHOLD: '{threshold}'"))?;
    }
    Ok(())
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `evalai.toml` in the current directory
/// 2. `~/.config/evalai/config.toml`
///
/// Environment variable overrides: `EVALAI_DATA_DIR`, `EVALAI_PASS_THRESHOLD`.
pub fn load_config() -> Result<EvalaiConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<EvalaiConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("evalai.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => EvalaiConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Parse a TOML document and resolve `${VAR}` references in `data_dir`.
pub fn parse_config(content: &str) -> Result<EvalaiConfig> {
    let mut config: EvalaiConfig = toml::from_str(content)?;
    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("evalai"))
}

/// Create a scorer instance from its configuration.
pub fn create_scorer(config: &ScorerConfig) -> Box<dyn Scorer> {
    match config {
        ScorerConfig::Random { seed: Some(seed) } => Box::new(RandomScorer::seeded(*seed)),
        ScorerConfig::Random { seed: None } => Box::new(RandomScorer::new()),
    }
}
