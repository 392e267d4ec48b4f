//! evalai-storage — File-backed persistence and configuration.
//!
//! Implements the `StateStore` trait on top of a JSON file, the
//! `SelectedFile` trait for files on disk, and the TOML configuration that
//! wires them together.

pub mod config;
pub mod disk;
pub mod file;

pub use config::{create_scorer, load_config, EvalaiConfig, ScorerConfig};
pub use disk::DiskFile;
pub use file::JsonFileStore;
