//! JSON file store.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use evalai_core::error::StoreError;
use evalai_core::model::AppState;
use evalai_core::store::{encode_state, load_or_default};
use evalai_core::traits::StateStore;

/// Persists the whole state as `<data_dir>/<storage_key>.json`.
///
/// Saves go to a temporary file in the same directory which then replaces
/// the target, so a reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>, storage_key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{storage_key}.json")),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> AppState {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => load_or_default(Some(&blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => load_or_default(None),
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", self.path.display());
                AppState::default()
            }
        }
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let encoded = encode_state(state)?;
        let dir = self.dir();
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(encoded.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), bytes = encoded.len(), "saved state");
        Ok(())
    }
}
