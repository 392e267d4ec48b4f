//! Persisted state codec, JSON export, and an in-memory store.
//!
//! The whole [`AppState`] is written as one JSON document wrapped in a
//! versioned envelope:
//!
//! ```json
//! { "schemaVersion": 1, "subjects": [], "results": [], "uploadedFiles": [] }
//! ```
//!
//! Documents written before the envelope existed carry no `schemaVersion`
//! and are read as version 0.

use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::AppState;
use crate::traits::StateStore;

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Storage key the state is written under.
pub const DEFAULT_STORAGE_KEY: &str = "evalai_pro_data";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    schema_version: u32,
    #[serde(flatten)]
    state: &'a AppState,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    #[serde(default)]
    schema_version: Option<u32>,
    #[serde(flatten)]
    state: AppState,
}

/// Serialize `state` into the compact persisted form.
pub fn encode_state(state: &AppState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        state,
    })?)
}

/// Parse a persisted blob, migrating older schema versions.
pub fn decode_state(blob: &str) -> Result<AppState> {
    let envelope: Envelope =
        serde_json::from_str(blob).context("failed to parse persisted state")?;
    match envelope.schema_version.unwrap_or(0) {
        0 => {
            tracing::debug!("migrating unversioned state to schema v{SCHEMA_VERSION}");
            Ok(envelope.state)
        }
        SCHEMA_VERSION => Ok(envelope.state),
        newer => anyhow::bail!(
            "persisted state has schema v{newer}, newest supported is v{SCHEMA_VERSION}"
        ),
    }
}

/// Decode `blob`, falling back to the empty state when it is absent or unreadable.
pub fn load_or_default(blob: Option<&str>) -> AppState {
    let Some(blob) = blob else {
        tracing::debug!("no persisted state found, starting empty");
        return AppState::default();
    };
    match decode_state(blob) {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!("discarding unreadable persisted state: {e:#}");
            AppState::default()
        }
    }
}

/// Render `state` as a downloadable JSON document.
///
/// The shape matches the persisted form, pretty-printed.
pub fn export_json(state: &AppState) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec_pretty(&EnvelopeRef {
        schema_version: SCHEMA_VERSION,
        state,
    })?)
}

/// File name for an export taken on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("evalai_export_{}.json", date.format("%Y-%m-%d"))
}

/// A [`StateStore`] that keeps the serialized blob in memory.
///
/// The blob goes through the same codec as the on-disk store.
#[derive(Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw blob already stored.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    /// The raw stored blob, if anything has been saved.
    pub fn blob(&self) -> Option<String> {
        self.blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> AppState {
        load_or_default(self.blob().as_deref())
    }

    fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let encoded = encode_state(state)?;
        *self
            .blob
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(encoded);
        Ok(())
    }
}
