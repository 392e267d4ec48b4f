//! Collaborator traits the evaluation manager is wired to.
//!
//! The manager never talks to storage, the file picker, the clock, or the
//! user directly. Each of those is injected behind one of these traits so
//! that tests can substitute in-memory fakes.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::AppState;

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Key-value persistence for the whole [`AppState`] aggregate.
pub trait StateStore: Send + Sync {
    /// Read the persisted state.
    ///
    /// A missing or unreadable blob yields the empty state; this never fails.
    fn load(&self) -> AppState;

    /// Overwrite the persisted state with `state`.
    fn save(&self, state: &AppState) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Strategy that assigns a mark to an answer script.
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Human-readable scorer name (e.g. "random").
    fn name(&self) -> &str;

    /// Score one answer script.
    async fn score(&self, request: &ScoreRequest<'_>) -> anyhow::Result<Score>;
}

/// Input handed to a [`Scorer`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreRequest<'a> {
    pub file_name: &'a str,
    /// Decoded text of the answer script.
    pub content: &'a str,
    /// Subject name.
    pub subject: &'a str,
    /// The subject's scheme document, if one was uploaded.
    pub scheme: Option<&'a str>,
}

/// A raw mark produced by a [`Scorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub marks: u32,
    pub max_marks: u32,
}

// ---------------------------------------------------------------------------
// File selection
// ---------------------------------------------------------------------------

/// A file handed over by the file picker.
#[async_trait]
pub trait SelectedFile: Send + Sync {
    fn name(&self) -> &str;

    /// Declared MIME type, if the source reported one.
    fn mime_type(&self) -> Option<&str>;

    /// Size in bytes.
    fn size(&self) -> u64;

    /// Read the full content and decode it as text.
    async fn read_text(&self) -> anyhow::Result<String>;
}

/// A file whose bytes are already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    name: String,
    mime_type: Option<String>,
    bytes: Vec<u8>,
}

impl InMemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[async_trait]
impl SelectedFile for InMemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_text(&self) -> anyhow::Result<String> {
        Ok(String::from_utf8_lossy(&self.bytes).into_owned())
    }
}

// ---------------------------------------------------------------------------
// User notifications
// ---------------------------------------------------------------------------

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-visible outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: "Success".into(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".into(),
            description: description.into(),
        }
    }
}

/// Surface that shows outcome messages to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Discards every notice.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _: Notice) {}
}

/// Keeps every notice in memory, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice);
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
