//! Error types for the evaluation state manager and its persistence layer.
//!
//! Validation errors are reported to the user and leave state untouched.
//! Decode and scoring errors are reported per file. Storage errors only ever
//! occur on save and undo the mutation that triggered them; loading recovers
//! silently.

use thiserror::Error;

/// Errors produced by [`EvaluationManager`](crate::manager::EvaluationManager) operations.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The subject name was empty or whitespace.
    #[error("please enter a subject name")]
    BlankSubjectName,

    /// A subject with the same name (ignoring case) already exists.
    #[error("subject already exists: {0}")]
    DuplicateSubject(String),

    /// A scheme document was uploaded with a type other than PDF.
    #[error("please upload a PDF file only (got {0})")]
    UnsupportedSchemeType(String),

    /// No subject was chosen for an evaluation batch.
    #[error("please select a subject")]
    NoSubjectSelected,

    /// The referenced subject id does not exist.
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    /// An evaluation batch was submitted without files.
    #[error("please select files to upload")]
    NoFilesSelected,

    /// Manual review targeted a result id that is not stored.
    #[error("evaluation result not found: {0}")]
    ResultNotFound(String),

    /// A file's content could not be read as text.
    #[error("failed to read {file}: {reason}")]
    Decode { file: String, reason: String },

    /// The scorer failed to produce a score for a file.
    #[error("failed to score {file}: {reason}")]
    Scoring { file: String, reason: String },

    /// The scorer produced a score with no attainable marks.
    #[error("invalid score for {file}: max marks must be at least 1")]
    InvalidScore { file: String },

    /// The mutated state could not be saved.
    #[error("failed to save data")]
    Storage(#[from] StoreError),
}

impl EvalError {
    /// Returns `true` for errors caused by user input rather than file content.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EvalError::BlankSubjectName
                | EvalError::DuplicateSubject(_)
                | EvalError::UnsupportedSchemeType(_)
                | EvalError::NoSubjectSelected
                | EvalError::SubjectNotFound(_)
                | EvalError::NoFilesSelected
                | EvalError::ResultNotFound(_)
        )
    }
}

/// Errors that can occur while writing the persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The state could not be serialized.
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing medium rejected the write.
    #[error("failed to write state: {0}")]
    Io(#[from] std::io::Error),
}
