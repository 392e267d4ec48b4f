//! Core data model types for evalai.
//!
//! These are plain records: subjects, evaluation results, uploaded answer
//! scripts, and the [`AppState`] aggregate that is persisted as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grading category, e.g. a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name, unique ignoring case.
    pub name: String,
    /// When the subject was created.
    pub created_at: DateTime<Utc>,
    /// Reference material attached to the subject, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_file: Option<SchemeFile>,
}

/// A scheme-of-evaluation document, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeFile {
    pub name: String,
    /// Decoded text of the uploaded document.
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
}

/// The outcome of evaluating one answer script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Shared with the originating [`UploadedFile::result_id`].
    pub id: String,
    pub student_name: String,
    pub student_id: String,
    /// Subject name (not id).
    pub subject: String,
    pub file_name: String,
    pub marks: u32,
    pub max_marks: u32,
    /// Derived from `marks` / `max_marks`, see [`Grade::compute`].
    pub percentage: u32,
    /// Derived from `percentage` and the pass threshold.
    pub passed: bool,
    pub uploaded_at: DateTime<Utc>,
    pub evaluated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manually_evaluated: Option<bool>,
}

impl EvaluationResult {
    /// Whether a human reviewer has overwritten this result.
    pub fn is_manual(&self) -> bool {
        self.manually_evaluated.unwrap_or(false)
    }
}

/// An answer script kept alongside its evaluation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    /// Decoded text of the script.
    pub content: String,
    /// Subject name (not id).
    pub subject: String,
    pub student_name: String,
    pub student_id: String,
    /// Foreign key to [`EvaluationResult::id`].
    pub result_id: String,
}

/// The aggregate root. Persisted and restored as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub results: Vec<EvaluationResult>,
    #[serde(default)]
    pub uploaded_files: Vec<UploadedFile>,
}

impl AppState {
    /// Returns `true` if all three collections are empty.
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.results.is_empty() && self.uploaded_files.is_empty()
    }
}

/// Percentage and pass/fail derived from a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub percentage: u32,
    pub passed: bool,
}

impl Grade {
    /// Derive the grade for `marks` out of `max_marks`.
    ///
    /// `percentage = round(marks / max_marks * 100)` with halves rounded up,
    /// computed in integer arithmetic. `max_marks` of zero is treated as one.
    pub fn compute(marks: u32, max_marks: u32, pass_threshold: u32) -> Self {
        let percentage = rounded_percent(marks as u64, max_marks.max(1) as u64);
        Self {
            percentage,
            passed: percentage >= pass_threshold,
        }
    }
}

/// `round(part / whole * 100)`, rounding halves up. `whole` must be non-zero.
pub(crate) fn rounded_percent(part: u64, whole: u64) -> u32 {
    let value = (part * 200 + whole) / (whole * 2);
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Strip the final extension from a file name.
///
/// Only the last `.segment` is removed, and only when the segment is
/// non-empty and contains no path separator: `"essay.final.txt"` becomes
/// `"essay.final"`, `"notes."` is left alone.
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && !ext.contains('/') => stem,
        _ => file_name,
    }
}

/// Parse the leading integer of `input`, ignoring any trailing characters.
///
/// Accepts leading whitespace and an optional sign. Returns `None` when no
/// digit follows.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let magnitude = rest[..digits_end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
