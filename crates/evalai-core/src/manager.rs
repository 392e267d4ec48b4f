//! The evaluation state manager.
//!
//! Owns the [`AppState`] aggregate and applies every user operation to it.
//! Each mutation is written back through the injected [`StateStore`]; a
//! mutation whose save fails is rolled back and returned as
//! [`EvalError::Storage`]. Every outcome is reported through the [`Notifier`].

use std::sync::Arc;

use crate::error::EvalError;
use crate::model::{
    new_id, parse_leading_int, strip_extension, AppState, EvaluationResult, Grade, SchemeFile,
    Subject, UploadedFile,
};
use crate::statistics::{self, OverallStats, ResultSearch, SubjectStats};
use crate::traits::{
    Clock, Notice, Notifier, ScoreRequest, Scorer, SelectedFile, StateStore, SystemClock,
};

/// The only document type accepted as a scheme of evaluation.
pub const SCHEME_MIME_TYPE: &str = "application/pdf";

/// Default pass threshold, in percent.
pub const DEFAULT_PASS_THRESHOLD: u32 = 35;

/// Max marks assumed when a manual review gives none that parse.
const DEFAULT_MANUAL_MAX_MARKS: u32 = 100;

/// Parameters for an automatic evaluation batch.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    /// Subject the batch is filed under.
    pub subject_id: Option<String>,
    /// Student name applied to every file; defaults to the file name.
    pub student_name: Option<String>,
    /// Student id applied to every file; defaults to a timestamp.
    pub student_id: Option<String>,
    pub pass_threshold: u32,
}

/// Form input for a manual review, as typed by the reviewer.
#[derive(Debug, Clone)]
pub struct ManualReview {
    pub marks: String,
    pub max_marks: String,
    pub comments: String,
    pub pass_threshold: u32,
}

/// A file from a batch that could not be evaluated.
#[derive(Debug)]
pub struct FileFailure {
    pub file_name: String,
    pub error: EvalError,
}

/// What happened to each file of an automatic evaluation batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Results committed to state, in input order.
    pub evaluated: Vec<EvaluationResult>,
    /// Files that were skipped.
    pub failures: Vec<FileFailure>,
}

/// Owns the application state and its collaborators.
pub struct EvaluationManager {
    state: AppState,
    store: Arc<dyn StateStore>,
    scorer: Arc<dyn Scorer>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl EvaluationManager {
    /// Load state from `store` and wire up the collaborators.
    pub fn open(
        store: Arc<dyn StateStore>,
        scorer: Arc<dyn Scorer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let state = store.load();
        tracing::debug!(
            subjects = state.subjects.len(),
            results = state.results.len(),
            "loaded evaluation state"
        );
        Self {
            state,
            store,
            scorer,
            notifier,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Name of the scorer used for automatic evaluation.
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.state.subjects
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.state.results
    }

    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.state.uploaded_files
    }

    pub fn find_subject(&self, subject_id: &str) -> Option<&Subject> {
        self.state.subjects.iter().find(|s| s.id == subject_id)
    }

    /// Look up a subject by name, ignoring case.
    pub fn find_subject_by_name(&self, name: &str) -> Option<&Subject> {
        let wanted = name.to_lowercase();
        self.state
            .subjects
            .iter()
            .find(|s| s.name.to_lowercase() == wanted)
    }

    pub fn uploaded_file_for_result(&self, result_id: &str) -> Option<&UploadedFile> {
        self.state
            .uploaded_files
            .iter()
            .find(|f| f.result_id == result_id)
    }

    /// Create a subject named `name`.
    pub fn create_subject(&mut self, name: &str) -> Result<Subject, EvalError> {
        if name.trim().is_empty() {
            return self.reject(EvalError::BlankSubjectName);
        }
        if self.find_subject_by_name(name).is_some() {
            return self.reject(EvalError::DuplicateSubject(name.to_string()));
        }

        let subject = Subject {
            id: new_id(),
            name: name.to_string(),
            created_at: self.clock.now(),
            scheme_file: None,
        };
        self.state.subjects.push(subject.clone());
        self.commit(|state| {
            state.subjects.pop();
        })?;

        tracing::info!(id = %subject.id, name = %subject.name, "created subject");
        self.notifier.notify(Notice::success(format!(
            "Subject \"{name}\" created successfully"
        )));
        Ok(subject)
    }

    /// Store `file` as the scheme document of `subject_id`, replacing any prior one.
    pub async fn attach_scheme(
        &mut self,
        subject_id: &str,
        file: &dyn SelectedFile,
    ) -> Result<(), EvalError> {
        let mime_type = file.mime_type().unwrap_or("unknown");
        if mime_type != SCHEME_MIME_TYPE {
            return self.reject(EvalError::UnsupportedSchemeType(mime_type.to_string()));
        }
        if self.find_subject(subject_id).is_none() {
            return self.reject(EvalError::SubjectNotFound(subject_id.to_string()));
        }

        let content = match file.read_text().await {
            Ok(content) => content,
            Err(e) => {
                return self.reject(EvalError::Decode {
                    file: file.name().to_string(),
                    reason: format!("{e:#}"),
                })
            }
        };

        let uploaded_at = self.clock.now();
        let Some(subject) = self.state.subjects.iter_mut().find(|s| s.id == subject_id) else {
            return self.reject(EvalError::SubjectNotFound(subject_id.to_string()));
        };
        let previous = subject.scheme_file.replace(SchemeFile {
            name: file.name().to_string(),
            content,
            uploaded_at,
        });
        self.commit(|state| {
            if let Some(subject) = state.subjects.iter_mut().find(|s| s.id == subject_id) {
                subject.scheme_file = previous;
            }
        })?;

        tracing::info!(subject = subject_id, file = file.name(), "attached scheme");
        self.notifier
            .notify(Notice::success("Scheme of evaluation uploaded successfully"));
        Ok(())
    }

    /// Score every file in `files` and file the results under the requested subject.
    ///
    /// Files that cannot be read or scored are reported in
    /// [`BatchOutcome::failures`]; the rest of the batch still goes through and
    /// every committed file is saved immediately. A failed save stops the
    /// batch with [`EvalError::Storage`]; files saved before it stay committed.
    ///
    /// When no student id is given, each file gets `STU<unix millis>`. Files
    /// processed within the same millisecond share that id.
    pub async fn evaluate_automatically<F: SelectedFile>(
        &mut self,
        request: &EvaluationRequest,
        files: &[F],
    ) -> Result<BatchOutcome, EvalError> {
        let Some(subject_id) = non_blank(request.subject_id.as_deref()) else {
            return self.reject(EvalError::NoSubjectSelected);
        };
        if files.is_empty() {
            return self.reject(EvalError::NoFilesSelected);
        }
        let Some(subject) = self.find_subject(subject_id) else {
            return self.reject(EvalError::SubjectNotFound(subject_id.to_string()));
        };
        let subject_name = subject.name.clone();
        let scheme = subject.scheme_file.as_ref().map(|s| s.content.clone());
        let basis = if scheme.is_some() {
            "uploaded scheme"
        } else {
            "default criteria"
        };

        tracing::debug!(
            subject = %subject_name,
            scorer = self.scorer.name(),
            files = files.len(),
            "starting evaluation batch"
        );
        let mut outcome = BatchOutcome::default();
        for file in files {
            let file_name = file.name().to_string();
            match self
                .evaluate_one(file, &subject_name, scheme.as_deref(), basis, request)
                .await
            {
                Ok(result) => {
                    tracing::debug!(
                        file = %file_name,
                        marks = result.marks,
                        passed = result.passed,
                        "evaluated file"
                    );
                    outcome.evaluated.push(result);
                }
                Err(error @ EvalError::Storage(_)) => return Err(error),
                Err(error) => {
                    tracing::warn!(file = %file_name, "evaluation failed: {error}");
                    self.notifier.notify(Notice::error(format!(
                        "Evaluation failed for {file_name}: {error}"
                    )));
                    outcome.failures.push(FileFailure { file_name, error });
                }
            }
        }

        tracing::info!(
            subject = %subject_name,
            evaluated = outcome.evaluated.len(),
            failed = outcome.failures.len(),
            scorer = self.scorer.name(),
            "evaluation batch complete"
        );
        if !outcome.evaluated.is_empty() {
            self.notifier.notify(Notice::success(format!(
                "{} file(s) evaluated successfully",
                outcome.evaluated.len()
            )));
        }
        Ok(outcome)
    }

    async fn evaluate_one<F: SelectedFile>(
        &mut self,
        file: &F,
        subject_name: &str,
        scheme: Option<&str>,
        basis: &str,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, EvalError> {
        let file_name = file.name();
        let content = file.read_text().await.map_err(|e| EvalError::Decode {
            file: file_name.to_string(),
            reason: format!("{e:#}"),
        })?;

        let score = self
            .scorer
            .score(&ScoreRequest {
                file_name,
                content: &content,
                subject: subject_name,
                scheme,
            })
            .await
            .map_err(|e| EvalError::Scoring {
                file: file_name.to_string(),
                reason: format!("{e:#}"),
            })?;
        if score.max_marks == 0 {
            return Err(EvalError::InvalidScore {
                file: file_name.to_string(),
            });
        }

        let grade = Grade::compute(score.marks, score.max_marks, request.pass_threshold);
        let now = self.clock.now();
        let student_name = non_blank(request.student_name.as_deref())
            .unwrap_or_else(|| strip_extension(file_name))
            .to_string();
        let student_id = match non_blank(request.student_id.as_deref()) {
            Some(id) => id.to_string(),
            None => format!("STU{}", now.timestamp_millis()),
        };

        let result = EvaluationResult {
            id: new_id(),
            student_name,
            student_id,
            subject: subject_name.to_string(),
            file_name: file_name.to_string(),
            marks: score.marks,
            max_marks: score.max_marks,
            percentage: grade.percentage,
            passed: grade.passed,
            uploaded_at: now,
            evaluated_at: now,
            comments: Some(format!("Automatic evaluation based on {basis}")),
            manually_evaluated: None,
        };
        let uploaded = UploadedFile {
            file_name: file_name.to_string(),
            content,
            subject: subject_name.to_string(),
            student_name: result.student_name.clone(),
            student_id: result.student_id.clone(),
            result_id: result.id.clone(),
        };

        self.state.results.push(result.clone());
        self.state.uploaded_files.push(uploaded);
        self.commit(|state| {
            state.results.pop();
            state.uploaded_files.pop();
        })?;
        Ok(result)
    }

    /// Replace the result behind `selected` with a reviewer-entered mark.
    ///
    /// Does nothing when no file is selected. Marks that do not parse become
    /// 0; max marks that do not parse, or are below 1, become 100. Comments
    /// are stored exactly as typed.
    pub fn submit_manual_evaluation(
        &mut self,
        selected: Option<&UploadedFile>,
        review: &ManualReview,
    ) -> Result<Option<EvaluationResult>, EvalError> {
        let Some(file) = selected else {
            return Ok(None);
        };
        let position = self.state.results.iter().position(|r| r.id == file.result_id);
        let Some(index) = position else {
            return self.reject(EvalError::ResultNotFound(file.result_id.clone()));
        };

        let marks = parse_leading_int(&review.marks)
            .filter(|m| *m > 0)
            .map(clamp_u32)
            .unwrap_or(0);
        let max_marks = parse_leading_int(&review.max_marks)
            .filter(|m| *m >= 1)
            .map(clamp_u32)
            .unwrap_or(DEFAULT_MANUAL_MAX_MARKS);
        let grade = Grade::compute(marks, max_marks, review.pass_threshold);
        let now = self.clock.now();

        let updated = EvaluationResult {
            id: file.result_id.clone(),
            student_name: file.student_name.clone(),
            student_id: file.student_id.clone(),
            subject: file.subject.clone(),
            file_name: file.file_name.clone(),
            marks,
            max_marks,
            percentage: grade.percentage,
            passed: grade.passed,
            uploaded_at: now,
            evaluated_at: now,
            comments: Some(review.comments.clone()),
            manually_evaluated: Some(true),
        };
        let previous = std::mem::replace(&mut self.state.results[index], updated.clone());
        self.commit(|state| state.results[index] = previous)?;

        tracing::info!(result = %updated.id, marks, max_marks, "saved manual evaluation");
        self.notifier
            .notify(Notice::success("Manual evaluation saved successfully"));
        Ok(Some(updated))
    }

    /// Results whose student name or id contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> ResultSearch<'_> {
        ResultSearch::new(&self.state.results, query)
    }

    pub fn subject_stats(&self, subject_name: &str) -> SubjectStats {
        statistics::subject_stats(&self.state.results, subject_name)
    }

    pub fn overall_stats(&self) -> OverallStats {
        statistics::overall_stats(&self.state)
    }

    /// Drop every subject, result and uploaded file once `confirm` agrees.
    ///
    /// Returns whether anything was cleared.
    pub fn clear_all(&mut self, confirm: impl FnOnce() -> bool) -> Result<bool, EvalError> {
        if !confirm() {
            tracing::debug!("clear all declined");
            return Ok(false);
        }
        let previous = std::mem::take(&mut self.state);
        self.commit(|state| *state = previous)?;

        tracing::info!("cleared all evaluation data");
        self.notifier
            .notify(Notice::success("All data cleared successfully"));
        Ok(true)
    }

    /// Save the current state, applying `undo` to it if the save fails.
    fn commit(&mut self, undo: impl FnOnce(&mut AppState)) -> Result<(), EvalError> {
        match self.store.save(&self.state) {
            Ok(()) => Ok(()),
            Err(e) => {
                undo(&mut self.state);
                tracing::error!("failed to persist evaluation state: {e}");
                self.notifier
                    .notify(Notice::error(format!("Failed to save data: {e}")));
                Err(EvalError::Storage(e))
            }
        }
    }

    fn reject<T>(&self, error: EvalError) -> Result<T, EvalError> {
        tracing::debug!("rejected operation: {error}");
        self.notifier.notify(Notice::error(error.to_string()));
        Err(error)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" Ada ")), Some(" Ada "));
    }

    #[test]
    fn clamp_u32_saturates() {
        assert_eq!(clamp_u32(42), 42);
        assert_eq!(clamp_u32(i64::MAX), u32::MAX);
    }
}
