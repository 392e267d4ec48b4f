//! Pass-rate statistics and result search.

use serde::{Deserialize, Serialize};

use crate::model::{rounded_percent, AppState, EvaluationResult};

/// Pass counts for a single subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub passed: usize,
    pub total: usize,
    /// `round(passed / total * 100)`, or 0 when there are no results.
    pub pass_rate: u32,
}

/// Dashboard totals across every subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_evaluations: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: u32,
    pub manual_evaluations: usize,
    pub subjects: usize,
    pub schemes_uploaded: usize,
}

/// `round(passed / total * 100)`, 0 when `total` is 0.
pub fn pass_rate(passed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    rounded_percent(passed as u64, total as u64)
}

/// Compute pass statistics for every result filed under `subject_name`.
///
/// Matching is exact, since results store the subject name as it was at
/// evaluation time.
pub fn subject_stats(results: &[EvaluationResult], subject_name: &str) -> SubjectStats {
    let (passed, total) = results
        .iter()
        .filter(|r| r.subject == subject_name)
        .fold((0, 0), |(passed, total), r| {
            (passed + usize::from(r.passed), total + 1)
        });
    SubjectStats {
        passed,
        total,
        pass_rate: pass_rate(passed, total),
    }
}

/// Compute totals across the whole state.
pub fn overall_stats(state: &AppState) -> OverallStats {
    let total_evaluations = state.results.len();
    let passed = state.results.iter().filter(|r| r.passed).count();
    OverallStats {
        total_evaluations,
        passed,
        failed: total_evaluations - passed,
        pass_rate: pass_rate(passed, total_evaluations),
        manual_evaluations: state.results.iter().filter(|r| r.is_manual()).count(),
        subjects: state.subjects.len(),
        schemes_uploaded: state
            .subjects
            .iter()
            .filter(|s| s.scheme_file.is_some())
            .count(),
    }
}

/// A filtered, restartable view over evaluation results.
///
/// Nothing is copied; every call to [`iter`](Self::iter) walks the
/// underlying slice again.
#[derive(Debug, Clone)]
pub struct ResultSearch<'a> {
    results: &'a [EvaluationResult],
    needle: String,
}

impl<'a> ResultSearch<'a> {
    /// Match results whose student name or id contains `query`, ignoring case.
    pub fn new(results: &'a [EvaluationResult], query: &str) -> Self {
        Self {
            results,
            needle: query.to_lowercase(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EvaluationResult> + '_ {
        self.results.iter().filter(move |r| self.matches(r))
    }

    /// Number of matching results.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    fn matches(&self, result: &EvaluationResult) -> bool {
        result.student_name.to_lowercase().contains(&self.needle)
            || result.student_id.to_lowercase().contains(&self.needle)
    }
}
