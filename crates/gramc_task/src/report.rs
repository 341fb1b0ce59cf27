use crate::outcome::Outcome;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskReport {
    id: String,
    outcome: Outcome,
}

impl TaskReport {
    pub fn new(id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            id: id.into(),
            outcome,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

impl Display for TaskReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.outcome, self.id)
    }
}

/// Aggregate result of one batch run: one report per submitted task, in
/// submission order, plus the batch-level failure flag. Immutable once built.
#[derive(Debug, serde::Serialize)]
pub struct RunReport {
    results: Vec<TaskReport>,
    has_failures: bool,
}

impl RunReport {
    pub fn from_reports(results: Vec<TaskReport>) -> Self {
        let has_failures = results.iter().any(|r| !r.is_ok());
        Self {
            results,
            has_failures,
        }
    }
    pub fn has_failures(&self) -> bool {
        self.has_failures
    }
    pub fn results(&self) -> &[TaskReport] {
        &self.results
    }
    pub fn failed(&self) -> impl Iterator<Item = &TaskReport> {
        self.results.iter().filter(|r| !r.is_ok())
    }
    pub fn len(&self) -> usize {
        self.results.len()
    }
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_has_no_failures() {
        let report = RunReport::from_reports(vec![]);
        assert!(report.is_empty());
        assert!(!report.has_failures());
    }

    #[test]
    fn failure_flag_tracks_outcomes() {
        let all_good = RunReport::from_reports(vec![
            TaskReport::new("a", Outcome::success()),
            TaskReport::new("b", Outcome::success()),
        ]);
        assert!(!all_good.has_failures());

        let one_bad = RunReport::from_reports(vec![
            TaskReport::new("a", Outcome::success()),
            TaskReport::new("b", Outcome::failed_message("nope")),
        ]);
        assert!(one_bad.has_failures());
        let failed = one_bad.failed().collect::<Vec<_>>();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id(), "b");
        assert_eq!(failed[0].outcome().reason().as_deref(), Some("nope"));
    }
}
