use crate::comms::{RunEvent, TaskComms};
use crate::invocation::Invocation;
use crate::outcome::Outcome;
use crate::report::{RunReport, TaskReport};
use crate::task::TaskEntry;
use crate::RunnerOpts;
use futures_util::FutureExt;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// A programming error in how the batch was configured - surfaced before any
/// task starts, unlike task failures which are recorded in the report.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("concurrency limit must be at least 1, got {given}")]
    InvalidLimit { given: usize },
    #[error("duplicate task id: {id}")]
    DuplicateId { id: String },
}

/// Executes a batch of tasks with a concurrency ceiling, collecting one
/// outcome per task into a [`RunReport`].
///
/// Failure of one task never cancels siblings and never stops admission of
/// queued tasks - the whole batch runs to completion and the caller decides
/// what to do with the aggregate.
#[derive(Debug, Default, Clone)]
pub struct BoundedRunner {
    opts: RunnerOpts,
}

impl BoundedRunner {
    pub fn new(opts: RunnerOpts) -> Self {
        Self { opts }
    }

    /// Run every task, at most `max_concurrent` actions in flight at once.
    ///
    /// Each task is spawned up front; the spawned execution first waits on a
    /// shared semaphore permit, so a slot is handed over the moment any
    /// in-flight action completes. Reports land in submission order.
    pub async fn run(
        &self,
        tasks: Vec<TaskEntry>,
        comms: &TaskComms,
    ) -> Result<RunReport, RunnerError> {
        let limit = self.opts.max_concurrent();
        if limit < 1 {
            return Err(RunnerError::InvalidLimit { given: limit });
        }
        let mut seen = HashSet::new();
        for entry in &tasks {
            if !seen.insert(entry.id().to_owned()) {
                return Err(RunnerError::DuplicateId {
                    id: entry.id().to_owned(),
                });
            }
        }

        tracing::debug!(batch.len = tasks.len(), batch.limit = limit);

        let sem = Arc::new(Semaphore::new(limit));
        let mut jhs = Vec::with_capacity(tasks.len());
        for entry in tasks {
            let id = entry.id().to_owned();
            let recipient = entry.into_recipient();
            let jh = tokio::spawn({
                let semaphore = sem.clone();
                let comms = comms.clone();
                let id = id.clone();
                async move {
                    let _permit = semaphore.acquire().await.unwrap();
                    comms.send(RunEvent::started(id.as_str())).await;
                    let invocation = Invocation::new(id.as_str(), comms.clone());
                    let outcome = recipient
                        .send(invocation)
                        .map(|sent| match sent {
                            Ok(outcome) => outcome,
                            Err(mailbox_error) => {
                                tracing::error!(%id, "mailbox error: {mailbox_error}");
                                Outcome::failed_message(format!(
                                    "task could not be delivered: {mailbox_error}"
                                ))
                            }
                        })
                        .await;
                    comms
                        .send(RunEvent::finished(id.as_str(), outcome.clone()))
                        .await;
                    drop(_permit);
                    TaskReport::new(id, outcome)
                }
            });
            jhs.push((id, jh));
        }

        let mut reports = Vec::with_capacity(jhs.len());
        for (id, jh) in jhs {
            match jh.await {
                Ok(report) => reports.push(report),
                // a panicking action still accounts for exactly one outcome
                Err(join_error) => {
                    tracing::error!(%id, "task execution panicked: {join_error}");
                    reports.push(TaskReport::new(
                        id,
                        Outcome::failed_message(format!("task panicked: {join_error}")),
                    ));
                }
            }
        }

        Ok(RunReport::from_reports(reports))
    }
}
