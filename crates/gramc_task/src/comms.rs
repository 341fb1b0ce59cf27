use crate::outcome::Outcome;
use tokio::sync::mpsc::Sender;

/// Events published while a batch runs - consumed by an output writer on the
/// other side of an mpsc channel. Lifecycle events come from the runner,
/// output lines from the task actions themselves.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunEvent {
    TaskStarted {
        id: String,
    },
    TaskFinished {
        id: String,
        outcome: Outcome,
    },
    StdoutLine {
        prefix: Option<String>,
        line: String,
    },
    StderrLine {
        prefix: Option<String>,
        line: String,
    },
}

impl RunEvent {
    pub fn started(id: impl Into<String>) -> Self {
        Self::TaskStarted { id: id.into() }
    }
    pub fn finished(id: impl Into<String>, outcome: Outcome) -> Self {
        Self::TaskFinished {
            id: id.into(),
            outcome,
        }
    }
    pub fn stdout_line(line: impl Into<String>, prefix: Option<String>) -> Self {
        Self::StdoutLine {
            prefix,
            line: line.into(),
        }
    }
    pub fn stderr_line(line: impl Into<String>, prefix: Option<String>) -> Self {
        Self::StderrLine {
            prefix,
            line: line.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskComms {
    pub event_sender: Sender<RunEvent>,
}

impl TaskComms {
    pub fn new(event_sender: Sender<RunEvent>) -> TaskComms {
        Self { event_sender }
    }

    /// Best-effort send. A closed receiver is not an error for the sender -
    /// the run carries on without an observer.
    pub async fn send(&self, evt: RunEvent) {
        match self.event_sender.send(evt).await {
            Ok(_) => tracing::trace!("did forward run event"),
            Err(_) => tracing::trace!("run event receiver gone"),
        }
    }
}
