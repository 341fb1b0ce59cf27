use crate::invocation::Invocation;
use actix::Recipient;
use std::fmt::{Display, Formatter};

/// Conversion seam between "a description of work" and "a running actor that
/// will accept exactly one [`Invocation`]".
///
/// Implementors are consumed by the conversion, which is what makes a task's
/// action callable exactly once.
pub trait AsTask: std::fmt::Debug {
    fn into_recipient(self: Box<Self>) -> Recipient<Invocation>;
}

/// One independently schedulable, fallible unit of work, paired with a stable
/// identifier for reporting.
///
/// Different task types (e.g. a grammar build, a stub in tests) are boxed
/// behind [`AsTask`] so a `Vec<TaskEntry>` can hold a mixed batch and the
/// runner can treat them uniformly.
#[derive(Debug)]
pub struct TaskEntry {
    id: String,
    task: Box<dyn AsTask>,
}

impl TaskEntry {
    pub fn new(id: impl Into<String>, task: Box<dyn AsTask>) -> Self {
        Self {
            id: id.into(),
            task,
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn into_recipient(self) -> Recipient<Invocation> {
        self.task.into_recipient()
    }
}

impl Display for TaskEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaskEntry({})", self.id)
    }
}
