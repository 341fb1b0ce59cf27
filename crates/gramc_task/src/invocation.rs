use crate::comms::TaskComms;
use crate::outcome::Outcome;

/// The message delivered to a task actor exactly once to run its action.
#[derive(actix::Message, Debug, Clone)]
#[rtype(result = "Outcome")]
pub struct Invocation {
    pub id: String,
    pub comms: TaskComms,
}

impl Invocation {
    pub fn new(id: impl Into<String>, comms: TaskComms) -> Self {
        Self {
            id: id.into(),
            comms,
        }
    }
}
