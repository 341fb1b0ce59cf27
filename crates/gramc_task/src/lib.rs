pub mod comms;
pub mod invocation;
pub mod outcome;
pub mod report;
pub mod runner;
pub mod task;

/// Options controlling how a batch of tasks is executed.
///
/// The single knob is `max_concurrent` - the ceiling on how many task
/// actions may be in flight at the same time. A slot is handed to the next
/// pending task the moment any in-flight task completes, so unequal task
/// durations never leave capacity idle.
///
/// A limit of `1` degrades to strictly sequential execution. A limit of `0`
/// is rejected by [`runner::BoundedRunner::run`] before any task starts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunnerOpts {
    max_concurrent: usize,
}

impl RunnerOpts {
    pub fn new(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

impl Default for RunnerOpts {
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            max_concurrent: cores,
        }
    }
}
