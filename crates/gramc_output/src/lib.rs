use gramc_task::comms::RunEvent;
use gramc_task::report::RunReport;
use std::io::Write;

pub mod json;
pub mod pretty;
#[cfg(test)]
mod tests;

pub trait OutputWriter {
    fn handle_run_event<W: Write>(&self, _sink: &mut W, _evt: &RunEvent) -> anyhow::Result<()> {
        Ok(())
    }
    fn handle_report<W: Write>(&self, _sink: &mut W, _report: &RunReport) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Copy, Clone)]
pub enum Writers {
    Pretty,
    Json,
}

impl OutputWriter for Writers {
    fn handle_run_event<W: Write>(&self, sink: &mut W, evt: &RunEvent) -> anyhow::Result<()> {
        match self {
            Writers::Pretty => pretty::PrettyPrint.handle_run_event(sink, evt),
            Writers::Json => json::JsonPrint.handle_run_event(sink, evt),
        }
    }
    fn handle_report<W: Write>(&self, sink: &mut W, report: &RunReport) -> anyhow::Result<()> {
        match self {
            Writers::Pretty => pretty::PrettyPrint.handle_report(sink, report),
            Writers::Json => json::JsonPrint.handle_report(sink, report),
        }
    }
}
