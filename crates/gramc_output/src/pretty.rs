use crate::OutputWriter;
use gramc_task::comms::RunEvent;
use gramc_task::report::RunReport;
use std::io::Write;

const PREFIX: &str = "[gramc]";

pub struct PrettyPrint;

impl OutputWriter for PrettyPrint {
    fn handle_run_event<W: Write>(&self, sink: &mut W, evt: &RunEvent) -> anyhow::Result<()> {
        match evt {
            RunEvent::TaskStarted { id } => writeln!(sink, "{PREFIX} ⏳ building {id}")?,
            RunEvent::TaskFinished { id, outcome } if outcome.is_ok() => {
                writeln!(sink, "{PREFIX} ✅ finished {id}")?
            }
            RunEvent::TaskFinished { id, outcome } => {
                let reason = outcome.reason().unwrap_or_default();
                writeln!(sink, "{PREFIX} 🔥 failed {id}: {reason}")?
            }
            RunEvent::StdoutLine { prefix, line } => print_line(sink, prefix, line)?,
            RunEvent::StderrLine { prefix, line } => print_line(sink, prefix, line)?,
        }
        Ok(())
    }

    fn handle_report<W: Write>(&self, sink: &mut W, report: &RunReport) -> anyhow::Result<()> {
        let failed = report.failed().count();
        if failed == 0 {
            writeln!(sink, "{PREFIX} {} builds, all good ✅", report.len())?;
            return Ok(());
        }
        writeln!(sink, "{PREFIX} {} builds, {failed} failed", report.len())?;
        for task_report in report.failed() {
            let reason = task_report.outcome().reason().unwrap_or_default();
            writeln!(sink, "{PREFIX}   🔥 {}: {reason}", task_report.id())?;
        }
        Ok(())
    }
}

fn print_line<W: Write>(sink: &mut W, prefix: &Option<String>, line: &str) -> std::io::Result<()> {
    match prefix {
        Some(prefix) => writeln!(sink, "[{prefix}] {line}"),
        None => writeln!(sink, "{line}"),
    }
}
