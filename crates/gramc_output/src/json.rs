use crate::OutputWriter;
use gramc_task::comms::RunEvent;
use gramc_task::report::RunReport;
use std::io::Write;

/// Newline-delimited JSON, one object per event, one for the final report.
pub struct JsonPrint;

impl OutputWriter for JsonPrint {
    fn handle_run_event<W: Write>(&self, sink: &mut W, evt: &RunEvent) -> anyhow::Result<()> {
        writeln!(sink, "{}", serde_json::to_string(&evt)?)
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
    fn handle_report<W: Write>(&self, sink: &mut W, report: &RunReport) -> anyhow::Result<()> {
        writeln!(sink, "{}", serde_json::to_string(&report)?)
            .map_err(|e| anyhow::anyhow!(e.to_string()))
    }
}
