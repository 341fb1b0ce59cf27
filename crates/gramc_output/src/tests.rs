use crate::pretty::PrettyPrint;
use crate::{json::JsonPrint, OutputWriter};
use gramc_task::comms::RunEvent;
use gramc_task::outcome::Outcome;
use gramc_task::report::{RunReport, TaskReport};
use std::io::BufWriter;

fn exec_event(writer: &impl OutputWriter, evt: &RunEvent) -> anyhow::Result<String> {
    let mut sink = BufWriter::new(Vec::new());
    writer.handle_run_event(&mut sink, evt)?;
    Ok(String::from_utf8(sink.into_inner()?).unwrap())
}

fn exec_report(writer: &impl OutputWriter, report: &RunReport) -> anyhow::Result<String> {
    let mut sink = BufWriter::new(Vec::new());
    writer.handle_report(&mut sink, report)?;
    Ok(String::from_utf8(sink.into_inner()?).unwrap())
}

#[test]
fn pretty_lifecycle_events() -> anyhow::Result<()> {
    let started = exec_event(&PrettyPrint, &RunEvent::started("tree-sitter-css"))?;
    assert_eq!(started, "[gramc] ⏳ building tree-sitter-css\n");

    let finished = exec_event(
        &PrettyPrint,
        &RunEvent::finished("tree-sitter-css", Outcome::success()),
    )?;
    assert_eq!(finished, "[gramc] ✅ finished tree-sitter-css\n");

    let failed = exec_event(
        &PrettyPrint,
        &RunEvent::finished("tree-sitter-css", Outcome::failed_code(2)),
    )?;
    assert_eq!(
        failed,
        "[gramc] 🔥 failed tree-sitter-css: exited with code 2\n"
    );
    Ok(())
}

#[test]
fn pretty_output_lines_carry_their_prefix() -> anyhow::Result<()> {
    let line = exec_event(
        &PrettyPrint,
        &RunEvent::stdout_line("compiling...", Some("tree-sitter-css".to_string())),
    )?;
    assert_eq!(line, "[tree-sitter-css] compiling...\n");

    let bare = exec_event(&PrettyPrint, &RunEvent::stderr_line("warning", None))?;
    assert_eq!(bare, "warning\n");
    Ok(())
}

#[test]
fn pretty_report_summarises_failures() -> anyhow::Result<()> {
    let report = RunReport::from_reports(vec![
        TaskReport::new("a", Outcome::failed_message("x")),
        TaskReport::new("b", Outcome::success()),
        TaskReport::new("c", Outcome::failed_message("y")),
        TaskReport::new("d", Outcome::success()),
    ]);
    let actual = exec_report(&PrettyPrint, &report)?;
    insta::assert_snapshot!(actual, @r"
    [gramc] 4 builds, 2 failed
    [gramc]   🔥 a: x
    [gramc]   🔥 c: y
    ");
    Ok(())
}

#[test]
fn pretty_report_all_good() -> anyhow::Result<()> {
    let report = RunReport::from_reports(vec![TaskReport::new("a", Outcome::success())]);
    let actual = exec_report(&PrettyPrint, &report)?;
    assert_eq!(actual, "[gramc] 1 builds, all good ✅\n");
    Ok(())
}

#[test]
fn json_events_are_newline_delimited_objects() -> anyhow::Result<()> {
    let line = exec_event(
        &JsonPrint,
        &RunEvent::finished("a", Outcome::failed_message("x")),
    )?;
    let value: serde_json::Value = serde_json::from_str(line.trim_end())?;
    assert_eq!(value["kind"], "taskFinished");
    assert_eq!(value["id"], "a");
    assert_eq!(value["outcome"]["kind"], "failure");
    assert_eq!(value["outcome"]["error"]["message"], "x");
    Ok(())
}

#[test]
fn json_report_carries_the_failure_flag() -> anyhow::Result<()> {
    let report = RunReport::from_reports(vec![
        TaskReport::new("a", Outcome::success()),
        TaskReport::new("b", Outcome::failed_code(1)),
    ]);
    let raw = exec_report(&JsonPrint, &report)?;
    let value: serde_json::Value = serde_json::from_str(raw.trim_end())?;
    assert_eq!(value["has_failures"], true);
    assert_eq!(value["results"].as_array().unwrap().len(), 2);
    Ok(())
}
