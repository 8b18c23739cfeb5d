use super::types::{ErrorReport, StepReport, TestReport};
use crate::error::{HarnessError, HarnessResult};
use crate::runner::state::StepStatus;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML with one testcase per executed step
pub fn generate_junit_xml(report: &TestReport) -> HarnessResult<String> {
    write_xml(report).map_err(HarnessError::reporting)
}

fn write_xml(report: &TestReport) -> anyhow::Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    // Errors raised outside any step (browser launch) still fail the suite
    let unstepped: Vec<&ErrorReport> = report
        .errors
        .iter()
        .filter(|e| !report.steps.iter().any(|s| s.name == e.step))
        .collect();

    let tests = (report.summary.total as usize + unstepped.len()).to_string();
    let failures = (report.summary.failed as usize + unstepped.len()).to_string();
    let time = seconds(report.duration_ms);

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "parabank-e2e"));
    suites_start.push_attribute(("tests", tests.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", report.description.as_str()));
    suite_start.push_attribute(("id", report.case_id.as_str()));
    suite_start.push_attribute(("tests", tests.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", "0"));
    suite_start.push_attribute(("time", time.as_str()));
    suite_start.push_attribute(("timestamp", report.start_time.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for error in &unstepped {
        write_error_case(&mut writer, &report.case_id, error)?;
    }
    for step in &report.steps {
        write_test_case(&mut writer, &report.case_id, step)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    classname: &str,
    step: &StepReport,
) -> anyhow::Result<()> {
    let time = seconds(step.duration_ms);
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", step.name.as_str()));
    case_start.push_attribute(("classname", classname));
    case_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(case_start))?;

    if step.status == StepStatus::Failed {
        let message = step.error.as_deref().unwrap_or("Unknown error");
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", message));
        fail_start.push_attribute(("type", "StepFailure"));
        writer.write_event(Event::Start(fail_start))?;
        writer.write_event(Event::Text(BytesText::new(message)))?;
        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

fn write_error_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    classname: &str,
    error: &ErrorReport,
) -> anyhow::Result<()> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", error.step.as_str()));
    case_start.push_attribute(("classname", classname));
    case_start.push_attribute(("time", "0.000"));
    writer.write_event(Event::Start(case_start))?;

    let mut fail_start = BytesStart::new("failure");
    fail_start.push_attribute(("message", error.message.as_str()));
    fail_start.push_attribute(("type", "SetupFailure"));
    writer.write_event(Event::Start(fail_start))?;
    writer.write_event(Event::Text(BytesText::new(&error.message)))?;
    writer.write_event(Event::End(BytesEnd::new("failure")))?;

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

fn seconds(ms: u64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

/// Write `junit.xml` into the given path
pub fn write_report(report: &TestReport, path: &Path) -> HarnessResult<()> {
    let xml = generate_junit_xml(report)?;
    std::fs::write(path, xml)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{StepRecord, TestResult, TestStatus};

    #[test]
    fn test_generate_junit_xml() {
        let mut result = TestResult::new();
        result.record_step(StepRecord::passed("Navigate to ParaBank", 1500));
        result.record_step(StepRecord::failed(
            "Open registration page",
            2000,
            "Element not found".into(),
        ));
        result.record_error("Open registration page", "Element not found");
        result.finish(TestStatus::Failed);

        let xml = generate_junit_xml(&result.to_report()).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="parabank-e2e""#));
        assert!(xml.contains(r#"tests="2""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"<testcase name="Navigate to ParaBank" classname="TC-REG-001" time="1.500""#));
        assert!(xml.contains(r#"message="Element not found""#));
    }

    #[test]
    fn test_error_outside_steps_counts_as_failure() {
        let mut result = TestResult::new();
        result.record_error("Launch browser", "browser launch failed: no browser installed");
        result.finish(TestStatus::Failed);

        let xml = generate_junit_xml(&result.to_report()).unwrap();

        assert!(xml.contains(r#"<testsuites name="parabank-e2e" tests="1" failures="1""#));
        assert!(xml.contains(r#"<testcase name="Launch browser""#));
        assert!(xml.contains("no browser installed"));
    }

    #[test]
    fn test_step_errors_not_duplicated() {
        let mut result = TestResult::new();
        result.record_step(StepRecord::failed("Navigate to ParaBank", 10, "boom".into()));
        result.record_error("Navigate to ParaBank", "boom");
        result.finish(TestStatus::Failed);

        let xml = generate_junit_xml(&result.to_report()).unwrap();
        assert!(xml.contains(r#"tests="1" failures="1""#));
        assert_eq!(xml.matches("<testcase ").count(), 1);
    }
}
