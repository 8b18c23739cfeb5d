pub mod html;
pub mod json;
pub mod junit;
pub mod types;

use crate::error::{HarnessError, HarnessResult};
use crate::runner::state::TestResult;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const HTML_REPORT: &str = "test-execution-report.html";
pub const JSON_REPORT: &str = "test-results.json";
pub const JUNIT_REPORT: &str = "junit.xml";

/// Where the artifacts of one run ended up
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPaths {
    pub html: PathBuf,
    pub json: PathBuf,
    pub junit: Option<PathBuf>,
}

/// Render a finalized result into the reports directory
///
/// Works for any status, since it also runs on the failure path.
pub fn generate_reports(
    result: &TestResult,
    reports_dir: &Path,
    junit: bool,
) -> HarnessResult<ReportPaths> {
    std::fs::create_dir_all(reports_dir).map_err(|e| {
        HarnessError::Reporting(format!("cannot create {}: {}", reports_dir.display(), e))
    })?;

    let report = result.to_report();
    let paths = ReportPaths {
        html: reports_dir.join(HTML_REPORT),
        json: reports_dir.join(JSON_REPORT),
        junit: junit.then(|| reports_dir.join(JUNIT_REPORT)),
    };

    html::generate(&report, Some(&paths.html)).map_err(into_reporting)?;
    json::generate(&report, Some(&paths.json)).map_err(into_reporting)?;
    if let Some(ref path) = paths.junit {
        junit::write_report(&report, path).map_err(into_reporting)?;
    }

    log::debug!("reports written to {}", reports_dir.display());
    Ok(paths)
}

fn into_reporting(err: HarnessError) -> HarnessError {
    match err {
        HarnessError::Reporting(_) => err,
        other => HarnessError::Reporting(other.to_string()),
    }
}

/// Re-render a saved `test-results.json`
pub fn render_from_file(results_path: &Path, format: &str, output: Option<&Path>) -> Result<()> {
    let results = std::fs::read_to_string(results_path)?;
    let report: types::TestReport = serde_json::from_str(&results)?;

    match format {
        "json" => json::generate(&report, output)?,
        "html" => html::generate(&report, output)?,
        "junit" => match output {
            Some(path) => junit::write_report(&report, path)?,
            None => println!("{}", junit::generate_junit_xml(&report)?),
        },
        _ => anyhow::bail!("Unknown format: {}", format),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{StepRecord, TestStatus};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("parabank-e2e-{}", uuid::Uuid::new_v4()))
    }

    fn failed_result() -> TestResult {
        let mut result = TestResult::new();
        result.generated_username = "user777xyz".into();
        result.record_step(StepRecord::passed("Navigate to ParaBank", 900));
        result.record_step(StepRecord::failed(
            "Open registration page",
            40,
            "interaction failed: timeout".into(),
        ));
        result.record_error("Open registration page", "interaction failed: timeout");
        result.finish(TestStatus::Failed);
        result
    }

    #[test]
    fn test_creates_directory_and_writes_both() {
        let dir = temp_dir().join("nested");
        let paths = generate_reports(&failed_result(), &dir, false).unwrap();

        assert_eq!(paths.html, dir.join(HTML_REPORT));
        assert!(paths.junit.is_none());
        let html = std::fs::read_to_string(&paths.html).unwrap();
        assert!(html.contains("Error Details"));
        assert!(html.contains("user777xyz"));

        let report: types::TestReport =
            serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(report.status, TestStatus::Failed);
        assert_eq!(report.summary.total as usize, report.steps.len());
        assert_eq!(report.summary.passed + report.summary.failed, report.summary.total);

        std::fs::remove_dir_all(dir.parent().unwrap()).ok();
    }

    #[test]
    fn test_junit_written_when_requested() {
        let dir = temp_dir();
        let paths = generate_reports(&failed_result(), &dir, true).unwrap();
        let junit = paths.junit.unwrap();
        assert!(std::fs::read_to_string(junit).unwrap().contains("<testsuites"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_dir_is_reporting_error() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the reports directory should be
        let blocker = dir.join("reports");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = generate_reports(&TestResult::new(), &blocker, false).unwrap_err();
        assert!(matches!(err, HarnessError::Reporting(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_render_from_saved_json() {
        let dir = temp_dir();
        let paths = generate_reports(&failed_result(), &dir, false).unwrap();
        let out = dir.join("again.html");

        render_from_file(&paths.json, "html", Some(&out)).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().contains("FAILED"));
        assert!(render_from_file(&paths.json, "pdf", None).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }
}
