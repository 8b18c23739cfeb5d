use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::types::{ErrorReport, ReportSummary, StepReport, TestReport};

pub const CASE_ID: &str = "TC-REG-001";
pub const CASE_DESCRIPTION: &str = "Register a new customer account on ParaBank";

/// Overall outcome of the run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl TestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Passed => "PASSED",
            TestStatus::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum StepStatus {
    Passed,
    Failed,
}

/// One executed step, immutable once recorded
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub error: Option<String>,
}

impl StepRecord {
    pub fn passed(name: &str, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Passed,
            duration_ms,
            timestamp: Utc::now(),
            error: None,
        }
    }

    pub fn failed(name: &str, duration_ms: u64, error: String) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Failed,
            duration_ms,
            timestamp: Utc::now(),
            error: Some(error),
        }
    }

    fn to_report(&self) -> StepReport {
        StepReport {
            name: self.name.clone(),
            status: self.status,
            duration_ms: self.duration_ms,
            timestamp: self.timestamp.to_rfc3339(),
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub step: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// State of the single registration run
///
/// Steps and errors are append-only; the only way in is through
/// [`TestResult::record_step`] and [`TestResult::record_error`].
#[derive(Debug, Clone)]
pub struct TestResult {
    pub case_id: String,
    pub description: String,
    pub run_id: String,
    pub status: TestStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub generated_username: String,
    steps: Vec<StepRecord>,
    errors: Vec<ErrorRecord>,
}

impl TestResult {
    pub fn new() -> Self {
        Self {
            case_id: CASE_ID.to_string(),
            description: CASE_DESCRIPTION.to_string(),
            run_id: uuid::Uuid::new_v4().to_string(),
            status: TestStatus::Pending,
            start_time: Utc::now(),
            end_time: None,
            generated_username: String::new(),
            steps: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn record_step(&mut self, step: StepRecord) {
        self.steps.push(step);
    }

    pub fn record_error(&mut self, step: &str, message: &str) {
        self.errors.push(ErrorRecord {
            step: step.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Finalize status and stamp the end time
    pub fn finish(&mut self, status: TestStatus) {
        self.status = status;
        self.end_time = Some(Utc::now());
    }

    /// Sum of recorded step durations
    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }

    pub fn summary(&self) -> ReportSummary {
        let (passed, failed) = self
            .steps
            .iter()
            .fold((0, 0), |(p, f), step| match step.status {
                StepStatus::Passed => (p + 1, f),
                StepStatus::Failed => (p, f + 1),
            });

        ReportSummary {
            total: self.steps.len() as u32,
            passed,
            failed,
        }
    }

    /// Serialize state for reporting
    pub fn to_report(&self) -> TestReport {
        TestReport {
            run_id: self.run_id.clone(),
            case_id: self.case_id.clone(),
            description: self.description.clone(),
            status: self.status,
            start_time: self.start_time.to_rfc3339(),
            end_time: self.end_time.map(|t| t.to_rfc3339()),
            duration_ms: self.total_duration_ms(),
            username: self.generated_username.clone(),
            steps: self.steps.iter().map(StepRecord::to_report).collect(),
            errors: self
                .errors
                .iter()
                .map(|e| ErrorReport {
                    step: e.step.clone(),
                    message: e.message.clone(),
                    timestamp: e.timestamp.to_rfc3339(),
                })
                .collect(),
            summary: self.summary(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

impl Default for TestResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_is_pending() {
        let result = TestResult::new();
        assert_eq!(result.status, TestStatus::Pending);
        assert_eq!(result.case_id, CASE_ID);
        assert!(result.end_time.is_none());
        assert!(result.steps().is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let mut result = TestResult::new();
        result.record_step(StepRecord::passed("Navigate", 120));
        result.record_step(StepRecord::passed("Open", 80));
        result.record_step(StepRecord::failed("Fill", 40, "boom".into()));
        result.record_error("Fill", "boom");
        result.finish(TestStatus::Failed);

        let summary = result.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(result.total_duration_ms(), 240);
        assert!(result.end_time.unwrap() >= result.start_time);
    }

    #[test]
    fn test_report_serializes_uppercase_status() {
        let mut result = TestResult::new();
        result.generated_username = "user12345a".into();
        result.record_step(StepRecord::passed("Navigate", 10));
        result.finish(TestStatus::Passed);

        let json = serde_json::to_value(result.to_report()).unwrap();
        assert_eq!(json["status"], "PASSED");
        assert_eq!(json["steps"][0]["status"], "PASSED");
        assert_eq!(json["username"], "user12345a");
        assert_eq!(json["summary"]["total"], 1);
    }
}
