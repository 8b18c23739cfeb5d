use crate::runner::state::{StepStatus, TestStatus};
use serde::{Deserialize, Serialize};

/// Serializable view of a finalized run, written as `test-results.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub run_id: String,
    pub case_id: String,
    pub description: String,
    pub status: TestStatus,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_ms: u64,
    pub username: String,
    pub steps: Vec<StepReport>,
    pub errors: Vec<ErrorReport>,
    pub summary: ReportSummary,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub name: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub step: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
}
