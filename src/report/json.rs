use super::types::TestReport;
use crate::error::HarnessResult;
use std::path::Path;

/// Write the JSON report, or print it when no output is given
pub fn generate(report: &TestReport, output: Option<&Path>) -> HarnessResult<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output {
        std::fs::write(path, json)?;
    } else {
        println!("{}", json);
    }

    Ok(())
}
