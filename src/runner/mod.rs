pub mod data;
pub mod events;
pub mod executor;
pub mod scenario;
pub mod state;
pub mod verify;

use colored::Colorize;

use crate::driver::BrowserPage;
use crate::error::HarnessError;
use crate::report::{generate_reports, ReportPaths};
use crate::utils::config::HarnessConfig;

pub use events::*;
pub use state::*;

/// Step name recorded when the browser never came up
pub const LAUNCH_STEP: &str = "Launch browser";

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub result: TestResult,
    pub reports: Option<ReportPaths>,
    /// The error that ended the scenario, if any
    pub error: Option<HarnessError>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.result.status == TestStatus::Passed && self.error.is_none() {
            0
        } else {
            1
        }
    }
}

/// Run the registration scenario end to end
///
/// Takes the outcome of launching the browser so a launch failure still
/// yields a failed result and reports. The page is closed exactly once when
/// it was opened; close and report failures are logged, never raised.
pub async fn run_scenario(
    config: &HarnessConfig,
    launched: anyhow::Result<Box<dyn BrowserPage>>,
) -> RunOutcome {
    let (emitter, receiver) = EventEmitter::new();
    let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

    let (result, error) = match launched {
        Ok(page) => {
            let mut scenario = scenario::RegistrationScenario::new(
                config,
                executor::StepExecutor::new(emitter.clone()),
            );
            let outcome = scenario.run(page.as_ref()).await;

            if let Err(e) = page.close().await {
                log::warn!("failed to close browser: {}", e);
            }
            (scenario.into_result(), outcome.err())
        }
        Err(e) => {
            let err = HarnessError::Launch(format!("{:#}", e));
            let mut result = TestResult::new();
            result.record_error(LAUNCH_STEP, &err.to_string());
            result.finish(TestStatus::Failed);
            emitter.log(format!("{} {}", "❌".red(), err));
            (result, Some(err))
        }
    };

    emitter.emit(TestEvent::ScenarioFinished {
        status: result.status,
        summary: result.summary(),
        duration_ms: result.total_duration_ms(),
    });

    // Let the listener drain before anything else hits stdout
    drop(emitter);
    let _ = listener.await;

    let reports = match generate_reports(&result, &config.reports_dir, config.junit) {
        Ok(paths) => {
            println!(
                "\n{} HTML report saved to: {}",
                "📊".blue(),
                paths.html.display().to_string().cyan()
            );
            println!(
                "{} JSON report saved to: {}",
                "📄".blue(),
                paths.json.display().to_string().cyan()
            );
            if let Some(ref junit) = paths.junit {
                println!(
                    "{} JUnit report saved to: {}",
                    "📄".blue(),
                    junit.display().to_string().cyan()
                );
            }
            Some(paths)
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{} {}", "⚠".yellow(), e);
            None
        }
    };

    RunOutcome {
        result,
        reports,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::fake::FakePage;
    use crate::report::{HTML_REPORT, JSON_REPORT};
    use crate::utils::config::ScenarioConfig;
    use std::path::PathBuf;

    fn config() -> HarnessConfig {
        HarnessConfig {
            reports_dir: std::env::temp_dir()
                .join(format!("parabank-e2e-{}", uuid::Uuid::new_v4())),
            ..HarnessConfig::default()
        }
    }

    fn happy_page() -> FakePage {
        let scenario = ScenarioConfig::default();
        FakePage::new("ParaBank | Welcome | Online Banking")
            .navigate_on_click(
                &scenario.register_link,
                "https://parabank.parasoft.com/parabank/register.htm",
            )
            .with_visible(&scenario.success_indicators[0])
    }

    #[tokio::test]
    async fn test_passing_run_exits_zero_and_reports() {
        let config = config();
        let page = happy_page();

        let outcome = run_scenario(&config, Ok(Box::new(page.clone()))).await;

        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.result.status, TestStatus::Passed);
        assert_eq!(outcome.result.steps().len(), 5);
        assert_eq!(page.close_count(), 1);

        let reports = outcome.reports.unwrap();
        assert_eq!(reports.html, config.reports_dir.join(HTML_REPORT));
        let html = std::fs::read_to_string(&reports.html).unwrap();
        assert!(html.contains(&outcome.result.generated_username));
        assert!(html.contains("PASSED"));
        std::fs::remove_dir_all(&config.reports_dir).ok();
    }

    #[tokio::test]
    async fn test_failing_run_still_reports_and_closes() {
        let config = config();
        let page = FakePage::new("Not the bank");

        let outcome = run_scenario(&config, Ok(Box::new(page.clone()))).await;

        assert_eq!(outcome.exit_code(), 1);
        assert!(matches!(outcome.error, Some(HarnessError::Navigation(_))));
        assert_eq!(page.close_count(), 1);
        assert!(config.reports_dir.join(JSON_REPORT).exists());
        std::fs::remove_dir_all(&config.reports_dir).ok();
    }

    #[tokio::test]
    async fn test_launch_failure_exits_non_zero() {
        let config = config();

        let outcome = run_scenario(&config, Err(anyhow::anyhow!("no browser installed"))).await;

        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.result.status, TestStatus::Failed);
        assert!(outcome.result.steps().is_empty());
        assert_eq!(outcome.result.errors().len(), 1);
        assert_eq!(outcome.result.errors()[0].step, LAUNCH_STEP);
        assert!(matches!(outcome.error, Some(HarnessError::Launch(_))));

        let html = std::fs::read_to_string(outcome.reports.unwrap().html).unwrap();
        assert!(html.contains("no browser installed"));
        std::fs::remove_dir_all(&config.reports_dir).ok();
    }

    #[tokio::test]
    async fn test_launch_failure_fails_junit_suite() {
        let config = HarnessConfig {
            junit: true,
            ..config()
        };

        let outcome = run_scenario(&config, Err(anyhow::anyhow!("no browser installed"))).await;

        let junit = outcome.reports.unwrap().junit.unwrap();
        let xml = std::fs::read_to_string(junit).unwrap();
        assert!(xml.contains(r#"failures="1""#));
        assert!(!xml.contains(r#"failures="0""#));
        assert!(xml.contains(LAUNCH_STEP));
        std::fs::remove_dir_all(&config.reports_dir).ok();
    }

    #[tokio::test]
    async fn test_close_failure_is_not_fatal() {
        let config = config();
        let page = happy_page().fail_on("close");

        let outcome = run_scenario(&config, Ok(Box::new(page.clone()))).await;

        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(page.close_count(), 1);
        std::fs::remove_dir_all(&config.reports_dir).ok();
    }

    #[tokio::test]
    async fn test_report_failure_keeps_scenario_outcome() {
        let base = std::env::temp_dir().join(format!("parabank-e2e-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&base).unwrap();
        let blocker = base.join("reports");
        std::fs::write(&blocker, "file in the way").unwrap();

        let config = HarnessConfig {
            reports_dir: PathBuf::from(&blocker),
            ..HarnessConfig::default()
        };
        let outcome = run_scenario(&config, Ok(Box::new(happy_page()))).await;

        assert!(outcome.reports.is_none());
        assert_eq!(outcome.result.status, TestStatus::Passed);
        assert_eq!(outcome.exit_code(), 0);
        std::fs::remove_dir_all(&base).ok();
    }
}
