//! The registration scenario: five recorded steps against one page

use std::path::PathBuf;

use super::data::{generate_username, TestData};
use super::events::TestEvent;
use super::executor::StepExecutor;
use super::state::{TestResult, TestStatus};
use super::verify::verify_outcome;
use crate::driver::{BrowserPage, LoadState};
use crate::error::{HarnessError, HarnessResult};
use crate::utils::config::{HarnessConfig, ScenarioConfig};

pub const STEP_NAVIGATE: &str = "Navigate to ParaBank";
pub const STEP_OPEN_REGISTRATION: &str = "Open registration page";
pub const STEP_FILL_FORM: &str = "Fill registration form";
pub const STEP_SUBMIT: &str = "Submit registration";
pub const STEP_VERIFY: &str = "Verify registration";

pub const DEBUG_SCREENSHOT: &str = "debug-screenshot.png";
pub const FAILURE_SCREENSHOT: &str = "failure-screenshot.png";

pub struct RegistrationScenario {
    config: ScenarioConfig,
    data: TestData,
    debug_screenshot: PathBuf,
    failure_screenshot: PathBuf,
    executor: StepExecutor,
    result: TestResult,
}

impl RegistrationScenario {
    pub fn new(config: &HarnessConfig, executor: StepExecutor) -> Self {
        let username = generate_username();
        let data = if config.fake_data {
            TestData::fake(&username)
        } else {
            TestData::fixed(&username)
        };
        Self::with_data(config, executor, data)
    }

    pub fn with_data(config: &HarnessConfig, executor: StepExecutor, data: TestData) -> Self {
        let mut result = TestResult::new();
        result.generated_username = data.username.clone();

        Self {
            config: config.scenario.clone(),
            data,
            debug_screenshot: config.report_path(DEBUG_SCREENSHOT),
            failure_screenshot: config.report_path(FAILURE_SCREENSHOT),
            executor,
            result,
        }
    }

    pub fn result(&self) -> &TestResult {
        &self.result
    }

    pub fn into_result(self) -> TestResult {
        self.result
    }

    /// Run every step in order, stopping at the first failure
    ///
    /// The result is finalized either way; on failure a full-page screenshot
    /// is attempted before the error is returned.
    pub async fn run(&mut self, page: &dyn BrowserPage) -> HarnessResult<()> {
        self.executor.emitter().emit(TestEvent::ScenarioStarted {
            case_id: self.result.case_id.clone(),
            description: self.result.description.clone(),
        });
        self.executor
            .emitter()
            .log(format!("Generated username: {}", self.data.username));

        match self.run_steps(page).await {
            Ok(()) => {
                self.result.finish(TestStatus::Passed);
                Ok(())
            }
            Err(err) => {
                self.capture_failure(page).await;
                self.result.finish(TestStatus::Failed);
                Err(err)
            }
        }
    }

    async fn run_steps(&mut self, page: &dyn BrowserPage) -> HarnessResult<()> {
        let config = &self.config;
        let data = &self.data;

        self.executor
            .execute(&mut self.result, STEP_NAVIGATE, || navigate(page, config))
            .await?;

        self.executor
            .execute(&mut self.result, STEP_OPEN_REGISTRATION, || {
                open_registration(page, config)
            })
            .await?;

        self.executor
            .execute(&mut self.result, STEP_FILL_FORM, || {
                fill_form(page, config, data)
            })
            .await?;

        self.executor
            .execute(&mut self.result, STEP_SUBMIT, || submit(page, config))
            .await?;

        let debug = &self.debug_screenshot;
        let indicator = self
            .executor
            .execute(&mut self.result, STEP_VERIFY, || {
                verify_outcome(page, config, debug)
            })
            .await?;

        self.executor
            .emitter()
            .log(format!("Registration confirmed by '{}'", indicator));
        Ok(())
    }

    async fn capture_failure(&self, page: &dyn BrowserPage) {
        match page.screenshot(&self.failure_screenshot, true).await {
            Ok(()) => self.executor.emitter().log(format!(
                "Saved failure screenshot: {}",
                self.failure_screenshot.display()
            )),
            Err(e) => log::warn!("failed to capture failure screenshot: {}", e),
        }
    }
}

async fn navigate(page: &dyn BrowserPage, config: &ScenarioConfig) -> HarnessResult<()> {
    page.goto(
        &config.base_url,
        LoadState::NetworkIdle,
        config.timeouts.navigation_ms,
    )
    .await
    .map_err(HarnessError::navigation)?;

    let title = page.title().await.map_err(HarnessError::navigation)?;
    if !title.contains(&config.expected_title) {
        return Err(HarnessError::Navigation(format!(
            "page title '{}' does not contain '{}'",
            title, config.expected_title
        )));
    }
    Ok(())
}

async fn open_registration(page: &dyn BrowserPage, config: &ScenarioConfig) -> HarnessResult<()> {
    page.click(&config.register_link, config.timeouts.action_ms)
        .await
        .map_err(HarnessError::interaction)?;

    page.wait_for_url(&config.register_url_pattern, config.timeouts.url_ms)
        .await
        .map_err(HarnessError::interaction)
}

async fn fill_form(
    page: &dyn BrowserPage,
    config: &ScenarioConfig,
    data: &TestData,
) -> HarnessResult<()> {
    let form = &config.form;
    let fields = [
        (&form.first_name, &data.first_name),
        (&form.last_name, &data.last_name),
        (&form.street, &data.street),
        (&form.city, &data.city),
        (&form.state, &data.state),
        (&form.zip_code, &data.zip_code),
        (&form.phone, &data.phone),
        (&form.ssn, &data.ssn),
        (&form.username, &data.username),
        (&form.password, &data.password),
        (&form.repeated_password, &data.password),
    ];

    for (selector, value) in fields {
        page.fill(selector, value, config.timeouts.action_ms)
            .await
            .map_err(HarnessError::interaction)?;
    }

    // Catch fills that report success but never reach the input
    let written = page
        .input_value(&form.username)
        .await
        .map_err(HarnessError::interaction)?;
    if written != data.username {
        return Err(HarnessError::Interaction(format!(
            "username field holds '{}' instead of '{}'",
            written, data.username
        )));
    }
    Ok(())
}

async fn submit(page: &dyn BrowserPage, config: &ScenarioConfig) -> HarnessResult<()> {
    page.click(&config.submit_button, config.timeouts.action_ms)
        .await
        .map_err(HarnessError::interaction)?;

    page.wait_for_load_state(LoadState::NetworkIdle, config.timeouts.load_state_ms)
        .await
        .map_err(HarnessError::interaction)
}
