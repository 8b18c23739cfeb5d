use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessConfig {
    /// Scenario target, selectors and waits
    pub scenario: ScenarioConfig,

    /// Directory for reports and screenshots
    pub reports_dir: PathBuf,

    /// Also write `junit.xml`
    pub junit: bool,

    /// Randomize customer details instead of the fixed set
    pub fake_data: bool,

    /// Browser engine: chromium, firefox or webkit
    pub browser: String,

    pub headless: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        let headless = std::env::var("PARABANK_HEADLESS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self {
            scenario: ScenarioConfig::default(),
            reports_dir: PathBuf::from("reports"),
            junit: false,
            fake_data: false,
            browser: "chromium".to_string(),
            headless,
        }
    }
}

impl HarnessConfig {
    /// Load from an optional YAML file, then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("Invalid config: {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(url) = std::env::var("PARABANK_BASE_URL") {
            config.scenario.base_url = url;
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn report_path(&self, filename: &str) -> PathBuf {
        self.reports_dir.join(filename)
    }
}

/// What the registration scenario targets and how long it waits
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub base_url: String,

    /// Substring the landing page title must contain
    pub expected_title: String,

    pub register_link: String,

    /// Glob or `/regex/` the URL must match after opening registration
    pub register_url_pattern: String,

    pub form: FormSelectors,

    pub submit_button: String,

    /// Checked in order; the first that appears wins
    pub success_indicators: Vec<String>,

    /// Inspected when no success indicator appears
    pub error_indicators: Vec<String>,

    pub timeouts: Timeouts,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            base_url: "https://parabank.parasoft.com/parabank/index.htm".to_string(),
            expected_title: "ParaBank".to_string(),
            register_link: "a[href*='register.htm']".to_string(),
            register_url_pattern: "**/register.htm*".to_string(),
            form: FormSelectors::default(),
            submit_button: "input[type='submit'][value='Register']".to_string(),
            success_indicators: vec![
                "text=Your account was created successfully".to_string(),
                "#rightPanel h1.title:has-text('Welcome')".to_string(),
                "a[href*='logout.htm']".to_string(),
            ],
            error_indicators: vec![
                "span.error".to_string(),
                "p.error".to_string(),
                ".error".to_string(),
            ],
            timeouts: Timeouts::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSelectors {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub ssn: String,
    pub username: String,
    pub password: String,
    pub repeated_password: String,
}

impl Default for FormSelectors {
    fn default() -> Self {
        let field = |name: &str| format!("input[name='{}']", name);
        Self {
            first_name: field("customer.firstName"),
            last_name: field("customer.lastName"),
            street: field("customer.address.street"),
            city: field("customer.address.city"),
            state: field("customer.address.state"),
            zip_code: field("customer.address.zipCode"),
            phone: field("customer.phoneNumber"),
            ssn: field("customer.ssn"),
            username: field("customer.username"),
            password: field("customer.password"),
            repeated_password: field("repeatedPassword"),
        }
    }
}

/// Wait limits in milliseconds
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timeouts {
    pub navigation_ms: u64,
    pub action_ms: u64,
    pub url_ms: u64,
    pub load_state_ms: u64,
    /// Per success indicator
    pub indicator_ms: u64,
    /// Total across all success indicators
    pub verification_budget_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 30_000,
            action_ms: 10_000,
            url_ms: 10_000,
            load_state_ms: 15_000,
            indicator_ms: 5_000,
            verification_budget_ms: 20_000,
        }
    }
}
