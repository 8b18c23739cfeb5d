//! Web Driver implementation using Playwright
//!
//! Drives a single browser page for the registration scenario.

use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::Colorize;
use playwright::api::{Browser, BrowserContext, DocumentLoadState, Page, Viewport};
use playwright::Playwright;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::driver::traits::{url_pattern_to_regex, BrowserPage, LoadState};

/// Polling interval for URL and ready-state waits
const POLL_INTERVAL_MS: u64 = 100;

/// Quiet period after `readyState == complete` standing in for network idle
const NETWORK_SETTLE_MS: u64 = 500;

/// Web browser type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowserType {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl BrowserType {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "firefox" => BrowserType::Firefox,
            "webkit" | "safari" => BrowserType::Webkit,
            _ => BrowserType::Chromium,
        }
    }
}

/// Web Driver configuration
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        let headless = std::env::var("PARABANK_HEADLESS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        Self {
            browser_type: BrowserType::Chromium,
            headless,
            viewport_width: 1280,
            viewport_height: 720,
        }
    }
}

/// Web Driver using Playwright
pub struct WebDriver {
    #[allow(dead_code)]
    playwright: Arc<Playwright>,
    browser: Arc<Browser>,
    #[allow(dead_code)]
    context: Arc<BrowserContext>,
    page: Arc<Mutex<Page>>,
}

impl WebDriver {
    /// Launch a browser and open one page
    pub async fn new(config: WebDriverConfig) -> Result<Self> {
        let playwright = Playwright::initialize()
            .await
            .context("Failed to initialize Playwright")?;

        let browser = match config.browser_type {
            BrowserType::Chromium => launch_chromium_browser(&playwright.chromium(), &config).await?,
            BrowserType::Firefox => {
                playwright
                    .firefox()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
            BrowserType::Webkit => {
                playwright
                    .webkit()
                    .launcher()
                    .headless(config.headless)
                    .launch()
                    .await?
            }
        };

        let context = browser.context_builder().build().await?;
        let page = context.new_page().await?;

        page.set_viewport_size(Viewport {
            width: config.viewport_width as i32,
            height: config.viewport_height as i32,
        })
        .await?;

        log::debug!(
            "launched {:?} (headless: {}) at {}x{}",
            config.browser_type,
            config.headless,
            config.viewport_width,
            config.viewport_height
        );

        Ok(Self {
            playwright: Arc::new(playwright),
            browser: Arc::new(browser),
            context: Arc::new(context),
            page: Arc::new(Mutex::new(page)),
        })
    }

    async fn ready_state(&self) -> Result<String> {
        let page = self.page.lock().await;
        let state: String = page
            .evaluate::<(), String>("() => document.readyState", ())
            .await?;
        Ok(state)
    }
}

#[async_trait]
impl BrowserPage for WebDriver {
    async fn goto(&self, url: &str, wait_until: LoadState, timeout_ms: u64) -> Result<()> {
        let page = self.page.lock().await;
        page.goto_builder(url)
            .wait_until(to_document_load_state(wait_until))
            .timeout(timeout_ms as f64)
            .goto()
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let page = self.page.lock().await;
        let result = page
            .wait_for_selector_builder(selector)
            .timeout(timeout_ms as f64)
            .wait_for_selector()
            .await;

        Ok(result.is_ok())
    }

    async fn title(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.title().await?)
    }

    async fn url(&self) -> Result<String> {
        let page = self.page.lock().await;
        Ok(page.url()?)
    }

    async fn click(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let page = self.page.lock().await;
        match page
            .click_builder(selector)
            .timeout(timeout_ms as f64)
            .click()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                log::debug!("click failed for '{}': {:?}", selector, e);
                Err(anyhow::anyhow!("Failed to click: {}. Error: {}", selector, e))
            }
        }
    }

    async fn fill(&self, selector: &str, value: &str, timeout_ms: u64) -> Result<()> {
        let page = self.page.lock().await;
        page.fill_builder(selector, value)
            .timeout(timeout_ms as f64)
            .fill()
            .await
            .with_context(|| format!("Failed to fill: {}", selector))?;
        Ok(())
    }

    async fn input_value(&self, selector: &str) -> Result<String> {
        let page = self.page.lock().await;
        let value: String = page
            .evaluate_on_selector::<String, _>(selector, "el => el.value ?? ''", None::<String>)
            .await
            .with_context(|| format!("Failed to read value of: {}", selector))?;
        Ok(value)
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        let page = self.page.lock().await;
        let js = "el => el.innerText || el.textContent || ''";

        // A missing element reads as empty text
        match page
            .evaluate_on_selector::<String, String>(selector, js, None::<String>)
            .await
        {
            Ok(text) => Ok(text.trim().to_string()),
            Err(_) => Ok(String::new()),
        }
    }

    async fn wait_for_url(&self, pattern: &str, timeout_ms: u64) -> Result<()> {
        let re = url_pattern_to_regex(pattern)?;

        if let Err(current) = poll_until(timeout_ms, || self.url(), |url| re.is_match(url)).await {
            anyhow::bail!(
                "Timed out after {}ms waiting for URL matching '{}' (current: {})",
                timeout_ms,
                pattern,
                current
            );
        }
        Ok(())
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout_ms: u64) -> Result<()> {
        let reached = |ready: &str| match state {
            LoadState::DomContentLoaded => ready != "loading",
            LoadState::Load | LoadState::NetworkIdle => ready == "complete",
        };

        if let Err(ready) = poll_until(timeout_ms, || self.ready_state(), reached).await {
            anyhow::bail!(
                "Timed out after {}ms waiting for load state '{}' (readyState: {})",
                timeout_ms,
                state.as_str(),
                ready
            );
        }

        if state == LoadState::NetworkIdle {
            tokio::time::sleep(Duration::from_millis(NETWORK_SETTLE_MS)).await;
        }
        Ok(())
    }

    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let page = self.page.lock().await;
        page.screenshot_builder()
            .full_page(full_page)
            .path(path.to_path_buf())
            .screenshot()
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// Poll `read` until `done` accepts a value or `timeout_ms` has passed
///
/// Reads at least once. A failed read counts as "not there yet", since the
/// page may be mid-navigation. On timeout the last observation is returned.
async fn poll_until<F, Fut, P>(timeout_ms: u64, mut read: F, done: P) -> std::result::Result<(), String>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String>>,
    P: Fn(&str) -> bool,
{
    let start = Instant::now();

    loop {
        let last = match read().await {
            Ok(value) if done(&value) => return Ok(()),
            Ok(value) => value,
            Err(e) => {
                log::debug!("poll read failed: {}", e);
                format!("error: {}", e)
            }
        };

        if start.elapsed().as_millis() >= timeout_ms as u128 {
            return Err(last);
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

fn to_document_load_state(state: LoadState) -> DocumentLoadState {
    match state {
        LoadState::Load => DocumentLoadState::Load,
        LoadState::DomContentLoaded => DocumentLoadState::DomContentLoaded,
        LoadState::NetworkIdle => DocumentLoadState::NetworkIdle,
    }
}

/// Launch a new Chromium browser, preferring an installed Chrome
async fn launch_chromium_browser(
    chromium: &playwright::api::BrowserType,
    config: &WebDriverConfig,
) -> Result<Browser> {
    let mut launcher = chromium.launcher();
    launcher = launcher.headless(config.headless);

    let env_path = std::env::var("PLAYWRIGHT_CHROMIUM_EXECUTABLE_PATH")
        .ok()
        .map(PathBuf::from);

    let system_path = if env_path.is_none() {
        find_system_browser()
    } else {
        None
    };

    if let Some(ref path) = env_path {
        println!("{} Using browser from env: {}", "🌐".blue(), path.display());
        launcher = launcher.executable(path);
    } else if let Some(ref path) = system_path {
        println!(
            "{} Using discovered browser: {}",
            "🌐".blue(),
            path.display()
        );
        launcher = launcher.executable(path);
    } else {
        println!(
            "{} No browser executable found. Attempting default launch...",
            "ℹ".blue()
        );
    }

    let args: Vec<String> = [
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    launcher = launcher.args(&args);

    Ok(launcher.launch().await?)
}

fn find_system_browser() -> Option<PathBuf> {
    let common_paths = [
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
    ];

    common_paths
        .iter()
        .map(Path::new)
        .find(|p| p.exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_type_from_name() {
        assert_eq!(BrowserType::from_name("Firefox"), BrowserType::Firefox);
        assert_eq!(BrowserType::from_name("webkit"), BrowserType::Webkit);
        assert_eq!(BrowserType::from_name("chrome"), BrowserType::Chromium);
    }

    #[tokio::test]
    async fn test_poll_survives_destroyed_context() {
        let mut reads = 0;
        let outcome = poll_until(
            5_000,
            || {
                reads += 1;
                let attempt = reads;
                async move {
                    if attempt == 1 {
                        Err(anyhow::anyhow!("Execution context was destroyed"))
                    } else {
                        Ok("complete".to_string())
                    }
                }
            },
            |ready| ready == "complete",
        )
        .await;

        assert!(outcome.is_ok());
        assert_eq!(reads, 2);
    }

    #[tokio::test]
    async fn test_poll_zero_timeout_still_reads_once() {
        let re = url_pattern_to_regex("**/register.htm*").unwrap();
        let outcome = poll_until(
            0,
            || async { Ok("https://parabank.parasoft.com/parabank/register.htm".to_string()) },
            |url| re.is_match(url),
        )
        .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_poll_times_out_with_last_error() {
        let outcome = poll_until(
            150,
            || async { Err(anyhow::anyhow!("page closed")) },
            |_| true,
        )
        .await;
        assert_eq!(outcome.unwrap_err(), "error: page closed");
    }

    #[test]
    fn test_load_state_mapping() {
        assert!(matches!(
            to_document_load_state(LoadState::NetworkIdle),
            DocumentLoadState::NetworkIdle
        ));
        assert!(matches!(
            to_document_load_state(LoadState::DomContentLoaded),
            DocumentLoadState::DomContentLoaded
        ));
    }
}
