use std::path::Path;
use std::time::{Duration, Instant};

use crate::driver::BrowserPage;
use crate::error::{HarnessError, HarnessResult};
use crate::utils::config::ScenarioConfig;

pub const UNVERIFIED_MESSAGE: &str = "could not verify registration outcome";

/// Try each indicator in order until one appears or the budget runs out
///
/// Each wait is capped at `per_indicator` and at whatever is left of
/// `budget`. Returns the indicator that matched.
pub async fn first_visible(
    page: &dyn BrowserPage,
    indicators: &[String],
    per_indicator: Duration,
    budget: Duration,
) -> HarnessResult<Option<String>> {
    let started = Instant::now();

    for indicator in indicators {
        let remaining = budget.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            log::debug!("verification budget exhausted before '{}'", indicator);
            break;
        }

        let wait = per_indicator.min(remaining);
        let visible = page
            .wait_for_selector(indicator, wait.as_millis() as u64)
            .await
            .map_err(|e| HarnessError::Verification(e.to_string()))?;

        if visible {
            return Ok(Some(indicator.clone()));
        }
    }

    Ok(None)
}

/// Text of the first error element with something to say
pub async fn find_error_text(page: &dyn BrowserPage, selectors: &[String]) -> Option<String> {
    for selector in selectors {
        match page.text_content(selector).await {
            Ok(text) if !text.trim().is_empty() => return Some(text.trim().to_string()),
            Ok(_) => {}
            Err(e) => log::debug!("error probe '{}' failed: {}", selector, e),
        }
    }
    None
}

/// Decide whether registration succeeded
///
/// Success indicators first; failing that, error elements on the page become
/// an [`HarnessError::Application`]; with neither, a debug screenshot is
/// captured and the outcome is reported as unverified.
pub async fn verify_outcome(
    page: &dyn BrowserPage,
    config: &ScenarioConfig,
    debug_screenshot: &Path,
) -> HarnessResult<String> {
    let matched = first_visible(
        page,
        &config.success_indicators,
        Duration::from_millis(config.timeouts.indicator_ms),
        Duration::from_millis(config.timeouts.verification_budget_ms),
    )
    .await?;

    if let Some(indicator) = matched {
        return Ok(indicator);
    }

    if let Some(text) = find_error_text(page, &config.error_indicators).await {
        return Err(HarnessError::Application(text));
    }

    if let Err(e) = page.screenshot(debug_screenshot, true).await {
        log::warn!("failed to capture debug screenshot: {}", e);
    }
    Err(HarnessError::Verification(UNVERIFIED_MESSAGE.to_string()))
}
