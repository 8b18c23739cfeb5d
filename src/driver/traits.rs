use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Page readiness milestone to wait for after navigation or a submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    Load,
    DomContentLoaded,
    #[default]
    NetworkIdle,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Load => "load",
            LoadState::DomContentLoaded => "domcontentloaded",
            LoadState::NetworkIdle => "networkidle",
        }
    }
}

/// Browser page capability consumed by the scenario
///
/// This trait covers exactly the interactions the registration flow needs.
/// Selectors use Playwright syntax (`text=Register`, CSS, `xpath=...`).
/// Every operation may fail with a timeout or a "not found" condition; the
/// scenario treats any error as the failure of the step it was called from.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Open a URL and wait until the page reaches `wait_until`
    async fn goto(&self, url: &str, wait_until: LoadState, timeout_ms: u64) -> Result<()>;

    /// Wait for an element to become visible
    ///
    /// # Returns
    /// True if the element became visible, false on timeout
    async fn wait_for_selector(&self, selector: &str, timeout_ms: u64) -> Result<bool>;

    /// Current document title
    async fn title(&self) -> Result<String>;

    /// Current page URL
    async fn url(&self) -> Result<String>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str, timeout_ms: u64) -> Result<()>;

    /// Replace the value of the input matching `selector`
    async fn fill(&self, selector: &str, value: &str, timeout_ms: u64) -> Result<()>;

    /// Read back the value of an input
    async fn input_value(&self, selector: &str) -> Result<String>;

    /// Visible text of an element, empty if it does not exist
    async fn text_content(&self, selector: &str) -> Result<String>;

    /// Wait until the page URL matches a glob (`**/register.htm*`) or `/regex/` pattern
    async fn wait_for_url(&self, pattern: &str, timeout_ms: u64) -> Result<()>;

    async fn wait_for_load_state(&self, state: LoadState, timeout_ms: u64) -> Result<()>;

    /// Capture a screenshot
    ///
    /// # Arguments
    /// * `path` - Where to save the PNG; parent directories are created
    /// * `full_page` - Capture the whole scrollable page instead of the viewport
    async fn screenshot(&self, path: &Path, full_page: bool) -> Result<()>;

    /// Release the page and its browser
    async fn close(&self) -> Result<()>;
}

/// Convert a URL pattern into a regex
///
/// `/.../` is taken as a raw regex. Anything else is a glob where `**`
/// matches any run of characters and `*` matches anything except `/`.
pub fn url_pattern_to_regex(pattern: &str) -> Result<regex::Regex> {
    if pattern.len() > 1 && pattern.starts_with('/') && pattern.ends_with('/') {
        return Ok(regex::Regex::new(&pattern[1..pattern.len() - 1])?);
    }

    let mut re = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    re.push_str(".*");
                } else {
                    re.push_str("[^/]*");
                }
            }
            '?' => re.push('.'),
            _ => re.push_str(&regex::escape(&c.to_string())),
        }
    }
    re.push('$');
    Ok(regex::Regex::new(&re)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_pattern() {
        let re = url_pattern_to_regex("**/register.htm*").unwrap();
        assert!(re.is_match("https://parabank.parasoft.com/parabank/register.htm"));
        assert!(re.is_match(
            "https://parabank.parasoft.com/parabank/register.htm;jsessionid=ABC"
        ));
        assert!(!re.is_match("https://parabank.parasoft.com/parabank/index.htm"));
    }

    #[test]
    fn test_single_star_stops_at_slash() {
        let re = url_pattern_to_regex("https://host/*.htm").unwrap();
        assert!(re.is_match("https://host/index.htm"));
        assert!(!re.is_match("https://host/a/index.htm"));
    }

    #[test]
    fn test_regex_pattern() {
        let re = url_pattern_to_regex("/register\\.htm/").unwrap();
        assert!(re.is_match("http://localhost/parabank/register.htm?x=1"));
    }
}
