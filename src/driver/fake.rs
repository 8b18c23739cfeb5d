//! Scriptable in-memory page for exercising the scenario without a browser

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::traits::{url_pattern_to_regex, BrowserPage, LoadState};

/// Clones share their recorded interactions, so a test can keep one while
/// the runner consumes another
#[derive(Default, Clone)]
pub struct FakePage {
    title: String,
    url: Arc<Mutex<String>>,
    navigations: HashMap<String, String>,
    visible: HashSet<String>,
    texts: HashMap<String, String>,
    failing: HashSet<String>,
    dropped_fills: HashSet<String>,
    fills: Arc<Mutex<HashMap<String, String>>>,
    screenshots: Arc<Mutex<Vec<PathBuf>>>,
    calls: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
}

impl FakePage {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            url: Arc::new(Mutex::new("about:blank".to_string())),
            ..Default::default()
        }
    }

    /// Clicking `selector` moves the page to `url`
    pub fn navigate_on_click(mut self, selector: &str, url: &str) -> Self {
        self.navigations.insert(selector.to_string(), url.to_string());
        self
    }

    pub fn with_visible(mut self, selector: &str) -> Self {
        self.visible.insert(selector.to_string());
        self
    }

    pub fn with_text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    /// Make an operation fail: `goto`, `title`, `click:<sel>`, `fill:<sel>`,
    /// `wait_for_load_state`, `screenshot`, `close`
    pub fn fail_on(mut self, op: &str) -> Self {
        self.failing.insert(op.to_string());
        self
    }

    /// Accept the fill for `selector` but never store the value
    pub fn drop_fill(mut self, selector: &str) -> Self {
        self.dropped_fills.insert(selector.to_string());
        self
    }

    pub fn filled(&self, selector: &str) -> Option<String> {
        self.fills.lock().unwrap().get(selector).cloned()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.screenshots.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.failing.contains(op) {
            anyhow::bail!("{} failed: simulated timeout", op);
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    async fn goto(&self, url: &str, _wait_until: LoadState, _timeout_ms: u64) -> Result<()> {
        self.record(format!("goto {}", url));
        self.check("goto")?;
        *self.url.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str, _timeout_ms: u64) -> Result<bool> {
        self.record(format!("wait_for_selector {}", selector));
        Ok(self.visible.contains(selector))
    }

    async fn title(&self) -> Result<String> {
        self.check("title")?;
        Ok(self.title.clone())
    }

    async fn url(&self) -> Result<String> {
        Ok(self.url.lock().unwrap().clone())
    }

    async fn click(&self, selector: &str, _timeout_ms: u64) -> Result<()> {
        self.record(format!("click {}", selector));
        self.check(&format!("click:{}", selector))?;
        if let Some(url) = self.navigations.get(selector) {
            *self.url.lock().unwrap() = url.clone();
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str, _timeout_ms: u64) -> Result<()> {
        self.record(format!("fill {}", selector));
        self.check(&format!("fill:{}", selector))?;
        if !self.dropped_fills.contains(selector) {
            self.fills
                .lock()
                .unwrap()
                .insert(selector.to_string(), value.to_string());
        }
        Ok(())
    }

    async fn input_value(&self, selector: &str) -> Result<String> {
        Ok(self.filled(selector).unwrap_or_default())
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn wait_for_url(&self, pattern: &str, timeout_ms: u64) -> Result<()> {
        let current = self.url.lock().unwrap().clone();
        if url_pattern_to_regex(pattern)?.is_match(&current) {
            Ok(())
        } else {
            anyhow::bail!(
                "Timed out after {}ms waiting for URL matching '{}' (current: {})",
                timeout_ms,
                pattern,
                current
            )
        }
    }

    async fn wait_for_load_state(&self, state: LoadState, _timeout_ms: u64) -> Result<()> {
        self.record(format!("wait_for_load_state {}", state.as_str()));
        self.check("wait_for_load_state")
    }

    async fn screenshot(&self, path: &Path, _full_page: bool) -> Result<()> {
        self.check("screenshot")?;
        self.screenshots.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.check("close")
    }
}
