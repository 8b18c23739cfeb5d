//! Readiness probe for a locally served application under test

use colored::Colorize;
use std::time::Duration;

use crate::error::{HarnessError, HarnessResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_ATTEMPTS: u32 = 10;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Polls `<base>/health` until it answers 2xx or attempts run out
#[derive(Debug, Clone)]
pub struct ReadinessProbe {
    pub url: String,
    pub attempts: u32,
    pub interval: Duration,
    pub request_timeout: Duration,
}

impl ReadinessProbe {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}/health", base_url.trim_end_matches('/')),
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn client(&self) -> HarnessResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| HarnessError::Probe(format!("cannot build HTTP client: {}", e)))
    }

    /// Returns the attempt number that succeeded
    pub async fn wait(&self) -> HarnessResult<u32> {
        let client = self.client()?;

        for attempt in 1..=self.attempts {
            match client.get(&self.url).send().await {
                Ok(response) if response.status().is_success() => {
                    println!(
                        "{} {} is ready (attempt {}/{})",
                        "✅".green(),
                        self.url,
                        attempt,
                        self.attempts
                    );
                    return Ok(attempt);
                }
                Ok(response) => log::debug!(
                    "{} answered {} on attempt {}",
                    self.url,
                    response.status(),
                    attempt
                ),
                Err(e) => log::debug!("{} unreachable on attempt {}: {}", self.url, attempt, e),
            }

            println!(
                "{} Waiting for {} ({}/{})",
                "⏳".yellow(),
                self.url,
                attempt,
                self.attempts
            );
            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(HarnessError::NotReady {
            url: self.url.clone(),
            attempts: self.attempts,
        })
    }
}

/// Wait for readiness, then run `command` and return its exit code
pub async fn probe_then_run(probe: &ReadinessProbe, command: &[String]) -> anyhow::Result<i32> {
    probe.wait().await?;

    let (program, args) = command
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("No command given to run after the probe"))?;

    println!("{} Running: {}", "▶".green().bold(), command.join(" "));
    let status = tokio::process::Command::new(program)
        .args(args)
        .status()
        .await?;

    Ok(status.code().unwrap_or(1))
}
