use thiserror::Error;

/// Failure classes surfaced by the registration harness
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Page load failed or the landing page is not the one expected
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Element missing, not clickable, or a fill did not stick
    #[error("interaction failed: {0}")]
    Interaction(String),

    /// No success indicator appeared within the verification budget
    #[error("verification failed: {0}")]
    Verification(String),

    /// The application rendered an error element after submit
    #[error("application reported an error: {0}")]
    Application(String),

    #[error("report generation failed: {0}")]
    Reporting(String),

    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("readiness probe failed: {0}")]
    Probe(String),

    #[error("{url} was not ready after {attempts} attempts")]
    NotReady { url: String, attempts: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    pub fn navigation(err: impl std::fmt::Display) -> Self {
        Self::Navigation(err.to_string())
    }

    pub fn interaction(err: impl std::fmt::Display) -> Self {
        Self::Interaction(err.to_string())
    }

    pub fn reporting(err: impl std::fmt::Display) -> Self {
        Self::Reporting(err.to_string())
    }

    /// Verification failures, including the application-error sub-case
    pub fn is_verification(&self) -> bool {
        matches!(self, Self::Verification(_) | Self::Application(_))
    }
}

pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
