use super::state::TestStatus;
use crate::report::types::ReportSummary;
use tokio::sync::broadcast;

/// Scenario execution events for real-time console output
#[derive(Debug, Clone)]
pub enum TestEvent {
    ScenarioStarted {
        case_id: String,
        description: String,
    },
    ScenarioFinished {
        status: TestStatus,
        summary: ReportSummary,
        duration_ms: u64,
    },

    StepStarted {
        index: usize,
        name: String,
    },
    StepPassed {
        index: usize,
        duration_ms: u64,
    },
    StepFailed {
        index: usize,
        error: String,
        duration_ms: u64,
    },

    // Log event for coordinated output
    Log {
        message: String,
    },
}

/// Event emitter for broadcasting scenario events
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }

    pub fn log(&self, message: impl Into<String>) {
        self.emit(TestEvent::Log {
            message: message.into(),
        });
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration as StdDuration;

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    /// Print events until every sender is dropped
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        use colored::Colorize;
        use std::io::IsTerminal;

        let interactive = std::io::stdout().is_terminal();
        let mut spinner: Option<ProgressBar> = None;
        let mut step_text = String::new();

        loop {
            let event = match receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match event {
                TestEvent::ScenarioStarted {
                    case_id,
                    description,
                } => {
                    println!(
                        "\n{} {} {}",
                        "▶".green().bold(),
                        case_id.cyan(),
                        description.white().bold()
                    );
                }

                TestEvent::ScenarioFinished {
                    status,
                    summary,
                    duration_ms,
                } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    let status_str = match status {
                        TestStatus::Passed => "PASSED".green().bold(),
                        TestStatus::Failed => "FAILED".red().bold(),
                        TestStatus::Pending => "PENDING".yellow().bold(),
                    };
                    println!("\n{} Scenario finished [{}]", "■".blue().bold(), status_str);
                    println!(
                        "  {} passed, {} failed of {} steps",
                        summary.passed.to_string().green(),
                        summary.failed.to_string().red(),
                        summary.total
                    );
                    println!("  Duration: {}ms", duration_ms);
                }

                TestEvent::StepStarted { index, name } => {
                    step_text = format!("[{}] {}... ", index + 1, name.dimmed());

                    let pb = if interactive {
                        ProgressBar::new_spinner()
                    } else {
                        // Piped output gets no escape codes
                        ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
                    };
                    if let Ok(style) = ProgressStyle::default_spinner()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .template("    {spinner} {msg}")
                    {
                        pb.set_style(style);
                    }
                    pb.set_message(step_text.clone());
                    pb.enable_steady_tick(StdDuration::from_millis(100));
                    spinner = Some(pb);
                }

                TestEvent::StepPassed { duration_ms, .. } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    println!("    {} {}({}ms)", "✓".green(), step_text, duration_ms);
                }

                TestEvent::StepFailed {
                    error, duration_ms, ..
                } => {
                    if let Some(pb) = spinner.take() {
                        pb.finish_and_clear();
                    }
                    println!("    {} {}({}ms)", "✗".red(), step_text, duration_ms);
                    println!("      {}", error.red());
                }

                TestEvent::Log { message } => match &spinner {
                    Some(pb) => pb.println(format!("      {}", message)),
                    None => println!("  {}", message),
                },
            }
        }
    }
}
