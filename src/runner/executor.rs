use std::future::Future;
use std::time::Instant;

use super::events::{EventEmitter, TestEvent};
use super::state::{StepRecord, TestResult};
use crate::error::HarnessResult;

/// Runs one step at a time: timed, recorded into the result, errors propagated
pub struct StepExecutor {
    emitter: EventEmitter,
}

impl StepExecutor {
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    /// Execute `action` as the step `name`
    ///
    /// On success a passed [`StepRecord`] is appended and the action's value
    /// returned. On failure a failed record and an error record are appended
    /// and the same error is returned to the caller.
    pub async fn execute<F, Fut, T>(
        &self,
        result: &mut TestResult,
        name: &str,
        action: F,
    ) -> HarnessResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = HarnessResult<T>>,
    {
        let index = result.steps().len();
        self.emitter.emit(TestEvent::StepStarted {
            index,
            name: name.to_string(),
        });
        log::debug!("step {} '{}' started", index + 1, name);

        let started = Instant::now();
        let outcome = action().await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => {
                result.record_step(StepRecord::passed(name, duration_ms));
                self.emitter.emit(TestEvent::StepPassed { index, duration_ms });
                Ok(value)
            }
            Err(err) => {
                let message = err.to_string();
                result.record_step(StepRecord::failed(name, duration_ms, message.clone()));
                result.record_error(name, &message);
                log::debug!("step {} '{}' failed: {}", index + 1, name, message);
                self.emitter.emit(TestEvent::StepFailed {
                    index,
                    error: message,
                    duration_ms,
                });
                Err(err)
            }
        }
    }
}
