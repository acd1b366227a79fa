use std::time::Duration;

use crate::types::FAILURE_MESSAGE;

/// Configuration for the sequential runner.
///
/// Use [`RunnerConfig::builder()`] for ergonomic construction, or
/// [`RunnerConfig::default()`] for the defaults (1s between dispatches,
/// 60s per call).
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Minimum pause between two dispatches of the same batch run.
    pub dispatch_delay: Duration,

    /// Deadline for a single enrichment call. `None` = unbounded.
    pub call_timeout: Option<Duration>,

    /// Message stored in `Failed` states.
    pub failure_message: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            dispatch_delay: Duration::from_millis(1000),
            call_timeout: Some(Duration::from_secs(60)),
            failure_message: FAILURE_MESSAGE.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Start building a config with the builder pattern.
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }
}

/// Builder for [`RunnerConfig`].
#[derive(Default)]
pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    /// Set the pause inserted between consecutive batch dispatches.
    pub fn with_dispatch_delay(mut self, delay: Duration) -> Self {
        self.config.dispatch_delay = delay;
        self
    }

    /// Bound every enrichment call by `timeout`.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.call_timeout = Some(timeout);
        self
    }

    /// Let calls run for as long as the enricher takes.
    pub fn without_call_timeout(mut self) -> Self {
        self.config.call_timeout = None;
        self
    }

    /// Override the user-facing failure message.
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.config.failure_message = message.into();
        self
    }

    /// Build the final [`RunnerConfig`].
    pub fn build(self) -> RunnerConfig {
        self.config
    }
}
