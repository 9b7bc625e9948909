//! Batch configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::BatchError;

/// What the engine does with the remaining entries after a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum FailurePolicy {
    /// Keep going; every entry is attempted.
    #[default]
    Continue,
    /// Mark every entry after the first failure as aborted.
    StopOnFirstFailure,
}

/// Configuration for a deletion batch.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct BatchConfig {
    /// Policy applied after a failed entry.
    #[builder(default)]
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Buffer size of the event channel used by the async adapter.
    #[builder(default = "100")]
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,

    /// Number of threads for counting directories (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Reject relative paths in a selection.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub require_absolute: bool,
}

fn default_true() -> bool {
    true
}

fn default_channel_size() -> usize {
    100
}

fn check_channel_size(channel_size: usize) -> Result<(), String> {
    if channel_size == 0 {
        return Err("Channel size must be greater than zero".to_string());
    }
    Ok(())
}

impl BatchConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(channel_size) = self.channel_size {
            check_channel_size(channel_size)?;
        }
        Ok(())
    }
}

impl BatchConfig {
    /// Create a new batch config builder.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder::default()
    }

    /// Check a config that did not come through the builder.
    pub fn validate(&self) -> Result<(), BatchError> {
        check_channel_size(self.channel_size)
            .map_err(|message| BatchError::InvalidConfig { message })
    }

    /// Whether the batch stops after the first failed entry.
    pub fn stops_on_failure(&self) -> bool {
        self.failure_policy == FailurePolicy::StopOnFirstFailure
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Continue,
            channel_size: default_channel_size(),
            threads: 0,
            require_absolute: true,
        }
    }
}
