//! Progress state shared with observers.

use serde::{Deserialize, Serialize};

/// Whether a batch is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressMode {
    #[default]
    Idle,
    InProgress,
}

/// Percentage complete of the current batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Percentage in `0..=100`.
    pub value: u8,
    pub mode: ProgressMode,
}

impl ProgressState {
    pub fn is_running(&self) -> bool {
        self.mode == ProgressMode::InProgress
    }
}
