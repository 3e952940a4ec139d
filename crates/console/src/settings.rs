//! Runtime knobs for the console core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Channel poll period used when nothing is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// How record fetches that resolve out of order are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefetchMode {
    /// Every response is applied as it arrives; a slow response for an
    /// earlier selection can overwrite a newer one.
    #[default]
    LastResolvedWins,
    /// Only the response for the newest selection is applied.
    LatestOnly,
}

impl RefetchMode {
    /// Canonical config/CLI spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastResolvedWins => "last-resolved-wins",
            Self::LatestOnly => "latest-only",
        }
    }
}

impl std::fmt::Display for RefetchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RefetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-resolved-wins" => Ok(Self::LastResolvedWins),
            "latest-only" => Ok(Self::LatestOnly),
            other => Err(format!(
                "unknown refetch mode '{other}' (expected last-resolved-wins or latest-only)"
            )),
        }
    }
}

/// Settings injected into [`crate::Console`] at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleSettings {
    /// Period of the channel pane's polling task.
    pub poll_interval: Duration,
    /// Policy for out-of-order record fetches.
    pub refetch_mode: RefetchMode,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            refetch_mode: RefetchMode::default(),
        }
    }
}
