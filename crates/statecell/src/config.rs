#![forbid(unsafe_code)]

//! Per-record configuration.
//!
//! The defaults reproduce the documented semantics; [`NotifyMode::Live`]
//! opts back into index-based iteration over the live subscriber list.

use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`RecordConfig::from_env`].
pub const NOTIFY_MODE_ENV: &str = "STATECELL_NOTIFY_MODE";

/// How a notification pass walks the subscriber list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyMode {
    /// Copy the list when the pass starts and notify the copy. Subscribers
    /// added or removed during the pass take effect on the next `change`.
    #[default]
    Snapshot,
    /// Walk the live list by index, re-reading its length at each step.
    /// Subscribers appended during the pass are visited; removing an
    /// earlier entry shifts the next one past the cursor.
    Live,
}

impl NotifyMode {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`NotifyMode`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNotifyModeError(String);

impl fmt::Display for ParseNotifyModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown notify mode '{}' (expected 'snapshot' or 'live')",
            self.0
        )
    }
}

impl std::error::Error for ParseNotifyModeError {}

impl FromStr for NotifyMode {
    type Err = ParseNotifyModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snapshot" => Ok(Self::Snapshot),
            "live" => Ok(Self::Live),
            _ => Err(ParseNotifyModeError(s.to_string())),
        }
    }
}

/// Configuration for an [`ObservableRecord`](crate::ObservableRecord).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConfig {
    /// Iteration strategy for notification passes.
    pub notify_mode: NotifyMode,
    /// Emit a warning when `unsubscribe` finds no match.
    pub warn_on_unsubscribe_miss: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            notify_mode: NotifyMode::Snapshot,
            warn_on_unsubscribe_miss: true,
        }
    }
}

impl RecordConfig {
    /// Defaults, with the notify mode overridden by `STATECELL_NOTIFY_MODE`
    /// when it is set. Unrecognized values are reported and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(NOTIFY_MODE_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = value {
            match raw.parse::<NotifyMode>() {
                Ok(mode) => config.notify_mode = mode,
                Err(err) => {
                    tracing::warn!(
                        target: "statecell",
                        env = NOTIFY_MODE_ENV,
                        value = raw,
                        "{err}; using default"
                    );
                }
            }
        }
        config
    }

    /// Set the notification iteration strategy.
    pub fn with_notify_mode(mut self, mode: NotifyMode) -> Self {
        self.notify_mode = mode;
        self
    }

    /// Enable or disable the unsubscribe-miss warning.
    pub fn with_unsubscribe_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_unsubscribe_miss = enabled;
        self
    }
}
