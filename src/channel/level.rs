use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity level of a log record
///
/// Ordered from least to most severe, so `Level::Debug < Level::Critical`.
/// Loggers and handlers drop records below their configured minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Detailed diagnostic output
    Debug,
    /// Normal operational messages
    Info,
    /// Something unexpected, execution continues
    Warning,
    /// An operation failed
    Error,
    /// The application cannot continue
    Critical,
}

/// Error returned when a severity name cannot be parsed
#[derive(Debug, Error)]
#[error("invalid level '{0}'. Must be one of: DEBUG, INFO, WARNING, ERROR, CRITICAL")]
pub struct ParseLevelError(String);

impl Level {
    /// Upper-case name as rendered into log lines
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a severity name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}
