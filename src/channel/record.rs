use chrono::{DateTime, Local};

use super::level::Level;

/// A single log event, created per call and rendered by each handler
///
/// Borrows the channel name and message from the emitting logger so that
/// dispatching to multiple handlers does not clone the payload.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Wall-clock time captured when the record was emitted
    pub timestamp: DateTime<Local>,
    /// Name of the channel that emitted the record
    pub channel: &'a str,
    /// Severity of the record
    pub level: Level,
    /// The message text
    pub message: &'a str,
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current local time
    pub fn now(channel: &'a str, level: Level, message: &'a str) -> Self {
        Self {
            timestamp: Local::now(),
            channel,
            level,
            message,
        }
    }
}
