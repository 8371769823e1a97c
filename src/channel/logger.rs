use std::io;
use std::sync::Arc;

use super::handler::Handler;
use super::level::Level;
use super::record::Record;

/// A named logging channel
///
/// Carries a minimum severity, the handlers that receive its records, and a
/// propagation flag. When propagation is enabled, records accepted by this
/// channel are also offered to the parent channel's handlers (keeping the
/// originating channel's name); the shipped configuration disables it so
/// the file and console channels stay fully independent.
#[derive(Debug)]
pub struct Logger {
    name: String,
    level: Level,
    handlers: Vec<Arc<Handler>>,
    propagate: bool,
    parent: Option<Arc<Logger>>,
}

impl Logger {
    /// Create a channel
    pub fn new(
        name: impl Into<String>,
        level: Level,
        handlers: Vec<Arc<Handler>>,
        propagate: bool,
        parent: Option<Arc<Logger>>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            handlers,
            propagate,
            parent,
        }
    }

    /// Channel name, as rendered by `%(name)s`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Minimum severity this channel accepts
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Emit a record at the given level
    ///
    /// Records below the channel's level are dropped without touching any
    /// handler. Handler-level gates are applied independently afterwards.
    pub fn log(&self, level: Level, message: &str) -> io::Result<()> {
        if level < self.level {
            return Ok(());
        }
        let record = Record::now(&self.name, level, message);
        self.dispatch(&record)
    }

    /// Emit at [`Level::Debug`]
    pub fn debug(&self, message: &str) -> io::Result<()> {
        self.log(Level::Debug, message)
    }

    /// Emit at [`Level::Info`]
    pub fn info(&self, message: &str) -> io::Result<()> {
        self.log(Level::Info, message)
    }

    /// Emit at [`Level::Warning`]
    pub fn warning(&self, message: &str) -> io::Result<()> {
        self.log(Level::Warning, message)
    }

    /// Emit at [`Level::Error`]
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.log(Level::Error, message)
    }

    /// Emit at [`Level::Critical`]
    pub fn critical(&self, message: &str) -> io::Result<()> {
        self.log(Level::Critical, message)
    }

    /// Offer a record to this channel's handlers, then the parent's
    ///
    /// Propagation skips the parent's own level gate, matching the usual
    /// logger-tree contract: only handler levels filter forwarded records.
    fn dispatch(&self, record: &Record<'_>) -> io::Result<()> {
        for handler in &self.handlers {
            handler.emit(record)?;
        }
        if self.propagate {
            if let Some(parent) = &self.parent {
                parent.dispatch(record)?;
            }
        }
        Ok(())
    }
}
