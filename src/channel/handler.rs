use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::format::Formatter;
use super::level::Level;
use super::record::Record;

/// How a file sink opens its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Append to the file, creating it if absent (the shipped default)
    Append,
    /// Truncate the file on open
    Truncate,
}

/// Standard stream targeted by a stream sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamTarget {
    /// The process standard output
    Stdout,
    /// The process standard error
    Stderr,
}

/// A sink for log records: one destination, one formatter, one level gate
///
/// The destination sits behind a mutex so that interleaved calls from
/// multiple threads cannot corrupt a single line of output. Each `emit`
/// takes the lock once, writes the rendered line and flushes.
pub struct Handler {
    level: Level,
    formatter: Formatter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Handler {
    /// Create a file sink
    ///
    /// Opens the file immediately and keeps it open for the life of the
    /// handler. Fails if the parent directory does not exist or is not
    /// writable; the caller is expected to ensure the directory beforehand.
    pub fn file(
        path: impl AsRef<Path>,
        mode: OpenMode,
        level: Level,
        formatter: Formatter,
    ) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Append => options.append(true).create(true),
            OpenMode::Truncate => options.write(true).create(true).truncate(true),
        };
        let file = options.open(path.as_ref())?;
        Ok(Self::writer(Box::new(file), level, formatter))
    }

    /// Create a sink writing to a standard stream
    pub fn stream(target: StreamTarget, level: Level, formatter: Formatter) -> Self {
        match target {
            StreamTarget::Stdout => Self::writer(Box::new(io::stdout()), level, formatter),
            StreamTarget::Stderr => Self::writer(Box::new(io::stderr()), level, formatter),
        }
    }

    /// Create a sink over an arbitrary writer
    ///
    /// This is the injection seam used by tests and by hosts that want to
    /// capture output in memory.
    pub fn writer(sink: Box<dyn Write + Send>, level: Level, formatter: Formatter) -> Self {
        Self {
            level,
            formatter,
            sink: Mutex::new(sink),
        }
    }

    /// Minimum severity this handler accepts
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Write a record to the sink if it passes the level gate
    ///
    /// A blocking write holds the calling thread for its duration; errors
    /// from the underlying sink are surfaced unchanged.
    pub fn emit(&self, record: &Record<'_>) -> io::Result<()> {
        if record.level < self.level {
            return Ok(());
        }
        let line = self.formatter.render(record);
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(sink, "{line}")?;
        sink.flush()
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
