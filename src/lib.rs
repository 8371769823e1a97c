//! Logchan - Declarative Logging Channels
//!
//! Logchan materializes named logging channels from a section-based
//! configuration description: loggers, handlers and formatters are declared
//! as text, wired together by name, and turned into live objects in a single
//! fail-fast load at process start.
//!
//! # Architecture
//!
//! - **Channels** (`channel`): levels, records, formatters, sinks and the
//!   named logger channels themselves
//! - **Configuration** (`config`): the description parser and the one-shot
//!   loader that resolves references and opens sinks
//!
//! The loader returns a [`Registry`] of channel handles; callers inject
//! those handles into collaborators rather than reaching into global state.
//! Channels are safe to share across threads: each sink serializes writes
//! behind its own lock so concurrent calls cannot interleave within a line.
//!
//! # Example
//!
//! ```no_run
//! use logchan::Loader;
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = Loader::init_default("logs/viewer.log")?;
//!
//!     // The root channel writes only to the file.
//!     registry.root().debug("annotation backup written")?;
//!
//!     // The consoleLog channel writes only to standard output.
//!     if let Some(console) = registry.get("consoleLog") {
//!         console.info("session started")?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;

// Re-export commonly used types for convenience
pub use channel::{Formatter, Handler, Level, Logger, OpenMode, Record, Registry, StreamTarget};
pub use config::{ConfigError, Loader, DEFAULT_CONF};
