//! Logging channels
//!
//! The live objects materialized from a configuration description:
//! - Severity levels and per-call records
//! - Formatters rendering records as text lines
//! - Handlers writing lines to file or stream sinks
//! - Named logger channels and the registry that owns them

pub mod format;
pub mod handler;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;

pub use format::{Formatter, TemplateError};
pub use handler::{Handler, OpenMode, StreamTarget};
pub use level::Level;
pub use logger::Logger;
pub use record::Record;
pub use registry::Registry;
