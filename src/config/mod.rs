//! Configuration loading
//!
//! Turns the declarative logger/handler/formatter description into live
//! channels:
//! - Section-based description parser with `%(logfilename)s` substitution
//! - Fail-fast loader wiring formatters, sinks and channels together
//! - Typed load-time errors

pub mod errors;
pub mod loader;
pub mod parser;

pub use errors::ConfigError;
pub use loader::{Loader, DEFAULT_CONF};
