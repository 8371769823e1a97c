use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::channel::format::TemplateError;

/// Errors raised while loading a logging configuration description
///
/// All of these are fatal at load time: the loader never partially
/// initializes and never falls back to a default channel.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A line that is neither a section header, a key=value pair, a
    /// comment, nor blank
    #[error("syntax error at line {line}: {reason}")]
    Syntax {
        /// 1-based line number in the description
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// A key listed in an index section has no matching detail block
    #[error("missing section [{0}]")]
    MissingSection(String),

    /// A detail block lacks a required key
    #[error("missing key '{key}' in section [{section}]")]
    MissingKey {
        /// Section the key was expected in
        section: String,
        /// The absent key
        key: String,
    },

    /// A `level` value is not a standard severity name
    #[error("invalid level '{level}' in section [{section}]. Must be one of: DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidLevel {
        /// Section carrying the bad value
        section: String,
        /// The rejected value
        level: String,
    },

    /// A key holds a value outside its accepted set
    #[error("invalid value '{value}' for key '{key}' in section [{section}]")]
    InvalidValue {
        /// Section carrying the bad value
        section: String,
        /// The offending key
        key: String,
        /// The rejected value
        value: String,
    },

    /// A handler `class` is not a known sink kind
    #[error("unknown handler class '{class}' in section [{section}]. Must be FileHandler or StreamHandler")]
    UnknownHandlerClass {
        /// Section carrying the bad class
        section: String,
        /// The rejected class name
        class: String,
    },

    /// A handler `args` tuple does not match its sink kind
    #[error("invalid args in section [{section}]: {reason}")]
    InvalidArgs {
        /// Section carrying the bad args
        section: String,
        /// What was wrong with the tuple
        reason: String,
    },

    /// A logger references a handler name with no definition
    #[error("logger '{logger}' references undefined handler '{handler}'")]
    UndefinedHandler {
        /// The referencing logger
        logger: String,
        /// The missing handler name
        handler: String,
    },

    /// A handler references a formatter name with no definition
    #[error("handler '{handler}' references undefined formatter '{formatter}'")]
    UndefinedFormatter {
        /// The referencing handler
        handler: String,
        /// The missing formatter name
        formatter: String,
    },

    /// The description defines no root logger
    #[error("no root logger defined")]
    MissingRootLogger,

    /// A formatter block carries a bad format or date template
    #[error("invalid template in section [{section}]")]
    InvalidTemplate {
        /// The formatter's section
        section: String,
        /// The compilation failure
        #[source]
        source: TemplateError,
    },

    /// The file sink's target (or the description file itself) could not
    /// be opened
    #[error("cannot open {}", .path.display())]
    Io {
        /// Path that failed to open
        path: PathBuf,
        /// The underlying failure
        #[source]
        source: io::Error,
    },
}
