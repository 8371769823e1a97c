use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::errors::ConfigError;
use super::parser::{self, ConfDescription, LoggerSpec, SinkSpec};
use crate::channel::format::Formatter;
use crate::channel::handler::Handler;
use crate::channel::logger::Logger;
use crate::channel::registry::Registry;

/// The bundled two-channel description: root to an append-mode file,
/// `consoleLog` to standard output, both at DEBUG with propagation off
pub const DEFAULT_CONF: &str = include_str!("default.conf");

/// One-shot loader turning a description into live channels
///
/// Loading is fail-fast: any unresolved reference or I/O failure aborts the
/// whole load with nothing initialized. There is no retry and no fallback
/// channel; hosts are expected to abort startup when this fails, since
/// diagnostic output is otherwise unavailable.
pub struct Loader;

impl Loader {
    /// Load a description, resolving `%(logfilename)s` to `log_path`
    ///
    /// Opens the file sink (append mode, create-if-absent) as soon as its
    /// handler is constructed, so a missing or unwritable parent directory
    /// fails here rather than at first emission. The caller is expected to
    /// ensure the directory exists beforehand.
    pub fn load(description: &str, log_path: impl AsRef<Path>) -> Result<Registry, ConfigError> {
        let resolved = parser::substitute(description, log_path.as_ref());
        let desc = parser::parse(&resolved)?;
        Self::build(&desc)
    }

    /// Load a description from a file on disk
    pub fn load_file(
        conf_path: impl AsRef<Path>,
        log_path: impl AsRef<Path>,
    ) -> Result<Registry, ConfigError> {
        let conf_path = conf_path.as_ref();
        let description = std::fs::read_to_string(conf_path).map_err(|source| ConfigError::Io {
            path: conf_path.to_path_buf(),
            source,
        })?;
        Self::load(&description, log_path)
    }

    /// Load the bundled description, creating the log directory first
    ///
    /// Convenience entry point for application startup: ensures the parent
    /// directory of `log_path` exists, then loads [`DEFAULT_CONF`].
    pub fn init_default(log_path: impl AsRef<Path>) -> anyhow::Result<Registry> {
        let log_path = log_path.as_ref();
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory {}", parent.display())
            })?;
        }
        Self::load(DEFAULT_CONF, log_path).context("failed to load default logging configuration")
    }

    /// Materialize channels from an already-parsed description
    pub fn build(desc: &ConfDescription) -> Result<Registry, ConfigError> {
        // Formatters first; handlers reference them by name.
        let mut formatters: HashMap<&str, Formatter> = HashMap::new();
        for (name, spec) in &desc.formatters {
            let formatter = Formatter::new(&spec.format, spec.datefmt.as_deref()).map_err(
                |source| ConfigError::InvalidTemplate {
                    section: format!("formatter_{name}"),
                    source,
                },
            )?;
            formatters.insert(name, formatter);
        }

        let mut handlers: HashMap<&str, Arc<Handler>> = HashMap::new();
        for (name, spec) in &desc.handlers {
            let formatter = formatters
                .get(spec.formatter.as_str())
                .ok_or_else(|| ConfigError::UndefinedFormatter {
                    handler: name.clone(),
                    formatter: spec.formatter.clone(),
                })?
                .clone();
            let handler = match &spec.sink {
                SinkSpec::File { path, mode } => {
                    Handler::file(path, *mode, spec.level, formatter).map_err(|source| {
                        ConfigError::Io {
                            path: path.clone(),
                            source,
                        }
                    })?
                }
                SinkSpec::Stream { target } => Handler::stream(*target, spec.level, formatter),
            };
            handlers.insert(name, Arc::new(handler));
        }

        let root_spec = desc.loggers.get("root").ok_or(ConfigError::MissingRootLogger)?;
        let root = Arc::new(build_logger("root", root_spec, None, &handlers)?);

        let mut channels = HashMap::new();
        for (key, spec) in &desc.loggers {
            if key == "root" {
                continue;
            }
            let name = spec.qualname.clone().unwrap_or_else(|| key.clone());
            let logger = build_logger(&name, spec, Some(Arc::clone(&root)), &handlers)?;
            channels.insert(name, Arc::new(logger));
        }

        Ok(Registry::new(root, channels))
    }
}

/// Wire one logger to its named handlers
fn build_logger(
    name: &str,
    spec: &LoggerSpec,
    parent: Option<Arc<Logger>>,
    handlers: &HashMap<&str, Arc<Handler>>,
) -> Result<Logger, ConfigError> {
    let mut attached = Vec::with_capacity(spec.handlers.len());
    for handler_name in &spec.handlers {
        let handler =
            handlers
                .get(handler_name.as_str())
                .ok_or_else(|| ConfigError::UndefinedHandler {
                    logger: name.to_string(),
                    handler: handler_name.clone(),
                })?;
        attached.push(Arc::clone(handler));
    }
    Ok(Logger::new(name, spec.level, attached, spec.propagate, parent))
}
