//! Parser for the section-based logging description
//!
//! The format is declarative key/value text: index sections (`[loggers]`,
//! `[handlers]`, `[formatters]`) enumerate names via a `keys` list, and each
//! name must have a matching `[logger_X]` / `[handler_X]` / `[formatter_X]`
//! detail block. Parsing produces a plain data model; no file is opened and
//! no channel is constructed here.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::errors::ConfigError;
use crate::channel::handler::{OpenMode, StreamTarget};
use crate::channel::level::Level;

/// Placeholder resolved against the runtime log file path before parsing
pub const LOGFILE_TOKEN: &str = "%(logfilename)s";

/// Parsed description of every logger, handler and formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfDescription {
    /// Logger blocks keyed by the name listed in `[loggers]`
    pub loggers: BTreeMap<String, LoggerSpec>,
    /// Handler blocks keyed by the name listed in `[handlers]`
    pub handlers: BTreeMap<String, HandlerSpec>,
    /// Formatter blocks keyed by the name listed in `[formatters]`
    pub formatters: BTreeMap<String, FormatterSpec>,
}

/// One `[logger_X]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSpec {
    /// Minimum severity for the channel
    pub level: Level,
    /// Handler names the channel writes through
    pub handlers: Vec<String>,
    /// Channel name callers use to obtain the logger; defaults to the key
    pub qualname: Option<String>,
    /// Whether records also flow to the root channel
    pub propagate: bool,
}

/// One `[handler_X]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSpec {
    /// Minimum severity for the sink
    pub level: Level,
    /// Name of the formatter rendering this sink's lines
    pub formatter: String,
    /// Sink kind and constructor arguments, from `class` and `args`
    pub sink: SinkSpec,
}

/// Sink kind plus its parsed constructor arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkSpec {
    /// `class=FileHandler` with `args=('<path>', '<mode>')`
    File {
        /// Target path, after `%(logfilename)s` substitution
        path: PathBuf,
        /// Open mode; `'a'` appends, `'w'` truncates
        mode: OpenMode,
    },
    /// `class=StreamHandler` with `args=(sys.stdout,)` or `(sys.stderr,)`
    Stream {
        /// The targeted standard stream
        target: StreamTarget,
    },
}

/// One `[formatter_X]` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterSpec {
    /// Line template with `%(...)s` placeholders
    pub format: String,
    /// Optional strftime date template
    pub datefmt: Option<String>,
}

/// Resolve the `%(logfilename)s` token against the real log path
///
/// Substitution happens on the raw text, before any parsing, so the token
/// can sit inside a quoted `args` literal.
pub fn substitute(description: &str, log_path: &Path) -> String {
    description.replace(LOGFILE_TOKEN, &log_path.display().to_string())
}

/// Parse a description into its data model
pub fn parse(text: &str) -> Result<ConfDescription, ConfigError> {
    let sections = split_sections(text)?;

    let mut loggers = BTreeMap::new();
    for key in index_keys(&sections, "loggers")? {
        let section = format!("logger_{key}");
        let block = detail_block(&sections, &section)?;
        loggers.insert(key, parse_logger(&section, block)?);
    }

    let mut handlers = BTreeMap::new();
    for key in index_keys(&sections, "handlers")? {
        let section = format!("handler_{key}");
        let block = detail_block(&sections, &section)?;
        handlers.insert(key, parse_handler(&section, block)?);
    }

    let mut formatters = BTreeMap::new();
    for key in index_keys(&sections, "formatters")? {
        let section = format!("formatter_{key}");
        let block = detail_block(&sections, &section)?;
        formatters.insert(key, parse_formatter(&section, block)?);
    }

    Ok(ConfDescription {
        loggers,
        handlers,
        formatters,
    })
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// Split raw text into `[section]` blocks of key/value pairs
fn split_sections(text: &str) -> Result<Sections, ConfigError> {
    let mut sections: Sections = BTreeMap::new();
    let mut current: Option<String> = None;
    let mut entries: BTreeMap<String, String> = BTreeMap::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err(ConfigError::Syntax {
                    line,
                    reason: "unterminated section header".to_string(),
                });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Syntax {
                    line,
                    reason: "empty section name".to_string(),
                });
            }
            if let Some(previous) = current.take() {
                sections.insert(previous, std::mem::take(&mut entries));
            }
            if sections.contains_key(name) {
                return Err(ConfigError::Syntax {
                    line,
                    reason: format!("duplicate section [{name}]"),
                });
            }
            current = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(ConfigError::Syntax {
                line,
                reason: "expected 'key=value'".to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Syntax {
                line,
                reason: "empty key".to_string(),
            });
        }
        let Some(section) = current.as_deref() else {
            return Err(ConfigError::Syntax {
                line,
                reason: "key/value pair outside any section".to_string(),
            });
        };
        if entries.contains_key(key) {
            return Err(ConfigError::Syntax {
                line,
                reason: format!("duplicate key '{key}' in section [{section}]"),
            });
        }
        entries.insert(key.to_string(), value.trim().to_string());
    }

    if let Some(last) = current.take() {
        sections.insert(last, entries);
    }
    Ok(sections)
}

/// Names listed under `keys=` in an index section
fn index_keys(sections: &Sections, index: &str) -> Result<Vec<String>, ConfigError> {
    let block = sections
        .get(index)
        .ok_or_else(|| ConfigError::MissingSection(index.to_string()))?;
    let keys = require(index, block, "keys")?;
    Ok(keys
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(String::from)
        .collect())
}

/// Detail block for a name listed in an index section
fn detail_block<'a>(
    sections: &'a Sections,
    section: &str,
) -> Result<&'a BTreeMap<String, String>, ConfigError> {
    sections
        .get(section)
        .ok_or_else(|| ConfigError::MissingSection(section.to_string()))
}

fn require<'a>(
    section: &str,
    block: &'a BTreeMap<String, String>,
    key: &str,
) -> Result<&'a str, ConfigError> {
    block
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn parse_level(section: &str, value: &str) -> Result<Level, ConfigError> {
    Level::from_name(value).ok_or_else(|| ConfigError::InvalidLevel {
        section: section.to_string(),
        level: value.to_string(),
    })
}

fn parse_logger(
    section: &str,
    block: &BTreeMap<String, String>,
) -> Result<LoggerSpec, ConfigError> {
    let level = parse_level(section, require(section, block, "level")?)?;
    let handlers = require(section, block, "handlers")?
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect();
    let qualname = block.get("qualname").cloned();
    let propagate = match block.get("propagate").map(String::as_str) {
        None | Some("1") => true,
        Some("0") => false,
        Some(other) => {
            return Err(ConfigError::InvalidValue {
                section: section.to_string(),
                key: "propagate".to_string(),
                value: other.to_string(),
            });
        }
    };

    Ok(LoggerSpec {
        level,
        handlers,
        qualname,
        propagate,
    })
}

fn parse_handler(
    section: &str,
    block: &BTreeMap<String, String>,
) -> Result<HandlerSpec, ConfigError> {
    let class = require(section, block, "class")?;
    let level = parse_level(section, require(section, block, "level")?)?;
    let formatter = require(section, block, "formatter")?.to_string();
    let args = require(section, block, "args")?;

    let invalid_args = |reason: String| ConfigError::InvalidArgs {
        section: section.to_string(),
        reason,
    };
    let tokens = parse_args_tuple(args).map_err(invalid_args)?;

    let sink = match class {
        "FileHandler" => parse_file_args(&tokens).map_err(invalid_args)?,
        "StreamHandler" => parse_stream_args(&tokens).map_err(invalid_args)?,
        other => {
            return Err(ConfigError::UnknownHandlerClass {
                section: section.to_string(),
                class: other.to_string(),
            });
        }
    };

    Ok(HandlerSpec {
        level,
        formatter,
        sink,
    })
}

fn parse_formatter(
    section: &str,
    block: &BTreeMap<String, String>,
) -> Result<FormatterSpec, ConfigError> {
    Ok(FormatterSpec {
        format: require(section, block, "format")?.to_string(),
        datefmt: block.get("datefmt").cloned(),
    })
}

/// One element of a parsed `args` tuple
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgToken {
    /// A quoted string literal
    Str(String),
    /// A bare token such as `sys.stdout`
    Ident(String),
}

/// Parse a tuple-shaped `args` literal into tokens
///
/// Quoted strings take their content verbatim (no escape processing, so
/// Windows paths pass through unchanged); anything else is a bare token.
/// A trailing comma, as in `(sys.stdout,)`, is accepted.
fn parse_args_tuple(raw: &str) -> Result<Vec<ArgToken>, String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| "expected a parenthesized argument list".to_string())?;

    let mut tokens = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else { break };

        if first == '\'' || first == '"' {
            chars.next();
            let mut value = String::new();
            loop {
                match chars.next() {
                    Some(c) if c == first => break,
                    Some(c) => value.push(c),
                    None => return Err("unterminated string literal".to_string()),
                }
            }
            tokens.push(ArgToken::Str(value));
            while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
                chars.next();
            }
            match chars.next() {
                None => break,
                Some(',') => {}
                Some(other) => {
                    return Err(format!("unexpected '{other}' after string literal"));
                }
            }
        } else {
            let mut value = String::new();
            loop {
                match chars.peek() {
                    Some(',') => {
                        chars.next();
                        break;
                    }
                    Some(&c) => {
                        value.push(c);
                        chars.next();
                    }
                    None => break,
                }
            }
            let value = value.trim();
            if !value.is_empty() {
                tokens.push(ArgToken::Ident(value.to_string()));
            }
        }
    }
    Ok(tokens)
}

fn parse_file_args(tokens: &[ArgToken]) -> Result<SinkSpec, String> {
    let path = match tokens.first() {
        Some(ArgToken::Str(path)) => PathBuf::from(path),
        Some(ArgToken::Ident(other)) => {
            return Err(format!("file path must be a quoted string, got '{other}'"));
        }
        None => return Err("file handler requires a path argument".to_string()),
    };
    let mode = match tokens.get(1) {
        None => OpenMode::Append,
        Some(ArgToken::Str(mode)) => match mode.as_str() {
            "a" => OpenMode::Append,
            "w" => OpenMode::Truncate,
            other => return Err(format!("unsupported open mode '{other}'")),
        },
        Some(ArgToken::Ident(other)) => {
            return Err(format!("open mode must be a quoted string, got '{other}'"));
        }
    };
    if tokens.len() > 2 {
        return Err("file handler takes at most a path and an open mode".to_string());
    }
    Ok(SinkSpec::File { path, mode })
}

fn parse_stream_args(tokens: &[ArgToken]) -> Result<SinkSpec, String> {
    match tokens {
        [ArgToken::Ident(stream)] => match stream.as_str() {
            "sys.stdout" => Ok(SinkSpec::Stream {
                target: StreamTarget::Stdout,
            }),
            "sys.stderr" => Ok(SinkSpec::Stream {
                target: StreamTarget::Stderr,
            }),
            other => Err(format!("unknown stream '{other}'")),
        },
        [ArgToken::Str(other)] => Err(format!(
            "stream target must be a bare token, got quoted '{other}'"
        )),
        _ => Err("stream handler takes exactly one stream argument".to_string()),
    }
}
