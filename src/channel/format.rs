use chrono::format::{Item, StrftimeItems};
use thiserror::Error;

use super::record::Record;

/// Default date template when a formatter block omits `datefmt`
pub const DEFAULT_DATEFMT: &str = "%Y-%m-%d %H:%M:%S";

/// Error found while compiling a format template
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// The template names a field that does not exist on a log record
    #[error("unknown placeholder '%({0})s'")]
    UnknownPlaceholder(String),

    /// A `%` that does not introduce `%(field)s` and is not doubled
    #[error("malformed placeholder; expected '%(field)s' or a literal '%%'")]
    MalformedPlaceholder,

    /// The strftime date template contains an invalid specifier
    #[error("invalid date format '{0}'")]
    InvalidDateFormat(String),
}

/// Compiled piece of a format template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Asctime,
    Name,
    Levelname,
    Message,
}

/// Template converting a log record into a single line of text
///
/// Supports the `%(asctime)s`, `%(name)s`, `%(levelname)s` and `%(message)s`
/// placeholders. The template and the strftime date format are both validated
/// at construction so that rendering cannot fail later.
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    datefmt: String,
}

impl Formatter {
    /// Compile a format template
    ///
    /// `datefmt` falls back to [`DEFAULT_DATEFMT`] when `None`.
    pub fn new(format: &str, datefmt: Option<&str>) -> Result<Self, TemplateError> {
        let datefmt = datefmt.unwrap_or(DEFAULT_DATEFMT);
        if StrftimeItems::new(datefmt).any(|item| matches!(item, Item::Error)) {
            return Err(TemplateError::InvalidDateFormat(datefmt.to_string()));
        }

        Ok(Self {
            segments: compile(format)?,
            datefmt: datefmt.to_string(),
        })
    }

    /// Render a record as a line of text, without a trailing newline
    pub fn render(&self, record: &Record<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Asctime => {
                    out.push_str(&record.timestamp.format(&self.datefmt).to_string());
                }
                Segment::Name => out.push_str(record.channel),
                Segment::Levelname => out.push_str(record.level.as_str()),
                Segment::Message => out.push_str(record.message),
            }
        }
        out
    }
}

/// Compile the `%(field)s` template into segments
fn compile(format: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            literal.push(ch);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                literal.push('%');
            }
            Some('(') => {
                chars.next();
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(c) => field.push(c),
                        None => return Err(TemplateError::MalformedPlaceholder),
                    }
                }
                // the conversion suffix is always 's' for string fields
                if chars.next() != Some('s') {
                    return Err(TemplateError::MalformedPlaceholder);
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(match field.as_str() {
                    "asctime" => Segment::Asctime,
                    "name" => Segment::Name,
                    "levelname" => Segment::Levelname,
                    "message" => Segment::Message,
                    _ => return Err(TemplateError::UnknownPlaceholder(field)),
                });
            }
            _ => return Err(TemplateError::MalformedPlaceholder),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::level::Level;
    use chrono::TimeZone;

    fn fixed_record<'a>(channel: &'a str, message: &'a str) -> Record<'a> {
        Record {
            timestamp: chrono::Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 2).unwrap(),
            channel,
            level: Level::Info,
            message,
        }
    }

    #[test]
    fn test_render_with_name() {
        let formatter = Formatter::new(
            "%(asctime)s - %(name)s - %(levelname)s - %(message)s",
            Some("%d/%m/%Y %H:%M:%S"),
        )
        .unwrap();

        let line = formatter.render(&fixed_record("root", "image loaded"));
        assert_eq!(line, "09/03/2024 14:05:02 - root - INFO - image loaded");
    }

    #[test]
    fn test_render_without_name() {
        let formatter = Formatter::new(
            "%(asctime)s - %(levelname)s - %(message)s",
            Some("%d/%m/%Y %H:%M:%S"),
        )
        .unwrap();

        let line = formatter.render(&fixed_record("consoleLog", "image loaded"));
        assert_eq!(line, "09/03/2024 14:05:02 - INFO - image loaded");
        assert!(!line.contains("consoleLog"));
    }

    #[test]
    fn test_literal_percent() {
        let formatter = Formatter::new("%(message)s at 100%%", None).unwrap();
        let line = formatter.render(&fixed_record("root", "progress"));
        assert_eq!(line, "progress at 100%");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = Formatter::new("%(asctime)s %(thread)s", None).unwrap_err();
        assert_eq!(err, TemplateError::UnknownPlaceholder("thread".to_string()));
    }

    #[test]
    fn test_malformed_placeholder_rejected() {
        assert_eq!(
            Formatter::new("%(message", None).unwrap_err(),
            TemplateError::MalformedPlaceholder
        );
        assert_eq!(
            Formatter::new("%(message)d", None).unwrap_err(),
            TemplateError::MalformedPlaceholder
        );
        assert_eq!(
            Formatter::new("50% done", None).unwrap_err(),
            TemplateError::MalformedPlaceholder
        );
    }

    #[test]
    fn test_invalid_datefmt_rejected() {
        let err = Formatter::new("%(message)s", Some("%Q")).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidDateFormat(_)));
    }

    #[test]
    fn test_default_datefmt() {
        let formatter = Formatter::new("%(asctime)s %(message)s", None).unwrap();
        let line = formatter.render(&fixed_record("root", "x"));
        assert_eq!(line, "2024-03-09 14:05:02 x");
    }
}
