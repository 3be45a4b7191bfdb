//! Override-aware line formatter
//!
//! Renders a [`LogRecord`] into a single text line. Before rendering, the
//! record's override fields are substituted for its natural values:
//!
//! 1. a name override replaces the logger name
//! 2. a function-name override replaces the *file* field
//! 3. a file-name override replaces the file field again, so it wins over (2)
//!
//! The default template only renders the timestamp, level, name and message,
//! so (2) and (3) only show up with a template that includes `{filename}`.

use crate::record::LogRecord;

/// Template used by loggers built through the factory
pub const DEFAULT_TEMPLATE: &str = "{asctime} - {levelname} - {name} - {message}";

/// Timestamp layout for `{asctime}`, e.g. `2026-01-21 14:30:45,123`
pub const ASCTIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Asctime,
    Levelname,
    Levelno,
    Name,
    Message,
    Filename,
    FuncName,
    Lineno,
}

impl Field {
    fn parse(ident: &str) -> Option<Self> {
        match ident {
            "asctime" => Some(Field::Asctime),
            "levelname" => Some(Field::Levelname),
            "levelno" => Some(Field::Levelno),
            "name" => Some(Field::Name),
            "message" => Some(Field::Message),
            "filename" => Some(Field::Filename),
            "funcName" => Some(Field::FuncName),
            "lineno" => Some(Field::Lineno),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Formats records into text lines
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    segments: Vec<Segment>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::with_template(DEFAULT_TEMPLATE)
    }
}

impl Formatter {
    /// Create a formatter using [`DEFAULT_TEMPLATE`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter with a custom template
    ///
    /// Placeholders: `{asctime}`, `{levelname}`, `{levelno}`, `{name}`,
    /// `{message}`, `{filename}`, `{funcName}`, `{lineno}`. Use `{{` and `}}`
    /// for literal braces. Unknown placeholders are rendered as written.
    pub fn with_template(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = parse_template(&template);
        Self { template, segments }
    }

    /// The template this formatter renders
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Return a copy of `record` with its override fields substituted
    pub fn apply_overrides(&self, record: &LogRecord) -> LogRecord {
        let mut resolved = record.clone();
        let overrides = &record.overrides;

        if let Some(name) = &overrides.name {
            resolved.name = name.clone();
        }
        if let Some(func_name) = &overrides.func_name {
            resolved.filename = func_name.clone();
        }
        if let Some(file_name) = &overrides.file_name {
            resolved.filename = file_name.clone();
        }

        resolved
    }

    /// Render a record into a line (without trailing newline)
    pub fn format(&self, record: &LogRecord) -> String {
        let record = self.apply_overrides(record);
        let mut line = String::with_capacity(64 + record.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Field(field) => render_field(&mut line, *field, &record),
            }
        }

        line
    }
}

fn render_field(out: &mut String, field: Field, record: &LogRecord) {
    use std::fmt::Write;

    match field {
        Field::Asctime => {
            let _ = write!(out, "{}", record.timestamp.format(ASCTIME_FORMAT));
        }
        Field::Levelname => out.push_str(record.level.as_str()),
        Field::Levelno => {
            let _ = write!(out, "{}", record.level.value());
        }
        Field::Name => out.push_str(&record.name),
        Field::Message => out.push_str(&record.message),
        Field::Filename => out.push_str(&record.filename),
        Field::FuncName => out.push_str(&record.func_name),
        Field::Lineno => {
            let _ = write!(out, "{}", record.lineno);
        }
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") {
            literal.push('{');
            rest = &rest[2..];
            continue;
        }
        if rest.starts_with("}}") {
            literal.push('}');
            rest = &rest[2..];
            continue;
        }

        if c == '{' {
            if let Some(end) = rest.find('}') {
                if let Some(field) = Field::parse(&rest[1..end]) {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::record::Overrides;
    use chrono::{Local, TimeZone};

    fn fixed_record(level: Level, message: &str) -> LogRecord {
        let ts = Local
            .with_ymd_and_hms(2026, 1, 21, 14, 30, 45)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(123))
            .unwrap();
        LogRecord::new(level, "app", message)
            .with_timestamp(ts)
            .with_location("main.rs", "app::run", 7)
    }

    #[test]
    fn test_default_template_line() {
        let formatter = Formatter::new();
        let line = formatter.format(&fixed_record(Level::Info, "Starting application"));
        assert_eq!(line, "2026-01-21 14:30:45,123 - INFO - app - Starting application");
    }

    #[test]
    fn test_name_override_replaces_name() {
        let formatter = Formatter::new();
        let record = fixed_record(Level::Warning, "disk low")
            .with_overrides(Overrides::new().name("storage"));
        let line = formatter.format(&record);
        assert!(line.ends_with(" - WARNING - storage - disk low"));
    }

    #[test]
    fn test_file_overrides_are_inert_in_default_template() {
        let formatter = Formatter::new();
        let plain = fixed_record(Level::Info, "msg");
        let overridden = plain
            .clone()
            .with_overrides(Overrides::new().func_name("handler").file_name("db.rs"));
        assert_eq!(formatter.format(&plain), formatter.format(&overridden));
    }

    #[test]
    fn test_func_name_override_targets_file_field() {
        let formatter = Formatter::new();
        let record = fixed_record(Level::Info, "msg")
            .with_overrides(Overrides::new().func_name("handler"));
        let resolved = formatter.apply_overrides(&record);
        assert_eq!(resolved.filename, "handler");
        assert_eq!(resolved.func_name, "app::run");
    }

    #[test]
    fn test_file_name_override_wins() {
        let formatter = Formatter::with_template("{filename}|{funcName}");
        let both = fixed_record(Level::Info, "msg")
            .with_overrides(Overrides::new().func_name("handler").file_name("db.rs"));
        let file_only =
            fixed_record(Level::Info, "msg").with_overrides(Overrides::new().file_name("db.rs"));

        assert_eq!(formatter.format(&both), "db.rs|app::run");
        assert_eq!(formatter.format(&both), formatter.format(&file_only));
    }

    #[test]
    fn test_no_overrides_keeps_natural_fields() {
        let formatter = Formatter::with_template("{name}:{filename}:{lineno}");
        assert_eq!(formatter.format(&fixed_record(Level::Debug, "x")), "app:main.rs:7");
    }

    #[test]
    fn test_custom_template_escapes_and_unknown_fields() {
        let formatter = Formatter::with_template("{{{levelname}}} {levelno} {unknown} {message");
        let line = formatter.format(&fixed_record(Level::Error, "boom"));
        assert_eq!(line, "{ERROR} 40 {unknown} {message");
    }
}
