use std::fmt::Display;

use crate::loader::Span;

#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Logs {
    logs: Vec<LogEntry>,
    has_error: bool,
}

pub trait LogSink {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry;

    fn emit_error(&mut self, msg: impl Into<String>, span: Span) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Error, msg, Some(span)))
    }

    fn emit_error_locless(&mut self, msg: impl Into<String>) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Error, msg, None))
    }

    fn emit_help_locless(&mut self, msg: impl Into<String>) -> &mut LogEntry {
        self.emit(LogEntry::new(LogLevel::Help, msg, None))
    }
}

impl LogSink for Logs {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry {
        self.has_error |= matches!(entry.level, LogLevel::Error);
        self.logs.push(entry);
        let last = self.logs.len() - 1;
        &mut self.logs[last]
    }
}

impl Logs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_errors(&self) -> bool {
        self.has_error
    }

    pub fn displayable_with<'a>(
        &'a self,
        src: &'a str,
    ) -> impl Iterator<Item = LogEntryDisplay<'a>> {
        self.logs.iter().map(|entry| LogEntryDisplay { src, entry })
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.logs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "snake_case"))]
pub enum LogLevel {
    Error,
    Help,
}

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LogEntry {
    pub message: String,
    pub span: Option<Span>,
    pub level: LogLevel,
    pub child: Option<Box<LogEntry>>,
}

impl LogEntry {
    fn new(level: LogLevel, msg: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            message: msg.into(),
            span,
            level,
            child: None,
        }
    }
}

impl LogSink for LogEntry {
    fn emit(&mut self, entry: LogEntry) -> &mut LogEntry {
        self.child.insert(Box::new(entry))
    }
}

/// ANSI rendering of an entry and its children, underlining the span inside
/// the (single line) source.
pub struct LogEntryDisplay<'a> {
    src: &'a str,
    entry: &'a LogEntry,
}

impl<'a> Display for LogEntryDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        pub const RESET: &str = "\x1b[0;22m";
        pub const BOLD: &str = "\x1b[1m";
        pub const RED: &str = "\x1b[31m";
        pub const GREEN: &str = "\x1b[32m";
        pub const CYAN: &str = "\x1b[36m";

        let mut next_entry = Some(self.entry);

        while let Some(entry) = next_entry {
            match entry.level {
                LogLevel::Help => write!(f, "{BOLD}{GREEN}help{RESET}{BOLD}: ")?,
                LogLevel::Error => write!(f, "{BOLD}{RED}error{RESET}{BOLD}: ")?,
            }
            writeln!(f, "{}{RESET}", entry.message)?;

            if let Some(Span(start, end)) = entry.span {
                write!(f, "{BOLD}{CYAN}  | {RESET}")?;
                for char in self.src.chars() {
                    if char.is_control() {
                        write!(f, " ")?
                    } else {
                        write!(f, "{char}")?
                    }
                }
                writeln!(f)?;

                write!(f, "{BOLD}{CYAN}  | ")?;
                let mut index = 0;
                for char in self.src.chars() {
                    if (start..end).contains(&index) {
                        write!(f, "~")?;
                    } else {
                        write!(f, " ")?;
                    }
                    index += char.len_utf8();
                }
                writeln!(f, "{RESET}")?;
            }
            next_entry = entry.child.as_deref()
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSI: [&str; 5] = ["\x1b[0;22m", "\x1b[1m", "\x1b[31m", "\x1b[32m", "\x1b[36m"];

    fn strip(s: String) -> String {
        ANSI.iter().fold(s, |s, code| s.replace(code, ""))
    }

    #[test]
    fn underlines_span() {
        let mut logs = Logs::new();
        logs.emit_error("invalid character 'x'", Span(2, 3))
            .emit_help_locless("expression must contain only 'P' and '0'");
        let rendered: Vec<_> = logs
            .displayable_with("P0x0")
            .map(|d| strip(d.to_string()))
            .collect();

        assert_eq!(
            rendered,
            [concat!(
                "error: invalid character 'x'\n",
                "  | P0x0\n",
                "  |   ~ \n",
                "help: expression must contain only 'P' and '0'\n",
            )]
        );
    }

    #[test]
    fn tracks_errors() {
        let mut logs = Logs::new();
        logs.emit_help_locless("just a hint");
        assert!(!logs.contains_errors());
        logs.emit_error_locless("bad");
        assert!(logs.contains_errors());
        assert_eq!(logs.entries().len(), 2);
    }

    #[test]
    fn multibyte_span() {
        let mut logs = Logs::new();
        logs.emit_error("invalid character 'é'", Span(1, 3));
        let rendered = strip(logs.displayable_with("Pé").next().unwrap().to_string());
        assert!(rendered.ends_with("  | Pé\n  |  ~\n"));
    }
}
