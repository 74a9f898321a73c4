//! Collected diagnostics for best-effort translation.
//!
//! Per-symbol, per-cell and per-room problems never abort the batch. They are
//! recorded here (so callers and tests can inspect them) and forwarded to the
//! `log` facade at the same time.

use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Non-actionable detail, e.g. known legacy quirks being cleaned up.
    Verbose,
    Info,
    /// Data was degraded, processing continued.
    Warning,
    /// Output for the current scope (room, location) is not meaningful.
    Error,
}

impl Severity {
    fn log_level(self) -> log::Level {
        match self {
            Severity::Verbose => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// A single recorded problem.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

/// Append-only diagnostic sink.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: &'static str, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        log::log!(severity.log_level(), "{}", message);
        self.entries.push(Diagnostic {
            category,
            severity,
            message,
        });
    }

    pub fn verbose(&mut self, category: &'static str, message: impl Into<String>) {
        self.push(category, Severity::Verbose, message);
    }

    pub fn info(&mut self, category: &'static str, message: impl Into<String>) {
        self.push(category, Severity::Info, message);
    }

    pub fn warn(&mut self, category: &'static str, message: impl Into<String>) {
        self.push(category, Severity::Warning, message);
    }

    pub fn error(&mut self, category: &'static str, message: impl Into<String>) {
        self.push(category, Severity::Error, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}
