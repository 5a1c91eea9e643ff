//! Load diagnostics
//!
//! Rejected lines never fail a load. Each one is handed to a [`DiagnosticSink`]
//! supplied by the caller, and counted in the [`LoadReport`].

use crate::error::RecordError;

/// Category of a rejected line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Fewer tokens than the record requires
    ParameterCount,
    /// Keyword is not a known record or mesh type
    MeshType,
    /// A field failed to coerce
    Uninterpretable,
    /// Point light limit reached
    Capacity,
}

impl From<&RecordError> for DiagnosticKind {
    fn from(error: &RecordError) -> Self {
        match error {
            RecordError::ParameterCount { .. } => Self::ParameterCount,
            RecordError::MeshType { .. } => Self::MeshType,
            RecordError::Coercion(_) => Self::Uninterpretable,
            RecordError::Capacity { .. } => Self::Capacity,
        }
    }
}

/// A rejected line
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line number in the source (the header is line 1)
    pub line: usize,
    /// The line as read, without its terminator
    pub source: String,
    /// Why the line was rejected
    pub error: RecordError,
}

impl Diagnostic {
    /// Create a diagnostic
    pub fn new(line: usize, source: impl Into<String>, error: RecordError) -> Self {
        Self {
            line,
            source: source.into(),
            error,
        }
    }

    /// Category of the rejection
    pub fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::from(&self.error)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            DiagnosticKind::ParameterCount => write!(
                f,
                "line {}: \"{}\" has incorrect amount of parameters ({})",
                self.line, self.source, self.error
            ),
            DiagnosticKind::MeshType => {
                write!(f, "line {}: \"{}\" has incorrect mesh type", self.line, self.source)
            }
            DiagnosticKind::Uninterpretable => write!(
                f,
                "line {}: \"{}\" could not be interpreted ({})",
                self.line, self.source, self.error
            ),
            DiagnosticKind::Capacity => write!(
                f,
                "line {}: the scene has exceeded the maximum amount of point lights ({}), skipping",
                self.line, self.error
            ),
        }
    }
}

/// Receiver for rejected lines
pub trait DiagnosticSink {
    /// Handle one rejected line
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}

/// Sink that forwards to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

/// Summary of a completed load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read, header included
    pub lines_read: usize,
    /// Records committed into the document
    pub records_committed: usize,
    /// Lines rejected and reported to the sink
    pub lines_skipped: usize,
    /// Comment, blank and short lines
    pub lines_ignored: usize,
}

impl LoadReport {
    /// Check if every record line was committed
    pub fn is_clean(&self) -> bool {
        self.lines_skipped == 0
    }
}

impl std::fmt::Display for LoadReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lines, {} records loaded, {} skipped, {} ignored",
            self.lines_read, self.records_committed, self.lines_skipped, self.lines_ignored
        )
    }
}
