//! Non-fatal import warnings and the per-invocation collector.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Warning,
}

/// Machine-readable reason for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    EmptyHeader,
    EmptyInput,
    FileFormat,
    UnrecognizedHeader,
    DuplicateHeader,
    UnknownStudent,
    AliasResolutionFailed,
    OrphanCommentColumn,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyHeader => "empty_header",
            Self::EmptyInput => "empty_input",
            Self::FileFormat => "file_format",
            Self::UnrecognizedHeader => "unrecognized_header",
            Self::DuplicateHeader => "duplicate_header",
            Self::UnknownStudent => "unknown_student",
            Self::AliasResolutionFailed => "alias_resolution_failed",
            Self::OrphanCommentColumn => "orphan_comment_column",
        }
    }
}

/// A single problem found while importing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    /// Human-readable message.
    pub message: String,
    /// Display title of the column involved (if applicable).
    pub column_title: Option<String>,
    /// Student identifier as it appeared in the file (if applicable).
    pub student_id: Option<String>,
}

impl Diagnostic {
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            column_title: None,
            student_id: None,
        }
    }

    pub fn fatal(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            code,
            message: message.into(),
            column_title: None,
            student_id: None,
        }
    }

    #[must_use]
    pub fn with_column(mut self, title: impl Into<String>) -> Self {
        self.column_title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

/// Ordered diagnostics for one build + reconcile cycle.
///
/// Each import owns its own collector and threads it by `&mut` through the
/// header classifier, row mapper and reconciliation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// The event is mirrored at debug level with its code and column only;
    /// messages and student ids stay in the collector.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = diagnostic.code.as_str(),
            fatal = diagnostic.is_fatal(),
            column = diagnostic.column_title.as_deref().unwrap_or(""),
            "diagnostic recorded"
        );
        self.entries.push(diagnostic);
    }

    /// Records a warning with no column or student context.
    pub fn warn(&mut self, code: DiagnosticCode, message: impl Into<String>) {
        self.push(Diagnostic::warning(code, message));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_fatal())
    }

    pub fn has_fatal(&self) -> bool {
        self.entries.iter().any(Diagnostic::is_fatal)
    }

    pub fn count_of(&self, code: DiagnosticCode) -> usize {
        self.entries.iter().filter(|d| d.code == code).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
