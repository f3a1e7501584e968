//! Error types for grade import.
//!
//! Everything here is fatal: the pipeline stops and no change records are
//! produced. Row- and column-level problems are reported as warnings through
//! [`crate::Diagnostics`] instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticCode};

/// Errors that abort an import.
#[derive(Debug, Error)]
pub enum ImportError {
    // === Header Errors ===
    /// A non-positional header cell is blank.
    #[error("blank or missing column header at column {column_index}")]
    EmptyHeader { column_index: usize },

    /// Source has no rows at all, so there is no header row.
    #[error("import file contains no header row")]
    EmptyInput,

    // === Source Errors ===
    /// Source could not be tokenized into rows (corrupt workbook, bad CSV).
    #[error("failed to parse {path}: {message}")]
    FileFormat { path: PathBuf, message: String },

    /// Neither the file name nor the MIME type identify a supported format.
    #[error("unsupported file type for grade import: {file_name} ({mime_type})")]
    UnsupportedFileType { file_name: String, mime_type: String },

    /// Import file not found.
    #[error("import file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ImportError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::EmptyHeader { .. } => DiagnosticCode::EmptyHeader,
            Self::EmptyInput => DiagnosticCode::EmptyInput,
            Self::FileFormat { .. }
            | Self::UnsupportedFileType { .. }
            | Self::FileNotFound { .. }
            | Self::FileRead { .. } => DiagnosticCode::FileFormat,
        }
    }

    /// Renders this error as a fatal diagnostic for callers that display
    /// everything in a single list.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::fatal(self.code(), self.to_string())
    }

    /// Maps an I/O error for `path`, distinguishing a missing file.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
