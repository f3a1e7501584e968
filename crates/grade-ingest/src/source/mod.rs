//! Reading import files into raw rows.
//!
//! The format is chosen from the file name first and the MIME type second.

mod delimited;
mod workbook;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use grade_model::{ImportError, Result};

pub use delimited::{DelimitedOptions, read_delimited, read_delimited_path};
pub use workbook::read_workbook_path;

const DELIMITED_EXTENSIONS: &[&str] = &["csv", "txt"];
const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "ods"];

const DELIMITED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "text/comma-separated-values",
    "text/plain",
    "application/csv",
    "application/x-csv",
];
const WORKBOOK_MIME_TYPES: &[&str] = &[
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel.sheet.macroenabled.12",
    "application/vnd.oasis.opendocument.spreadsheet",
];

/// Supported import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Comma separated text.
    Delimited,
    /// Spreadsheet workbook; only the first sheet is read.
    Workbook,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Workbook => "workbook",
        }
    }
}

fn format_from_extension(file_name: &str) -> Option<SourceFormat> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        Some(SourceFormat::Delimited)
    } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        Some(SourceFormat::Workbook)
    } else {
        None
    }
}

fn format_from_mime(mime_type: &str) -> Option<SourceFormat> {
    // Drop parameters such as `; charset=utf-8`.
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if DELIMITED_MIME_TYPES.contains(&essence.as_str()) {
        Some(SourceFormat::Delimited)
    } else if WORKBOOK_MIME_TYPES.contains(&essence.as_str()) {
        Some(SourceFormat::Workbook)
    } else {
        None
    }
}

/// Detects the source format from a file name and optional MIME type.
pub fn detect_format(file_name: &str, mime_type: Option<&str>) -> Result<SourceFormat> {
    format_from_extension(file_name)
        .or_else(|| mime_type.and_then(format_from_mime))
        .ok_or_else(|| ImportError::UnsupportedFileType {
            file_name: file_name.to_string(),
            mime_type: mime_type.unwrap_or("unknown").to_string(),
        })
}

/// Reads an import file into raw rows, header first.
pub fn read_source(path: &Path, mime_type: Option<&str>) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = detect_format(&file_name, mime_type)?;
    debug!(path = %path.display(), format = format.as_str(), "reading import file");

    match format {
        SourceFormat::Delimited => read_delimited_path(path, &DelimitedOptions::default()),
        SourceFormat::Workbook => read_workbook_path(path),
    }
}
