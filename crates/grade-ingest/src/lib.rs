//! Grade import ingestion.
//!
//! This crate turns an uploaded grade sheet into a [`grade_model::NormalizedTable`].
//!
//! # Features
//!
//! - **Source Reading**: CSV/text files via `csv`, workbooks via `calamine`
//! - **Format Detection**: by file extension, then by MIME type
//! - **Table Building**: header classification and row mapping over raw rows
//! - **Rebuild**: re-run the mapping with another column layout from the
//!   retained raw rows
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use grade_ingest::{TableBuilder, read_source};
//! use grade_model::{ColumnLayout, RosterDirectory};
//!
//! let roster = RosterDirectory::from_students([("stu1", "uuid-1")]);
//! let raw_rows = read_source(Path::new("grades.csv"), None)?;
//!
//! let builder = TableBuilder::new(&roster);
//! let outcome = builder.build(raw_rows)?;
//!
//! // Identifier and name columns were swapped in the upload.
//! let fixed = builder.rebuild(&outcome.table.raw_rows, ColumnLayout::new(1, 0))?;
//! ```

#![deny(unsafe_code)]

mod builder;
mod source;

// === Table Building ===
pub use builder::{BuildOutcome, TableBuilder};

// === Source Reading ===
pub use source::{
    DelimitedOptions, SourceFormat, detect_format, read_delimited, read_delimited_path,
    read_source, read_workbook_path,
};
