//! Column classification and row mapping for imported grade sheets.
//!
//! - [`header`]: turns header text into typed [`grade_model::ColumnDescriptor`]s.
//! - [`row`]: turns a data row into a [`grade_model::Row`], resolving the
//!   student through an [`grade_model::IdentityResolver`].

#![deny(unsafe_code)]

pub mod header;
pub mod row;

pub use header::{HEADER_RULES, HeaderMatch, HeaderRule, classify, classify_header_row};
pub use row::{is_blank_row, map_row, trim_to_none};
