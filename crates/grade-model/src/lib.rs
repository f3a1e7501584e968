//! Shared types for grade import: columns, rows, grade items, change records,
//! diagnostics and the fatal [`ImportError`].

#![deny(unsafe_code)]

pub mod change;
pub mod column;
pub mod diagnostics;
pub mod error;
pub mod grades;
pub mod identity;
pub mod options;
pub mod table;

pub use change::{ChangeDetail, ChangeKind, ChangeRecord, ChangeStatus};
pub use column::{ColumnDescriptor, ColumnKind, ColumnLayout};
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use error::{ImportError, Result};
pub use grades::{ExistingGrade, ExistingGradeSnapshot, GradeItem, StudentGrades};
pub use identity::{IdentityResolver, RosterDirectory};
pub use options::{DEFAULT_ALIAS_PREFIX, ImportOptions};
pub use table::{Cell, NormalizedTable, Row};
