//! Reconciliation of an imported grade table against the gradebook.
//!
//! Every non-ignored column becomes a [`ChangeRecord`] whose status says what
//! applying the import would do to the matching grade item:
//!
//! | Status     | Meaning                                                   |
//! |------------|-----------------------------------------------------------|
//! | `NEW`      | no grade item has the column's title                      |
//! | `EXTERNAL` | the item is managed by another tool and cannot be changed |
//! | `MODIFIED` | the header's point value differs from the item's          |
//! | `UPDATE`   | at least one student's score or comment differs           |
//! | `NA`       | nothing to change                                         |

#![deny(unsafe_code)]

mod engine;

use serde::Serialize;

use grade_model::{
    ChangeKind, ChangeRecord, Diagnostics, ExistingGradeSnapshot, GradeItem, NormalizedTable,
};

pub use engine::{determine_status, reconcile, scores_match, strip_point_zero};

/// Change records together with every diagnostic raised for the import.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub records: Vec<ChangeRecord>,
    pub diagnostics: Diagnostics,
}

impl Reconciliation {
    /// Reconciles `table`, appending to the diagnostics collected while
    /// building it.
    pub fn run(
        table: &mut NormalizedTable,
        known_items: &[GradeItem],
        snapshot: &ExistingGradeSnapshot,
        mut diagnostics: Diagnostics,
    ) -> Self {
        let records = reconcile(table, known_items, snapshot, &mut diagnostics);
        Self {
            records,
            diagnostics,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter().filter(|r| r.kind == ChangeKind::Item)
    }

    pub fn comments(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records
            .iter()
            .filter(|r| r.kind == ChangeKind::Comment)
    }

    /// Records with status `NEW`, `MODIFIED` or `UPDATE`.
    pub fn changes_requiring_action(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.records.iter().filter(|r| r.status.requires_action())
    }

    pub fn record(&self, title: &str, kind: ChangeKind) -> Option<&ChangeRecord> {
        self.records
            .iter()
            .find(|r| r.kind == kind && r.title == title)
    }
}
