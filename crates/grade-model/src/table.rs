use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ColumnDescriptor;

/// One student's imported value for one column title.
///
/// `previous_*` are filled in by reconciliation from the existing grades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub score: Option<String>,
    pub comment: Option<String>,
    pub previous_score: Option<String>,
    pub previous_comment: Option<String>,
}

impl Cell {
    pub fn with_score(score: Option<String>) -> Self {
        Self {
            score,
            ..Self::default()
        }
    }

    pub fn with_comment(comment: Option<String>) -> Self {
        Self {
            comment,
            ..Self::default()
        }
    }
}

/// A mapped data row for a student found in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Identifier as used by the institution (after alias resolution).
    pub student_external_id: String,
    /// Identifier resolved from the roster.
    pub student_internal_id: String,
    pub student_display_name: Option<String>,
    /// Cells keyed by column display title.
    pub cells: BTreeMap<String, Cell>,
}

impl Row {
    pub fn new(external_id: impl Into<String>, internal_id: impl Into<String>) -> Self {
        Self {
            student_external_id: external_id.into(),
            student_internal_id: internal_id.into(),
            student_display_name: None,
            cells: BTreeMap::new(),
        }
    }

    pub fn cell(&self, title: &str) -> Option<&Cell> {
        self.cells.get(title)
    }
}

/// Classified columns, mapped rows and the raw rows they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<Row>,
    /// Every source row verbatim, header first; used to rebuild the table
    /// after the column layout changes.
    pub raw_rows: Vec<Vec<String>>,
}

impl NormalizedTable {
    pub fn new(columns: Vec<ColumnDescriptor>, raw_rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            raw_rows,
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn find_row(&self, external_id: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.student_external_id == external_id)
    }
}
