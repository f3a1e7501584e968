//! Column descriptors produced by header classification.

use serde::{Deserialize, Serialize};

/// Semantic role of an imported column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    StudentIdentifier,
    StudentDisplayName,
    GradedItemWithPoints,
    GradedItemWithoutPoints,
    Comment,
    Ignored,
}

impl ColumnKind {
    /// True for columns that never produce a change record.
    pub fn is_ignorable(self) -> bool {
        matches!(
            self,
            Self::Ignored | Self::StudentIdentifier | Self::StudentDisplayName
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StudentIdentifier => "student id",
            Self::StudentDisplayName => "student name",
            Self::GradedItemWithPoints => "item (points)",
            Self::GradedItemWithoutPoints => "item",
            Self::Comment => "comment",
            Self::Ignored => "ignored",
        }
    }
}

/// A classified header cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Position of the column in the source row.
    pub index: usize,
    /// Header text exactly as it appeared in the file.
    pub raw_title: String,
    /// Trimmed or derived title; the key cells and grade items join on.
    pub display_title: String,
    pub kind: ColumnKind,
    /// Maximum points, only for [`ColumnKind::GradedItemWithPoints`].
    pub point_value: Option<f64>,
}

impl ColumnDescriptor {
    pub fn new(
        index: usize,
        raw_title: impl Into<String>,
        display_title: impl Into<String>,
        kind: ColumnKind,
    ) -> Self {
        Self {
            index,
            raw_title: raw_title.into(),
            display_title: display_title.into(),
            kind,
            point_value: None,
        }
    }

    #[must_use]
    pub fn with_points(mut self, points: f64) -> Self {
        self.point_value = Some(points);
        self
    }

    pub fn is_ignorable(&self) -> bool {
        self.kind.is_ignorable()
    }
}

/// Positions of the columns classified by position rather than header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub identifier_column: usize,
    pub name_column: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            identifier_column: 0,
            name_column: 1,
        }
    }
}

impl ColumnLayout {
    pub fn new(identifier_column: usize, name_column: usize) -> Self {
        Self {
            identifier_column,
            name_column,
        }
    }

    /// Returns the positional kind for `index`, if any.
    pub fn positional_kind(&self, index: usize) -> Option<ColumnKind> {
        if index == self.identifier_column {
            Some(ColumnKind::StudentIdentifier)
        } else if index == self.name_column {
            Some(ColumnKind::StudentDisplayName)
        } else {
            None
        }
    }
}
