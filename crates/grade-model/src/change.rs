//! Proposed changes produced by reconciliation.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Item,
    Comment,
}

/// What an imported column means for the gradebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    /// No grade item with this title exists yet.
    New,
    /// The item exists but the imported point value differs.
    Modified,
    /// The item is managed by another system and cannot be imported into.
    External { app_name: Option<String> },
    /// At least one student's score or comment differs.
    Update,
    /// Nothing to change.
    Na,
    /// Not yet determined.
    Unknown,
}

impl ChangeStatus {
    pub fn code(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Modified => "MODIFIED",
            Self::External { .. } => "EXTERNAL",
            Self::Update => "UPDATE",
            Self::Na => "NA",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// True for statuses the caller has to act on.
    pub fn requires_action(&self) -> bool {
        matches!(self, Self::New | Self::Modified | Self::Update)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External {
                app_name: Some(name),
            } => write!(f, "EXTERNAL ({name})"),
            other => f.write_str(other.code()),
        }
    }
}

/// Before/after values for one student.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDetail {
    pub student_external_id: String,
    pub student_internal_id: String,
    pub new_score: Option<String>,
    pub new_comment: Option<String>,
    pub previous_score: Option<String>,
    pub previous_comment: Option<String>,
}

/// One reconciled column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub title: String,
    /// Header text the record was built from (last column wins on duplicates).
    pub raw_title: String,
    pub kind: ChangeKind,
    /// Matching grade item; `None` means the item does not exist yet.
    pub matched_item_id: Option<String>,
    pub point_value: Option<f64>,
    pub status: ChangeStatus,
    pub details: Vec<ChangeDetail>,
}

impl ChangeRecord {
    pub fn new(title: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            title: title.into(),
            raw_title: String::new(),
            kind,
            matched_item_id: None,
            point_value: None,
            status: ChangeStatus::Unknown,
            details: Vec::new(),
        }
    }
}
