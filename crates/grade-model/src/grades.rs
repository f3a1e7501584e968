//! Current gradebook state supplied by the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A grade item that already exists in the gradebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub point_value: Option<f64>,
    /// Identifier in the system that manages this item, if it is external.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Display name of the managing system.
    #[serde(default)]
    pub external_app_name: Option<String>,
}

impl GradeItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            point_value: None,
            external_id: None,
            external_app_name: None,
        }
    }

    #[must_use]
    pub fn with_points(mut self, points: f64) -> Self {
        self.point_value = Some(points);
        self
    }

    #[must_use]
    pub fn managed_by(mut self, external_id: impl Into<String>, app_name: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self.external_app_name = Some(app_name.into());
        self
    }

    pub fn is_external(&self) -> bool {
        self.external_id.is_some()
    }
}

/// Stored score and comment for one student on one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingGrade {
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ExistingGrade {
    pub fn new(score: Option<&str>, comment: Option<&str>) -> Self {
        Self {
            score: score.map(str::to_string),
            comment: comment.map(str::to_string),
        }
    }
}

/// All grades of one student, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGrades {
    pub student_external_id: String,
    pub grades: BTreeMap<String, ExistingGrade>,
}

/// Item id -> student external id -> stored grade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExistingGradeSnapshot {
    items: BTreeMap<String, BTreeMap<String, ExistingGrade>>,
}

impl ExistingGradeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pivots per-student grade listings into per-item maps.
    pub fn from_student_grades<'a, I>(students: I) -> Self
    where
        I: IntoIterator<Item = &'a StudentGrades>,
    {
        let mut snapshot = Self::new();
        for student in students {
            for (item_id, grade) in &student.grades {
                snapshot.insert(item_id, &student.student_external_id, grade.clone());
            }
        }
        snapshot
    }

    pub fn insert(&mut self, item_id: &str, student_external_id: &str, grade: ExistingGrade) {
        self.items
            .entry(item_id.to_string())
            .or_default()
            .insert(student_external_id.to_string(), grade);
    }

    pub fn grade(&self, item_id: &str, student_external_id: &str) -> Option<&ExistingGrade> {
        self.items.get(item_id)?.get(student_external_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
