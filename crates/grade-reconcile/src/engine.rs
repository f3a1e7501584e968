//! Column-by-column comparison of an imported table with the gradebook.

use std::collections::HashMap;

use tracing::{debug, info, info_span};

use grade_model::{
    ChangeDetail, ChangeKind, ChangeRecord, ChangeStatus, ColumnDescriptor, ColumnKind,
    Diagnostic, DiagnosticCode, Diagnostics, ExistingGradeSnapshot, GradeItem, NormalizedTable,
};

/// Removes one trailing `.0`, so `"85.0"` and `"85"` compare equal.
pub fn strip_point_zero(score: &str) -> &str {
    score.strip_suffix(".0").unwrap_or(score)
}

/// Loose score equality used when deciding whether a column changed.
pub fn scores_match(imported: &str, existing: Option<&str>) -> bool {
    existing.is_some_and(|existing| strip_point_zero(imported) == strip_point_zero(existing))
}

fn change_kind(kind: ColumnKind) -> Option<ChangeKind> {
    match kind {
        ColumnKind::GradedItemWithPoints | ColumnKind::GradedItemWithoutPoints => {
            Some(ChangeKind::Item)
        }
        ColumnKind::Comment => Some(ChangeKind::Comment),
        ColumnKind::StudentIdentifier | ColumnKind::StudentDisplayName | ColumnKind::Ignored => {
            None
        }
    }
}

fn points_differ(column: &ColumnDescriptor, item: &GradeItem) -> bool {
    if column.kind != ColumnKind::GradedItemWithPoints {
        return false;
    }
    match (column.point_value, item.point_value) {
        (Some(imported), Some(stored)) => imported != stored,
        _ => true,
    }
}

/// Scans every row for a matched, locally managed item.
///
/// Copies the existing grade into each row's cell as the previous value and
/// reports whether any non-blank imported value differs from it.
fn scan_rows(
    column: &ColumnDescriptor,
    item: &GradeItem,
    table: &mut NormalizedTable,
    snapshot: &ExistingGradeSnapshot,
) -> bool {
    let mut changed = false;
    for row in &mut table.rows {
        let existing = snapshot.grade(&item.id, &row.student_external_id);
        let Some(cell) = row.cells.get_mut(&column.display_title) else {
            continue;
        };
        if let Some(existing) = existing {
            cell.previous_score = existing
                .score
                .as_deref()
                .map(|score| strip_point_zero(score).to_string());
            cell.previous_comment.clone_from(&existing.comment);
        }

        let existing_score = existing.and_then(|e| e.score.as_deref());
        let existing_comment = existing.and_then(|e| e.comment.as_deref());
        let differs = if column.kind == ColumnKind::Comment {
            cell.comment
                .as_deref()
                .is_some_and(|comment| Some(comment) != existing_comment)
        } else {
            cell.score
                .as_deref()
                .is_some_and(|score| !scores_match(score, existing_score))
        };
        if differs {
            debug!(column = %column.display_title, "imported value differs");
            changed = true;
        }
    }
    changed
}

/// Decides the status of one column. The first matching rule wins.
pub fn determine_status(
    column: &ColumnDescriptor,
    item: Option<&GradeItem>,
    table: &mut NormalizedTable,
    snapshot: &ExistingGradeSnapshot,
) -> ChangeStatus {
    let Some(item) = item else {
        return ChangeStatus::New;
    };
    if item.is_external() {
        return ChangeStatus::External {
            app_name: item.external_app_name.clone(),
        };
    }
    if points_differ(column, item) {
        return ChangeStatus::Modified;
    }
    if scan_rows(column, item, table, snapshot) {
        ChangeStatus::Update
    } else {
        ChangeStatus::Na
    }
}

fn details_for(title: &str, table: &NormalizedTable) -> Vec<ChangeDetail> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let cell = row.cell(title)?;
            Some(ChangeDetail {
                student_external_id: row.student_external_id.clone(),
                student_internal_id: row.student_internal_id.clone(),
                new_score: cell.score.clone(),
                new_comment: cell.comment.clone(),
                previous_score: cell.previous_score.clone(),
                previous_comment: cell.previous_comment.clone(),
            })
        })
        .collect()
}

/// Produces one change record per (title, kind) in first-seen column order.
///
/// Previous scores and comments are written back into `table`'s cells. A
/// comment record with no item record of the same title raises an
/// `OrphanCommentColumn` warning and is kept.
pub fn reconcile(
    table: &mut NormalizedTable,
    known_items: &[GradeItem],
    snapshot: &ExistingGradeSnapshot,
    diagnostics: &mut Diagnostics,
) -> Vec<ChangeRecord> {
    let span = info_span!(
        "reconcile",
        columns = table.columns.len(),
        rows = table.rows.len()
    );
    let _guard = span.enter();

    // First item wins when names repeat.
    let mut items_by_name: HashMap<&str, &GradeItem> = HashMap::with_capacity(known_items.len());
    for item in known_items {
        items_by_name.entry(item.name.as_str()).or_insert(item);
    }

    let columns = table.columns.clone();
    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut positions: HashMap<(String, ChangeKind), usize> = HashMap::new();

    for column in &columns {
        let Some(kind) = change_kind(column.kind) else {
            debug!(column = %column.raw_title, "column ignored");
            continue;
        };
        let title = column.display_title.as_str();
        let item = items_by_name.get(title).copied();
        let status = determine_status(column, item, table, snapshot);
        info!(column = title, kind = ?kind, status = %status, "reconciled column");

        let index = *positions
            .entry((title.to_string(), kind))
            .or_insert_with(|| {
                records.push(ChangeRecord::new(title, kind));
                records.len() - 1
            });
        let record = &mut records[index];
        record.raw_title = column.raw_title.trim().to_string();
        record.matched_item_id = item.map(|item| item.id.clone());
        if column.kind == ColumnKind::GradedItemWithPoints {
            record.point_value = column.point_value;
        }
        record.status = status;
        record.details = details_for(title, table);
    }

    for record in records.iter().filter(|r| r.kind == ChangeKind::Comment) {
        if !positions.contains_key(&(record.title.clone(), ChangeKind::Item)) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::OrphanCommentColumn,
                    format!(
                        "The comment column '{}' does not have a corresponding grade item.",
                        record.title
                    ),
                )
                .with_column(record.title.clone()),
            );
        }
    }

    info!(
        records = records.len(),
        actionable = records.iter().filter(|r| r.status.requires_action()).count(),
        "reconciliation complete"
    );
    records
}

#[cfg(test)]
mod tests {
    use grade_model::{Cell, ExistingGrade, Row};

    use super::*;

    fn points_column(title: &str, points: f64) -> ColumnDescriptor {
        ColumnDescriptor::new(2, format!("{title} [{points}]"), title, ColumnKind::GradedItemWithPoints)
            .with_points(points)
    }

    fn table_with(column: ColumnDescriptor, scores: &[(&str, Option<&str>)]) -> NormalizedTable {
        let mut table = NormalizedTable::new(vec![column.clone()], Vec::new());
        for (student, score) in scores {
            let mut row = Row::new(*student, format!("uuid-{student}"));
            row.cells.insert(
                column.display_title.clone(),
                Cell::with_score(score.map(str::to_string)),
            );
            table.push_row(row);
        }
        table
    }

    #[test]
    fn point_zero_is_stripped_once() {
        assert_eq!(strip_point_zero("85.0"), "85");
        assert_eq!(strip_point_zero("85.0.0"), "85.0");
        assert_eq!(strip_point_zero("85.05"), "85.05");
        assert!(scores_match("85", Some("85.0")));
        assert!(!scores_match("85", Some("85.5")));
        assert!(!scores_match("85", None));
    }

    #[test]
    fn no_item_is_new() {
        let column = points_column("Quiz", 10.0);
        let mut table = table_with(column.clone(), &[("stu1", Some("8"))]);
        let status = determine_status(&column, None, &mut table, &ExistingGradeSnapshot::new());
        assert_eq!(status, ChangeStatus::New);
    }

    #[test]
    fn external_item_wins_over_point_mismatch() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz")
            .with_points(20.0)
            .managed_by("ext-1", "Tests & Quizzes");
        let mut table = table_with(column.clone(), &[]);
        let status =
            determine_status(&column, Some(&item), &mut table, &ExistingGradeSnapshot::new());
        assert_eq!(
            status,
            ChangeStatus::External {
                app_name: Some("Tests & Quizzes".into())
            }
        );
    }

    #[test]
    fn point_mismatch_is_modified_without_score_changes() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz").with_points(20.0);
        let mut snapshot = ExistingGradeSnapshot::new();
        snapshot.insert("1", "stu1", ExistingGrade::new(Some("8"), None));
        let mut table = table_with(column.clone(), &[("stu1", Some("8"))]);
        let status = determine_status(&column, Some(&item), &mut table, &snapshot);
        assert_eq!(status, ChangeStatus::Modified);
    }

    #[test]
    fn missing_stored_points_is_modified() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz");
        let mut table = table_with(column.clone(), &[]);
        let status =
            determine_status(&column, Some(&item), &mut table, &ExistingGradeSnapshot::new());
        assert_eq!(status, ChangeStatus::Modified);
    }

    #[test]
    fn loose_equal_scores_are_na_and_fill_previous() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz").with_points(10.0);
        let mut snapshot = ExistingGradeSnapshot::new();
        snapshot.insert("1", "stu1", ExistingGrade::new(Some("85.0"), Some("ok")));
        let mut table = table_with(column.clone(), &[("stu1", Some("85")), ("stu2", None)]);

        let status = determine_status(&column, Some(&item), &mut table, &snapshot);
        assert_eq!(status, ChangeStatus::Na);
        let cell = table.rows[0].cell("Quiz").expect("cell");
        assert_eq!(cell.previous_score.as_deref(), Some("85"));
        assert_eq!(cell.previous_comment.as_deref(), Some("ok"));
    }

    #[test]
    fn any_changed_score_is_update() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz").with_points(10.0);
        let mut snapshot = ExistingGradeSnapshot::new();
        snapshot.insert("1", "stu1", ExistingGrade::new(Some("85"), None));
        snapshot.insert("1", "stu2", ExistingGrade::new(Some("70"), None));
        let mut table = table_with(column.clone(), &[("stu1", Some("85.5")), ("stu2", Some("70"))]);
        let status = determine_status(&column, Some(&item), &mut table, &snapshot);
        assert_eq!(status, ChangeStatus::Update);
    }

    #[test]
    fn score_for_student_without_grade_is_update() {
        let column = points_column("Quiz", 10.0);
        let item = GradeItem::new("1", "Quiz").with_points(10.0);
        let mut table = table_with(column.clone(), &[("stu1", Some("5"))]);
        let status =
            determine_status(&column, Some(&item), &mut table, &ExistingGradeSnapshot::new());
        assert_eq!(status, ChangeStatus::Update);
    }

    #[test]
    fn comments_compare_verbatim() {
        let column = ColumnDescriptor::new(3, "* Quiz", "Quiz", ColumnKind::Comment);
        let item = GradeItem::new("1", "Quiz").with_points(10.0);
        let mut snapshot = ExistingGradeSnapshot::new();
        snapshot.insert("1", "stu1", ExistingGrade::new(None, Some("Good")));

        let mut table = NormalizedTable::new(vec![column.clone()], Vec::new());
        let mut row = Row::new("stu1", "uuid-1");
        row.cells
            .insert("Quiz".into(), Cell::with_comment(Some("good".into())));
        table.push_row(row);

        let status = determine_status(&column, Some(&item), &mut table, &snapshot);
        assert_eq!(status, ChangeStatus::Update);
    }
}
