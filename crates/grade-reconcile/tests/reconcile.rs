//! Build-then-reconcile scenarios over realistic grade sheets.

use grade_ingest::TableBuilder;
use grade_model::{
    ChangeKind, ChangeStatus, DiagnosticCode, ExistingGrade, ExistingGradeSnapshot, GradeItem,
    NormalizedTable, RosterDirectory,
};
use grade_reconcile::Reconciliation;
use proptest::prelude::*;

fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(|v| (*v).to_string()).collect())
        .collect()
}

fn roster() -> RosterDirectory {
    RosterDirectory::from_students([("stu1", "uuid-1"), ("stu2", "uuid-2"), ("stu3", "uuid-3")])
}

fn run(
    raw: Vec<Vec<String>>,
    items: &[GradeItem],
    snapshot: &ExistingGradeSnapshot,
) -> (Reconciliation, NormalizedTable) {
    let roster = roster();
    let outcome = TableBuilder::new(&roster).build(raw).expect("build table");
    let mut table = outcome.table;
    let result = Reconciliation::run(&mut table, items, snapshot, outcome.diagnostics);
    (result, table)
}

#[test]
fn new_item_with_comment_sibling() {
    let (result, _) = run(
        rows(&[
            &["ID", "Name", "Quiz 1 [10]", "* Quiz 1"],
            &["stu1", "Jane", "8", "great work"],
        ]),
        &[],
        &ExistingGradeSnapshot::new(),
    );

    assert_eq!(result.records.len(), 2);
    assert!(result.diagnostics.is_empty());

    let item = result.record("Quiz 1", ChangeKind::Item).expect("item record");
    let json = serde_json::to_string_pretty(item).expect("serialize record");
    insta::assert_snapshot!(json, @r#"
    {
      "title": "Quiz 1",
      "raw_title": "Quiz 1 [10]",
      "kind": "item",
      "matched_item_id": null,
      "point_value": 10.0,
      "status": {
        "code": "NEW"
      },
      "details": [
        {
          "student_external_id": "stu1",
          "student_internal_id": "uuid-1",
          "new_score": "8",
          "new_comment": "great work",
          "previous_score": null,
          "previous_comment": null
        }
      ]
    }
    "#);

    let comment = result
        .record("Quiz 1", ChangeKind::Comment)
        .expect("comment record");
    assert_eq!(comment.status, ChangeStatus::New);
    assert_eq!(comment.raw_title, "* Quiz 1");
}

#[test]
fn orphan_comment_column_warns_once() {
    let (result, _) = run(
        rows(&[
            &["ID", "Name", "* Participation"],
            &["stu1", "Jane", "asks good questions"],
        ]),
        &[GradeItem::new("7", "Participation")],
        &ExistingGradeSnapshot::new(),
    );

    assert_eq!(result.comments().count(), 1);
    assert_eq!(result.items().count(), 0);
    assert_eq!(
        result
            .diagnostics
            .count_of(DiagnosticCode::OrphanCommentColumn),
        1
    );
    let warning = result.diagnostics.iter().next().expect("warning");
    assert_eq!(warning.column_title.as_deref(), Some("Participation"));
    assert!(warning.message.contains("'Participation'"));
}

#[test]
fn statuses_across_a_full_sheet() {
    let items = vec![
        GradeItem::new("1", "Quiz 1").with_points(10.0),
        GradeItem::new("2", "Midterm").with_points(50.0),
        GradeItem::new("3", "Lab").with_points(20.0),
        GradeItem::new("4", "Essay").managed_by("ext-4", "Assignments"),
        GradeItem::new("5", "Attendance"),
    ];
    let mut snapshot = ExistingGradeSnapshot::new();
    snapshot.insert("1", "stu1", ExistingGrade::new(Some("8.0"), Some("nice")));
    snapshot.insert("1", "stu2", ExistingGrade::new(Some("6"), None));
    snapshot.insert("3", "stu1", ExistingGrade::new(Some("15"), None));
    snapshot.insert("5", "stu1", ExistingGrade::new(Some("1"), None));

    let (result, table) = run(
        rows(&[
            &[
                "ID",
                "Name",
                "Quiz 1 [10]",
                "* Quiz 1",
                "Midterm [60]",
                "Lab [20]",
                "Essay",
                "Attendance",
                "Final [100]",
                "# Total",
            ],
            &["stu1", "Jane", "8", "nice", "40", "17", "A", "1", "", "99"],
            &["stu2", "Omar", "6.0", "", "45", "", "B", "", "", "98"],
        ]),
        &items,
        &snapshot,
    );

    let statuses: Vec<(String, ChangeKind, String)> = result
        .records
        .iter()
        .map(|r| (r.title.clone(), r.kind, r.status.to_string()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("Quiz 1".into(), ChangeKind::Item, "NA".into()),
            ("Quiz 1".into(), ChangeKind::Comment, "NA".into()),
            ("Midterm".into(), ChangeKind::Item, "MODIFIED".into()),
            ("Lab".into(), ChangeKind::Item, "UPDATE".into()),
            ("Essay".into(), ChangeKind::Item, "EXTERNAL (Assignments)".into()),
            ("Attendance".into(), ChangeKind::Item, "NA".into()),
            ("Final".into(), ChangeKind::Item, "NEW".into()),
        ]
    );

    let actionable: Vec<&str> = result
        .changes_requiring_action()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(actionable, vec!["Midterm", "Lab", "Final"]);

    let quiz = table.rows[0].cell("Quiz 1").expect("quiz cell");
    assert_eq!(quiz.previous_score.as_deref(), Some("8"));
    assert_eq!(quiz.previous_comment.as_deref(), Some("nice"));

    let lab = result.record("Lab", ChangeKind::Item).expect("lab record");
    assert_eq!(lab.matched_item_id.as_deref(), Some("3"));
    assert_eq!(lab.details.len(), 2);
    assert_eq!(lab.details[0].previous_score.as_deref(), Some("15"));
    assert_eq!(lab.details[1].new_score, None);
}

#[test]
fn duplicate_columns_merge_into_first_record() {
    let items = vec![GradeItem::new("1", "Quiz")];
    let mut snapshot = ExistingGradeSnapshot::new();
    snapshot.insert("1", "stu1", ExistingGrade::new(Some("5"), None));

    let (result, _) = run(
        rows(&[
            &["ID", "Name", "Quiz", "Lab", "Quiz"],
            &["stu1", "Jane", "9", "1", "5"],
        ]),
        &items,
        &snapshot,
    );

    let titles: Vec<&str> = result.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Quiz", "Lab"]);
    // The later column overwrote the cell with "5", which matches.
    let quiz = result.record("Quiz", ChangeKind::Item).expect("quiz");
    assert_eq!(quiz.status, ChangeStatus::Na);
    assert_eq!(quiz.details.len(), 1);
    assert_eq!(
        result.diagnostics.count_of(DiagnosticCode::DuplicateHeader),
        1
    );
}

#[test]
fn result_serializes_with_diagnostics() {
    let (result, _) = run(
        rows(&[&["ID", "Name", "Quiz"], &["stu9", "Ghost", "1"]]),
        &[],
        &ExistingGradeSnapshot::new(),
    );
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["records"][0]["status"]["code"], "NEW");
    assert_eq!(value["diagnostics"][0]["code"], "unknown_student");
    assert_eq!(value["diagnostics"][0]["severity"], "warning");
}

fn score() -> impl Strategy<Value = String> {
    (0u32..100, any::<bool>()).prop_map(|(n, point_zero)| {
        if point_zero {
            format!("{n}.0")
        } else {
            n.to_string()
        }
    })
}

proptest! {
    #[test]
    fn loose_equal_scores_never_update(scores in prop::collection::vec((score(), any::<bool>()), 1..3)) {
        let items = vec![GradeItem::new("1", "Quiz").with_points(10.0)];
        let mut snapshot = ExistingGradeSnapshot::new();
        let mut raw = vec![vec!["ID".to_string(), "Name".to_string(), "Quiz [10]".to_string()]];
        for (index, (value, blank_import)) in scores.iter().enumerate() {
            let student = format!("stu{}", index + 1);
            snapshot.insert("1", &student, ExistingGrade::new(Some(value), None));
            let imported = if *blank_import {
                String::new()
            } else {
                value.trim_end_matches(".0").to_string()
            };
            raw.push(vec![student, "Name".to_string(), imported]);
        }

        let (result, _) = run(raw, &items, &snapshot);
        prop_assert_eq!(&result.records[0].status, &ChangeStatus::Na);
    }

    #[test]
    fn unmatched_titles_are_always_new(title in "[A-Z][a-z]{2,10}") {
        let items = vec![GradeItem::new("1", "Quiz").with_points(10.0)];
        prop_assume!(title != "Quiz");
        let (result, _) = run(
            rows(&[&["ID", "Name", &format!("{title} [5]")], &["stu1", "Jane", "3"]]),
            &items,
            &ExistingGradeSnapshot::new(),
        );
        prop_assert_eq!(&result.records[0].status, &ChangeStatus::New);
    }
}
