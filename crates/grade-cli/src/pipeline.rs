//! Loading inputs and running the build and reconcile stages.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, info_span, trace};

use grade_ingest::{BuildOutcome, SourceFormat, TableBuilder, detect_format, read_source};
use grade_model::{
    ChangeKind, ChangeRecord, ExistingGradeSnapshot, GradeItem, IdentityResolver, ImportOptions,
    NormalizedTable, RosterDirectory,
};
use grade_reconcile::{Reconciliation, scores_match};

use crate::logging::redact_value;

/// Resolver used for previews without a roster: every identifier is its own
/// internal id and aliases resolve to themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughRoster;

impl IdentityResolver for PassThroughRoster {
    fn resolve_alias(&self, alias: &str) -> Option<String> {
        Some(alias.to_string())
    }

    fn roster_lookup(&self, external_id: &str) -> Option<String> {
        Some(external_id.to_string())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read {what}: {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse {what}: {}", path.display()))
}

pub fn load_roster(path: &Path) -> Result<RosterDirectory> {
    let roster: RosterDirectory = read_json(path, "roster")?;
    debug!(path = %path.display(), students = roster.len(), "loaded roster");
    Ok(roster)
}

pub fn load_items(path: &Path) -> Result<Vec<GradeItem>> {
    let items: Vec<GradeItem> = read_json(path, "grade items")?;
    debug!(path = %path.display(), items = items.len(), "loaded grade items");
    Ok(items)
}

pub fn load_snapshot(path: Option<&Path>) -> Result<ExistingGradeSnapshot> {
    match path {
        Some(path) => read_json(path, "existing grades"),
        None => Ok(ExistingGradeSnapshot::new()),
    }
}

/// A built table plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct ImportedTable {
    pub file: String,
    pub format: SourceFormat,
    pub table: NormalizedTable,
    pub diagnostics: grade_model::Diagnostics,
}

/// Reads `file` and builds its normalized table.
pub fn build_table<R>(
    file: &Path,
    mime_type: Option<&str>,
    options: ImportOptions,
    resolver: &R,
) -> Result<ImportedTable>
where
    R: IdentityResolver + ?Sized,
{
    let span = info_span!("import", file = %file.display());
    let _guard = span.enter();

    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = detect_format(&file_name, mime_type)
        .with_context(|| format!("detect format: {}", file.display()))?;
    let raw_rows =
        read_source(file, mime_type).with_context(|| format!("read {}", file.display()))?;
    info!(format = format.as_str(), rows = raw_rows.len(), "read import file");

    let BuildOutcome { table, diagnostics } = TableBuilder::new(resolver)
        .with_options(options)
        .build(raw_rows)
        .with_context(|| format!("build table: {}", file.display()))?;
    for row in &table.rows {
        trace!(
            student = redact_value(&row.student_external_id),
            cells = row.cells.len(),
            "imported row"
        );
    }

    Ok(ImportedTable {
        file: file.display().to_string(),
        format,
        table,
        diagnostics,
    })
}

/// Reconciles a built table against the gradebook.
pub fn reconcile_table(
    imported: ImportedTable,
    items: &[GradeItem],
    snapshot: &ExistingGradeSnapshot,
) -> (NormalizedTable, Reconciliation) {
    let ImportedTable {
        mut table,
        diagnostics,
        ..
    } = imported;
    let result = Reconciliation::run(&mut table, items, snapshot, diagnostics);
    for record in result.changes_requiring_action() {
        for detail in &record.details {
            trace!(
                column = %record.title,
                student = redact_value(&detail.student_external_id),
                "pending change"
            );
        }
    }
    (table, result)
}

/// Number of students whose imported value differs from the gradebook.
///
/// Scores compare the way reconciliation does, so `6.0` against `6` is unchanged.
pub fn changed_count(record: &ChangeRecord) -> usize {
    record
        .details
        .iter()
        .filter(|detail| match record.kind {
            ChangeKind::Item => detail
                .new_score
                .as_deref()
                .is_some_and(|score| !scores_match(score, detail.previous_score.as_deref())),
            ChangeKind::Comment => detail
                .new_comment
                .as_deref()
                .is_some_and(|comment| Some(comment) != detail.previous_comment.as_deref()),
        })
        .count()
}
