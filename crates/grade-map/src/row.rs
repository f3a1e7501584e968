//! Mapping raw data rows onto classified columns.

use tracing::{debug, trace};

use grade_model::{
    ColumnDescriptor, ColumnKind, Diagnostic, DiagnosticCode, Diagnostics,
    IdentityResolver, ImportOptions, Row,
};

/// Trims a raw value, treating blank as missing.
pub fn trim_to_none(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True if every cell of the row is blank (an empty row counts as blank).
pub fn is_blank_row<S: AsRef<str>>(raw_cells: &[S]) -> bool {
    raw_cells.iter().all(|cell| cell.as_ref().trim().is_empty())
}

fn value_at<S: AsRef<str>>(raw_cells: &[S], index: usize) -> Option<String> {
    raw_cells
        .get(index)
        .and_then(|value| trim_to_none(value.as_ref()))
}

/// Maps one data row.
///
/// Returns `None` when the row is dropped: entirely blank rows and rows with
/// a blank identifier are skipped silently, unresolvable aliases and students
/// missing from the roster are skipped with a warning. Rows shorter than the
/// header are padded with blanks.
pub fn map_row<S, R>(
    raw_cells: &[S],
    columns: &[ColumnDescriptor],
    resolver: &R,
    options: &ImportOptions,
    diagnostics: &mut Diagnostics,
) -> Option<Row>
where
    S: AsRef<str>,
    R: IdentityResolver + ?Sized,
{
    if is_blank_row(raw_cells) {
        debug!("skipping a blank line of import row data");
        return None;
    }

    let identifier = columns
        .iter()
        .find(|column| column.kind == ColumnKind::StudentIdentifier)
        .and_then(|column| value_at(raw_cells, column.index));
    let Some(identifier) = identifier else {
        debug!("skipping row with no student identifier");
        return None;
    };

    let external_id = if options.is_alias(&identifier) {
        match resolver.resolve_alias(&identifier) {
            Some(resolved) => resolved,
            None => {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::AliasResolutionFailed,
                        "ignored, no student found for alias",
                    )
                    .with_student(identifier),
                );
                return None;
            }
        }
    } else {
        identifier
    };

    let Some(internal_id) = resolver.roster_lookup(&external_id) else {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::UnknownStudent,
                "ignored, student not found in roster",
            )
            .with_student(external_id),
        );
        return None;
    };

    let mut row = Row::new(external_id, internal_id);
    for column in columns {
        let value = value_at(raw_cells, column.index);
        match column.kind {
            ColumnKind::StudentIdentifier | ColumnKind::Ignored => {}
            ColumnKind::StudentDisplayName => row.student_display_name = value,
            ColumnKind::GradedItemWithPoints | ColumnKind::GradedItemWithoutPoints => {
                row.cells
                    .entry(column.display_title.clone())
                    .or_default()
                    .score = value;
            }
            ColumnKind::Comment => {
                row.cells
                    .entry(column.display_title.clone())
                    .or_default()
                    .comment = value;
            }
        }
    }
    trace!(cells = row.cells.len(), "mapped row");

    Some(row)
}
