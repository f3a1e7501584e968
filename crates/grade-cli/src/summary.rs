use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use grade_model::{ChangeKind, ChangeStatus, ColumnKind, Diagnostics, Severity};

use grade_cli::pipeline::changed_count;

use crate::types::{PreviewResult, ReconcileResult};

pub fn print_preview(result: &PreviewResult) {
    println!("File: {} ({})", result.file, result.format.as_str());

    let mut columns = Table::new();
    columns.set_header(vec![
        header_cell("#"),
        header_cell("Header"),
        header_cell("Title"),
        header_cell("Kind"),
        header_cell("Points"),
    ]);
    apply_table_style(&mut columns);
    align_column(&mut columns, 0, CellAlignment::Right);
    align_column(&mut columns, 4, CellAlignment::Right);
    for column in &result.table.columns {
        columns.add_row(vec![
            Cell::new(column.index),
            Cell::new(&column.raw_title),
            Cell::new(&column.display_title),
            kind_cell(column.kind),
            points_cell(column.point_value),
        ]);
    }
    println!("{columns}");

    let titles: Vec<&str> = result
        .table
        .columns
        .iter()
        .filter(|c| !c.is_ignorable())
        .map(|c| c.display_title.as_str())
        .fold(Vec::new(), |mut titles, title| {
            if !titles.contains(&title) {
                titles.push(title);
            }
            titles
        });

    let mut rows = Table::new();
    let mut header = vec![header_cell("Student"), header_cell("Name")];
    header.extend(titles.iter().map(|title| header_cell(title)));
    rows.set_header(header);
    apply_table_style(&mut rows);
    for row in &result.table.rows {
        let mut cells = vec![
            Cell::new(&row.student_external_id).fg(Color::Blue),
            optional_cell(row.student_display_name.as_deref()),
        ];
        for title in &titles {
            let cell = row.cell(title);
            let score = cell.and_then(|c| c.score.as_deref());
            let comment = cell.and_then(|c| c.comment.as_deref());
            cells.push(match (score, comment) {
                (Some(score), Some(comment)) => Cell::new(format!("{score}\n\"{comment}\"")),
                (Some(value), None) | (None, Some(value)) => Cell::new(value),
                (None, None) => dim_cell("-"),
            });
        }
        rows.add_row(cells);
    }
    println!();
    println!("Rows: {}", result.table.rows.len());
    println!("{rows}");

    print_diagnostics(&result.diagnostics);
}

pub fn print_reconcile(result: &ReconcileResult) {
    println!("File: {} ({})", result.file, result.format.as_str());
    println!("Students: {}", result.students);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Title"),
        header_cell("Kind"),
        header_cell("Status"),
        header_cell("Points"),
        header_cell("Item"),
        header_cell("Changed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for record in &result.records {
        let changed = changed_count(record);
        table.add_row(vec![
            Cell::new(&record.title).add_attribute(Attribute::Bold),
            Cell::new(match record.kind {
                ChangeKind::Item => "item",
                ChangeKind::Comment => "comment",
            }),
            status_cell(&record.status),
            points_cell(record.point_value),
            optional_cell(record.matched_item_id.as_deref()),
            count_cell(changed),
        ]);
    }
    println!("{table}");

    let pending = result
        .records
        .iter()
        .filter(|r| r.status.requires_action())
        .count();
    println!("Changes requiring action: {pending}");

    print_diagnostics(&result.diagnostics);
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for diagnostic in diagnostics {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            Cell::new(diagnostic.code.as_str()),
            optional_cell(diagnostic.column_title.as_deref()),
            Cell::new(&diagnostic.message),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &ChangeStatus) -> Cell {
    let cell = Cell::new(status.to_string());
    match status {
        ChangeStatus::New => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        ChangeStatus::Modified | ChangeStatus::Update => cell.fg(Color::Yellow),
        ChangeStatus::External { .. } => cell.fg(Color::Magenta),
        ChangeStatus::Na | ChangeStatus::Unknown => cell.fg(Color::DarkGrey),
    }
}

fn kind_cell(kind: ColumnKind) -> Cell {
    let cell = Cell::new(kind.as_str());
    match kind {
        ColumnKind::Ignored => cell.fg(Color::DarkGrey),
        ColumnKind::StudentIdentifier | ColumnKind::StudentDisplayName => cell.fg(Color::Blue),
        ColumnKind::GradedItemWithPoints
        | ColumnKind::GradedItemWithoutPoints
        | ColumnKind::Comment => cell,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Fatal => Cell::new("FATAL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn points_cell(points: Option<f64>) -> Cell {
    match points {
        Some(points) => Cell::new(points),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
