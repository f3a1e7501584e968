//! Spreadsheet workbooks (xls, xlsx, xlsm, ods).

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::debug;

use grade_model::{ImportError, Result};

/// Reads the first sheet of a workbook into raw rows.
///
/// Rows start at the first used column of the sheet. Gaps inside a row stay
/// as blank cells, trailing blank cells are dropped so a note to the right of
/// the last header does not add an empty header cell.
pub fn read_workbook_path(path: &Path) -> Result<Vec<Vec<String>>> {
    let format_error = |message: String| ImportError::FileFormat {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| format_error(e.to_string()))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        debug!(path = %path.display(), "workbook has no sheets");
        return Ok(Vec::new());
    };
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format_error(format!("sheet '{sheet_name}': {e}")))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(cell_text).collect();
            trim_trailing_blanks(&mut cells);
            cells
        })
        .collect();

    debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = rows.len(),
        "read workbook sheet"
    );
    Ok(rows)
}

/// Drops blank cells after the last non-blank one.
fn trim_trailing_blanks(cells: &mut Vec<String>) {
    let kept = cells
        .iter()
        .rposition(|cell| !cell.trim().is_empty())
        .map_or(0, |last| last + 1);
    cells.truncate(kept);
}

/// Text for one workbook cell.
///
/// Whole numbers lose their fractional part, dates become ISO 8601 and error
/// cells read as blank.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            serial_to_datetime(serial).map_or_else(|| format_number(serial), format_datetime)
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Converts a serial date in the 1900 date system.
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn whole_floats_drop_fraction() {
        assert_eq!(cell_text(&Data::Float(85.0)), "85");
        assert_eq!(cell_text(&Data::Float(85.5)), "85.5");
        assert_eq!(cell_text(&Data::Float(-3.0)), "-3");
        assert_eq!(cell_text(&Data::Int(42)), "42");
    }

    #[test]
    fn text_and_flags() {
        assert_eq!(cell_text(&Data::String("stu1".into())), "stu1");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-09-01T08:00:00".into())),
            "2024-09-01T08:00:00"
        );
    }

    #[test]
    fn serial_dates_become_iso() {
        let date = serial_to_datetime(45_536.0).expect("date");
        assert_eq!(format_datetime(date), "2024-09-01");
        let with_time = serial_to_datetime(45_536.5).expect("date");
        assert_eq!(format_datetime(with_time), "2024-09-01T12:00:00");
        assert!(serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn trailing_blank_cells_are_dropped() {
        let mut cells = vec![
            "ID".to_string(),
            String::new(),
            "Quiz".to_string(),
            String::new(),
            " ".to_string(),
        ];
        trim_trailing_blanks(&mut cells);
        assert_eq!(cells, vec!["ID", "", "Quiz"]);

        let mut blank = vec![String::new(), String::new()];
        trim_trailing_blanks(&mut blank);
        assert!(blank.is_empty());
    }

    #[test]
    fn corrupt_workbook_is_a_format_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .expect("temp file");
        file.write_all(b"not a zip archive").expect("write");

        let err = read_workbook_path(file.path()).unwrap_err();
        assert!(matches!(err, ImportError::FileFormat { .. }));
    }
}
