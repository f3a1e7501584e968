//! Header classification.
//!
//! Each header cell becomes a [`ColumnDescriptor`]. The student identifier
//! and name columns are picked by position (see [`ColumnLayout`]); every
//! other header is matched against [`HEADER_RULES`] in order and the first
//! matching rule decides the column kind.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use grade_model::{
    ColumnDescriptor, ColumnKind, ColumnLayout, Diagnostic, DiagnosticCode, Diagnostics,
    ImportError, Result,
};

/// `Quiz 1 [25]`, `Quiz 1 [25.5]`
static ITEM_WITH_POINTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^*#$\[\]]*[^*#$\[\]\s])\s*\[(\d+(?:\.\d+)?)\]$")
        .expect("Invalid item-with-points regex")
});

/// `* Quiz 1`
static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s*(\S.*)$").expect("Invalid comment regex"));

/// Points suffix on a comment title, `* Quiz 1 [25]`.
static TRAILING_POINTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\[\d+(?:\.\d+)?\]$").expect("Invalid trailing points regex")
});

/// Any text free of the reserved markers `* # $ [ ]`.
static STANDARD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^*#$\[\]]+$").expect("Invalid standard header regex"));

static IGNORE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#").expect("Invalid ignore regex"));

/// Result of a matching rule: the display title and optional point value.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMatch {
    pub title: String,
    pub points: Option<f64>,
}

/// One header pattern and how to pull the title out of it.
pub struct HeaderRule {
    pub name: &'static str,
    pub kind: ColumnKind,
    pattern: &'static LazyLock<Regex>,
    extract: fn(&Regex, &str) -> Option<HeaderMatch>,
}

impl HeaderRule {
    /// Applies this rule to an already-trimmed header.
    pub fn apply(&self, header: &str) -> Option<HeaderMatch> {
        (self.extract)(LazyLock::force(self.pattern), header)
    }
}

impl std::fmt::Debug for HeaderRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

fn extract_item_with_points(regex: &Regex, header: &str) -> Option<HeaderMatch> {
    let captures = regex.captures(header)?;
    let points = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some(HeaderMatch {
        title: captures.get(1)?.as_str().trim().to_string(),
        points: Some(points),
    })
}

fn extract_comment(regex: &Regex, header: &str) -> Option<HeaderMatch> {
    let captures = regex.captures(header)?;
    let title = captures.get(1)?.as_str().trim();
    let title = TRAILING_POINTS_REGEX.replace(title, "");
    let title = title.trim();
    if title.is_empty() {
        return None;
    }
    Some(HeaderMatch {
        title: title.to_string(),
        points: None,
    })
}

fn extract_whole(regex: &Regex, header: &str) -> Option<HeaderMatch> {
    regex.is_match(header).then(|| HeaderMatch {
        title: header.trim().to_string(),
        points: None,
    })
}

/// Header rules in precedence order.
pub static HEADER_RULES: [HeaderRule; 4] = [
    HeaderRule {
        name: "item-with-points",
        kind: ColumnKind::GradedItemWithPoints,
        pattern: &ITEM_WITH_POINTS_REGEX,
        extract: extract_item_with_points,
    },
    HeaderRule {
        name: "comment",
        kind: ColumnKind::Comment,
        pattern: &COMMENT_REGEX,
        extract: extract_comment,
    },
    HeaderRule {
        name: "standard",
        kind: ColumnKind::GradedItemWithoutPoints,
        pattern: &STANDARD_REGEX,
        extract: extract_whole,
    },
    HeaderRule {
        name: "ignore",
        kind: ColumnKind::Ignored,
        pattern: &IGNORE_REGEX,
        extract: extract_whole,
    },
];

/// Classifies one header cell.
///
/// Positional columns accept any text, including blank. Every other column
/// must have a non-blank header; headers no rule recognizes become
/// [`ColumnKind::Ignored`] with an `UnrecognizedHeader` warning.
pub fn classify(
    raw_header: &str,
    column_index: usize,
    layout: &ColumnLayout,
    diagnostics: &mut Diagnostics,
) -> Result<ColumnDescriptor> {
    let header = raw_header.trim();

    if let Some(kind) = layout.positional_kind(column_index) {
        return Ok(ColumnDescriptor::new(column_index, raw_header, header, kind));
    }

    if header.is_empty() {
        return Err(ImportError::EmptyHeader { column_index });
    }

    for rule in &HEADER_RULES {
        if let Some(matched) = rule.apply(header) {
            debug!(
                column = column_index,
                header,
                rule = rule.name,
                title = %matched.title,
                "classified header"
            );
            let mut column =
                ColumnDescriptor::new(column_index, raw_header, matched.title, rule.kind);
            column.point_value = matched.points;
            return Ok(column);
        }
    }

    diagnostics.push(
        Diagnostic::warning(
            DiagnosticCode::UnrecognizedHeader,
            format!("Unrecognized column header: {header}"),
        )
        .with_column(header),
    );
    Ok(ColumnDescriptor::new(
        column_index,
        raw_header,
        header,
        ColumnKind::Ignored,
    ))
}

/// Classifies a whole header row and reports duplicate titles.
pub fn classify_header_row<S: AsRef<str>>(
    headers: &[S],
    layout: &ColumnLayout,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ColumnDescriptor>> {
    let mut columns = Vec::with_capacity(headers.len());
    // Item and comment columns may share a title; two of the same family may not.
    let mut seen: HashSet<(String, bool)> = HashSet::new();

    for (index, raw) in headers.iter().enumerate() {
        let column = classify(raw.as_ref(), index, layout, diagnostics)?;
        if !column.is_ignorable()
            && !seen.insert((
                column.display_title.clone(),
                column.kind == ColumnKind::Comment,
            ))
        {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::DuplicateHeader,
                    format!("Duplicate column header: {}", column.display_title),
                )
                .with_column(column.display_title.clone()),
            );
        }
        columns.push(column);
    }

    Ok(columns)
}
