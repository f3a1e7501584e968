//! Property tests for header classification and row mapping.

use grade_map::{classify, map_row};
use grade_model::{ColumnKind, ColumnLayout, Diagnostics, ImportOptions, RosterDirectory};
use proptest::prelude::*;

proptest! {
    #[test]
    fn points_header_splits_title_and_points(
        title in "[A-Za-z][A-Za-z0-9 ]{0,20}[A-Za-z0-9]",
        whole in 0u32..1000,
        frac in proptest::option::of(0u32..100),
    ) {
        let points = match frac {
            Some(f) => format!("{whole}.{f}"),
            None => whole.to_string(),
        };
        let header = format!("{title} [{points}]");
        let mut diagnostics = Diagnostics::new();
        let column = classify(&header, 5, &ColumnLayout::default(), &mut diagnostics).unwrap();

        prop_assert_eq!(column.kind, ColumnKind::GradedItemWithPoints);
        prop_assert_eq!(column.display_title, title.trim().to_string());
        prop_assert_eq!(column.point_value, Some(points.parse::<f64>().unwrap()));
        prop_assert!(diagnostics.is_empty());
    }

    #[test]
    fn classification_is_deterministic(header in "[ -~]{1,30}") {
        prop_assume!(!header.trim().is_empty());
        let mut first = Diagnostics::new();
        let mut second = Diagnostics::new();
        let a = classify(&header, 3, &ColumnLayout::default(), &mut first).unwrap();
        let b = classify(&header, 3, &ColumnLayout::default(), &mut second).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn blank_rows_never_map(width in 0usize..12, pad in "[ \t]{0,3}") {
        let headers: Vec<String> = (0..width.max(2))
            .map(|i| if i < 2 { format!("col{i}") } else { format!("Item {i}") })
            .collect();
        let mut diagnostics = Diagnostics::new();
        let columns =
            grade_map::classify_header_row(&headers, &ColumnLayout::default(), &mut diagnostics)
                .unwrap();
        let raw: Vec<String> = (0..width).map(|_| pad.clone()).collect();
        let roster = RosterDirectory::from_students([("", "nobody")]);
        let row = map_row(&raw, &columns, &roster, &ImportOptions::default(), &mut diagnostics);
        prop_assert!(row.is_none());
        prop_assert!(diagnostics.is_empty());
    }
}
