use anyhow::Result;
use tracing::info_span;

use grade_cli::pipeline::{
    PassThroughRoster, build_table, load_items, load_roster, load_snapshot, reconcile_table,
};

use crate::cli::{PreviewArgs, ReconcileArgs};
use crate::types::{PreviewResult, ReconcileResult};

pub fn run_preview(args: &PreviewArgs) -> Result<PreviewResult> {
    let span = info_span!("preview");
    let _guard = span.enter();

    let import = &args.import;
    let options = import.import_options();
    let imported = match &args.roster {
        Some(path) => {
            let roster = load_roster(path)?;
            build_table(&import.file, import.mime_type.as_deref(), options, &roster)?
        }
        None => build_table(
            &import.file,
            import.mime_type.as_deref(),
            options,
            &PassThroughRoster,
        )?,
    };

    Ok(PreviewResult {
        file: imported.file,
        format: imported.format,
        table: imported.table,
        diagnostics: imported.diagnostics,
    })
}

pub fn run_reconcile(args: &ReconcileArgs) -> Result<ReconcileResult> {
    let span = info_span!("reconcile_import");
    let _guard = span.enter();

    let import = &args.import;
    let roster = load_roster(&args.roster)?;
    let items = load_items(&args.items)?;
    let snapshot = load_snapshot(args.grades.as_deref())?;

    let imported = build_table(
        &import.file,
        import.mime_type.as_deref(),
        import.import_options(),
        &roster,
    )?;
    let file = imported.file.clone();
    let format = imported.format;
    let (table, result) = reconcile_table(imported, &items, &snapshot);

    Ok(ReconcileResult {
        file,
        format,
        students: table.rows.len(),
        records: result.records,
        diagnostics: result.diagnostics,
    })
}
