use serde::Serialize;

use grade_ingest::SourceFormat;
use grade_model::{ChangeRecord, Diagnostics, NormalizedTable};

#[derive(Debug, Serialize)]
pub struct PreviewResult {
    pub file: String,
    pub format: SourceFormat,
    pub table: NormalizedTable,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Serialize)]
pub struct ReconcileResult {
    pub file: String,
    pub format: SourceFormat,
    pub students: usize,
    pub records: Vec<ChangeRecord>,
    pub diagnostics: Diagnostics,
}
