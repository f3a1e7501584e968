//! Building a [`NormalizedTable`] from tokenized rows.

use tracing::{debug, info, info_span};

use grade_map::{classify_header_row, map_row};
use grade_model::{
    ColumnLayout, Diagnostics, IdentityResolver, ImportError, ImportOptions, NormalizedTable,
    Result,
};

/// A built table together with the warnings raised while building it.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub table: NormalizedTable,
    pub diagnostics: Diagnostics,
}

/// Drives header classification and row mapping over raw rows.
///
/// The first row is always the header row. Raw rows are kept inside the
/// table so [`TableBuilder::rebuild`] can re-run the pipeline with another
/// column layout without reading the source again.
pub struct TableBuilder<'a, R: ?Sized> {
    resolver: &'a R,
    options: ImportOptions,
}

impl<'a, R> TableBuilder<'a, R>
where
    R: IdentityResolver + ?Sized,
{
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            options: ImportOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds a table with a fresh diagnostics collector.
    pub fn build(&self, raw_rows: Vec<Vec<String>>) -> Result<BuildOutcome> {
        let mut diagnostics = Diagnostics::new();
        let table = self.build_into(raw_rows, &mut diagnostics)?;
        Ok(BuildOutcome { table, diagnostics })
    }

    /// Builds a table, appending warnings to `diagnostics`.
    pub fn build_into(
        &self,
        raw_rows: Vec<Vec<String>>,
        diagnostics: &mut Diagnostics,
    ) -> Result<NormalizedTable> {
        let span = info_span!("build_table", rows = raw_rows.len());
        let _guard = span.enter();

        let Some(header) = raw_rows.first() else {
            return Err(ImportError::EmptyInput);
        };
        let columns = classify_header_row(header, &self.options.layout, diagnostics)?;
        debug!(columns = columns.len(), "classified header row");

        let mut rows = Vec::with_capacity(raw_rows.len().saturating_sub(1));
        let mut dropped = 0usize;
        for (line, raw) in raw_rows.iter().enumerate().skip(1) {
            match map_row(raw, &columns, self.resolver, &self.options, diagnostics) {
                Some(row) => rows.push(row),
                None => {
                    debug!(line = line + 1, "row dropped");
                    dropped += 1;
                }
            }
        }

        info!(
            columns = columns.len(),
            rows = rows.len(),
            dropped,
            warnings = diagnostics.len(),
            "table built"
        );

        let mut table = NormalizedTable::new(columns, raw_rows);
        table.rows = rows;
        Ok(table)
    }

    /// Re-runs classification and mapping from previously captured raw rows
    /// with a different column layout.
    pub fn rebuild(&self, raw_rows: &[Vec<String>], layout: ColumnLayout) -> Result<BuildOutcome> {
        let options = self.options.clone().with_layout(layout);
        TableBuilder {
            resolver: self.resolver,
            options,
        }
        .build(raw_rows.to_vec())
    }
}
