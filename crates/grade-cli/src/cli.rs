//! CLI argument definitions for `gradeimport`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use grade_model::{ColumnLayout, DEFAULT_ALIAS_PREFIX, ImportOptions};

#[derive(Parser)]
#[command(
    name = "gradeimport",
    version,
    about = "Preview and reconcile gradebook spreadsheet imports",
    long_about = "Preview and reconcile gradebook spreadsheet imports.\n\n\
                  Reads CSV or workbook grade sheets, classifies their columns, maps rows\n\
                  to roster students and compares the result with the existing gradebook."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include student identifiers in row-level log events.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix log lines with timestamps.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify columns and map rows without comparing to the gradebook.
    Preview(PreviewArgs),

    /// Build the import table and compare it with existing items and grades.
    Reconcile(ReconcileArgs),
}

/// Options shared by every command that reads an import file.
#[derive(Args)]
pub struct ImportArgs {
    /// Grade sheet to import (.csv, .txt, .xls, .xlsx, .xlsm, .ods).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// MIME type reported for the upload; used when the extension is not recognized.
    #[arg(long = "mime-type", value_name = "TYPE")]
    pub mime_type: Option<String>,

    /// Zero-based position of the student identifier column.
    #[arg(long = "id-column", value_name = "INDEX", default_value_t = 0)]
    pub id_column: usize,

    /// Zero-based position of the student name column.
    #[arg(long = "name-column", value_name = "INDEX", default_value_t = 1)]
    pub name_column: usize,

    /// Identifiers starting with this prefix are resolved as aliases.
    #[arg(long = "alias-prefix", value_name = "PREFIX", default_value = DEFAULT_ALIAS_PREFIX)]
    pub alias_prefix: String,

    /// Treat every identifier as a plain student identifier.
    #[arg(long = "no-alias", conflicts_with = "alias_prefix")]
    pub no_alias: bool,

    /// Print the result as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

impl ImportArgs {
    pub fn import_options(&self) -> ImportOptions {
        let prefix = (!self.no_alias).then(|| self.alias_prefix.clone());
        ImportOptions::new()
            .with_layout(ColumnLayout::new(self.id_column, self.name_column))
            .with_alias_prefix(prefix)
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub import: ImportArgs,

    /// Roster JSON; without it every identifier is accepted as-is.
    #[arg(long = "roster", value_name = "PATH")]
    pub roster: Option<PathBuf>,
}

#[derive(Args)]
pub struct ReconcileArgs {
    #[command(flatten)]
    pub import: ImportArgs,

    /// Roster JSON: `{ "students": {id: uuid}, "aliases": {alias: id} }`.
    #[arg(long = "roster", value_name = "PATH")]
    pub roster: PathBuf,

    /// Grade items JSON array.
    #[arg(long = "items", value_name = "PATH")]
    pub items: PathBuf,

    /// Existing grades JSON, keyed by item id then student id.
    #[arg(long = "grades", value_name = "PATH")]
    pub grades: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
