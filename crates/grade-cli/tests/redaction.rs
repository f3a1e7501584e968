//! Student identifiers stay out of log output unless `--log-data` is given.
//!
//! Installs the global subscriber, so this file holds a single test.

use std::fs;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use grade_cli::logging::{LogConfig, LogFormat, REDACTED_VALUE, init_logging_with_writer};
use grade_cli::pipeline::{build_table, reconcile_table};
use grade_model::{DiagnosticCode, ExistingGradeSnapshot, ImportOptions, RosterDirectory};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer").clone();
        String::from_utf8(bytes).expect("utf-8 log")
    }
}

impl Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn trace_logging_never_writes_student_ids() {
    let log = CapturedLog::default();
    let config = LogConfig {
        level_filter: LevelFilter::TRACE,
        use_env_filter: false,
        with_ansi: false,
        format: LogFormat::Compact,
        ..LogConfig::default()
    };
    init_logging_with_writer(&config, log.clone());

    let dir = tempfile::tempdir().expect("temp dir");
    let sheet = dir.path().join("grades.csv");
    fs::write(
        &sheet,
        "ID,Name,Quiz [10]\n\
         known-7731,Jane,8\n\
         ghost-4410,Nobody,3\n\
         A-ghost-9902,Alias,4\n",
    )
    .expect("write sheet");
    let roster = RosterDirectory::from_students([("known-7731", "uuid-7731")]);
    let options = ImportOptions::default().with_alias_prefix(Some("A-".to_string()));

    let imported = build_table(&sheet, None, options, &roster).expect("build table");
    assert_eq!(imported.table.rows.len(), 1);
    assert_eq!(
        imported.diagnostics.count_of(DiagnosticCode::UnknownStudent),
        1
    );
    assert_eq!(
        imported
            .diagnostics
            .count_of(DiagnosticCode::AliasResolutionFailed),
        1
    );
    let _ = reconcile_table(imported, &[], &ExistingGradeSnapshot::default());

    let output = log.contents();
    assert!(output.contains("unknown_student"));
    assert!(output.contains("alias_resolution_failed"));
    assert!(output.contains(REDACTED_VALUE));
    assert!(!output.contains("not found in roster"));
    for id in ["known-7731", "ghost-4410", "A-ghost-9902", "uuid-7731"] {
        assert!(!output.contains(id), "{id} leaked into the log:\n{output}");
    }
}
