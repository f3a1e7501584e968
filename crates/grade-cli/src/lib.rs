//! CLI library components for `gradeimport`.

pub mod logging;
pub mod pipeline;
