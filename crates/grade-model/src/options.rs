//! Configuration options for grade import.

use serde::{Deserialize, Serialize};

use crate::ColumnLayout;

/// Prefix marking student identifiers that need alias resolution.
pub const DEFAULT_ALIAS_PREFIX: &str = "A0";

/// Options controlling how raw rows become a normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Positions of the student identifier and name columns.
    pub layout: ColumnLayout,

    /// Identifiers starting with this prefix are resolved as aliases before
    /// the roster lookup. `None` disables alias resolution.
    pub alias_prefix: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            alias_prefix: Some(DEFAULT_ALIAS_PREFIX.to_string()),
        }
    }
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_alias_prefix(mut self, prefix: Option<String>) -> Self {
        self.alias_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    /// True if `identifier` must go through alias resolution.
    pub fn is_alias(&self, identifier: &str) -> bool {
        self.alias_prefix
            .as_deref()
            .is_some_and(|prefix| identifier.starts_with(prefix))
    }
}
