use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Student lookups the row mapper needs from the site directory.
pub trait IdentityResolver {
    /// Resolves an alias (e.g. a PLID) to the canonical external id.
    fn resolve_alias(&self, alias: &str) -> Option<String>;

    /// Resolves an external id to the internal id of an enrolled student.
    fn roster_lookup(&self, external_id: &str) -> Option<String>;
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for &T {
    fn resolve_alias(&self, alias: &str) -> Option<String> {
        (**self).resolve_alias(alias)
    }

    fn roster_lookup(&self, external_id: &str) -> Option<String> {
        (**self).roster_lookup(external_id)
    }
}

/// In-memory roster: external id -> internal id, alias -> external id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterDirectory {
    #[serde(default)]
    students: HashMap<String, String>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

impl RosterDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_students<I, K, V>(students: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut roster = Self::new();
        for (external_id, internal_id) in students {
            roster.add_student(external_id, internal_id);
        }
        roster
    }

    pub fn add_student(&mut self, external_id: impl Into<String>, internal_id: impl Into<String>) {
        self.students.insert(external_id.into(), internal_id.into());
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, external_id: impl Into<String>) {
        self.aliases.insert(alias.into(), external_id.into());
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>, external_id: impl Into<String>) -> Self {
        self.add_alias(alias, external_id);
        self
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl IdentityResolver for RosterDirectory {
    fn resolve_alias(&self, alias: &str) -> Option<String> {
        self.aliases.get(alias).cloned()
    }

    fn roster_lookup(&self, external_id: &str) -> Option<String> {
        self.students
            .get(external_id)
            .filter(|internal| !internal.trim().is_empty())
            .cloned()
    }
}
