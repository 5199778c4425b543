use std::collections::HashMap;

use bp_types::{validate_tag, LocalUuid};

use crate::definition::Definition;
use crate::error::{SessionError, SessionResult};

/// The definition graph: every tag → definition declared before a session
/// exists.
///
/// Iteration follows insertion order, which is also the order in which
/// independent tags are materialized.
#[derive(Clone, Debug, Default)]
pub struct Blueprint {
    entries: Vec<(String, Definition)>,
    index: HashMap<String, usize>,
    owners: HashMap<LocalUuid, usize>,
}

impl Blueprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `tag`. Tags must be valid and unique.
    pub fn insert(&mut self, tag: impl Into<String>, definition: Definition) -> SessionResult<()> {
        let tag = tag.into();
        validate_tag(&tag)?;
        if self.index.contains_key(&tag) {
            return Err(SessionError::DuplicateTag(tag));
        }
        self.index.insert(tag.clone(), self.entries.len());
        self.owners.entry(definition.local_uuid()).or_insert(self.entries.len());
        self.entries.push((tag, definition));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, tag: impl Into<String>, definition: Definition) -> SessionResult<Self> {
        self.insert(tag, definition)?;
        Ok(self)
    }

    pub fn get(&self, tag: &str) -> Option<&Definition> {
        self.index.get(tag).map(|&i| &self.entries[i].1)
    }

    /// The tag a definition was declared under. A definition declared under
    /// several tags maps to the first one.
    pub fn tag_of(&self, local_uuid: LocalUuid) -> Option<&str> {
        self.owners.get(&local_uuid).map(|&i| self.entries[i].0.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.entries.iter().map(|(tag, d)| (tag.as_str(), d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
