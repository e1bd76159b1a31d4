//! Author registry: one [`Author`] per distinct display name.

use std::collections::HashMap;

use chatstat_core::error::{ChatStatError, Result};
use chatstat_core::models::{Author, AuthorId};

use crate::parser::header_segment;

/// Name between the first `" - "` separator and the colon of the header
/// segment, trimmed.
pub fn extract_author_name(entry: &str) -> Option<&str> {
    let (name, _) = header_segment(entry)?.split_once(':')?;
    Some(name.trim())
}

/// All participants of one transcript, addressable by [`AuthorId`] or name.
#[derive(Debug, Clone, Default)]
pub struct AuthorRegistry {
    authors: Vec<Author>,
    by_name: HashMap<String, AuthorId>,
}

impl AuthorRegistry {
    /// Register every distinct name found in `authored_entries`, in order of
    /// first appearance.
    pub fn build<'a, I>(authored_entries: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut registry = Self::default();
        for entry in authored_entries {
            if let Some(name) = extract_author_name(entry) {
                registry.register(name);
            }
        }
        registry
    }

    /// Return the id for `name`, creating the author when unseen.
    pub fn register(&mut self, name: &str) -> AuthorId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = AuthorId(self.authors.len());
        self.authors.push(Author::new(id, name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up `name` by exact string equality.
    pub fn find(&self, name: &str) -> Result<AuthorId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ChatStatError::AuthorNotFound(name.to_string()))
    }

    /// Panics if `id` did not come from this registry.
    pub fn get(&self, id: AuthorId) -> &Author {
        &self.authors[id.0]
    }

    pub fn get_mut(&mut self, id: AuthorId) -> &mut Author {
        &mut self.authors[id.0]
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }
}
