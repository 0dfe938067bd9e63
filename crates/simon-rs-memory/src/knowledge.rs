//! Persisted key/value facts about the user.

use crate::error::MemoryError;
use crate::store::{read_json_file, write_json_file};
use indexmap::IndexMap;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Flat fact store backed by a JSON object file. Last write wins.
///
/// Every mutation rewrites the whole file. When the write fails the in-memory
/// state is kept and the error is returned to the caller.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    path: PathBuf,
    facts: IndexMap<String, String>,
}

impl KnowledgeBase {
    /// Load facts from `path`. A missing or unreadable file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let facts = match read_json_file::<IndexMap<String, String>>(&path) {
            Ok(Some(facts)) => facts,
            Ok(None) => IndexMap::new(),
            Err(err) => {
                warn!(
                    "failed to load knowledge file (path={}): {err}",
                    path.display()
                );
                IndexMap::new()
            }
        };
        debug!(
            "knowledge loaded (path={}, facts={})",
            path.display(),
            facts.len()
        );
        Self { path, facts }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// Facts in the order they were first stored.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Store or overwrite a fact and persist.
    pub fn remember(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), MemoryError> {
        self.facts.insert(key.into(), value.into());
        self.save()
    }

    /// Remove a fact and persist. Returns the removed value.
    pub fn forget(&mut self, key: &str) -> Result<Option<String>, MemoryError> {
        let removed = self.facts.shift_remove(key);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    /// First fact whose key contains the query or is contained in it.
    pub fn find(&self, query: &str) -> Option<(&str, &str)> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.iter()
            .find(|(key, _)| query.contains(key) || key.contains(query))
    }

    fn save(&self) -> Result<(), MemoryError> {
        write_json_file(&self.path, &self.facts)
    }
}

#[cfg(test)]
mod tests {
    use super::KnowledgeBase;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn remembered_fact_survives_reload() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("data").join("knowledge.json");
        let mut knowledge = KnowledgeBase::load(&path);
        knowledge
            .remember("favorite color", "blue")
            .expect("remember");

        let reloaded = KnowledgeBase::load(&path);
        assert_eq!(reloaded.get("favorite color"), Some("blue"));
    }

    #[test]
    fn last_write_wins() {
        let dir = tempdir().expect("tempdir");
        let mut knowledge = KnowledgeBase::load(dir.path().join("knowledge.json"));
        knowledge.remember("wifi password", "hunter2").expect("first");
        knowledge.remember("wifi password", "correct horse").expect("second");
        assert_eq!(knowledge.len(), 1);
        assert_eq!(knowledge.get("wifi password"), Some("correct horse"));
    }

    #[test]
    fn find_matches_substrings_both_ways() {
        let dir = tempdir().expect("tempdir");
        let mut knowledge = KnowledgeBase::load(dir.path().join("knowledge.json"));
        knowledge.remember("favorite color", "blue").expect("remember");
        assert_eq!(knowledge.find("favorite color"), Some(("favorite color", "blue")));
        assert_eq!(knowledge.find("color"), Some(("favorite color", "blue")));
        assert_eq!(knowledge.find("my favorite color please"), Some(("favorite color", "blue")));
        assert_eq!(knowledge.find(""), None);
        assert_eq!(knowledge.find("birthday"), None);
    }

    #[test]
    fn invalid_file_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("knowledge.json");
        std::fs::write(&path, "not json").expect("write");
        let knowledge = KnowledgeBase::load(&path);
        assert!(knowledge.is_empty());
    }

    #[test]
    fn forget_unknown_key_leaves_store_untouched() {
        let dir = tempdir().expect("tempdir");
        let mut knowledge = KnowledgeBase::load(dir.path().join("knowledge.json"));
        knowledge.remember("car", "red").expect("remember");
        assert_eq!(knowledge.forget("boat").expect("forget"), None);
        assert_eq!(knowledge.forget("car").expect("forget"), Some("red".to_string()));
        assert!(knowledge.is_empty());
    }
}
