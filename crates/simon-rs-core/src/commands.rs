//! User-registered phrase shortcuts that expand into fixed action lists.
//!
//! The registry is a JSON object `name -> [{"action": kind, "target": ...}]`
//! kept in document order. Lookup tries an exact match and then the first
//! registered name contained in the phrase; there is no scoring.

use indexmap::IndexMap;
use log::{debug, info, warn};
use simon_rs_memory::{MemoryError, read_json_file, write_json_file};
use simon_rs_protocol::ActionStep;
use std::path::{Path, PathBuf};

/// A registered command matched against a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMatch<'a> {
    pub name: &'a str,
    pub steps: &'a [ActionStep],
}

/// Persisted map of phrase shortcuts.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    path: PathBuf,
    commands: IndexMap<String, Vec<ActionStep>>,
}

impl CommandRegistry {
    /// Load the registry from `path`. Missing or unreadable files yield an empty registry.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let commands = load_commands(&path);
        Self { path, commands }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Steps of the command matching `phrase`, if any.
    pub fn lookup(&self, phrase: &str) -> Option<&[ActionStep]> {
        self.find(phrase).map(|found| found.steps)
    }

    /// Exact name match first, then the first registered name that is a substring of the phrase.
    pub fn find(&self, phrase: &str) -> Option<CommandMatch<'_>> {
        let phrase = normalize(phrase);
        if phrase.is_empty() {
            return None;
        }
        let exact = self.commands.iter().find(|(name, _)| name.as_str() == phrase);
        exact
            .or_else(|| {
                self.commands
                    .iter()
                    .find(|(name, _)| !name.is_empty() && phrase.contains(name.as_str()))
            })
            .map(|(name, steps)| CommandMatch {
                name: name.as_str(),
                steps: steps.as_slice(),
            })
    }

    /// Registered names in registration order.
    pub fn list(&self) -> Vec<String> {
        self.commands.keys().cloned().collect()
    }

    /// Register or replace a command and persist the whole registry.
    ///
    /// Returns false when the name is blank or the file could not be written;
    /// the in-memory registry keeps the change either way.
    pub fn add(&mut self, name: &str, steps: Vec<ActionStep>) -> bool {
        let name = normalize(name);
        if name.is_empty() {
            warn!("refusing to register command with empty name");
            return false;
        }
        let replaced = self.commands.insert(name.clone(), steps).is_some();
        info!("command registered (name={name}, replaced={replaced})");
        self.persist()
    }

    /// Remove a command and persist. Unknown names return false without touching disk.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = normalize(name);
        if self.commands.shift_remove(&name).is_none() {
            debug!("no command to remove (name={name})");
            return false;
        }
        info!("command removed (name={name})");
        self.persist()
    }

    /// Re-read the file, discarding in-memory changes that were never saved.
    pub fn reload(&mut self) {
        self.commands = load_commands(&self.path);
    }

    fn persist(&self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "failed to save commands (path={}): {err}",
                    self.path.display()
                );
                false
            }
        }
    }

    fn save(&self) -> Result<(), MemoryError> {
        write_json_file(&self.path, &self.commands)
    }
}

fn normalize(phrase: &str) -> String {
    phrase.trim().to_lowercase()
}

fn load_commands(path: &Path) -> IndexMap<String, Vec<ActionStep>> {
    match read_json_file::<IndexMap<String, Vec<ActionStep>>>(path) {
        Ok(Some(raw)) => {
            let mut commands = IndexMap::new();
            for (name, steps) in raw {
                let name = normalize(&name);
                if !name.is_empty() && !commands.contains_key(&name) {
                    commands.insert(name, steps);
                }
            }
            info!(
                "loaded commands (path={}, count={})",
                path.display(),
                commands.len()
            );
            commands
        }
        Ok(None) => {
            debug!("no commands file (path={})", path.display());
            IndexMap::new()
        }
        Err(err) => {
            warn!(
                "ignoring unreadable commands file (path={}): {err}",
                path.display()
            );
            IndexMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommandRegistry;
    use pretty_assertions::assert_eq;
    use simon_rs_protocol::{ActionKind, ActionStep};
    use tempfile::tempdir;

    fn step(kind: &str, target: Option<&str>) -> ActionStep {
        ActionStep::new(kind, target.map(str::to_string))
    }

    #[test]
    fn keys_are_normalized_on_load() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("commands.json");
        std::fs::write(
            &path,
            r#"{" Work Mode ": [{"action": "open_app", "target": "slack"}]}"#,
        )
        .expect("write");

        let registry = CommandRegistry::load(&path);
        assert_eq!(registry.list(), vec!["work mode".to_string()]);
        assert_eq!(
            registry.lookup("WORK MODE"),
            Some(&[step("open_app", Some("slack"))][..])
        );
    }

    #[test]
    fn invalid_file_loads_empty() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("commands.json");
        std::fs::write(&path, "not json").expect("write");

        let registry = CommandRegistry::load(&path);
        assert!(registry.is_empty());
        assert_eq!(registry.lookup("anything"), None);
    }

    #[test]
    fn empty_phrase_matches_nothing() {
        let temp = tempdir().expect("tempdir");
        let mut registry = CommandRegistry::load(temp.path().join("commands.json"));
        assert!(registry.add("goodnight", vec![step("lock_screen", None)]));
        assert_eq!(registry.lookup("   "), None);
    }

    #[test]
    fn blank_names_are_refused() {
        let temp = tempdir().expect("tempdir");
        let mut registry = CommandRegistry::load(temp.path().join("commands.json"));
        assert!(!registry.add("  ", vec![step("speak", None)]));
        assert!(registry.is_empty());
    }

    #[test]
    fn replacing_keeps_position() {
        let temp = tempdir().expect("tempdir");
        let mut registry = CommandRegistry::load(temp.path().join("commands.json"));
        assert!(registry.add("first", vec![step("volume_up", None)]));
        assert!(registry.add("second", vec![step("volume_down", None)]));
        assert!(registry.add("FIRST", vec![step("volume_mute", None)]));

        assert_eq!(registry.list(), vec!["first".to_string(), "second".to_string()]);
        let steps = registry.lookup("first").expect("steps");
        assert_eq!(steps[0].kind, ActionKind::VolumeMute);
    }

    #[test]
    fn removal_keeps_remaining_order() {
        let temp = tempdir().expect("tempdir");
        let mut registry = CommandRegistry::load(temp.path().join("commands.json"));
        for name in ["morning", "work", "music"] {
            assert!(registry.add(name, vec![step("volume_up", None)]));
        }
        assert!(registry.remove("morning"));
        assert!(!registry.remove("morning"));
        assert_eq!(registry.list(), vec!["work".to_string(), "music".to_string()]);

        let reloaded = CommandRegistry::load(temp.path().join("commands.json"));
        assert_eq!(reloaded.list(), vec!["work".to_string(), "music".to_string()]);
    }
}
