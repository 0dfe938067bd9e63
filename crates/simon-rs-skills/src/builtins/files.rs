//! Create, delete, rename and move files in a working folder (the desktop by default).

use crate::error::SkillError;
use crate::skill::Skill;
use async_trait::async_trait;
use directories::UserDirs;
use log::{info, warn};
use regex::Regex;
use simon_rs_protocol::Action;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;

const TRIGGERS: &[&str] = &[
    "create file",
    "create folder",
    "new file",
    "new folder",
    "rename",
    "delete file",
    "delete folder",
    "move file",
];
const NAME_STOPS: &[&str] = &[" on ", " in ", " at ", " to "];
const DELETE_FALLBACK_EXTENSIONS: &[&str] = &["txt", "doc", "docx", "pdf"];

static RENAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"rename\s+(.+?)\s+to\s+(.+)").ok());
static MOVE_FILE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"move\s+file\s+(.+?)\s+to\s+(.+)").ok());

/// File management rooted at a single folder.
#[derive(Debug, Clone)]
pub struct FilesSkill {
    root: PathBuf,
    documents_dir: PathBuf,
    downloads_dir: PathBuf,
}

impl FilesSkill {
    /// Manage files under `root`; move targets resolve against the user's folders.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let (documents_dir, downloads_dir) = match UserDirs::new() {
            Some(dirs) => (
                dirs.document_dir()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dirs.home_dir().join("Documents")),
                dirs.download_dir()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| dirs.home_dir().join("Downloads")),
            ),
            None => (root.join("Documents"), root.join("Downloads")),
        };
        Self {
            root,
            documents_dir,
            downloads_dir,
        }
    }

    /// Override where "documents" and "downloads" point.
    pub fn with_user_dirs(
        mut self,
        documents_dir: impl Into<PathBuf>,
        downloads_dir: impl Into<PathBuf>,
    ) -> Self {
        self.documents_dir = documents_dir.into();
        self.downloads_dir = downloads_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn place(&self) -> String {
        match self.root.file_name().and_then(|name| name.to_str()) {
            Some(name) if name.eq_ignore_ascii_case("desktop") => "on your desktop".to_string(),
            _ => format!("in {}", self.root.display()),
        }
    }

    async fn create_file(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some(mut name) = extract_name(lowered, &["create file ", "new file "]) else {
            return Ok(Action::speak("What should I name the file?"));
        };
        if !name.contains('.') {
            name.push_str(".txt");
        }
        if !is_plain_name(&name) {
            return Ok(self.outside_root());
        }
        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(&name), b"").await?;
        info!("created file (name={name})");
        Ok(Action::speak(format!("Created {name} {}.", self.place())))
    }

    async fn create_folder(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some(name) = extract_name(lowered, &["create folder ", "new folder "]) else {
            return Ok(Action::speak("What should I name the folder?"));
        };
        if !is_plain_name(&name) {
            return Ok(self.outside_root());
        }
        fs::create_dir_all(self.root.join(&name)).await?;
        info!("created folder (name={name})");
        Ok(Action::speak(format!(
            "Created folder {name} {}.",
            self.place()
        )))
    }

    async fn delete_file(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some(name) = extract_name(lowered, &["delete file ", "remove file "]) else {
            return Ok(Action::speak("Which file should I delete?"));
        };
        if !is_plain_name(&name) {
            return Ok(self.outside_root());
        }
        let exact = self.root.join(&name);
        let mut candidates = vec![exact];
        candidates.extend(
            DELETE_FALLBACK_EXTENSIONS
                .iter()
                .map(|ext| self.root.join(format!("{name}.{ext}"))),
        );
        for path in candidates {
            if fs::metadata(&path).await.is_ok_and(|meta| meta.is_file()) {
                fs::remove_file(&path).await?;
                let deleted = path
                    .file_name()
                    .map(|file| file.to_string_lossy().to_string())
                    .unwrap_or(name);
                info!("deleted file (name={deleted})");
                return Ok(Action::speak(format!("Deleted {deleted}.")));
            }
        }
        Ok(Action::speak(format!(
            "I couldn't find {name} {}.",
            self.place()
        )))
    }

    async fn delete_folder(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some(name) = extract_name(lowered, &["delete folder ", "remove folder "]) else {
            return Ok(Action::speak("Which folder should I delete?"));
        };
        if !is_plain_name(&name) {
            return Ok(self.outside_root());
        }
        let path = self.root.join(&name);
        if !fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir()) {
            return Ok(Action::speak(format!(
                "I couldn't find folder {name} {}.",
                self.place()
            )));
        }
        fs::remove_dir_all(&path).await?;
        info!("deleted folder (name={name})");
        Ok(Action::speak(format!("Deleted folder {name}.")))
    }

    async fn rename(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some((old_name, new_name)) = capture_pair(&RENAME, lowered) else {
            return Ok(Action::speak("Try saying 'rename old name to new name'."));
        };
        if !is_plain_name(&old_name) || !is_plain_name(&new_name) {
            return Ok(self.outside_root());
        }
        let old_path = self.root.join(&old_name);
        if fs::metadata(&old_path).await.is_err() {
            return Ok(Action::speak(format!("I couldn't find {old_name}.")));
        }
        fs::rename(&old_path, self.root.join(&new_name)).await?;
        info!("renamed (from={old_name}, to={new_name})");
        Ok(Action::speak(format!("Renamed {old_name} to {new_name}.")))
    }

    async fn move_file(&self, lowered: &str) -> Result<Action, SkillError> {
        let Some((name, destination)) = capture_pair(&MOVE_FILE, lowered) else {
            return Ok(Action::speak("Try saying 'move file name to folder'."));
        };
        if !is_plain_name(&name) {
            return Ok(self.outside_root());
        }
        let target_dir = match destination.as_str() {
            "documents" | "my documents" => self.documents_dir.clone(),
            "downloads" | "my downloads" => self.downloads_dir.clone(),
            folder if is_plain_name(folder) => self.root.join(folder),
            _ => return Ok(self.outside_root()),
        };
        let source = self.root.join(&name);
        if fs::metadata(&source).await.is_err() {
            return Ok(Action::speak(format!("I couldn't find {name}.")));
        }
        fs::create_dir_all(&target_dir).await?;
        move_path(&source, &target_dir.join(&name)).await?;
        info!(
            "moved file (name={name}, to={})",
            target_dir.display()
        );
        Ok(Action::speak(format!("Moved {name} to {destination}.")))
    }

    fn outside_root(&self) -> Action {
        Action::speak(format!(
            "I can only manage files directly {}.",
            self.place()
        ))
    }
}

#[async_trait]
impl Skill for FilesSkill {
    fn name(&self) -> &str {
        "files"
    }

    fn description(&self) -> &str {
        "Create, rename, move, and delete files"
    }

    fn triggers(&self) -> &[&str] {
        TRIGGERS
    }

    async fn execute(&self, utterance: &str) -> Action {
        let lowered = utterance.to_lowercase();
        let result = if lowered.contains("create file") || lowered.contains("new file") {
            self.create_file(&lowered).await
        } else if lowered.contains("create folder") || lowered.contains("new folder") {
            self.create_folder(&lowered).await
        } else if lowered.contains("delete file") {
            self.delete_file(&lowered).await
        } else if lowered.contains("delete folder") {
            self.delete_folder(&lowered).await
        } else if lowered.contains("rename") {
            self.rename(&lowered).await
        } else if lowered.contains("move file") {
            self.move_file(&lowered).await
        } else {
            Ok(Action::speak("I'm not sure what file operation you want."))
        };
        result.unwrap_or_else(|err| {
            warn!("file operation failed: {err}");
            Action::speak(format!("Sorry, that file operation failed: {err}"))
        })
    }
}

/// Name spoken after the first matching keyword, without "called"/"named"
/// and cut at the first location preposition.
fn extract_name(lowered: &str, keywords: &[&str]) -> Option<String> {
    let (_, after) = keywords
        .iter()
        .find_map(|keyword| lowered.split_once(keyword))?;
    let mut name = after.trim().replace("called ", "").replace("named ", "");
    for stop in NAME_STOPS {
        if let Some((head, _)) = name.split_once(stop) {
            name = head.to_string();
        }
    }
    let name = name.trim().trim_end_matches(['.', '?', '!']).trim().to_string();
    (!name.is_empty()).then_some(name)
}

fn capture_pair(pattern: &LazyLock<Option<Regex>>, lowered: &str) -> Option<(String, String)> {
    let caps = pattern.as_ref()?.captures(lowered)?;
    let first = caps.get(1)?.as_str().trim().to_string();
    let second = caps
        .get(2)?
        .as_str()
        .trim()
        .trim_end_matches(['.', '?', '!'])
        .trim()
        .to_string();
    (!first.is_empty() && !second.is_empty()).then_some((first, second))
}

/// A single path component: no separators, no parent references.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

/// Rename, falling back to copy-and-delete across filesystems.
async fn move_path(source: &Path, target: &Path) -> Result<(), SkillError> {
    if fs::rename(source, target).await.is_ok() {
        return Ok(());
    }
    fs::copy(source, target).await?;
    fs::remove_file(source).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FilesSkill, extract_name, is_plain_name};
    use crate::Skill;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn name_extraction_strips_fillers_and_locations() {
        assert_eq!(
            extract_name("create file called notes on the desktop", &["create file "]),
            Some("notes".to_string())
        );
        assert_eq!(
            extract_name("new folder named projects in documents", &["new folder "]),
            Some("projects".to_string())
        );
        assert_eq!(extract_name("create file ", &["create file "]), None);
    }

    #[test]
    fn plain_names_reject_traversal() {
        assert!(is_plain_name("notes.txt"));
        assert!(!is_plain_name("../secrets"));
        assert!(!is_plain_name("a/b"));
    }

    #[tokio::test]
    async fn creates_and_deletes_files_with_default_extension() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("Desktop");
        let skill = FilesSkill::new(&root);

        let action = skill.execute("Create file called shopping list").await;
        assert_eq!(action.response, "Created shopping list.txt on your desktop.");
        assert!(root.join("shopping list.txt").is_file());

        let action = skill.execute("delete file shopping list").await;
        assert_eq!(action.response, "Deleted shopping list.txt.");
        assert!(!root.join("shopping list.txt").exists());

        let action = skill.execute("delete file shopping list").await;
        assert_eq!(
            action.response,
            "I couldn't find shopping list on your desktop."
        );
    }

    #[tokio::test]
    async fn creates_renames_and_deletes_folders() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("Desktop");
        let skill = FilesSkill::new(&root);

        skill.execute("create folder reports").await;
        assert!(root.join("reports").is_dir());

        let action = skill.execute("rename reports to archive").await;
        assert_eq!(action.response, "Renamed reports to archive.");
        assert!(root.join("archive").is_dir());

        let action = skill.execute("delete folder archive").await;
        assert_eq!(action.response, "Deleted folder archive.");
        assert!(!root.join("archive").exists());
    }

    #[tokio::test]
    async fn moves_files_to_named_destinations() {
        let dir = tempdir().expect("tempdir");
        let root = dir.path().join("Desktop");
        let documents = dir.path().join("Documents");
        let skill = FilesSkill::new(&root).with_user_dirs(&documents, dir.path().join("Downloads"));
        std::fs::create_dir_all(&root).expect("root");
        std::fs::write(root.join("budget.xlsx"), b"numbers").expect("write");

        let action = skill.execute("move file budget.xlsx to documents").await;
        assert_eq!(action.response, "Moved budget.xlsx to documents.");
        assert_eq!(
            std::fs::read(documents.join("budget.xlsx")).expect("moved"),
            b"numbers"
        );
    }

    #[tokio::test]
    async fn refuses_paths_outside_root() {
        let dir = tempdir().expect("tempdir");
        let skill = FilesSkill::new(dir.path().join("work"));
        let action = skill.execute("delete folder ../secrets").await;
        assert!(action.response.starts_with("I can only manage files directly in "));
    }
}
