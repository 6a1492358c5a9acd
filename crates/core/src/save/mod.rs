//! Roster save files on disk.

pub mod format;

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub use format::{deserialize, serialize, serialize_mech, SaveRecord, NONE_WARGEAR};

/// Root directory under `~/.config` used for save files.
pub const DEFAULT_SAVE_DIR: &str = "mechroster/saves";

/// Extension of roster save files.
pub const SAVE_EXTENSION: &str = "txt";

const DEFAULT_SAVE_NAME: &str = "mech_list";

/// Metadata describing a save file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveEntry {
    /// Absolute path to the save file on disk.
    pub path: PathBuf,
    /// File stem.
    pub name: String,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Manager responsible for listing, reading and writing save files.
#[derive(Debug, Clone)]
pub struct SaveManager {
    root: PathBuf,
}

impl SaveManager {
    /// Create a new manager rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's config directory.
    pub fn default_root() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_SAVE_DIR)
    }

    /// Save directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All saves sorted by modification time (most recent first).
    pub fn entries(&self) -> Result<Vec<SaveEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)
            .with_context(|| format!("failed to read {}", self.root.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }

            match entry.metadata().and_then(|meta| meta.modified()) {
                Ok(modified) => entries.push(save_entry(path, modified)),
                Err(err) => warn!("Failed to read save {:?}: {err}", path),
            }
        }

        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.name.cmp(&b.name)));
        Ok(entries)
    }

    /// Most recent save, if any.
    pub fn latest(&self) -> Result<Option<SaveEntry>> {
        let entries = self.entries()?;
        Ok(entries.into_iter().next())
    }

    /// Write roster lines to a new timestamped file and return its entry.
    pub fn create_save(&self, name: Option<&str>, lines: &[String]) -> Result<SaveEntry> {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SAVE_NAME);
        let file_name = format!(
            "{}_{}.{SAVE_EXTENSION}",
            sanitize_component(name),
            Utc::now().format("%Y%m%d%H%M%S")
        );
        let path = self.root.join(file_name);
        self.write_lines(&path, lines)?;
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .with_context(|| format!("failed to stat {}", path.display()))?;
        Ok(save_entry(path, modified))
    }

    /// Overwrite `path` with one line per mech.
    pub fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), mechs = lines.len(), "Saved roster");
        Ok(())
    }

    /// Read a save file as UTF-8 text.
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn save_entry(path: PathBuf, modified: SystemTime) -> SaveEntry {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string();
    SaveEntry {
        path,
        name,
        updated_at: modified.into(),
    }
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        DEFAULT_SAVE_NAME.to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lines() -> Vec<String> {
        vec![
            "Atlas | Wargear: Shield Generator | Weapons: left_arm: Rifle".to_string(),
            "Solo Mech | Wargear: None | Weapons: ".to_string(),
        ]
    }

    #[test]
    fn save_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path().join("saves"));

        let entry = manager.create_save(Some("Strike Lance"), &lines())?;
        assert!(entry.path.exists());
        assert!(entry.name.starts_with("StrikeLance_"));

        let content = manager.read_to_string(&entry.path)?;
        assert_eq!(content, format!("{}\n", lines().join("\n")));
        assert_eq!(deserialize(&content).len(), 2);

        let entries = manager.entries()?;
        assert_eq!(entries, vec![entry.clone()]);
        assert_eq!(manager.latest()?, Some(entry));
        Ok(())
    }

    #[test]
    fn entries_skip_other_files() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        fs::write(dir.path().join("notes.json"), "{}")?;
        fs::create_dir(dir.path().join("nested.txt"))?;
        manager.write_lines(&dir.path().join("lance.txt"), &lines())?;

        let entries = manager.entries()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "lance");
        Ok(())
    }

    #[test]
    fn missing_directory_has_no_entries() -> Result<()> {
        let manager = SaveManager::new("/nonexistent/mechroster/saves");
        assert!(manager.entries()?.is_empty());
        assert!(manager.latest()?.is_none());
        Ok(())
    }

    #[test]
    fn default_name_and_empty_roster() -> Result<()> {
        let dir = tempdir()?;
        let manager = SaveManager::new(dir.path());
        let entry = manager.create_save(Some("   "), &[])?;
        assert!(entry.name.starts_with("mech_list_"));
        assert_eq!(manager.read_to_string(&entry.path)?, "");
        Ok(())
    }

    #[test]
    fn sanitize_creates_safe_filenames() {
        assert_eq!(sanitize_component("Hello World!* 18??"), "HelloWorld18");
        assert_eq!(sanitize_component("???"), "mech_list");
    }
}
