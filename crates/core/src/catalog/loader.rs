use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::Catalog;
use crate::models::{MechTemplate, WargearDef, WeaponDef};

/// Directory holding one JSON file per mech template.
pub const MECH_DATA_DIR: &str = "mech_data";
/// Arm weapon catalog file.
pub const ARM_WEAPON_FILE: &str = "weapons.json";
/// Back weapon catalog file.
pub const BACK_WEAPON_FILE: &str = "back_weapons.json";
/// Wargear catalog file.
pub const WARGEAR_FILE: &str = "wargear.json";
/// Keyword glossary file.
pub const KEYWORD_FILE: &str = "keywords.json";
/// Ability glossary file.
pub const ABILITY_FILE: &str = "abilities.json";

/// Loads a [`Catalog`] from a data directory.
///
/// Missing, empty or unreadable files become empty mappings and entries that
/// do not fit their schema are skipped; loading itself never fails.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    root: PathBuf,
}

impl CatalogLoader {
    /// Build a loader rooted at the given data directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every catalog file.
    pub fn load(&self) -> Catalog {
        let mut catalog = Catalog {
            arm_weapons: load_named(&self.root.join(ARM_WEAPON_FILE)),
            back_weapons: load_named(&self.root.join(BACK_WEAPON_FILE)),
            wargear: load_named(&self.root.join(WARGEAR_FILE)),
            keywords: load_mapping(&self.root.join(KEYWORD_FILE)),
            abilities: load_mapping(&self.root.join(ABILITY_FILE)),
            ..Catalog::default()
        };

        let stems = match self.mech_files() {
            Ok(stems) => stems,
            Err(err) => {
                warn!("Skipping mech templates: {err:#}");
                Vec::new()
            }
        };
        for stem in stems {
            match self.load_template(&stem) {
                Ok(template) => catalog.insert_template(&stem, template),
                Err(err) => warn!("Skipping mech {stem}: {err:#}"),
            }
        }

        debug!(
            mechs = catalog.mech_names().len(),
            arm_weapons = catalog.arm_weapons.len(),
            back_weapons = catalog.back_weapons.len(),
            wargear = catalog.wargear.len(),
            "Catalog loaded"
        );
        catalog
    }

    /// File stems of the mech template files, sorted.
    pub fn mech_files(&self) -> Result<Vec<String>> {
        let dir = self.root.join(MECH_DATA_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut stems: Vec<String> = fs::read_dir(&dir)
            .with_context(|| format!("failed to read {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();
        stems.sort();
        Ok(stems)
    }

    /// Read one template by mech name, deriving its armor summary.
    ///
    /// The file name is the lowercased mech name without a `-class` suffix.
    pub fn load_template(&self, name: &str) -> Result<MechTemplate> {
        let path = self
            .root
            .join(MECH_DATA_DIR)
            .join(format!("{}.json", super::mech_key(name)));
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut template: MechTemplate = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if template.name.trim().is_empty() {
            template.name = name.to_string();
        }
        template.derive_armor_summary();
        Ok(template)
    }
}

/// Catalog entries whose name is the key of the JSON object holding them.
trait Named {
    fn set_name(&mut self, name: String);
}

impl Named for WeaponDef {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Named for WargearDef {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

fn load_named<T: DeserializeOwned + Named>(path: &Path) -> BTreeMap<String, T> {
    let mut mapping: BTreeMap<String, T> = load_mapping(path);
    for (name, item) in mapping.iter_mut() {
        item.set_name(name.clone());
    }
    mapping
}

fn load_mapping<T: DeserializeOwned>(path: &Path) -> BTreeMap<String, T> {
    let raw = match read_mapping(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("Loading error {}: {err:#}", path.display());
            return BTreeMap::new();
        }
    };
    raw.into_iter()
        .filter_map(|(name, value)| match serde_json::from_value(value) {
            Ok(item) => Some((name, item)),
            Err(err) => {
                warn!("Skipping {name} in {}: {err}", path.display());
                None
            }
        })
        .collect()
}

fn read_mapping(path: &Path) -> Result<BTreeMap<String, Value>> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let mapping = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(mapping)
}
