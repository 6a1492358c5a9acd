//! Read-only reference data: templates, weapons, wargear and glossaries.

/// JSON catalog loading from a data directory.
pub mod loader;

use std::collections::BTreeMap;

use crate::{
    models::{MechTemplate, Slot, WargearDef, WeaponDef},
    rules::describe_weapon,
};

pub use loader::CatalogLoader;

/// Weapons keyed by name.
pub type WeaponCatalog = BTreeMap<String, WeaponDef>;

/// Fallback text for glossary entries without a description.
pub const NO_DESCRIPTION: &str = "No description.";

/// Lookup key for a mech name: lowercase, `-class` suffix removed.
///
/// `"Atlas-Class"` and `"atlas"` share the key `"atlas"`.
pub fn mech_key(name: &str) -> String {
    name.trim().to_lowercase().replace("-class", "")
}

/// Immutable catalog handed to the roster manager.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Weapons for arm slots.
    pub arm_weapons: WeaponCatalog,
    /// Weapons for back slots.
    pub back_weapons: WeaponCatalog,
    /// Wargear items.
    pub wargear: BTreeMap<String, WargearDef>,
    /// Keyword glossary.
    pub keywords: BTreeMap<String, String>,
    /// Ability glossary.
    pub abilities: BTreeMap<String, String>,
    templates: BTreeMap<String, MechTemplate>,
}

impl Catalog {
    /// Register a template under the normalised form of `key`.
    pub fn insert_template(&mut self, key: &str, template: MechTemplate) {
        self.templates.insert(mech_key(key), template);
    }

    /// Template for a mech name (see [`mech_key`]).
    pub fn template(&self, name: &str) -> Option<&MechTemplate> {
        self.templates.get(&mech_key(name))
    }

    /// Names accepted by [`Catalog::template`], sorted.
    pub fn mech_names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// All templates with their lookup keys, ordered by key.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &MechTemplate)> + '_ {
        self.templates
            .iter()
            .map(|(key, template)| (key.as_str(), template))
    }

    /// Weapon by name; the arm catalog shadows the back catalog.
    pub fn weapon(&self, name: &str) -> Option<&WeaponDef> {
        self.arm_weapons
            .get(name)
            .or_else(|| self.back_weapons.get(name))
    }

    /// Catalog of weapons selectable for `slot`.
    pub fn weapons_for(&self, slot: Slot) -> &WeaponCatalog {
        if slot.is_back() {
            &self.back_weapons
        } else {
            &self.arm_weapons
        }
    }

    /// Glossary text for a keyword.
    pub fn keyword_description(&self, keyword: &str) -> &str {
        self.keywords
            .get(keyword)
            .map(String::as_str)
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Glossary text for an ability.
    pub fn ability_description(&self, ability: &str) -> &str {
        self.abilities
            .get(ability)
            .map(String::as_str)
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Look a name up across every catalog for describe-on-hover use.
    ///
    /// Order: templates, arm weapons, back weapons, wargear, keywords,
    /// abilities.
    pub fn resolve(&self, name: &str) -> Option<CatalogEntry<'_>> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        if let Some(template) = self.template(name) {
            return Some(CatalogEntry::Mech(template));
        }
        if let Some(weapon) = self.arm_weapons.get(name) {
            return Some(CatalogEntry::ArmWeapon(weapon));
        }
        if let Some(weapon) = self.back_weapons.get(name) {
            return Some(CatalogEntry::BackWeapon(weapon));
        }
        if let Some(wargear) = self.wargear.get(name) {
            return Some(CatalogEntry::Wargear(wargear));
        }
        if let Some((name, description)) = self.keywords.get_key_value(name) {
            return Some(CatalogEntry::Keyword { name, description });
        }
        self.abilities
            .get_key_value(name)
            .map(|(name, description)| CatalogEntry::Ability { name, description })
    }
}

/// Result of [`Catalog::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogEntry<'a> {
    /// Mech template.
    Mech(&'a MechTemplate),
    /// Arm weapon.
    ArmWeapon(&'a WeaponDef),
    /// Back weapon.
    BackWeapon(&'a WeaponDef),
    /// Wargear item.
    Wargear(&'a WargearDef),
    /// Keyword glossary entry.
    Keyword {
        /// Keyword.
        name: &'a str,
        /// Glossary text.
        description: &'a str,
    },
    /// Ability glossary entry.
    Ability {
        /// Ability name.
        name: &'a str,
        /// Glossary text.
        description: &'a str,
    },
}

impl CatalogEntry<'_> {
    /// Display name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Self::Mech(template) => &template.name,
            Self::ArmWeapon(weapon) | Self::BackWeapon(weapon) => &weapon.name,
            Self::Wargear(wargear) => &wargear.name,
            Self::Keyword { name, .. } | Self::Ability { name, .. } => name,
        }
    }

    /// Multi-line description for display.
    pub fn describe(&self) -> String {
        match self {
            Self::Mech(template) => format!(
                "{}\nKeywords: {}\nAbilities:\n{}",
                template.stats_block(),
                template.keywords.join(", "),
                template.abilities.join("\n")
            ),
            Self::ArmWeapon(weapon) | Self::BackWeapon(weapon) => describe_weapon(weapon),
            Self::Wargear(wargear) => format!(
                "{}\n(Limit: {})",
                wargear.description,
                wargear
                    .limit
                    .map(|limit| limit.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
            Self::Keyword { description, .. } | Self::Ability { description, .. } => {
                description.to_string()
            }
        }
    }
}
