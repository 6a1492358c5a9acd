//! Roster state and the operations the front end drives.
//!
//! [`RosterManager`] owns the catalog, the configured mechs and the wargear
//! usage counter. Every mutation goes through its methods and either commits
//! completely or leaves the roster as it was.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::{
    catalog::{Catalog, CatalogEntry},
    error::{RosterError, RosterWarning},
    models::{ConfiguredMech, MechId, Slot},
    rules::{assign_wargear, compute_carrying_weight, is_none_selection, validate_assignment, WargearUsage},
    save::{self, SaveRecord},
};

/// Maximum number of mechs in a roster.
pub const MAX_MECHS: usize = 6;

/// Records read from save text, already capped at [`MAX_MECHS`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRoster {
    /// Accepted records in file order.
    pub records: Vec<SaveRecord>,
    /// Advisories raised while parsing.
    pub warnings: Vec<RosterWarning>,
}

/// Outcome of a successful roster load.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    /// Number of mechs now in the roster.
    pub loaded: usize,
    /// Everything that was normalised away.
    pub warnings: Vec<RosterWarning>,
}

/// Owner of the roster.
#[derive(Debug, Clone)]
pub struct RosterManager {
    catalog: Catalog,
    mechs: Vec<ConfiguredMech>,
    usage: WargearUsage,
    next_id: u64,
}

impl RosterManager {
    /// Empty roster over a catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            mechs: Vec::new(),
            usage: WargearUsage::default(),
            next_id: 1,
        }
    }

    /// Reference data the roster was built with.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mechs in insertion order.
    pub fn roster(&self) -> &[ConfiguredMech] {
        &self.mechs
    }

    /// Number of mechs.
    pub fn len(&self) -> usize {
        self.mechs.len()
    }

    /// Whether the roster has no mechs.
    pub fn is_empty(&self) -> bool {
        self.mechs.is_empty()
    }

    /// Whether another mech would exceed [`MAX_MECHS`].
    pub fn is_full(&self) -> bool {
        self.mechs.len() >= MAX_MECHS
    }

    /// Roster member by identity.
    pub fn mech(&self, id: MechId) -> Option<&ConfiguredMech> {
        self.mechs.iter().find(|mech| mech.id() == id)
    }

    /// Roster-wide wargear counts.
    pub fn wargear_usage(&self) -> &WargearUsage {
        &self.usage
    }

    /// Add a mech built from the named template with all slots empty.
    pub fn add_mech(&mut self, name: &str) -> Result<MechId, RosterError> {
        if self.is_full() {
            return Err(RosterError::RosterFull { max: MAX_MECHS });
        }
        let template = self
            .catalog
            .template(name)
            .cloned()
            .ok_or_else(|| RosterError::UnknownMech(name.trim().to_string()))?;

        let id = self.allocate_id();
        let mut mech = ConfiguredMech::fresh(id, template);
        compute_carrying_weight(&mut mech, &self.catalog)?;
        info!(%id, mech = %mech.name(), max_carry = mech.max_carry(), "Added mech");
        self.mechs.push(mech);
        Ok(id)
    }

    /// Remove the first mech equal to `mech` and release its wargear.
    ///
    /// Identity is not compared. Returns the removed mech, or `None` when no
    /// roster member matches.
    pub fn remove_mech(&mut self, mech: &ConfiguredMech) -> Option<ConfiguredMech> {
        let index = self.mechs.iter().position(|member| member == mech)?;
        let removed = self.mechs.remove(index);
        if let Some(wargear) = removed.wargear() {
            self.usage.release(wargear);
        }
        info!(id = %removed.id(), mech = %removed.name(), "Removed mech");
        Some(removed)
    }

    /// Put a weapon into one of a roster mech's slots.
    ///
    /// See [`validate_assignment`] for the rules; returns the weapon
    /// description on success.
    pub fn equip_weapon(
        &mut self,
        id: MechId,
        slot: Slot,
        weapon: &str,
    ) -> Result<String, RosterError> {
        let mech = self
            .mechs
            .iter_mut()
            .find(|mech| mech.id() == id)
            .ok_or(RosterError::NotInRoster)?;
        let description = validate_assignment(mech, slot, weapon, &self.catalog)?;
        debug!(%id, %slot, weapon, carrying = mech.carrying_weight(), "Equipped weapon");
        Ok(description)
    }

    /// Select wargear for a roster mech; see [`assign_wargear`].
    pub fn equip_wargear(&mut self, id: MechId, wargear: &str) -> Result<String, RosterError> {
        let mech = self
            .mechs
            .iter_mut()
            .find(|mech| mech.id() == id)
            .ok_or(RosterError::NotInRoster)?;
        let description = assign_wargear(&mut self.usage, mech, wargear, &self.catalog.wargear)?;
        debug!(%id, wargear = mech.wargear().unwrap_or(save::NONE_WARGEAR), "Equipped wargear");
        Ok(description)
    }

    /// Drop every mech and reset the wargear counter.
    pub fn clear(&mut self) {
        self.mechs.clear();
        self.usage.clear();
    }

    /// Save lines for the current roster.
    pub fn serialize_roster(&self) -> Vec<String> {
        save::serialize(&self.mechs)
    }

    /// Parse save text, keeping the first [`MAX_MECHS`] records.
    pub fn deserialize_roster(text: &str) -> ParsedRoster {
        let mut records = save::deserialize(text);
        let mut warnings = Vec::new();
        if records.len() > MAX_MECHS {
            warn!(total = records.len(), kept = MAX_MECHS, "Truncating roster");
            warnings.push(RosterWarning::RosterTruncated {
                kept: MAX_MECHS,
                total: records.len(),
            });
            records.truncate(MAX_MECHS);
        }
        ParsedRoster { records, warnings }
    }

    /// Replace the roster with the mechs described by save text.
    pub fn load_roster(&mut self, text: &str) -> Result<LoadReport, RosterError> {
        let parsed = Self::deserialize_roster(text);
        let mut report = self.load_records(parsed.records)?;
        let mut warnings = parsed.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        Ok(report)
    }

    /// Replace the roster with mechs rebuilt from records.
    ///
    /// Unknown mechs are skipped, unknown slots dropped, and weapons missing
    /// from their slot's catalog leave the slot empty. Saved wargear goes
    /// through the usual limit check. A loadout heavier than the capacity is
    /// kept and reported. On error the current roster is left untouched.
    pub fn load_records(&mut self, records: Vec<SaveRecord>) -> Result<LoadReport, RosterError> {
        let mut warnings = Vec::new();
        if records.len() > MAX_MECHS {
            warnings.push(RosterWarning::RosterTruncated {
                kept: MAX_MECHS,
                total: records.len(),
            });
        }

        let mut mechs = Vec::new();
        let mut usage = WargearUsage::default();
        let mut next_id = self.next_id;
        for record in records.into_iter().take(MAX_MECHS) {
            let Some(template) = self.catalog.template(&record.name).cloned() else {
                warn!("Skipping {}: no mech data", record.name);
                warnings.push(RosterWarning::UnknownMech(record.name));
                continue;
            };

            let mut saved = BTreeMap::new();
            for (slot, weapon) in record.weapons {
                let slot = match slot.parse::<Slot>() {
                    Ok(slot) => slot,
                    Err(err) => {
                        warn!("Skipping {}: {err}", record.name);
                        continue;
                    }
                };
                let weapon = if self.catalog.weapons_for(slot).contains_key(weapon.trim()) {
                    weapon
                } else {
                    debug!(mech = %record.name, %slot, weapon = %weapon, "Dropping unknown weapon");
                    String::new()
                };
                saved.insert(slot, weapon);
            }

            let mut mech = ConfiguredMech::restored(MechId(next_id), template, saved);
            next_id += 1;

            let load = compute_carrying_weight(&mut mech, &self.catalog)?;
            if load.is_overweight() {
                warnings.push(RosterWarning::Overweight {
                    mech: mech.name().to_string(),
                    carrying: load.carrying_weight,
                    max_carry: load.max_carry,
                });
            }

            if !is_none_selection(&record.wargear) {
                if let Err(reason) =
                    assign_wargear(&mut usage, &mut mech, &record.wargear, &self.catalog.wargear)
                {
                    warnings.push(RosterWarning::WargearRejected {
                        mech: mech.name().to_string(),
                        wargear: record.wargear,
                        reason,
                    });
                }
            }
            mechs.push(mech);
        }

        self.mechs = mechs;
        self.usage = usage;
        self.next_id = next_id;
        info!(mechs = self.mechs.len(), warnings = warnings.len(), "Loaded roster");
        Ok(LoadReport {
            loaded: self.mechs.len(),
            warnings,
        })
    }

    /// Look a name up across every catalog.
    pub fn resolve_catalog_entry(&self, name: &str) -> Option<CatalogEntry<'_>> {
        self.catalog.resolve(name)
    }

    /// Keywords used by the roster's mechs and their equipped weapons, with
    /// descriptions, sorted. An empty roster lists the whole glossary.
    pub fn squad_keywords(&self) -> Vec<(String, String)> {
        if self.mechs.is_empty() {
            return self
                .catalog
                .keywords
                .iter()
                .map(|(keyword, description)| (keyword.clone(), description.clone()))
                .collect();
        }

        let mut used = BTreeSet::new();
        for mech in &self.mechs {
            used.extend(mech.template().keywords.iter().map(String::as_str));
            for (_, weapon) in mech.equipped() {
                if let Some(weapon) = self.catalog.weapon(weapon) {
                    used.extend(weapon.keywords.iter().map(String::as_str));
                }
            }
        }
        used.into_iter()
            .map(|keyword| {
                (
                    keyword.to_string(),
                    self.catalog.keyword_description(keyword).to_string(),
                )
            })
            .collect()
    }

    /// Abilities across the roster with descriptions, sorted.
    pub fn squad_abilities(&self) -> Vec<(String, String)> {
        self.mechs
            .iter()
            .flat_map(|mech| mech.template().abilities.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|ability| {
                (
                    ability.to_string(),
                    self.catalog.ability_description(ability).to_string(),
                )
            })
            .collect()
    }

    /// One mech's abilities with descriptions, in template order.
    pub fn mech_abilities(&self, id: MechId) -> Result<Vec<(String, String)>, RosterError> {
        let mech = self.mech(id).ok_or(RosterError::NotInRoster)?;
        Ok(mech
            .template()
            .abilities
            .iter()
            .map(|ability| {
                (
                    ability.clone(),
                    self.catalog.ability_description(ability).to_string(),
                )
            })
            .collect())
    }

    fn allocate_id(&mut self) -> MechId {
        let id = MechId(self.next_id);
        self.next_id += 1;
        id
    }
}
