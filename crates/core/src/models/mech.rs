use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{display_value, Slot, WeightClass};

/// Mech statistics as read from the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MechTemplate {
    /// Display name, e.g. `Atlas-Class`.
    #[serde(default)]
    pub name: String,
    /// Hit points.
    #[serde(rename = "HP", default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<Value>,
    /// Kinetic armor value.
    #[serde(rename = "Kinetic-Armor", default, skip_serializing_if = "Option::is_none")]
    pub kinetic_armor: Option<Value>,
    /// Thermal armor value.
    #[serde(rename = "Thermal-Armor", default, skip_serializing_if = "Option::is_none")]
    pub thermal_armor: Option<Value>,
    /// Chemical armor value.
    #[serde(rename = "Chemical-Armor", default, skip_serializing_if = "Option::is_none")]
    pub chemical_armor: Option<Value>,
    /// Heat capacity.
    #[serde(rename = "Heat Cap.", default, skip_serializing_if = "Option::is_none")]
    pub heat_capacity: Option<Value>,
    /// Mobility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobility: Option<Value>,
    /// Declared weight class; keywords may override it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mech_type: Option<String>,
    /// Keywords, possibly including a weight class.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Ability names, described by the ability glossary.
    #[serde(default)]
    pub abilities: Vec<String>,
    /// Armor summary line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<String>,
}

impl MechTemplate {
    /// Fill in the armor summary unless the source record already had one.
    pub fn derive_armor_summary(&mut self) {
        if self.armor.is_some() {
            return;
        }
        let armor = |value: &Option<Value>| {
            value
                .as_ref()
                .map(display_value)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "0".to_string())
        };
        self.armor = Some(format!(
            "Kinetic: {}, Thermal: {}, Chemical: {}",
            armor(&self.kinetic_armor),
            armor(&self.thermal_armor),
            armor(&self.chemical_armor)
        ));
    }

    /// Weight class after keyword overrides.
    pub fn weight_class(&self) -> WeightClass {
        WeightClass::resolve(self.mech_type.as_deref(), &self.keywords)
    }

    /// Multi-line statistics block; missing values read `?`.
    pub fn stats_block(&self) -> String {
        let stat = |value: &Option<Value>| {
            value
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "?".to_string())
        };
        format!(
            "HP: {}\nKinetic Armor: {}\nThermal Armor: {}\nChemical Armor: {}\nMobility: {}\nHeat Capacity: {}",
            stat(&self.hp),
            stat(&self.kinetic_armor),
            stat(&self.thermal_armor),
            stat(&self.chemical_armor),
            stat(&self.mobility),
            stat(&self.heat_capacity),
        )
    }
}

/// Roster-scoped identity of a configured mech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MechId(pub(crate) u64);

impl fmt::Display for MechId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A mech in the roster: template plus loadout.
///
/// A slot is usable only while it is a key of the weapon map. Equality ignores
/// the [`MechId`], so two mechs with identical configuration compare equal.
#[derive(Debug, Clone)]
pub struct ConfiguredMech {
    id: MechId,
    template: MechTemplate,
    weapons: BTreeMap<Slot, Option<String>>,
    wargear: Option<String>,
    carrying_weight: f64,
    max_carry: f64,
}

impl PartialEq for ConfiguredMech {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
            && self.weapons == other.weapons
            && self.wargear == other.wargear
            && self.carrying_weight == other.carrying_weight
            && self.max_carry == other.max_carry
    }
}

impl ConfiguredMech {
    /// Freshly added mech: all four slots provisioned and empty.
    pub(crate) fn fresh(id: MechId, template: MechTemplate) -> Self {
        let weapons = Slot::ALL.into_iter().map(|slot| (slot, None)).collect();
        Self::with_weapons(id, template, weapons)
    }

    /// Mech rebuilt from saved weapons.
    ///
    /// Arm slots are always provisioned; back slots only when the save names
    /// them, even with an empty weapon.
    pub(crate) fn restored(
        id: MechId,
        template: MechTemplate,
        saved: BTreeMap<Slot, String>,
    ) -> Self {
        let mut weapons: BTreeMap<Slot, Option<String>> =
            Slot::ARMS.into_iter().map(|slot| (slot, None)).collect();
        for (slot, weapon) in saved {
            let weapon = weapon.trim();
            weapons.insert(slot, (!weapon.is_empty()).then(|| weapon.to_string()));
        }
        Self::with_weapons(id, template, weapons)
    }

    fn with_weapons(
        id: MechId,
        template: MechTemplate,
        weapons: BTreeMap<Slot, Option<String>>,
    ) -> Self {
        let max_carry = template.weight_class().max_carry();
        Self {
            id,
            template,
            weapons,
            wargear: None,
            carrying_weight: 0.0,
            max_carry,
        }
    }

    /// Roster identity.
    pub fn id(&self) -> MechId {
        self.id
    }

    /// Display name of the underlying template.
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Underlying template.
    pub fn template(&self) -> &MechTemplate {
        &self.template
    }

    /// Provisioned slots with their weapons, in canonical order.
    pub fn weapons(&self) -> &BTreeMap<Slot, Option<String>> {
        &self.weapons
    }

    /// Weapon in `slot`, if any.
    pub fn weapon(&self, slot: Slot) -> Option<&str> {
        self.weapons.get(&slot).and_then(|weapon| weapon.as_deref())
    }

    /// Non-empty slots in canonical order.
    pub fn equipped(&self) -> impl Iterator<Item = (Slot, &str)> + '_ {
        self.weapons
            .iter()
            .filter_map(|(slot, weapon)| weapon.as_deref().map(|name| (*slot, name)))
    }

    /// Whether `slot` can take a weapon on this mech.
    pub fn is_provisioned(&self, slot: Slot) -> bool {
        self.weapons.contains_key(&slot)
    }

    /// Equipped wargear, if any.
    pub fn wargear(&self) -> Option<&str> {
        self.wargear.as_deref()
    }

    /// Summed weight of equipped weapons.
    pub fn carrying_weight(&self) -> f64 {
        self.carrying_weight
    }

    /// Capacity of the mech's weight class.
    pub fn max_carry(&self) -> f64 {
        self.max_carry
    }

    /// Whether the loadout exceeds the capacity (possible only after a load).
    pub fn is_overweight(&self) -> bool {
        self.carrying_weight > self.max_carry
    }

    pub(crate) fn set_weapon(&mut self, slot: Slot, weapon: Option<String>) {
        self.weapons.insert(slot, weapon);
    }

    pub(crate) fn set_wargear(&mut self, wargear: Option<String>) {
        self.wargear = wargear;
    }

    pub(crate) fn set_load(&mut self, carrying_weight: f64, max_carry: f64) {
        self.carrying_weight = carrying_weight;
        self.max_carry = max_carry;
    }
}
