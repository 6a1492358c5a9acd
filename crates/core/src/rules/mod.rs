//! Equipment rules: carrying weight, weight classes and slot validation.
//!
//! The functions here operate on a single [`ConfiguredMech`] and a read-only
//! [`Catalog`]; roster-wide bookkeeping lives in [`crate::roster`].

mod describe;
mod wargear;

use tracing::debug;

use crate::{
    catalog::Catalog,
    error::RosterError,
    models::{ConfiguredMech, Slot, WeightClass},
};

pub use describe::{
    describe_weapon, parse_strength, weapon_summary, StrengthExpr, StrengthTerm, NO_DATA,
};
pub use wargear::{assign_wargear, is_none_selection, WargearUsage, NO_WARGEAR};

/// Carrying weight and capacity of a loadout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarryLoad {
    /// Sum of equipped weapon weights.
    pub carrying_weight: f64,
    /// Capacity of the weight class.
    pub max_carry: f64,
}

impl CarryLoad {
    /// Whether the load exceeds the capacity.
    pub fn is_overweight(&self) -> bool {
        self.carrying_weight > self.max_carry
    }
}

/// Capacity for a declared type and keyword list.
pub fn max_carry(mech_type: Option<&str>, keywords: &[String]) -> f64 {
    WeightClass::resolve(mech_type, keywords).max_carry()
}

/// Total weight of the named weapons.
///
/// Empty names and names missing from both weapon catalogs weigh nothing; a
/// malformed weight is an error.
pub fn loadout_weight<'a>(
    names: impl IntoIterator<Item = &'a str>,
    catalog: &Catalog,
) -> Result<f64, RosterError> {
    let mut total = 0.0;
    for name in names {
        if name.is_empty() {
            continue;
        }
        if let Some(weapon) = catalog.weapon(name) {
            total += weapon.weight()?;
        }
    }
    Ok(total)
}

/// Recompute the mech's carrying weight and capacity.
///
/// The mech is only updated on success, so a malformed catalog entry leaves
/// the previous figures in place.
pub fn compute_carrying_weight(
    mech: &mut ConfiguredMech,
    catalog: &Catalog,
) -> Result<CarryLoad, RosterError> {
    let template = mech.template();
    let load = CarryLoad {
        carrying_weight: loadout_weight(mech.equipped().map(|(_, name)| name), catalog)?,
        max_carry: max_carry(template.mech_type.as_deref(), &template.keywords),
    };
    mech.set_load(load.carrying_weight, load.max_carry);
    Ok(load)
}

/// Put a weapon into a slot, enforcing the carrying capacity.
///
/// The name is resolved against the slot's own catalog; an empty or unknown
/// name clears the slot. On success the description of the equipped weapon
/// (or [`NO_DATA`]) is returned. An overweight selection leaves the slot empty
/// and fails with [`RosterError::Overweight`].
pub fn validate_assignment(
    mech: &mut ConfiguredMech,
    slot: Slot,
    proposed: &str,
    catalog: &Catalog,
) -> Result<String, RosterError> {
    if !mech.is_provisioned(slot) {
        return Err(RosterError::SlotLocked {
            mech: mech.name().to_string(),
            slot,
        });
    }

    let proposed = proposed.trim();
    let selected = catalog.weapons_for(slot).get_key_value(proposed);
    let previous = mech.weapon(slot).map(str::to_string);
    mech.set_weapon(slot, selected.map(|(name, _)| name.clone()));

    let load = match compute_carrying_weight(mech, catalog) {
        Ok(load) => load,
        Err(err) => {
            mech.set_weapon(slot, previous);
            return Err(err);
        }
    };

    if load.is_overweight() {
        debug!(
            mech = %mech.name(),
            %slot,
            weapon = proposed,
            carrying = load.carrying_weight,
            max_carry = load.max_carry,
            "Rejected overweight loadout"
        );
        mech.set_weapon(slot, None);
        compute_carrying_weight(mech, catalog)?;
        return Err(RosterError::Overweight {
            mech: mech.name().to_string(),
            carrying: load.carrying_weight,
            max_carry: load.max_carry,
        });
    }

    Ok(selected
        .map(|(_, weapon)| describe_weapon(weapon))
        .unwrap_or_else(|| NO_DATA.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MechId, MechTemplate, WeaponDef};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        for (name, weight) in [("Rifle", 5.0), ("Heavy Cannon", 12.0), ("Shared", 5.0)] {
            catalog
                .arm_weapons
                .insert(name.to_string(), WeaponDef::new(name, weight));
        }
        for (name, weight) in [("Missile Pod", 8.0), ("Shared", 10.0)] {
            catalog
                .back_weapons
                .insert(name.to_string(), WeaponDef::new(name, weight));
        }
        catalog
    }

    fn mech(mech_type: &str, keywords: &[&str]) -> ConfiguredMech {
        let template = MechTemplate {
            name: "Test Mech".to_string(),
            mech_type: Some(mech_type.to_string()),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..MechTemplate::default()
        };
        ConfiguredMech::fresh(MechId(1), template)
    }

    fn restored(weapons: &[(Slot, &str)]) -> ConfiguredMech {
        let template = MechTemplate {
            name: "Test Mech".to_string(),
            ..MechTemplate::default()
        };
        let saved: BTreeMap<Slot, String> = weapons
            .iter()
            .map(|(slot, name)| (*slot, name.to_string()))
            .collect();
        ConfiguredMech::restored(MechId(1), template, saved)
    }

    #[test]
    fn carrying_weight_sums_both_catalogs() {
        let catalog = catalog();
        let mut mech = restored(&[(Slot::LeftArm, "Rifle"), (Slot::BackLeft, "Missile Pod")]);
        let load = compute_carrying_weight(&mut mech, &catalog).unwrap();
        assert_eq!(load.carrying_weight, 13.0);
        assert_eq!(load.max_carry, 20.0);
        assert_eq!(mech.carrying_weight(), 13.0);
    }

    #[test]
    fn arm_definition_wins_name_collisions() {
        let catalog = catalog();
        let mut mech = restored(&[(Slot::LeftArm, "Shared"), (Slot::RightArm, "Rifle")]);
        let load = compute_carrying_weight(&mut mech, &catalog).unwrap();
        assert_eq!(load.carrying_weight, 10.0);
    }

    #[test]
    fn unknown_and_weightless_weapons_count_zero() {
        let mut catalog = catalog();
        catalog
            .arm_weapons
            .insert("Knife".to_string(), WeaponDef { name: "Knife".to_string(), ..WeaponDef::default() });
        let mut mech = restored(&[(Slot::LeftArm, "unknown"), (Slot::RightArm, "Knife")]);
        let load = compute_carrying_weight(&mut mech, &catalog).unwrap();
        assert_eq!(load.carrying_weight, 0.0);
    }

    #[test]
    fn capacity_follows_class_and_keywords() {
        let catalog = catalog();
        for (mech_type, keywords, expected) in [
            ("light", &[][..], 15.0),
            ("medium", &[][..], 20.0),
            ("heavy", &[][..], 25.0),
            ("invalid_type", &[][..], 20.0),
            ("medium", &["Heavy", "Light"][..], 25.0),
            ("medium", &["Light"][..], 15.0),
        ] {
            let mut mech = mech(mech_type, keywords);
            let load = compute_carrying_weight(&mut mech, &catalog).unwrap();
            assert_eq!(load.max_carry, expected, "{mech_type} {keywords:?}");
        }
    }

    #[test]
    fn malformed_weight_is_an_error() {
        let mut catalog = catalog();
        let club: WeaponDef = serde_json::from_value(json!({"name": "Club", "weight": "heavy"})).unwrap();
        catalog.arm_weapons.insert("Club".to_string(), club);
        let mut mech = restored(&[(Slot::LeftArm, "Club"), (Slot::RightArm, "Rifle")]);
        assert!(matches!(
            compute_carrying_weight(&mut mech, &catalog),
            Err(RosterError::MalformedCatalogData { .. })
        ));
        assert_eq!(mech.carrying_weight(), 0.0);
    }

    #[test]
    fn malformed_weapon_keeps_previous_loadout() {
        let mut catalog = catalog();
        let club: WeaponDef = serde_json::from_value(json!({"name": "Club", "weight": "heavy"})).unwrap();
        catalog.arm_weapons.insert("Club".to_string(), club);
        let mut mech = mech("medium", &[]);
        validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();

        for slot in [Slot::RightArm, Slot::LeftArm] {
            assert!(matches!(
                validate_assignment(&mut mech, slot, "Club", &catalog),
                Err(RosterError::MalformedCatalogData { field: "weight", .. })
            ));
        }
        assert_eq!(mech.weapon(Slot::LeftArm), Some("Rifle"));
        assert_eq!(mech.weapon(Slot::RightArm), None);
        assert_eq!(mech.carrying_weight(), 5.0);
    }

    #[test]
    fn equips_within_capacity() {
        let catalog = catalog();
        let mut mech = mech("light", &[]);
        let description = validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();
        assert!(description.contains("weight: 5"));
        assert_eq!(mech.weapon(Slot::LeftArm), Some("Rifle"));
        assert_eq!(mech.carrying_weight(), 5.0);
    }

    #[test]
    fn overweight_selection_leaves_slot_empty() {
        let catalog = catalog();
        let mut mech = mech("light", &[]);
        validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();
        validate_assignment(&mut mech, Slot::RightArm, "Rifle", &catalog).unwrap();

        let result = validate_assignment(&mut mech, Slot::BackLeft, "Missile Pod", &catalog);
        assert_eq!(
            result,
            Err(RosterError::Overweight {
                mech: "Test Mech".to_string(),
                carrying: 18.0,
                max_carry: 15.0,
            })
        );
        assert_eq!(mech.weapon(Slot::BackLeft), None);
        assert!(mech.is_provisioned(Slot::BackLeft));
        assert_eq!(mech.weapon(Slot::LeftArm), Some("Rifle"));
        assert_eq!(mech.weapon(Slot::RightArm), Some("Rifle"));
        assert_eq!(mech.carrying_weight(), 10.0);
    }

    #[test]
    fn replacing_a_weapon_counts_only_the_new_one() {
        let catalog = catalog();
        let mut mech = mech("light", &[]);
        validate_assignment(&mut mech, Slot::LeftArm, "Heavy Cannon", &catalog).unwrap();
        validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();
        assert_eq!(mech.carrying_weight(), 5.0);
    }

    #[test]
    fn unknown_or_empty_selection_clears_slot() {
        let catalog = catalog();
        let mut mech = mech("medium", &[]);
        validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();

        let description = validate_assignment(&mut mech, Slot::LeftArm, "None", &catalog).unwrap();
        assert_eq!(description, NO_DATA);
        assert_eq!(mech.weapon(Slot::LeftArm), None);

        validate_assignment(&mut mech, Slot::LeftArm, "Rifle", &catalog).unwrap();
        validate_assignment(&mut mech, Slot::LeftArm, "", &catalog).unwrap();
        assert_eq!(mech.carrying_weight(), 0.0);
    }

    #[test]
    fn slots_only_accept_their_own_catalog() {
        let catalog = catalog();
        let mut mech = mech("medium", &[]);
        let description =
            validate_assignment(&mut mech, Slot::LeftArm, "Missile Pod", &catalog).unwrap();
        assert_eq!(description, NO_DATA);
        assert_eq!(mech.weapon(Slot::LeftArm), None);
    }

    #[test]
    fn unprovisioned_back_slot_is_locked() {
        let catalog = catalog();
        let mut mech = restored(&[(Slot::LeftArm, "Rifle")]);
        assert_eq!(
            validate_assignment(&mut mech, Slot::BackRight, "Missile Pod", &catalog),
            Err(RosterError::SlotLocked {
                mech: "Test Mech".to_string(),
                slot: Slot::BackRight,
            })
        );
        assert!(validate_assignment(&mut mech, Slot::RightArm, "Rifle", &catalog).is_ok());
    }
}
