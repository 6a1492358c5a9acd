//! Line-oriented roster text format.
//!
//! ```text
//! <MechName> | Wargear: <WargearName|None> | Weapons: <slot>: <weapon>, <slot>: <weapon>
//! ```

use std::collections::BTreeMap;

use crate::models::ConfiguredMech;

/// Wargear placeholder written for mechs without wargear.
pub const NONE_WARGEAR: &str = "None";

const WARGEAR_MARKER: &str = "Wargear:";
const WEAPONS_MARKER: &str = "Weapons:";

/// Partial mech description read back from a save line.
///
/// Nothing here is validated against the catalog; slot and weapon names are
/// kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    /// Mech name as written.
    pub name: String,
    /// Wargear name, `"None"` when absent.
    pub wargear: String,
    /// Slot name to weapon name.
    pub weapons: BTreeMap<String, String>,
}

impl SaveRecord {
    /// Record with no wargear and no weapons.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wargear: NONE_WARGEAR.to_string(),
            weapons: BTreeMap::new(),
        }
    }
}

/// One save line for a mech; empty slots are left out.
pub fn serialize_mech(mech: &ConfiguredMech) -> String {
    let weapons = mech
        .equipped()
        .map(|(slot, weapon)| format!("{slot}: {weapon}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} | {WARGEAR_MARKER} {} | {WEAPONS_MARKER} {weapons}",
        mech.name(),
        mech.wargear().unwrap_or(NONE_WARGEAR)
    )
}

/// One line per mech, in roster order.
pub fn serialize(mechs: &[ConfiguredMech]) -> Vec<String> {
    mechs.iter().map(serialize_mech).collect()
}

/// Parse every non-blank line. Never fails; unrecognised parts are ignored.
pub fn deserialize(text: &str) -> Vec<SaveRecord> {
    text.lines().filter_map(deserialize_line).collect()
}

/// Parse a single line, `None` when it is blank.
pub fn deserialize_line(line: &str) -> Option<SaveRecord> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.split('|');
    let mut record = SaveRecord::named(parts.next().unwrap_or_default().trim());
    for part in parts {
        if let Some(wargear) = after_marker(part, WARGEAR_MARKER) {
            record.wargear = wargear.to_string();
        } else if let Some(weapons) = after_marker(part, WEAPONS_MARKER) {
            for item in weapons.split(',') {
                if let Some((slot, weapon)) = item.split_once(':') {
                    record
                        .weapons
                        .insert(slot.trim().to_string(), weapon.trim().to_string());
                }
            }
        }
    }
    Some(record)
}

fn after_marker<'a>(part: &'a str, marker: &str) -> Option<&'a str> {
    part.split(marker).nth(1).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_line() {
        let records =
            deserialize("Atlas | Wargear: Shield Generator | Weapons: left_arm: Rifle, right_arm: Heavy Cannon\n");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.name, "Atlas");
        assert_eq!(record.wargear, "Shield Generator");
        assert_eq!(
            record.weapons,
            BTreeMap::from([
                ("left_arm".to_string(), "Rifle".to_string()),
                ("right_arm".to_string(), "Heavy Cannon".to_string()),
            ])
        );
    }

    #[test]
    fn name_only_line() {
        assert_eq!(deserialize("Solo Mech"), vec![SaveRecord::named("Solo Mech")]);
    }

    #[test]
    fn odd_lines_are_tolerated() {
        let records = deserialize(
            "\n  \nMech1 | Wargear: Shield | Weapons: left_arm Laser, back_left: Missile\n| junk | more\n",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].weapons,
            BTreeMap::from([("back_left".to_string(), "Missile".to_string())])
        );
        assert_eq!(records[1].name, "");
        assert_eq!(records[1].wargear, NONE_WARGEAR);
    }

    #[test]
    fn weapon_names_keep_inner_colons() {
        let record = deserialize_line("Mech | Weapons: left_arm: Mk:II Rifle").unwrap();
        assert_eq!(record.weapons["left_arm"], "Mk:II Rifle");
    }

    #[test]
    fn empty_weapon_list() {
        let record = deserialize_line("Mech | Wargear: None | Weapons: ").unwrap();
        assert_eq!(record.wargear, NONE_WARGEAR);
        assert!(record.weapons.is_empty());
    }
}
