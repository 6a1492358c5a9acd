use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::RosterError,
    models::{ConfiguredMech, WargearDef},
};

/// Description shown when no wargear is selected.
pub const NO_WARGEAR: &str = "No wargear Selected.";

/// Roster-wide tally of equipped wargear.
///
/// Counts always match the number of roster mechs holding each item; an item
/// whose count drops to zero is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WargearUsage {
    counts: BTreeMap<String, u32>,
}

impl WargearUsage {
    /// Number of mechs holding `wargear`.
    pub fn count(&self, wargear: &str) -> u32 {
        self.counts.get(wargear).copied().unwrap_or(0)
    }

    /// Items currently in use with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Whether no wargear is equipped anywhere.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub(crate) fn acquire(&mut self, wargear: &str) {
        *self.counts.entry(wargear.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn release(&mut self, wargear: &str) {
        if let Some(count) = self.counts.get_mut(wargear) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(wargear);
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Whether a selection means "no wargear".
pub fn is_none_selection(wargear: &str) -> bool {
    let wargear = wargear.trim();
    wargear.is_empty() || wargear.eq_ignore_ascii_case("none")
}

/// Equip `proposed` on the mech, enforcing per-item limits.
///
/// A "none" selection or a name missing from the catalog clears the mech's
/// wargear. Re-selecting the item already held changes nothing. On rejection
/// the mech keeps its previous wargear. Returns the description to display.
pub fn assign_wargear(
    usage: &mut WargearUsage,
    mech: &mut ConfiguredMech,
    proposed: &str,
    catalog: &BTreeMap<String, WargearDef>,
) -> Result<String, RosterError> {
    let proposed = proposed.trim();
    let previous = mech.wargear().map(str::to_string);

    let Some((name, def)) = catalog
        .get_key_value(proposed)
        .filter(|_| !is_none_selection(proposed))
    else {
        if let Some(previous) = previous {
            usage.release(&previous);
        }
        mech.set_wargear(None);
        return Ok(NO_WARGEAR.to_string());
    };

    if previous.as_deref() != Some(name.as_str()) {
        let count = usage.count(name);
        if let Some(limit) = def.limit {
            if count >= limit {
                debug!(mech = %mech.name(), wargear = %name, count, limit, "Wargear limit reached");
                return Err(RosterError::WargearLimitExceeded {
                    wargear: name.clone(),
                    limit,
                });
            }
        }

        usage.acquire(name);
        if let Some(previous) = previous {
            usage.release(&previous);
        }
        mech.set_wargear(Some(name.clone()));
    }

    Ok(format!(
        "{}\n(Limit: {})",
        def.description,
        def.limit
            .map(|limit| limit.to_string())
            .unwrap_or_else(|| "-".to_string())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MechId, MechTemplate};

    fn catalog() -> BTreeMap<String, WargearDef> {
        [
            WargearDef::new("Shield Generator", "Absorbs the first hit.", Some(1)),
            WargearDef::new("Jump Pack", "Moves over terrain.", Some(2)),
            WargearDef::new("Smoke Launcher", "Blocks line of sight.", None),
        ]
        .into_iter()
        .map(|def| (def.name.clone(), def))
        .collect()
    }

    fn mech(id: u64) -> ConfiguredMech {
        ConfiguredMech::fresh(
            MechId(id),
            MechTemplate {
                name: format!("Mech {id}"),
                ..MechTemplate::default()
            },
        )
    }

    #[test]
    fn enforces_limit_across_mechs() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        let mut first = mech(1);
        let mut second = mech(2);

        let description = assign_wargear(&mut usage, &mut first, "Shield Generator", &catalog).unwrap();
        assert_eq!(description, "Absorbs the first hit.\n(Limit: 1)");
        assert_eq!(usage.count("Shield Generator"), 1);

        assert_eq!(
            assign_wargear(&mut usage, &mut second, "Shield Generator", &catalog),
            Err(RosterError::WargearLimitExceeded {
                wargear: "Shield Generator".to_string(),
                limit: 1,
            })
        );
        assert_eq!(second.wargear(), None);
        assert_eq!(usage.count("Shield Generator"), 1);
    }

    #[test]
    fn rejection_keeps_previous_selection() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        let mut first = mech(1);
        let mut second = mech(2);
        assign_wargear(&mut usage, &mut first, "Shield Generator", &catalog).unwrap();
        assign_wargear(&mut usage, &mut second, "Jump Pack", &catalog).unwrap();

        assert!(assign_wargear(&mut usage, &mut second, "Shield Generator", &catalog).is_err());
        assert_eq!(second.wargear(), Some("Jump Pack"));
        assert_eq!(usage.count("Jump Pack"), 1);
    }

    #[test]
    fn swapping_releases_the_old_item() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        let mut first = mech(1);
        let mut second = mech(2);

        assign_wargear(&mut usage, &mut first, "Shield Generator", &catalog).unwrap();
        assign_wargear(&mut usage, &mut first, "Jump Pack", &catalog).unwrap();
        assert_eq!(usage.count("Shield Generator"), 0);
        assert_eq!(usage.count("Jump Pack"), 1);

        assign_wargear(&mut usage, &mut second, "Shield Generator", &catalog).unwrap();
        assert_eq!(second.wargear(), Some("Shield Generator"));
    }

    #[test]
    fn reselecting_held_item_is_a_no_op() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        let mut first = mech(1);
        assign_wargear(&mut usage, &mut first, "Shield Generator", &catalog).unwrap();
        assign_wargear(&mut usage, &mut first, "Shield Generator", &catalog).unwrap();
        assert_eq!(usage.count("Shield Generator"), 1);
    }

    #[test]
    fn none_or_unknown_selection_clears() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        let mut first = mech(1);

        assign_wargear(&mut usage, &mut first, "Smoke Launcher", &catalog).unwrap();
        let description = assign_wargear(&mut usage, &mut first, "None", &catalog).unwrap();
        assert_eq!(description, NO_WARGEAR);
        assert_eq!(first.wargear(), None);
        assert!(usage.is_empty());

        assign_wargear(&mut usage, &mut first, "Smoke Launcher", &catalog).unwrap();
        assign_wargear(&mut usage, &mut first, "Orbital Laser", &catalog).unwrap();
        assert_eq!(first.wargear(), None);
        assert!(usage.is_empty());
    }

    #[test]
    fn unlimited_items_never_reject() {
        let catalog = catalog();
        let mut usage = WargearUsage::default();
        for id in 0..6 {
            let mut mech = mech(id);
            let description = assign_wargear(&mut usage, &mut mech, "Smoke Launcher", &catalog).unwrap();
            assert!(description.ends_with("(Limit: -)"));
        }
        assert_eq!(usage.count("Smoke Launcher"), 6);
    }

    #[test]
    fn release_removes_zero_counts() {
        let mut usage = WargearUsage::default();
        usage.acquire("Jump Pack");
        usage.acquire("Jump Pack");
        usage.release("Jump Pack");
        assert_eq!(usage.iter().collect::<Vec<_>>(), vec![("Jump Pack", 1)]);
        usage.release("Jump Pack");
        usage.release("Jump Pack");
        assert!(usage.is_empty());
    }
}
