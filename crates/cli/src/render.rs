//! Plain-text rendering of roster state.

use mechroster_core::{
    rules::weapon_summary, CatalogEntry, ConfiguredMech, MechTemplate, RosterManager,
    RosterWarning, SaveEntry,
};

const EMPTY_SLOT: &str = "-";

pub fn template_row(key: &str, template: &MechTemplate) -> String {
    let class = template.weight_class();
    format!(
        "{key:<16} {:<24} {:<7} carry {}",
        template.name,
        class.as_str(),
        class.max_carry()
    )
}

pub fn mech(mech: &ConfiguredMech) -> String {
    let mut header = format!(
        "{} {} ({}) {}/{}",
        mech.id(),
        mech.name(),
        mech.template().weight_class(),
        mech.carrying_weight(),
        mech.max_carry()
    );
    if mech.is_overweight() {
        header.push_str(" OVERWEIGHT");
    }

    let mut lines = vec![
        header,
        format!("  Wargear: {}", mech.wargear().unwrap_or("None")),
    ];
    lines.extend(mech.weapons().iter().map(|(slot, weapon)| {
        format!(
            "  {}: {}",
            slot.label(),
            weapon.as_deref().unwrap_or(EMPTY_SLOT)
        )
    }));
    lines.join("\n")
}

pub fn roster(roster: &RosterManager) -> String {
    if roster.is_empty() {
        return "No mechs in roster.".to_string();
    }
    roster
        .roster()
        .iter()
        .map(mech)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn warnings(warnings: &[RosterWarning]) -> String {
    warnings
        .iter()
        .map(|warning| format!("warning: {warning}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn glossary(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(name, description)| format!("{name}\n  {description}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn entry(entry: &CatalogEntry<'_>) -> String {
    let text = format!("{}\n{}", entry.name(), entry.describe());
    match entry {
        CatalogEntry::ArmWeapon(weapon) | CatalogEntry::BackWeapon(weapon) => {
            format!("{text}\n\n{}", weapon_summary(Some(*weapon)))
        }
        _ => text,
    }
}

pub fn save_row(entry: &SaveEntry) -> String {
    format!(
        "{:<32} {}",
        entry.name,
        entry.updated_at.format("%Y-%m-%d %H:%M:%S")
    )
}
