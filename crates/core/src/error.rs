//! Error and advisory types returned by the roster engine.

use std::fmt;

use thiserror::Error;

use crate::models::Slot;

/// Failures of a roster or equipment operation.
///
/// Every variant except [`RosterError::MalformedCatalogData`] describes a rule
/// rejection: the operation was refused and the roster is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RosterError {
    /// The roster already holds the maximum number of mechs.
    #[error("roster already holds the maximum of {max} mechs")]
    RosterFull {
        /// Roster capacity.
        max: usize,
    },
    /// No mech template exists for the requested name.
    #[error("unknown mech '{0}'")]
    UnknownMech(String),
    /// Equipping the weapon would push the mech past its carrying capacity.
    #[error("{mech} exceeds its weight limit ({carrying} > {max_carry})")]
    Overweight {
        /// Display name of the mech.
        mech: String,
        /// Projected carrying weight with the rejected weapon.
        carrying: f64,
        /// Capacity of the mech's weight class.
        max_carry: f64,
    },
    /// The slot is not provisioned on this mech.
    #[error("slot {slot} is locked on {mech}")]
    SlotLocked {
        /// Display name of the mech.
        mech: String,
        /// Requested slot.
        slot: Slot,
    },
    /// The wargear item is already equipped as often as its limit allows.
    #[error("can't equip more than {limit} of {wargear}")]
    WargearLimitExceeded {
        /// Requested wargear.
        wargear: String,
        /// Roster-wide limit of the item.
        limit: u32,
    },
    /// A catalog field the rules depend on holds an unusable value.
    #[error("malformed catalog data for '{item}': {field} = {value}")]
    MalformedCatalogData {
        /// Catalog entry name.
        item: String,
        /// Offending field.
        field: &'static str,
        /// Raw value as found in the catalog.
        value: String,
    },
    /// The mech was removed from the roster (or never belonged to it).
    #[error("mech is not part of the roster")]
    NotInRoster,
}

/// Error returned when parsing an unrecognised slot name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown slot '{0}'")]
pub struct ParseSlotError(pub String);

/// Advisory conditions collected while loading a roster.
///
/// None of these abort the load; they describe what was normalised away.
#[derive(Debug, Clone, PartialEq)]
pub enum RosterWarning {
    /// The save held more mechs than the roster accepts.
    RosterTruncated {
        /// Number of records kept.
        kept: usize,
        /// Number of records found.
        total: usize,
    },
    /// A saved mech has no template in the catalog and was skipped.
    UnknownMech(String),
    /// A restored loadout is heavier than the mech's capacity.
    Overweight {
        /// Display name of the mech.
        mech: String,
        /// Carrying weight of the restored loadout.
        carrying: f64,
        /// Capacity of the mech's weight class.
        max_carry: f64,
    },
    /// Saved wargear could not be re-equipped.
    WargearRejected {
        /// Display name of the mech.
        mech: String,
        /// Saved wargear name.
        wargear: String,
        /// Rule that rejected it.
        reason: RosterError,
    },
}

impl fmt::Display for RosterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosterTruncated { kept, total } => write!(
                f,
                "maximal roster size is {kept}; only the first {kept} of {total} mechs were loaded"
            ),
            Self::UnknownMech(name) => write!(f, "could not read mech data for '{name}'"),
            Self::Overweight {
                mech,
                carrying,
                max_carry,
            } => write!(f, "{mech}: load limit exceeded ({carrying} > {max_carry})"),
            Self::WargearRejected {
                mech,
                wargear,
                reason,
            } => write!(f, "{mech}: wargear '{wargear}' dropped ({reason})"),
        }
    }
}
