#![warn(clippy::all, missing_docs)]

//! Core domain logic for the mech roster builder.
//!
//! This crate hosts the data models, catalog loading, equipment rules,
//! roster management and the save-file format used by the command-line
//! front end and any future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod rules;
pub mod save;

pub use catalog::{Catalog, CatalogEntry, CatalogLoader};
pub use config::AppConfig;
pub use error::{RosterError, RosterWarning};
pub use models::{ConfiguredMech, MechId, MechTemplate, Slot, WargearDef, WeaponDef, WeightClass};
pub use roster::{LoadReport, ParsedRoster, RosterManager, MAX_MECHS};
pub use save::{SaveEntry, SaveManager, SaveRecord};
