//! Weapons: the catalog, inventory lines, and ranged weapon state.

pub mod catalog;
pub mod damage;
pub mod inventory;
pub mod state;

pub use catalog::{WeaponCatalog, WeaponCatalogEntry, parse_malfunction};
pub use damage::{DamageExpression, DamageOption};
pub use inventory::{
    ParsedWeaponLine, WeaponInstance, format_line, parse_inventory, parse_line, scan_inventory,
};
pub use state::{RepairReport, ShotReport, WeaponState, clear_jam, reload, shoot};
