pub mod combat;
pub mod roll;
pub mod weapons;

use std::path::Path;

use colored::{ColoredString, Colorize};
use keeper_rules::{
    CharacterSheet, DiceSource, FixedRolls, OutcomeTier, PercentileDice, RulesConfig,
    WeaponCatalog,
};

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

/// Load the rules configuration, or the defaults if no file was given.
pub fn load_config(path: Option<&Path>) -> Result<RulesConfig, String> {
    match path {
        Some(path) => RulesConfig::from_json(&read(path)?)
            .map_err(|e| format!("{}: {e}", path.display())),
        None => Ok(RulesConfig::default()),
    }
}

/// Load a character sheet.
pub fn load_sheet(path: &Path) -> Result<CharacterSheet, String> {
    CharacterSheet::from_json(&read(path)?).map_err(|e| format!("{}: {e}", path.display()))
}

/// Write a character sheet back to disk.
pub fn save_sheet(path: &Path, sheet: &CharacterSheet) -> Result<(), String> {
    let json = sheet.to_json().map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

/// Load a weapon catalog.
pub fn load_catalog(path: &Path, config: &RulesConfig) -> Result<WeaponCatalog, String> {
    WeaponCatalog::from_json(&read(path)?, config).map_err(|e| format!("{}: {e}", path.display()))
}

/// Scripted dice if roll values were given, otherwise seeded or OS-random dice.
pub fn dice(config: &RulesConfig, seed: Option<u64>, rolls: &[u32]) -> Box<dyn DiceSource> {
    if rolls.is_empty() {
        Box::new(PercentileDice::new(seed.or(config.seed)))
    } else {
        Box::new(FixedRolls::new(rolls.to_vec()))
    }
}

/// Colour a tier name by how good it is.
fn paint(tier: OutcomeTier) -> ColoredString {
    let name = tier.to_string();
    match tier {
        OutcomeTier::Fumble => name.red().bold(),
        OutcomeTier::Fail => name.red(),
        OutcomeTier::Regular => name.green(),
        OutcomeTier::Hard | OutcomeTier::Extreme => name.green().bold(),
        OutcomeTier::Critical => name.cyan().bold(),
    }
}
