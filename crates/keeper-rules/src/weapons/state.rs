//! Ranged weapon state: firing, reloading, clearing jams.
//!
//! A weapon is Ready, Empty, or Jammed, derived from its parsed line. Every
//! transition rewrites the weapon's inventory line in place; callers re-parse
//! the inventory afterwards to get the new instance. If the line moved or
//! changed since it was parsed the operation is refused before any dice are
//! rolled.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceSource, RollMode};
use crate::error::{RulesError, RulesResult};
use crate::matching::resolver::resolve_rating;
use crate::resolution::SkillCheck;
use crate::sheet::CharacterSheet;

use super::inventory::WeaponInstance;

/// Skill rolled to clear a jam.
pub const REPAIR_SKILL: &str = "Mechanical Repair";

/// What a weapon can do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponState {
    /// Loaded and working.
    Ready,
    /// Out of ammunition.
    Empty,
    /// Jammed; must be cleared before firing.
    Jammed,
}

impl std::fmt::Display for WeaponState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Empty => write!(f, "empty"),
            Self::Jammed => write!(f, "jammed"),
        }
    }
}

impl WeaponInstance {
    /// Current state. A jam takes precedence over an empty magazine.
    pub fn state(&self) -> WeaponState {
        if self.jammed {
            WeaponState::Jammed
        } else if self.ammo == 0 {
            WeaponState::Empty
        } else {
            WeaponState::Ready
        }
    }
}

/// The outcome of firing a weapon.
#[derive(Debug, Clone)]
pub struct ShotReport {
    /// The attack roll.
    pub check: SkillCheck,
    /// Rounds left after the shot.
    pub ammo_left: u32,
    /// Whether the shot jammed the weapon.
    pub jammed: bool,
    /// Damage to apply, for a hit that did not jam.
    pub damage: Option<String>,
    /// The rewritten inventory line.
    pub line: String,
}

/// The outcome of trying to clear a jam.
#[derive(Debug, Clone)]
pub struct RepairReport {
    /// The repair roll.
    pub check: SkillCheck,
    /// Whether the jam was cleared.
    pub cleared: bool,
    /// The inventory line afterwards.
    pub line: String,
}

fn ensure_in_place(sheet: &CharacterSheet, weapon: &WeaponInstance) -> RulesResult<()> {
    if sheet.item(&weapon.slot) == Some(weapon.source.as_str()) {
        Ok(())
    } else {
        Err(RulesError::InventoryConflict(weapon.source.clone()))
    }
}

fn write_back(
    sheet: &mut CharacterSheet,
    weapon: &WeaponInstance,
    ammo: u32,
    jammed: bool,
) -> RulesResult<String> {
    let line = weapon.line_for(ammo, jammed);
    sheet.replace_item(&weapon.slot, &weapon.source, line.clone())?;
    tracing::debug!(slot = %weapon.slot, line = %line, "weapon line updated");
    Ok(line)
}

/// Fire `weapon` once.
///
/// Rolls the weapon's skill (falling back through aliases, fuzzy matches and
/// base chance), spends a round, and jams the weapon if the roll reaches its
/// malfunction value, whatever the outcome tier.
pub fn shoot(
    sheet: &mut CharacterSheet,
    weapon: &WeaponInstance,
    mode: RollMode,
    dice: &mut dyn DiceSource,
) -> RulesResult<ShotReport> {
    match weapon.state() {
        WeaponState::Empty => return Err(RulesError::OutOfAmmo(weapon.name.clone())),
        WeaponState::Jammed => return Err(RulesError::WeaponJammed(weapon.name.clone())),
        WeaponState::Ready => {}
    }
    ensure_in_place(sheet, weapon)?;

    let rating = resolve_rating(sheet, &weapon.entry.skill);
    let roll = dice.roll(mode);
    let jammed = weapon.entry.jams_on(roll.value);
    let check = SkillCheck::final_result(rating.name, rating.value, roll);
    let ammo_left = weapon.ammo - 1;
    let line = write_back(sheet, weapon, ammo_left, jammed)?;

    let damage = (check.tier.is_success() && !jammed)
        .then(|| weapon.entry.damage_expression().to_string());
    tracing::debug!(
        weapon = %weapon.name,
        value = check.value,
        tier = %check.tier,
        ammo_left,
        jammed,
        "shot fired"
    );
    Ok(ShotReport {
        check,
        ammo_left,
        jammed,
        damage,
        line,
    })
}

/// Load `weapon` to capacity. Reloading also clears a jam.
pub fn reload(sheet: &mut CharacterSheet, weapon: &WeaponInstance) -> RulesResult<String> {
    write_back(sheet, weapon, weapon.capacity, false)
}

/// Try to clear a jam with a repair roll. A success clears it; anything
/// else leaves the weapon jammed.
pub fn clear_jam(
    sheet: &mut CharacterSheet,
    weapon: &WeaponInstance,
    dice: &mut dyn DiceSource,
) -> RulesResult<RepairReport> {
    if weapon.state() != WeaponState::Jammed {
        return Err(RulesError::WeaponNotJammed(weapon.name.clone()));
    }
    ensure_in_place(sheet, weapon)?;

    let rating = resolve_rating(sheet, REPAIR_SKILL);
    let check = SkillCheck::final_result(rating.name, rating.value, dice.roll_normal());
    let cleared = check.tier.is_success();
    let line = if cleared {
        write_back(sheet, weapon, weapon.ammo, false)?
    } else {
        weapon.source.clone()
    };
    Ok(RepairReport {
        check,
        cleared,
        line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::FixedRolls;
    use crate::resolution::OutcomeTier;
    use crate::sheet::InventorySlot;
    use crate::weapons::catalog::{WeaponCatalog, WeaponCatalogEntry};
    use crate::weapons::inventory::parse_inventory;

    fn catalog() -> WeaponCatalog {
        WeaponCatalog::new()
            .with_entry(WeaponCatalogEntry::new("Test Pistol", "1D8", 6).with_malfunction(96))
            .with_entry(WeaponCatalogEntry::new(".38 Revolver", "1D10", 6))
    }

    fn sheet(line: &str) -> CharacterSheet {
        CharacterSheet::new("Test")
            .with_skill("Firearms (Handgun)", 50)
            .with_item("Weapons", line)
    }

    fn weapon(sheet: &CharacterSheet) -> WeaponInstance {
        parse_inventory(sheet, &catalog()).remove(0)
    }

    #[test]
    fn malfunction_jams_last_round() {
        let mut sheet = sheet("Test Pistol [1/6]");
        let pistol = weapon(&sheet);
        let mut dice = FixedRolls::new([97]);
        let report = shoot(&mut sheet, &pistol, RollMode::Normal, &mut dice).unwrap();
        assert_eq!(report.ammo_left, 0);
        assert!(report.jammed);
        assert_eq!(report.damage, None);
        assert_eq!(sheet.inventory["Weapons"][0], "⚠️ Test Pistol [0/6] (JAMMED)");

        let after = weapon(&sheet);
        assert_eq!(after.ammo, 0);
        assert!(after.jammed);
        assert_eq!(after.state(), WeaponState::Jammed);
    }

    #[test]
    fn hit_reports_damage() {
        let mut sheet = sheet("Test Pistol [6/6]");
        let pistol = weapon(&sheet);
        let mut dice = FixedRolls::new([30]);
        let report = shoot(&mut sheet, &pistol, RollMode::Normal, &mut dice).unwrap();
        assert_eq!(report.check.tier, OutcomeTier::Regular);
        assert_eq!(report.check.skill, "Firearms (Handgun)");
        assert_eq!(report.damage.as_deref(), Some("1D8"));
        assert_eq!(report.line, "Test Pistol [5/6]");
        assert!(report.check.is_settled());
    }

    #[test]
    fn jam_with_note_still_refuses_and_keeps_note() {
        let mut sheet = sheet("Test Pistol [3/6] (JAMMED) needs oil");
        let pistol = weapon(&sheet);
        assert_eq!(pistol.state(), WeaponState::Jammed);
        let mut dice = FixedRolls::new([10]);
        assert!(matches!(
            shoot(&mut sheet, &pistol, RollMode::Normal, &mut dice),
            Err(RulesError::WeaponJammed(_))
        ));

        let report = reload(&mut sheet, &pistol).unwrap();
        assert_eq!(report, "Test Pistol [6/6] needs oil");
        assert_eq!(sheet.inventory["Weapons"][0], "Test Pistol [6/6] needs oil");
    }

    #[test]
    fn never_jams_at_100() {
        let mut sheet = sheet(".38 Revolver [2/6]");
        let revolver = weapon(&sheet);
        let mut dice = FixedRolls::new([100]);
        let report = shoot(&mut sheet, &revolver, RollMode::Normal, &mut dice).unwrap();
        assert!(!report.jammed);
        assert_eq!(report.check.tier, OutcomeTier::Fumble);
        assert_eq!(report.line, ".38 Revolver [1/6]");
    }

    #[test]
    fn empty_and_jammed_refuse_to_fire() {
        let mut dice = FixedRolls::new([10]);

        let mut empty = sheet("Test Pistol [0/6]");
        let pistol = weapon(&empty);
        assert_eq!(pistol.state(), WeaponState::Empty);
        assert!(matches!(
            shoot(&mut empty, &pistol, RollMode::Normal, &mut dice),
            Err(RulesError::OutOfAmmo(_))
        ));
        assert_eq!(empty.inventory["Weapons"][0], "Test Pistol [0/6]");

        let mut jammed = sheet("⚠️ Test Pistol [3/6] (JAMMED)");
        let pistol = weapon(&jammed);
        assert!(matches!(
            shoot(&mut jammed, &pistol, RollMode::Normal, &mut dice),
            Err(RulesError::WeaponJammed(_))
        ));
        assert_eq!(dice.drawn(), 0);
    }

    #[test]
    fn skill_falls_back_to_alias_then_base_chance() {
        let mut legacy = CharacterSheet::new("Old")
            .with_skill("Handgun", 70)
            .with_item("Weapons", "Test Pistol [6/6]");
        let pistol = weapon(&legacy);
        let mut dice = FixedRolls::new([65, 65]);
        let report = shoot(&mut legacy, &pistol, RollMode::Normal, &mut dice).unwrap();
        assert_eq!(report.check.rating, 70);
        assert_eq!(report.check.tier, OutcomeTier::Regular);

        let mut untrained = CharacterSheet::new("New").with_item("Weapons", "Test Pistol [6/6]");
        let pistol = weapon(&untrained);
        let report = shoot(&mut untrained, &pistol, RollMode::Normal, &mut dice).unwrap();
        assert_eq!(report.check.rating, 20);
        assert_eq!(report.check.tier, OutcomeTier::Fail);
    }

    #[test]
    fn reload_fills_and_clears() {
        let mut sheet = sheet("⚠️ Test Pistol [0/6] (JAMMED)");
        let pistol = weapon(&sheet);
        assert_eq!(reload(&mut sheet, &pistol).unwrap(), "Test Pistol [6/6]");
        assert_eq!(weapon(&sheet).state(), WeaponState::Ready);
    }

    #[test]
    fn clear_jam_success_and_failure() {
        let mut sheet = sheet("⚠️ Test Pistol [3/6] (JAMMED)");
        sheet.skills.insert("Mechanical Repair".to_string(), 40);

        let pistol = weapon(&sheet);
        let mut dice = FixedRolls::new([80, 20]);
        let failed = clear_jam(&mut sheet, &pistol, &mut dice).unwrap();
        assert!(!failed.cleared);
        assert_eq!(sheet.inventory["Weapons"][0], "⚠️ Test Pistol [3/6] (JAMMED)");

        let pistol = weapon(&sheet);
        let cleared = clear_jam(&mut sheet, &pistol, &mut dice).unwrap();
        assert!(cleared.cleared);
        assert_eq!(sheet.inventory["Weapons"][0], "Test Pistol [3/6]");
    }

    #[test]
    fn clear_jam_on_working_weapon_fails() {
        let mut sheet = sheet("Test Pistol [3/6]");
        let pistol = weapon(&sheet);
        let mut dice = FixedRolls::new([20]);
        assert!(matches!(
            clear_jam(&mut sheet, &pistol, &mut dice),
            Err(RulesError::WeaponNotJammed(_))
        ));
    }

    #[test]
    fn stale_instance_is_a_conflict() {
        let mut sheet = sheet("Test Pistol [6/6]");
        let pistol = weapon(&sheet);
        sheet.inventory.insert(
            "Weapons".to_string(),
            vec!["Knife".to_string(), "Test Pistol [6/6]".to_string()],
        );
        let mut dice = FixedRolls::new([10]);
        assert!(matches!(
            shoot(&mut sheet, &pistol, RollMode::Normal, &mut dice),
            Err(RulesError::InventoryConflict(_))
        ));
        assert_eq!(dice.drawn(), 0);
        assert_eq!(sheet.inventory["Weapons"][1], "Test Pistol [6/6]");
        assert_eq!(
            pistol.slot,
            InventorySlot {
                category: "Weapons".to_string(),
                index: 0
            }
        );
    }
}
