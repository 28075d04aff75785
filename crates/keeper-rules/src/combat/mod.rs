//! A combat encounter from one investigator's side.
//!
//! The session borrows the character for its whole lifetime, tracks the
//! weapons parsed from their inventory and which one is in hand, and keeps a
//! log of every action taken. Combat rolls are final: no luck, no pushing.

pub mod action;

pub use action::{CombatAction, CombatEvent};

use std::time::{Duration, Instant};

use crate::config::RulesConfig;
use crate::dice::{DiceSource, RollMode};
use crate::error::{RulesError, RulesResult};
use crate::matching::resolver::resolve_rating;
use crate::resolution::SkillCheck;
use crate::sheet::CharacterSheet;
use crate::weapons::{WeaponCatalog, WeaponInstance, clear_jam, parse_inventory, reload, shoot};

/// Skill rolled for unarmed attacks and maneuvers.
pub const BRAWL_SKILL: &str = "Fighting (Brawl)";

/// Skill rolled to dodge.
pub const DODGE_SKILL: &str = "Dodge";

/// Unarmed damage before the damage bonus.
pub const BRAWL_DAMAGE: &str = "1D3";

/// The state of an ongoing combat encounter.
pub struct CombatSession<'a> {
    sheet: &'a mut CharacterSheet,
    catalog: &'a WeaponCatalog,
    dice: &'a mut dyn DiceSource,
    weapons: Vec<WeaponInstance>,
    active: Option<usize>,
    turn: u32,
    last_action: Option<String>,
    log: Vec<CombatEvent>,
    opened: Instant,
    timeout: Duration,
    closed: bool,
}

impl<'a> CombatSession<'a> {
    /// Open a session for `sheet`. The first weapon with a magazine starts
    /// in hand.
    pub fn new(
        sheet: &'a mut CharacterSheet,
        catalog: &'a WeaponCatalog,
        config: &RulesConfig,
        dice: &'a mut dyn DiceSource,
    ) -> Self {
        let weapons = parse_inventory(sheet, catalog);
        let active = weapons.iter().position(|w| w.capacity > 0);
        tracing::info!(
            character = %sheet.name,
            weapons = weapons.len(),
            "combat session opened"
        );
        Self {
            sheet,
            catalog,
            dice,
            weapons,
            active,
            turn: 0,
            last_action: None,
            log: Vec::new(),
            opened: Instant::now(),
            timeout: config.session_timeout(),
            closed: false,
        }
    }

    /// The character in combat.
    pub fn sheet(&self) -> &CharacterSheet {
        self.sheet
    }

    /// Every weapon the character carries, in inventory order.
    pub fn weapons(&self) -> &[WeaponInstance] {
        &self.weapons
    }

    /// Index of the weapon in hand.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// The weapon in hand.
    pub fn active_weapon(&self) -> Option<&WeaponInstance> {
        self.active.and_then(|i| self.weapons.get(i))
    }

    /// Description of the most recent action.
    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    /// Everything that has happened so far.
    pub fn log(&self) -> &[CombatEvent] {
        &self.log
    }

    /// Number of actions taken.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns true once the investigator has left combat.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns true once the session has been open longer than its timeout.
    pub fn is_expired(&self) -> bool {
        self.opened.elapsed() >= self.timeout
    }

    /// Take one action. On error nothing changes and nothing is logged.
    pub fn act(&mut self, action: CombatAction) -> RulesResult<CombatEvent> {
        if self.closed {
            return Err(RulesError::SessionClosed);
        }
        if self.is_expired() {
            tracing::info!(character = %self.sheet.name, "combat session expired");
            return Err(RulesError::SessionExpired);
        }

        let (tier, description) = match &action {
            CombatAction::Brawl => {
                let check = self.roll_skill(BRAWL_SKILL, RollMode::Normal);
                let mut text = check.to_string();
                if check.tier.is_success() {
                    let damage = self.sheet.damage_bonus().apply_to(BRAWL_DAMAGE);
                    text.push_str(&format!(", damage {damage}"));
                }
                (Some(check.tier), text)
            }
            CombatAction::Dodge => {
                let check = self.roll_skill(DODGE_SKILL, RollMode::Normal);
                (Some(check.tier), check.to_string())
            }
            CombatAction::Maneuver => {
                let check = self.roll_skill(BRAWL_SKILL, RollMode::Normal);
                let text = format!("{check}, build {}", self.sheet.build());
                (Some(check.tier), text)
            }
            CombatAction::Shoot { mode } => {
                let weapon = self.require_active()?;
                let report = shoot(&mut *self.sheet, &weapon, *mode, &mut *self.dice)?;
                let mut text = format!(
                    "{}: {}, {} left",
                    weapon.name, report.check, report.ammo_left
                );
                if let Some(damage) = &report.damage {
                    text.push_str(&format!(", damage {damage}"));
                }
                if report.jammed {
                    text.push_str(", weapon jammed");
                }
                self.refresh_weapons();
                (Some(report.check.tier), text)
            }
            CombatAction::Reload => {
                let weapon = self.require_active()?;
                let line = reload(&mut *self.sheet, &weapon)?;
                self.refresh_weapons();
                (None, format!("reloaded: {line}"))
            }
            CombatAction::FixJam => {
                let weapon = self.require_active()?;
                let report = clear_jam(&mut *self.sheet, &weapon, &mut *self.dice)?;
                let outcome = if report.cleared {
                    "jam cleared"
                } else {
                    "still jammed"
                };
                self.refresh_weapons();
                (
                    Some(report.check.tier),
                    format!("{}: {}, {outcome}", weapon.name, report.check),
                )
            }
            CombatAction::SelectWeapon(index) => {
                let weapon = self
                    .weapons
                    .get(*index)
                    .ok_or(RulesError::WeaponIndexOutOfRange(*index))?;
                let text = format!("drew {weapon}");
                self.active = Some(*index);
                (None, text)
            }
            CombatAction::Exit => {
                self.closed = true;
                tracing::info!(character = %self.sheet.name, turns = self.turn, "combat session closed");
                (None, "left combat".to_string())
            }
        };

        self.turn += 1;
        let event = CombatEvent {
            turn: self.turn,
            action,
            tier,
            description,
        };
        tracing::debug!(turn = event.turn, action = %event.action, "{}", event.description);
        self.last_action = Some(event.description.clone());
        self.log.push(event.clone());
        Ok(event)
    }

    fn require_active(&self) -> RulesResult<WeaponInstance> {
        self.active_weapon()
            .cloned()
            .ok_or(RulesError::NoActiveWeapon)
    }

    fn roll_skill(&mut self, skill: &str, mode: RollMode) -> SkillCheck {
        let rating = resolve_rating(self.sheet, skill);
        SkillCheck::final_result(rating.name, rating.value, self.dice.roll(mode))
    }

    /// Re-read weapons from the inventory and keep the same slot in hand.
    fn refresh_weapons(&mut self) {
        let held = self.active_weapon().map(|w| w.slot.clone());
        self.weapons = parse_inventory(self.sheet, self.catalog);
        self.active = held.and_then(|slot| self.weapons.iter().position(|w| w.slot == slot));
    }
}

impl std::fmt::Debug for CombatSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatSession")
            .field("character", &self.sheet.name)
            .field("weapons", &self.weapons)
            .field("active", &self.active)
            .field("turn", &self.turn)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
