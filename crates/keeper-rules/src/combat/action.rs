//! Combat actions and event logging.

use serde::{Deserialize, Serialize};

use crate::dice::RollMode;
use crate::resolution::OutcomeTier;

/// Something the investigator does on their turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatAction {
    /// Unarmed attack with Fighting (Brawl).
    Brawl,
    /// Dodge an incoming attack.
    Dodge,
    /// Grapple, trip, disarm: rolled with Fighting (Brawl).
    Maneuver,
    /// Fire the active weapon.
    Shoot {
        /// Normal, bonus or penalty die.
        mode: RollMode,
    },
    /// Reload the active weapon.
    Reload,
    /// Try to clear the active weapon's jam.
    FixJam,
    /// Make another weapon active.
    SelectWeapon(usize),
    /// Leave combat.
    Exit,
}

impl CombatAction {
    /// Parse an action from a short command: `brawl`, `dodge`, `maneuver`,
    /// `shoot [bonus|penalty]`, `reload`, `fix`, `select <n>`, `exit`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let verb = words.next()?.to_lowercase();
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }
        let action = match (verb.as_str(), arg) {
            ("brawl" | "punch", None) => Self::Brawl,
            ("dodge", None) => Self::Dodge,
            ("maneuver" | "manoeuvre", None) => Self::Maneuver,
            ("shoot" | "fire", None) => Self::Shoot {
                mode: RollMode::Normal,
            },
            ("shoot" | "fire", Some(mode)) => Self::Shoot {
                mode: RollMode::parse(mode)?,
            },
            ("reload", None) => Self::Reload,
            ("fix" | "unjam" | "fixjam", None) => Self::FixJam,
            ("select" | "weapon", Some(index)) => Self::SelectWeapon(index.parse().ok()?),
            ("exit" | "quit" | "end", None) => Self::Exit,
            _ => return None,
        };
        Some(action)
    }
}

impl std::fmt::Display for CombatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brawl => write!(f, "Brawl"),
            Self::Dodge => write!(f, "Dodge"),
            Self::Maneuver => write!(f, "Maneuver"),
            Self::Shoot {
                mode: RollMode::Normal,
            } => write!(f, "Shoot"),
            Self::Shoot { mode } => write!(f, "Shoot ({mode})"),
            Self::Reload => write!(f, "Reload"),
            Self::FixJam => write!(f, "Fix jam"),
            Self::SelectWeapon(index) => write!(f, "Select weapon #{index}"),
            Self::Exit => write!(f, "Exit"),
        }
    }
}

/// A recorded combat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEvent {
    /// Which turn this happened on (1-based).
    pub turn: u32,
    /// What was done.
    pub action: CombatAction,
    /// The roll's outcome, for actions that roll.
    pub tier: Option<OutcomeTier>,
    /// What happened, ready to show.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_actions() {
        assert_eq!(CombatAction::parse("brawl"), Some(CombatAction::Brawl));
        assert_eq!(CombatAction::parse("  Dodge "), Some(CombatAction::Dodge));
        assert_eq!(
            CombatAction::parse("shoot"),
            Some(CombatAction::Shoot {
                mode: RollMode::Normal
            })
        );
        assert_eq!(
            CombatAction::parse("shoot penalty"),
            Some(CombatAction::Shoot {
                mode: RollMode::Penalty
            })
        );
        assert_eq!(CombatAction::parse("select 2"), Some(CombatAction::SelectWeapon(2)));
        assert_eq!(CombatAction::parse("fix"), Some(CombatAction::FixJam));
        assert_eq!(CombatAction::parse("exit"), Some(CombatAction::Exit));
    }

    #[test]
    fn parse_rejects_junk() {
        assert_eq!(CombatAction::parse(""), None);
        assert_eq!(CombatAction::parse("dance"), None);
        assert_eq!(CombatAction::parse("select two"), None);
        assert_eq!(CombatAction::parse("shoot sideways"), None);
        assert_eq!(CombatAction::parse("reload now please"), None);
    }

    #[test]
    fn combat_action_display() {
        assert_eq!(CombatAction::Brawl.to_string(), "Brawl");
        assert_eq!(
            CombatAction::Shoot {
                mode: RollMode::Normal
            }
            .to_string(),
            "Shoot"
        );
        assert_eq!(
            CombatAction::Shoot {
                mode: RollMode::Bonus
            }
            .to_string(),
            "Shoot (bonus)"
        );
        assert_eq!(CombatAction::SelectWeapon(1).to_string(), "Select weapon #1");
        assert_eq!(CombatAction::FixJam.to_string(), "Fix jam");
    }
}
