//! Rules core for percentile investigative-horror games.
//!
//! Provides percentile dice with bonus and penalty dice, the roll-under
//! success classifier, luck spending and pushed rolls, fuzzy matching of skill
//! and weapon names, free-text weapon inventory parsing, ranged weapon state
//! (ammunition, jams, reloads), and a combat session that ties them together.

pub mod combat;
pub mod config;
pub mod dice;
pub mod error;
pub mod matching;
pub mod resolution;
pub mod sheet;
pub mod store;
pub mod weapons;

pub use combat::{CombatAction, CombatEvent, CombatSession};
pub use config::RulesConfig;
pub use dice::{DiceSource, FixedRolls, PercentileDice, RollMode, RollResult};
pub use error::{RulesError, RulesResult};
pub use matching::{SimilarityOracle, SkillResolver};
pub use resolution::check::{CheckRequest, SkillRoll, perform_check};
pub use resolution::{Decider, Decision, Escalation, OutcomeTier, SkillCheck, classify};
pub use sheet::{CharacterSheet, LuckLedger};
pub use store::{CharacterStore, MemoryStore};
pub use weapons::{WeaponCatalog, WeaponInstance, WeaponState};
