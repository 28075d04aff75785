//! Error types for the rules core.
//!
//! Nothing here is fatal to the caller. Most variants describe an action that
//! was rejected (out of ammo, jammed weapon) or an offer that was withheld
//! (not enough luck), and the caller is expected to report or skip it.

use crate::resolution::OutcomeTier;

/// Errors that can occur while resolving rolls, escalations, or weapon actions.
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// Free text matched no skill above the acceptance threshold.
    #[error("unresolved skill: {0}")]
    UnresolvedSkill(String),

    /// An inventory line matched no catalog weapon.
    #[error("unresolved weapon: {0}")]
    UnresolvedWeapon(String),

    /// The character does not have enough luck for the spend.
    #[error("not enough luck: need {needed}, have {available}")]
    InsufficientLuck {
        /// Luck the spend would cost.
        needed: u32,
        /// Luck the character has left.
        available: u32,
    },

    /// The spend is larger than the configured per-step cap.
    #[error("luck cost {cost} exceeds the cap of {cap}")]
    LuckCapExceeded {
        /// Luck the spend would cost.
        cost: u32,
        /// Configured maximum cost per step.
        cap: u32,
    },

    /// Luck cannot move this roll to a better tier.
    #[error("luck cannot improve a {0} result")]
    LuckNotApplicable(OutcomeTier),

    /// The roll cannot be pushed.
    #[error("cannot push: {0}")]
    PushNotAllowed(String),

    /// Shooting was attempted with an empty weapon.
    #[error("{0} is out of ammo")]
    OutOfAmmo(String),

    /// Shooting was attempted with a jammed weapon.
    #[error("{0} is jammed")]
    WeaponJammed(String),

    /// Clearing a jam was attempted on a weapon that is not jammed.
    #[error("{0} is not jammed")]
    WeaponNotJammed(String),

    /// A weapon action was requested with no weapon selected.
    #[error("no weapon selected")]
    NoActiveWeapon,

    /// A weapon index does not exist in the session.
    #[error("weapon index {0} out of range")]
    WeaponIndexOutOfRange(usize),

    /// A damage string could not be split into options.
    #[error("malformed damage expression: {0}")]
    MalformedDamageExpression(String),

    /// The inventory line a weapon was parsed from is no longer where it was.
    #[error("inventory changed underneath weapon '{0}'")]
    InventoryConflict(String),

    /// A character record was saved over a newer version.
    #[error("character '{id}' changed: expected version {expected}, found {found}")]
    PersistenceConflict {
        /// Character identifier.
        id: String,
        /// Version the writer read.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// No character with this identifier exists in the store.
    #[error("character not found: {0}")]
    CharacterNotFound(String),

    /// The combat session outlived its timeout.
    #[error("combat session timed out")]
    SessionExpired,

    /// The combat session was exited.
    #[error("combat session is closed")]
    SessionClosed,

    /// A configuration value is invalid.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON input could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for rules operations.
pub type RulesResult<T> = Result<T, RulesError>;
