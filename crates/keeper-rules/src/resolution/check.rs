//! A single skill check and the top-level roll entry point.

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::dice::{DiceSource, RollMode, RollResult};
use crate::error::RulesResult;
use crate::matching::resolver::{ResolvedRating, SkillSource, resolve_rating};
use crate::sheet::CharacterSheet;

use super::offer::{Decider, EscalationStep, run_offers};
use super::{OutcomeTier, classify};

/// One roll against one rating, plus what has been done to it since.
///
/// The check tracks which escalations remain open: spending luck closes the
/// push, pushing closes both, and retiring (decline, timeout, exit) closes
/// everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    /// Name of the skill or characteristic rolled.
    pub skill: String,
    /// The rating rolled against.
    pub rating: u32,
    /// The dice as rolled (replaced when pushed).
    pub roll: RollResult,
    /// The effective roll value after luck reductions.
    pub value: u32,
    /// Current outcome.
    pub tier: OutcomeTier,
    /// Total luck spent on this check.
    pub luck_spent: u32,
    /// Whether the check was pushed.
    pub pushed: bool,
    /// A pushed check that still failed: the keeper should bring trouble.
    pub dire_consequences: bool,
    offers_retired: bool,
}

impl SkillCheck {
    /// Classify `roll` against `rating`.
    pub fn new(skill: impl Into<String>, rating: u32, roll: RollResult) -> Self {
        let value = roll.value;
        Self {
            skill: skill.into(),
            rating,
            tier: classify(value, rating),
            value,
            roll,
            luck_spent: 0,
            pushed: false,
            dire_consequences: false,
            offers_retired: false,
        }
    }

    /// A check that offers no escalation at all (combat rolls).
    pub fn final_result(skill: impl Into<String>, rating: u32, roll: RollResult) -> Self {
        let mut check = Self::new(skill, rating, roll);
        check.offers_retired = true;
        check
    }

    /// Returns true if the rolled stat is Luck itself.
    pub fn is_luck_roll(&self) -> bool {
        self.skill.trim().eq_ignore_ascii_case("luck")
    }

    /// Returns true if luck may still be spent on this check.
    pub fn luck_open(&self) -> bool {
        !self.offers_retired && !self.pushed && !self.is_luck_roll()
    }

    /// Returns true if the check may still be pushed.
    pub fn push_open(&self) -> bool {
        !self.offers_retired && !self.pushed && self.luck_spent == 0 && !self.is_luck_roll()
    }

    /// Close every remaining offer without changing the result.
    pub fn retire_offers(&mut self) {
        self.offers_retired = true;
    }

    /// Returns true once no further escalation is possible.
    pub fn is_settled(&self) -> bool {
        self.offers_retired || self.pushed
    }

    pub(crate) fn apply_luck(&mut self, cost: u32, new_value: u32, tier: OutcomeTier) {
        self.luck_spent += cost;
        self.value = new_value;
        self.tier = tier;
    }

    pub(crate) fn apply_push(&mut self, roll: RollResult) {
        self.value = roll.value;
        self.tier = classify(roll.value, self.rating);
        self.roll = roll;
        self.pushed = true;
        self.dire_consequences = !self.tier.is_success();
    }
}

impl std::fmt::Display for SkillCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): rolled {} -> {}",
            self.skill, self.rating, self.value, self.tier
        )?;
        if self.luck_spent > 0 {
            write!(f, " [{} luck spent]", self.luck_spent)?;
        }
        if self.pushed {
            write!(f, " [pushed]")?;
        }
        if self.dire_consequences {
            write!(f, " [dire consequences]")?;
        }
        Ok(())
    }
}

/// A request to roll a named skill or characteristic.
#[derive(Debug, Clone, Default)]
pub struct CheckRequest {
    /// Free-text name of what to roll.
    pub skill: String,
    /// Normal, bonus, or penalty.
    pub mode: RollMode,
}

impl CheckRequest {
    /// Request a normal roll of `skill`.
    pub fn new(skill: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            mode: RollMode::Normal,
        }
    }

    /// Use a bonus or penalty die.
    pub fn with_mode(mut self, mode: RollMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Everything a caller needs to report a finished roll.
#[derive(Debug, Clone)]
pub struct SkillRoll {
    /// The final state of the check.
    pub check: SkillCheck,
    /// How the rating was found.
    pub source: SkillSource,
    /// The first roll, before any push.
    pub original: RollResult,
    /// Escalations offered and taken, in order.
    pub steps: Vec<EscalationStep>,
}

/// Roll a skill for a character and run the luck/push offers.
///
/// The skill name is resolved against the sheet (falling back to a base
/// chance), rolled, classified, and then offered to `decider`. Accepted luck
/// spends are taken from the sheet's ledger.
pub fn perform_check(
    sheet: &mut CharacterSheet,
    request: &CheckRequest,
    config: &RulesConfig,
    dice: &mut dyn DiceSource,
    decider: &mut dyn Decider,
) -> RulesResult<SkillRoll> {
    let ResolvedRating {
        name,
        value: rating,
        source,
    } = resolve_rating(sheet, &request.skill);
    let roll = dice.roll(request.mode);
    let original = roll.clone();
    let mut check = SkillCheck::new(name, rating, roll);
    tracing::debug!(skill = %check.skill, rating, value = check.value, tier = %check.tier, "skill check");

    let steps = run_offers(&mut check, &mut sheet.luck, config, dice, decider)?;
    Ok(SkillRoll {
        check,
        source,
        original,
        steps,
    })
}
