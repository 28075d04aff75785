//! Spending luck to improve a result by one tier.
//!
//! Luck lowers the roll to the boundary of the next tier up, one point per
//! point of difference. Only Fail→Regular, Regular→Hard and Hard→Extreme can
//! be bought. A step is eligible when the character can pay for it and the
//! cost is within the configured cap; steps may chain, each one checked on
//! its own.

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::sheet::LuckLedger;

use super::check::SkillCheck;
use super::{OutcomeTier, Thresholds};

/// One luck step that could be bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuckOffer {
    /// Tier before the spend.
    pub from: OutcomeTier,
    /// Tier after the spend.
    pub to: OutcomeTier,
    /// Luck points the step costs.
    pub cost: u32,
    /// Roll value after the spend.
    pub new_value: u32,
}

impl std::fmt::Display for LuckOffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "spend {} luck: {} -> {} (roll {})",
            self.cost, self.from, self.to, self.new_value
        )
    }
}

/// Work out the next luck step for `check`, given the character's luck and the cap.
pub fn evaluate(check: &SkillCheck, available: u32, cap: u32) -> RulesResult<LuckOffer> {
    if !check.luck_open() {
        return Err(RulesError::LuckNotApplicable(check.tier));
    }
    let to = check
        .tier
        .next()
        .ok_or(RulesError::LuckNotApplicable(check.tier))?;
    let target = Thresholds::for_skill(check.rating)
        .for_tier(to)
        .filter(|t| *t >= 1)
        .ok_or(RulesError::LuckNotApplicable(check.tier))?;

    let cost = check.value.saturating_sub(target);
    if cost == 0 {
        return Err(RulesError::LuckNotApplicable(check.tier));
    }
    if available < cost {
        return Err(RulesError::InsufficientLuck {
            needed: cost,
            available,
        });
    }
    if cost > cap {
        return Err(RulesError::LuckCapExceeded { cost, cap });
    }

    Ok(LuckOffer {
        from: check.tier,
        to,
        cost,
        new_value: target,
    })
}

/// Buy the next luck step: pay from `ledger` and move the check up one tier.
///
/// Nothing changes if the step is not eligible.
pub fn spend(check: &mut SkillCheck, ledger: &mut LuckLedger, cap: u32) -> RulesResult<LuckOffer> {
    let offer = evaluate(check, ledger.value(), cap)?;
    ledger.spend(offer.cost)?;
    check.apply_luck(offer.cost, offer.new_value, offer.to);
    tracing::debug!(
        skill = %check.skill,
        cost = offer.cost,
        tier = %offer.to,
        remaining = ledger.value(),
        "luck spent"
    );
    Ok(offer)
}
