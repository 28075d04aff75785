//! Asking the player what to do with a result.
//!
//! After a check is classified the player may be offered a luck spend, a
//! push, or both. The choice comes back as a [`Decision`] value: picking
//! something, declining, or letting the window run out. Declining and timing
//! out retire every remaining offer and leave the check as it stands.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::dice::DiceSource;
use crate::error::{RulesError, RulesResult};
use crate::sheet::LuckLedger;

use super::OutcomeTier;
use super::check::SkillCheck;
use super::luck::{self, LuckOffer};
use super::push;

/// The answer to an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision<T> {
    /// The player picked an option.
    Chosen(T),
    /// The player turned everything down.
    Declined,
    /// No answer arrived in time.
    TimedOut,
}

/// What a player can escalate a check with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Escalation {
    /// Buy the offered luck step.
    SpendLuck,
    /// Reroll the failure.
    Push,
}

/// The escalations currently open for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offers {
    /// The next luck step, if it is affordable and within the cap.
    pub luck: Option<LuckOffer>,
    /// Whether the check may be pushed.
    pub push: bool,
}

impl Offers {
    /// Returns true if there is nothing to offer.
    pub fn is_empty(&self) -> bool {
        self.luck.is_none() && !self.push
    }

    /// Returns true if `escalation` is among the offers.
    pub fn allows(&self, escalation: Escalation) -> bool {
        match escalation {
            Escalation::SpendLuck => self.luck.is_some(),
            Escalation::Push => self.push,
        }
    }
}

/// How long the player has to answer a single offer.
#[derive(Debug, Clone, Copy)]
pub struct DecisionWindow {
    timeout: Duration,
    opened: Instant,
}

impl DecisionWindow {
    /// Open a window that closes after `timeout`.
    pub fn open(timeout: Duration) -> Self {
        Self {
            timeout,
            opened: Instant::now(),
        }
    }

    /// Returns true once the window has closed.
    pub fn expired(&self) -> bool {
        self.opened.elapsed() >= self.timeout
    }

    /// Time left before the window closes.
    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.opened.elapsed())
    }
}

/// Something that answers offers: a player prompt, a script, a fixed policy.
pub trait Decider {
    /// Choose among `offers` for `check`. Answers given after `window` has
    /// expired count as a timeout.
    fn decide(
        &mut self,
        check: &SkillCheck,
        offers: &Offers,
        window: &DecisionWindow,
    ) -> Decision<Escalation>;
}

impl<F> Decider for F
where
    F: FnMut(&SkillCheck, &Offers) -> Decision<Escalation>,
{
    fn decide(
        &mut self,
        check: &SkillCheck,
        offers: &Offers,
        _window: &DecisionWindow,
    ) -> Decision<Escalation> {
        self(check, offers)
    }
}

/// A fixed policy: take luck and/or push whenever offered, else decline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Policy {
    /// Spend luck whenever a step is offered.
    pub spend_luck: bool,
    /// Push whenever allowed (after luck has been considered).
    pub push: bool,
}

impl Decider for Policy {
    fn decide(&mut self, _: &SkillCheck, offers: &Offers, _: &DecisionWindow) -> Decision<Escalation> {
        if self.spend_luck && offers.luck.is_some() {
            Decision::Chosen(Escalation::SpendLuck)
        } else if self.push && offers.push {
            Decision::Chosen(Escalation::Push)
        } else {
            Decision::Declined
        }
    }
}

/// Replays a list of answers in order; declines once it runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecider {
    answers: VecDeque<Decision<Escalation>>,
}

impl ScriptedDecider {
    /// Script the given answers.
    pub fn new(answers: impl IntoIterator<Item = Decision<Escalation>>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
        }
    }
}

impl Decider for ScriptedDecider {
    fn decide(&mut self, _: &SkillCheck, _: &Offers, _: &DecisionWindow) -> Decision<Escalation> {
        self.answers.pop_front().unwrap_or(Decision::Declined)
    }
}

/// One thing that happened while offers were open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscalationStep {
    /// A luck step was bought.
    LuckSpent(LuckOffer),
    /// The check was pushed.
    Pushed {
        /// The new roll value.
        value: u32,
        /// The tier of the new roll.
        tier: OutcomeTier,
    },
    /// The player declined the remaining offers.
    Declined,
    /// The decision window ran out.
    TimedOut,
}

impl std::fmt::Display for EscalationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LuckSpent(offer) => write!(f, "{offer}"),
            Self::Pushed { value, tier } => write!(f, "pushed: rolled {value} -> {tier}"),
            Self::Declined => write!(f, "declined"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// The offers currently open for `check`.
pub fn offers_for(check: &SkillCheck, ledger: &LuckLedger, config: &RulesConfig) -> Offers {
    Offers {
        luck: luck::evaluate(check, ledger.value(), config.luck_threshold).ok(),
        push: push::can_push(check).is_ok(),
    }
}

/// Offer escalations to `decider` until nothing is left to offer, the check
/// is pushed, or the player declines or times out.
///
/// Choosing something that was not offered is an error and changes nothing.
pub fn run_offers(
    check: &mut SkillCheck,
    ledger: &mut LuckLedger,
    config: &RulesConfig,
    dice: &mut dyn DiceSource,
    decider: &mut dyn Decider,
) -> RulesResult<Vec<EscalationStep>> {
    let mut steps = Vec::new();
    loop {
        let offers = offers_for(check, ledger, config);
        if offers.is_empty() {
            break;
        }

        let window = DecisionWindow::open(config.decision_timeout());
        let mut decision = decider.decide(check, &offers, &window);
        if window.expired() {
            decision = Decision::TimedOut;
        }

        match decision {
            Decision::Chosen(Escalation::SpendLuck) => {
                if !offers.allows(Escalation::SpendLuck) {
                    return Err(luck::evaluate(check, ledger.value(), config.luck_threshold)
                        .err()
                        .unwrap_or(RulesError::LuckNotApplicable(check.tier)));
                }
                let offer = luck::spend(check, ledger, config.luck_threshold)?;
                steps.push(EscalationStep::LuckSpent(offer));
            }
            Decision::Chosen(Escalation::Push) => {
                if !offers.allows(Escalation::Push) {
                    push::can_push(check)?;
                    return Err(RulesError::PushNotAllowed("push was not offered".into()));
                }
                push::push(check, dice)?;
                steps.push(EscalationStep::Pushed {
                    value: check.value,
                    tier: check.tier,
                });
                break;
            }
            Decision::Declined => {
                check.retire_offers();
                steps.push(EscalationStep::Declined);
                break;
            }
            Decision::TimedOut => {
                tracing::debug!(skill = %check.skill, "decision window expired");
                check.retire_offers();
                steps.push(EscalationStep::TimedOut);
                break;
            }
        }
    }
    Ok(steps)
}
