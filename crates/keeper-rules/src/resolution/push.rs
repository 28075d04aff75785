//! Pushing a failed roll.
//!
//! A failed check may be rolled again once, at higher narrative stakes. The
//! new roll replaces the old one entirely; if it fails again the check carries
//! the dire-consequences flag for the keeper to act on.

use crate::dice::DiceSource;
use crate::error::{RulesError, RulesResult};

use super::OutcomeTier;
use super::check::SkillCheck;

/// Check whether `check` may be pushed.
pub fn can_push(check: &SkillCheck) -> RulesResult<()> {
    if check.is_luck_roll() {
        return Err(RulesError::PushNotAllowed("luck rolls cannot be pushed".into()));
    }
    if check.pushed {
        return Err(RulesError::PushNotAllowed("already pushed".into()));
    }
    if check.luck_spent > 0 {
        return Err(RulesError::PushNotAllowed("luck was spent on this roll".into()));
    }
    if !check.push_open() {
        return Err(RulesError::PushNotAllowed("offers were closed".into()));
    }
    if check.tier != OutcomeTier::Fail {
        return Err(RulesError::PushNotAllowed(format!(
            "only a plain failure can be pushed, not a {}",
            check.tier
        )));
    }
    Ok(())
}

/// Push `check`: discard its roll and roll again normally.
pub fn push(check: &mut SkillCheck, dice: &mut dyn DiceSource) -> RulesResult<()> {
    can_push(check)?;
    let roll = dice.roll_normal();
    check.apply_push(roll);
    tracing::debug!(
        skill = %check.skill,
        value = check.value,
        tier = %check.tier,
        dire = check.dire_consequences,
        "pushed roll"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{FixedRolls, RollMode, RollResult};

    fn check(rating: u32, value: u32) -> SkillCheck {
        SkillCheck::new("Stealth", rating, RollResult::from_value(value, RollMode::Bonus))
    }

    #[test]
    fn push_success_clears_failure() {
        let mut c = check(50, 70);
        let mut dice = FixedRolls::new([20]);
        push(&mut c, &mut dice).unwrap();
        assert!(c.pushed);
        assert_eq!(c.value, 20);
        assert_eq!(c.tier, OutcomeTier::Hard);
        assert!(!c.dire_consequences);
        assert_eq!(c.roll.mode, RollMode::Normal);
    }

    #[test]
    fn push_failure_flags_dire_consequences() {
        let mut c = check(50, 70);
        let mut dice = FixedRolls::new([88]);
        push(&mut c, &mut dice).unwrap();
        assert_eq!(c.tier, OutcomeTier::Fail);
        assert!(c.dire_consequences);
    }

    #[test]
    fn push_into_fumble_flags_dire_consequences() {
        let mut c = check(30, 70);
        let mut dice = FixedRolls::new([98]);
        push(&mut c, &mut dice).unwrap();
        assert_eq!(c.tier, OutcomeTier::Fumble);
        assert!(c.dire_consequences);
    }

    #[test]
    fn cannot_push_twice() {
        let mut c = check(50, 70);
        let mut dice = FixedRolls::new([80, 10]);
        push(&mut c, &mut dice).unwrap();
        assert!(matches!(
            push(&mut c, &mut dice),
            Err(RulesError::PushNotAllowed(_))
        ));
        assert_eq!(c.value, 80);
        assert_eq!(dice.drawn(), 1);
    }

    #[test]
    fn cannot_push_success_or_fumble() {
        assert!(can_push(&check(50, 40)).is_err());
        assert!(can_push(&check(30, 99)).is_err());
    }

    #[test]
    fn cannot_push_luck() {
        let c = SkillCheck::new("Luck", 50, RollResult::from_value(70, RollMode::Normal));
        assert!(can_push(&c).is_err());
    }

    #[test]
    fn cannot_push_after_luck_or_retire() {
        let mut c = check(40, 45);
        c.apply_luck(5, 40, OutcomeTier::Regular);
        assert!(can_push(&c).is_err());

        let mut c = check(40, 45);
        c.retire_offers();
        assert!(can_push(&c).is_err());
    }
}
