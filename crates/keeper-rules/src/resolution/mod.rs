//! Success tiers and the roll-under classifier.
//!
//! A percentile roll is compared against a skill rating and its half and
//! fifth. Checks run in a fixed order, first match wins:
//!
//! 1. **Fumble**: 96-100 on a skill under 50, or exactly 100 otherwise
//! 2. **Critical**: a roll of 1
//! 3. **Extreme**: at or under a fifth of the skill
//! 4. **Hard**: at or under half the skill
//! 5. **Regular**: at or under the skill
//! 6. **Fail**: anything else
//!
//! The submodules handle what a player may do with a result afterwards:
//! spending luck, pushing, and the offer loop that asks them.

pub mod check;
pub mod luck;
pub mod offer;
pub mod push;

pub use check::SkillCheck;
pub use luck::LuckOffer;
pub use offer::{Decider, Decision, DecisionWindow, Escalation, Offers, run_offers};

use serde::{Deserialize, Serialize};

/// The graded outcome of a skill check. Higher is strictly better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutcomeTier {
    /// A catastrophic failure.
    Fumble = 0,
    /// A plain failure.
    Fail = 1,
    /// At or under the skill.
    Regular = 2,
    /// At or under half the skill.
    Hard = 3,
    /// At or under a fifth of the skill.
    Extreme = 4,
    /// A roll of 1.
    Critical = 5,
}

impl OutcomeTier {
    /// Returns true for Regular and better.
    pub fn is_success(self) -> bool {
        self >= Self::Regular
    }

    /// The tier one step up, if luck could ever reach it.
    ///
    /// Fumbles cannot be bought off and Critical cannot be bought into.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Fail => Some(Self::Regular),
            Self::Regular => Some(Self::Hard),
            Self::Hard => Some(Self::Extreme),
            Self::Fumble | Self::Extreme | Self::Critical => None,
        }
    }
}

impl std::fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fumble => write!(f, "Fumble"),
            Self::Fail => write!(f, "Fail"),
            Self::Regular => write!(f, "Regular Success"),
            Self::Hard => write!(f, "Hard Success"),
            Self::Extreme => write!(f, "Extreme Success"),
            Self::Critical => write!(f, "Critical Success"),
        }
    }
}

/// The three roll-under boundaries derived from a skill rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// The skill itself.
    pub regular: u32,
    /// Half the skill, rounded down.
    pub hard: u32,
    /// A fifth of the skill, rounded down.
    pub extreme: u32,
}

impl Thresholds {
    /// Compute the boundaries for a skill rating.
    pub fn for_skill(skill: u32) -> Self {
        Self {
            regular: skill,
            hard: skill / 2,
            extreme: skill / 5,
        }
    }

    /// The highest roll that still reaches `tier`, for the roll-under tiers.
    pub fn for_tier(&self, tier: OutcomeTier) -> Option<u32> {
        match tier {
            OutcomeTier::Regular => Some(self.regular),
            OutcomeTier::Hard => Some(self.hard),
            OutcomeTier::Extreme => Some(self.extreme),
            OutcomeTier::Fumble | OutcomeTier::Fail | OutcomeTier::Critical => None,
        }
    }
}

/// Classify a 1-100 roll against a skill rating.
pub fn classify(roll: u32, skill: u32) -> OutcomeTier {
    let fumble = if skill < 50 { roll >= 96 } else { roll == 100 };
    if fumble {
        return OutcomeTier::Fumble;
    }
    if roll == 1 {
        return OutcomeTier::Critical;
    }

    let t = Thresholds::for_skill(skill);
    if roll <= t.extreme {
        OutcomeTier::Extreme
    } else if roll <= t.hard {
        OutcomeTier::Hard
    } else if roll <= t.regular {
        OutcomeTier::Regular
    } else {
        OutcomeTier::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries_for_skill_60() {
        assert_eq!(classify(12, 60), OutcomeTier::Extreme);
        assert_eq!(classify(13, 60), OutcomeTier::Hard);
        assert_eq!(classify(30, 60), OutcomeTier::Hard);
        assert_eq!(classify(31, 60), OutcomeTier::Regular);
        assert_eq!(classify(60, 60), OutcomeTier::Regular);
        assert_eq!(classify(61, 60), OutcomeTier::Fail);
        assert_eq!(classify(99, 60), OutcomeTier::Fail);
        assert_eq!(classify(100, 60), OutcomeTier::Fumble);
    }

    #[test]
    fn low_skill_fumble_range() {
        assert_eq!(classify(95, 40), OutcomeTier::Fail);
        assert_eq!(classify(96, 40), OutcomeTier::Fumble);
        assert_eq!(classify(100, 49), OutcomeTier::Fumble);
        assert_eq!(classify(96, 50), OutcomeTier::Fail);
    }

    #[test]
    fn one_is_critical_even_at_zero_skill() {
        assert_eq!(classify(1, 0), OutcomeTier::Critical);
        assert_eq!(classify(2, 0), OutcomeTier::Fail);
    }

    #[test]
    fn skill_over_100_still_fumbles_on_100() {
        assert_eq!(classify(100, 150), OutcomeTier::Fumble);
        assert_eq!(classify(99, 150), OutcomeTier::Regular);
    }

    #[test]
    fn tier_order_and_next() {
        assert!(OutcomeTier::Critical > OutcomeTier::Extreme);
        assert!(OutcomeTier::Fail > OutcomeTier::Fumble);
        assert!(OutcomeTier::Regular.is_success());
        assert!(!OutcomeTier::Fail.is_success());
        assert_eq!(OutcomeTier::Fail.next(), Some(OutcomeTier::Regular));
        assert_eq!(OutcomeTier::Hard.next(), Some(OutcomeTier::Extreme));
        assert_eq!(OutcomeTier::Fumble.next(), None);
        assert_eq!(OutcomeTier::Extreme.next(), None);
    }

    #[test]
    fn thresholds_for_tier() {
        let t = Thresholds::for_skill(47);
        assert_eq!(t.for_tier(OutcomeTier::Regular), Some(47));
        assert_eq!(t.for_tier(OutcomeTier::Hard), Some(23));
        assert_eq!(t.for_tier(OutcomeTier::Extreme), Some(9));
        assert_eq!(t.for_tier(OutcomeTier::Critical), None);
    }

    #[test]
    fn tier_display() {
        assert_eq!(OutcomeTier::Hard.to_string(), "Hard Success");
        assert_eq!(OutcomeTier::Fumble.to_string(), "Fumble");
    }

    proptest! {
        #[test]
        fn roll_of_one_is_always_critical(skill in 0u32..1000) {
            prop_assert_eq!(classify(1, skill), OutcomeTier::Critical);
        }

        #[test]
        fn hundred_fumbles_for_high_skill(skill in 50u32..1000) {
            prop_assert_eq!(classify(100, skill), OutcomeTier::Fumble);
        }

        #[test]
        fn low_skill_fumbles_iff_96_plus(skill in 0u32..50, roll in 1u32..=100) {
            prop_assert_eq!(classify(roll, skill) == OutcomeTier::Fumble, roll >= 96);
        }

        #[test]
        fn tiers_never_improve_as_roll_rises(skill in 0u32..1000, roll in 2u32..95) {
            prop_assert!(classify(roll, skill) >= classify(roll + 1, skill));
        }

        #[test]
        fn tiers_match_thresholds(skill in 0u32..1000, roll in 2u32..=95) {
            let t = Thresholds::for_skill(skill);
            let expected = if roll <= t.extreme {
                OutcomeTier::Extreme
            } else if roll <= t.hard {
                OutcomeTier::Hard
            } else if roll <= t.regular {
                OutcomeTier::Regular
            } else {
                OutcomeTier::Fail
            };
            prop_assert_eq!(classify(roll, skill), expected);
        }
    }
}
