//! Percentile dice: roll modes, results, and roll sources.
//!
//! A percentile roll combines a tens die (00-90) with a ones die. Bonus and
//! penalty rolls draw an extra tens die and keep the better or worse one.
//! Anything that produces rolls implements [`DiceSource`], so sessions can run
//! against real randomness or a fixed script.

pub mod fixed;
pub mod percentile;

pub use fixed::FixedRolls;
pub use percentile::PercentileDice;

use serde::{Deserialize, Serialize};

/// How a percentile roll is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollMode {
    /// One tens die and one ones die.
    #[default]
    Normal,
    /// Two tens dice, the lower one counts.
    Bonus,
    /// Two tens dice, the higher one counts.
    Penalty,
}

impl RollMode {
    /// Parse a roll mode from user text ("bonus", "penalty", "normal").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "normal" | "n" => Some(Self::Normal),
            "bonus" | "b" | "+" => Some(Self::Bonus),
            "penalty" | "p" | "-" => Some(Self::Penalty),
            _ => None,
        }
    }
}

impl std::fmt::Display for RollMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Bonus => write!(f, "bonus"),
            Self::Penalty => write!(f, "penalty"),
        }
    }
}

/// The result of one percentile roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Every tens die rolled (one for normal rolls, two for bonus/penalty).
    pub tens: Vec<u32>,
    /// The ones die.
    pub ones: u32,
    /// The final value, 1 to 100.
    pub value: u32,
    /// How the roll was made.
    pub mode: RollMode,
}

impl RollResult {
    /// Build a result that lands on `value` for the given mode.
    ///
    /// Used by scripted dice. Values are clamped to 1..=100.
    pub fn from_value(value: u32, mode: RollMode) -> Self {
        let value = value.clamp(1, 100);
        let (tens, ones) = match mode {
            RollMode::Normal => ((value % 100) / 10 * 10, value % 10),
            RollMode::Bonus | RollMode::Penalty => {
                let ones = (value - 1) % 10 + 1;
                (value - ones, ones)
            }
        };
        Self {
            tens: vec![tens],
            ones,
            value,
            mode,
        }
    }

    /// The tens die that counted toward the value.
    pub fn kept_tens(&self) -> u32 {
        match self.mode {
            RollMode::Normal => self.tens.first().copied().unwrap_or(0),
            RollMode::Bonus => self.tens.iter().copied().min().unwrap_or(0),
            RollMode::Penalty => self.tens.iter().copied().max().unwrap_or(0),
        }
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tens: Vec<String> = self.tens.iter().map(|t| format!("{t:02}")).collect();
        match self.mode {
            RollMode::Normal => write!(f, "{} [{}+{}]", self.value, tens.join("|"), self.ones),
            mode => write!(
                f,
                "{} [{}+{}, {mode}]",
                self.value,
                tens.join("|"),
                self.ones
            ),
        }
    }
}

/// A source of percentile rolls.
pub trait DiceSource {
    /// Roll once in the given mode.
    fn roll(&mut self, mode: RollMode) -> RollResult;

    /// Roll once in normal mode.
    fn roll_normal(&mut self) -> RollResult {
        self.roll(RollMode::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_mode_parse() {
        assert_eq!(RollMode::parse("bonus"), Some(RollMode::Bonus));
        assert_eq!(RollMode::parse(" Penalty "), Some(RollMode::Penalty));
        assert_eq!(RollMode::parse(""), Some(RollMode::Normal));
        assert_eq!(RollMode::parse("sideways"), None);
    }

    #[test]
    fn from_value_normal_splits_digits() {
        let r = RollResult::from_value(45, RollMode::Normal);
        assert_eq!(r.tens, vec![40]);
        assert_eq!(r.ones, 5);
        let r = RollResult::from_value(100, RollMode::Normal);
        assert_eq!(r.tens, vec![0]);
        assert_eq!(r.ones, 0);
        assert_eq!(r.value, 100);
    }

    #[test]
    fn from_value_bonus_uses_one_to_ten_ones() {
        let r = RollResult::from_value(40, RollMode::Bonus);
        assert_eq!(r.tens, vec![30]);
        assert_eq!(r.ones, 10);
        let r = RollResult::from_value(100, RollMode::Penalty);
        assert_eq!(r.tens, vec![90]);
        assert_eq!(r.ones, 10);
    }

    #[test]
    fn from_value_clamps() {
        assert_eq!(RollResult::from_value(0, RollMode::Normal).value, 1);
        assert_eq!(RollResult::from_value(250, RollMode::Normal).value, 100);
    }

    #[test]
    fn kept_tens_by_mode() {
        let r = RollResult {
            tens: vec![20, 70],
            ones: 3,
            value: 23,
            mode: RollMode::Bonus,
        };
        assert_eq!(r.kept_tens(), 20);
        let r = RollResult {
            mode: RollMode::Penalty,
            value: 73,
            ..r
        };
        assert_eq!(r.kept_tens(), 70);
    }

    #[test]
    fn display() {
        let r = RollResult::from_value(45, RollMode::Normal);
        assert_eq!(r.to_string(), "45 [40+5]");
        let r = RollResult {
            tens: vec![20, 70],
            ones: 3,
            value: 23,
            mode: RollMode::Bonus,
        };
        assert_eq!(r.to_string(), "23 [20|70+3, bonus]");
    }
}
