//! RNG-backed percentile dice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DiceSource, RollMode, RollResult};

/// Percentile dice driven by a seedable RNG.
#[derive(Debug, Clone)]
pub struct PercentileDice {
    rng: StdRng,
}

impl PercentileDice {
    /// Create dice from an optional seed. `None` seeds from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    /// Create dice with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    fn tens_die(&mut self) -> u32 {
        self.rng.random_range(0..10u32) * 10
    }

    /// Roll one tens die and one ones die. 00 + 0 reads as 100.
    pub fn roll_normal_die(&mut self) -> RollResult {
        let tens = self.tens_die();
        let ones = self.rng.random_range(0..10u32);
        let value = match tens + ones {
            0 => 100,
            v => v,
        };
        RollResult {
            tens: vec![tens],
            ones,
            value,
            mode: RollMode::Normal,
        }
    }

    /// Roll two tens dice and a 1-10 ones die, keeping the lower tens for a
    /// bonus roll and the higher for a penalty roll.
    pub fn roll_bonus_or_penalty(&mut self, mode: RollMode) -> RollResult {
        let first = self.tens_die();
        let second = self.tens_die();
        let ones = self.rng.random_range(1..=10u32);
        let kept = match mode {
            RollMode::Penalty => first.max(second),
            RollMode::Bonus | RollMode::Normal => first.min(second),
        };
        RollResult {
            tens: vec![first, second],
            ones,
            value: kept + ones,
            mode,
        }
    }
}

impl DiceSource for PercentileDice {
    fn roll(&mut self, mode: RollMode) -> RollResult {
        let result = match mode {
            RollMode::Normal => self.roll_normal_die(),
            RollMode::Bonus | RollMode::Penalty => self.roll_bonus_or_penalty(mode),
        };
        tracing::debug!(value = result.value, %mode, "percentile roll");
        result
    }
}
