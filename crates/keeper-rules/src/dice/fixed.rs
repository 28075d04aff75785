//! Scripted dice for replays and tests.

use super::{DiceSource, RollMode, RollResult};

/// Dice that return a fixed sequence of values.
///
/// Values cycle once the script runs out. An empty script always rolls 100.
#[derive(Debug, Clone, Default)]
pub struct FixedRolls {
    values: Vec<u32>,
    next: usize,
}

impl FixedRolls {
    /// Create dice that return `values` in order.
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            next: 0,
        }
    }

    /// How many rolls have been drawn so far.
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl DiceSource for FixedRolls {
    fn roll(&mut self, mode: RollMode) -> RollResult {
        let value = if self.values.is_empty() {
            100
        } else {
            self.values[self.next % self.values.len()]
        };
        self.next += 1;
        RollResult::from_value(value, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_script_in_order_then_cycles() {
        let mut dice = FixedRolls::new([12, 87]);
        assert_eq!(dice.roll_normal().value, 12);
        assert_eq!(dice.roll(RollMode::Bonus).value, 87);
        assert_eq!(dice.roll_normal().value, 12);
        assert_eq!(dice.drawn(), 3);
    }

    #[test]
    fn empty_script_rolls_100() {
        let mut dice = FixedRolls::default();
        assert_eq!(dice.roll_normal().value, 100);
    }
}
