//! The luck pool.
//!
//! Luck only ever goes down during play: it is spent to improve a roll and
//! never drops below zero.

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// A character's remaining luck points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LuckLedger {
    current: u32,
}

impl LuckLedger {
    /// Create a ledger holding `value` points.
    pub fn new(value: u32) -> Self {
        Self { current: value }
    }

    /// Points left.
    pub fn value(&self) -> u32 {
        self.current
    }

    /// Returns true if `cost` points could be spent.
    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Spend `cost` points. Returns the new balance.
    ///
    /// Fails without changing anything if the balance is too low.
    pub fn spend(&mut self, cost: u32) -> RulesResult<u32> {
        if !self.can_afford(cost) {
            return Err(RulesError::InsufficientLuck {
                needed: cost,
                available: self.current,
            });
        }
        self.current -= cost;
        Ok(self.current)
    }

    /// Returns true if no luck is left.
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

impl std::fmt::Display for LuckLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Luck: {}", self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_reduces_balance() {
        let mut luck = LuckLedger::new(20);
        assert_eq!(luck.spend(5).unwrap(), 15);
        assert_eq!(luck.value(), 15);
    }

    #[test]
    fn spend_everything() {
        let mut luck = LuckLedger::new(5);
        assert_eq!(luck.spend(5).unwrap(), 0);
        assert!(luck.is_empty());
    }

    #[test]
    fn overspend_is_rejected_without_change() {
        let mut luck = LuckLedger::new(3);
        let err = luck.spend(4).unwrap_err();
        assert!(matches!(
            err,
            RulesError::InsufficientLuck {
                needed: 4,
                available: 3
            }
        ));
        assert_eq!(luck.value(), 3);
    }

    #[test]
    fn serializes_as_plain_number() {
        let luck = LuckLedger::new(42);
        assert_eq!(serde_json::to_string(&luck).unwrap(), "42");
        let back: LuckLedger = serde_json::from_str("17").unwrap();
        assert_eq!(back.value(), 17);
    }

    #[test]
    fn display() {
        assert_eq!(LuckLedger::new(8).to_string(), "Luck: 8");
    }
}
