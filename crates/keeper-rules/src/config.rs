//! Server-wide configuration for the rules core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// Configuration shared by every roll and combat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Maximum luck that may be spent on a single escalation step.
    pub luck_threshold: u32,
    /// Malfunction value used when a catalog entry omits one ("100" never jams).
    pub malfunction_default: String,
    /// RNG seed for reproducible rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// How long a player has to answer a luck or push offer.
    pub decision_timeout_secs: u64,
    /// How long a combat session stays open.
    pub session_timeout_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            luck_threshold: 10,
            malfunction_default: "100".to_string(),
            seed: None,
            decision_timeout_secs: 60,
            session_timeout_secs: 600,
        }
    }
}

impl RulesConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> RulesResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the luck cap per escalation step.
    pub fn with_luck_threshold(mut self, threshold: u32) -> Self {
        self.luck_threshold = threshold;
        self
    }

    /// Set the default malfunction value.
    pub fn with_malfunction_default(mut self, value: impl Into<String>) -> Self {
        self.malfunction_default = value.into();
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the decision window in seconds.
    pub fn with_decision_timeout(mut self, secs: u64) -> Self {
        self.decision_timeout_secs = secs;
        self
    }

    /// Set the combat session lifetime in seconds.
    pub fn with_session_timeout(mut self, secs: u64) -> Self {
        self.session_timeout_secs = secs;
        self
    }

    /// The decision window as a [`Duration`].
    pub fn decision_timeout(&self) -> Duration {
        Duration::from_secs(self.decision_timeout_secs)
    }

    /// The combat session lifetime as a [`Duration`].
    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Check that the malfunction default parses as a threshold.
    pub fn validate(&self) -> RulesResult<()> {
        if crate::weapons::catalog::parse_malfunction(&self.malfunction_default).is_none() {
            return Err(RulesError::InvalidConfig(format!(
                "malfunction_default '{}' is not a number or range",
                self.malfunction_default
            )));
        }
        Ok(())
    }
}
