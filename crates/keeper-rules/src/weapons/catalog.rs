//! The canonical weapon table.
//!
//! Loaded from JSON keyed by weapon name:
//!
//! ```json
//! {
//!   ".38 Revolver": { "damage": "1D10", "malfunction": "100", "capacity": 6, "skill": "Firearms (Handgun)" },
//!   "12-gauge Shotgun (2B)": { "damage": "4D6/2D6/1D6", "malfunction": "100", "capacity": "2" }
//! }
//! ```
//!
//! Capacity may be a number or a string; malfunction is a number, a string,
//! or a range such as `"96-00"` whose lower bound is used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RulesConfig;
use crate::error::{RulesError, RulesResult};
use crate::matching::SkillResolver;

use super::damage::DamageExpression;

/// Skill used by entries that do not name one.
pub const DEFAULT_WEAPON_SKILL: &str = "Firearms (Handgun)";

/// Malfunction value at or above which a weapon never jams.
pub const NEVER_JAMS: u32 = 100;

/// Parse a malfunction value: `"96"`, `"96-00"` (lower bound), `"00"` (100).
///
/// Returns `None` for anything outside 1-100.
pub fn parse_malfunction(text: &str) -> Option<u32> {
    let lower = text.trim().split(['-', '–']).next()?.trim();
    let value = if lower == "00" {
        100
    } else {
        lower.parse::<u32>().ok()?
    };
    (1..=100).contains(&value).then_some(value)
}

/// Leading number of a capacity field ("6", "20/30", "1 or 2"). 0 if none.
fn parse_capacity(text: &str) -> u32 {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(u32),
    Text(String),
}

impl NumberOrText {
    fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntry {
    damage: String,
    #[serde(default)]
    malfunction: Option<NumberOrText>,
    #[serde(default)]
    capacity: Option<NumberOrText>,
    #[serde(default)]
    skill: Option<String>,
}

/// One weapon as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponCatalogEntry {
    /// Canonical name.
    pub name: String,
    /// Damage as written in the table.
    pub damage: String,
    /// Rolls at or above this jam the weapon (100 never jams).
    pub malfunction: u32,
    /// Rounds per full load. 0 for melee or unparseable capacities.
    pub capacity: u32,
    /// Skill rolled to attack with the weapon.
    pub skill: String,
}

impl WeaponCatalogEntry {
    /// A ranged weapon that never jams.
    pub fn new(name: impl Into<String>, damage: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            damage: damage.into(),
            malfunction: NEVER_JAMS,
            capacity,
            skill: DEFAULT_WEAPON_SKILL.to_string(),
        }
    }

    /// Set the malfunction threshold.
    pub fn with_malfunction(mut self, malfunction: u32) -> Self {
        self.malfunction = malfunction;
        self
    }

    /// Set the attack skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skill = skill.into();
        self
    }

    /// The damage split into its options.
    pub fn damage_expression(&self) -> DamageExpression {
        DamageExpression::parse_lenient(&self.damage)
    }

    /// Returns true if an attack roll of `roll` jams the weapon.
    pub fn jams_on(&self, roll: u32) -> bool {
        self.malfunction < NEVER_JAMS && roll >= self.malfunction
    }
}

/// All known weapons, keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaponCatalog {
    entries: BTreeMap<String, WeaponCatalogEntry>,
}

impl WeaponCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from JSON. Entries without a malfunction value take
    /// `config.malfunction_default`.
    pub fn from_json(json: &str, config: &RulesConfig) -> RulesResult<Self> {
        let raw: BTreeMap<String, RawEntry> = serde_json::from_str(json)?;
        let default_malfunction = parse_malfunction(&config.malfunction_default).ok_or_else(|| {
            RulesError::InvalidConfig(format!(
                "malfunction_default '{}' is not a number or range",
                config.malfunction_default
            ))
        })?;

        let mut catalog = Self::new();
        for (name, entry) in raw {
            let malfunction = match &entry.malfunction {
                Some(value) => {
                    let text = value.as_text();
                    parse_malfunction(&text).unwrap_or_else(|| {
                        tracing::debug!(weapon = %name, malfunction = %text, "unreadable malfunction, using default");
                        default_malfunction
                    })
                }
                None => default_malfunction,
            };
            let capacity = entry
                .capacity
                .as_ref()
                .map(|c| parse_capacity(&c.as_text()))
                .unwrap_or(0);
            catalog.insert(WeaponCatalogEntry {
                name,
                damage: entry.damage,
                malfunction,
                capacity,
                skill: entry
                    .skill
                    .unwrap_or_else(|| DEFAULT_WEAPON_SKILL.to_string()),
            });
        }
        tracing::debug!(weapons = catalog.len(), "weapon catalog loaded");
        Ok(catalog)
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, entry: WeaponCatalogEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_entry(mut self, entry: WeaponCatalogEntry) -> Self {
        self.insert(entry);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &WeaponCatalogEntry> {
        self.entries.values()
    }

    /// Look up an entry by exact, case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&WeaponCatalogEntry> {
        let name = name.trim();
        self.entries
            .get(name)
            .or_else(|| self.entries.values().find(|e| e.name.eq_ignore_ascii_case(name)))
    }

    /// Find the entry a piece of free text refers to, exactly or fuzzily at
    /// the weapon threshold.
    pub fn lookup(&self, text: &str) -> Option<&WeaponCatalogEntry> {
        if let Some(entry) = self.get(text) {
            return Some(entry);
        }
        let found = SkillResolver::for_weapons()
            .resolve(text, self.entries.keys().map(String::as_str))?;
        self.entries.get(&found.key)
    }
}
