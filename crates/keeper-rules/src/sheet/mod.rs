//! Character records: characteristics, skills, luck, and inventory.
//!
//! The sheet is the unit the outside world stores and hands in. Components
//! borrow it instead of reaching for shared state, and weapon changes are
//! written back into its free-text inventory.

pub mod luck;

pub use luck::LuckLedger;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};

/// The eight core characteristics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Characteristics {
    /// Strength.
    #[serde(rename = "STR")]
    pub strength: u32,
    /// Constitution.
    #[serde(rename = "CON")]
    pub constitution: u32,
    /// Size.
    #[serde(rename = "SIZ")]
    pub size: u32,
    /// Dexterity.
    #[serde(rename = "DEX")]
    pub dexterity: u32,
    /// Appearance.
    #[serde(rename = "APP")]
    pub appearance: u32,
    /// Intelligence.
    #[serde(rename = "INT")]
    pub intelligence: u32,
    /// Power.
    #[serde(rename = "POW")]
    pub power: u32,
    /// Education.
    #[serde(rename = "EDU")]
    pub education: u32,
}

impl Characteristics {
    /// Look up a characteristic by abbreviation or full name.
    pub fn get(&self, name: &str) -> Option<u32> {
        match name.trim().to_lowercase().as_str() {
            "str" | "strength" => Some(self.strength),
            "con" | "constitution" => Some(self.constitution),
            "siz" | "size" => Some(self.size),
            "dex" | "dexterity" => Some(self.dexterity),
            "app" | "appearance" => Some(self.appearance),
            "int" | "intelligence" | "idea" => Some(self.intelligence),
            "pow" | "power" => Some(self.power),
            "edu" | "education" | "know" => Some(self.education),
            _ => None,
        }
    }

    /// Canonical abbreviations, in sheet order.
    pub const NAMES: [&'static str; 8] = ["STR", "CON", "SIZ", "DEX", "APP", "INT", "POW", "EDU"];
}

/// Build and damage bonus derived from STR + SIZ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DamageBonus {
    /// Build modifier (-2 and up).
    pub build: i32,
    /// Damage bonus as an expression: "-2", "-1", "0", "+1D4", "+1D6", ...
    pub expression: String,
}

impl DamageBonus {
    /// Derive the bonus from combined strength and size.
    pub fn from_str_siz(total: u32) -> Self {
        let (build, expression) = match total {
            0..=64 => (-2, "-2".to_string()),
            65..=84 => (-1, "-1".to_string()),
            85..=124 => (0, "0".to_string()),
            125..=164 => (1, "+1D4".to_string()),
            165..=204 => (2, "+1D6".to_string()),
            _ => {
                // 205-284 is +2D6, then one more D6 per 80 points.
                let steps = (total - 205) / 80;
                (3 + steps as i32, format!("+{}D6", 2 + steps))
            }
        };
        Self { build, expression }
    }

    /// Append the bonus to a base damage expression ("1D3" -> "1D3+1D4").
    pub fn apply_to(&self, base: &str) -> String {
        if self.expression == "0" {
            base.to_string()
        } else {
            format!("{base}{}", self.expression)
        }
    }
}

/// Where a line lives in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventorySlot {
    /// Inventory category (e.g. "Weapons").
    pub category: String,
    /// Position within the category.
    pub index: usize,
}

impl std::fmt::Display for InventorySlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.category, self.index)
    }
}

/// A character's full mechanical record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSheet {
    /// Character name.
    pub name: String,
    /// Core characteristics.
    pub characteristics: Characteristics,
    /// Current hit points.
    pub hit_points: u32,
    /// Current magic points.
    pub magic_points: u32,
    /// Current sanity.
    pub sanity: u32,
    /// Remaining luck.
    pub luck: LuckLedger,
    /// Skill ratings keyed by canonical name.
    pub skills: BTreeMap<String, u32>,
    /// Free-text inventory lines grouped by category.
    pub inventory: BTreeMap<String, Vec<String>>,
}

impl CharacterSheet {
    /// Create an empty sheet with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a sheet from JSON.
    pub fn from_json(json: &str) -> RulesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the sheet as pretty JSON.
    pub fn to_json(&self) -> RulesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set a skill rating, replacing any previous value.
    pub fn with_skill(mut self, name: impl Into<String>, value: u32) -> Self {
        self.skills.insert(name.into(), value);
        self
    }

    /// Append an inventory line to a category.
    pub fn with_item(mut self, category: impl Into<String>, line: impl Into<String>) -> Self {
        self.inventory
            .entry(category.into())
            .or_default()
            .push(line.into());
        self
    }

    /// Look up a skill by case-insensitive exact name.
    pub fn skill(&self, name: &str) -> Option<(&str, u32)> {
        self.skills
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name.trim()))
            .map(|(k, v)| (k.as_str(), *v))
    }

    /// Look up any rollable value: characteristic, Luck, Sanity, or skill.
    pub fn rating(&self, name: &str) -> Option<u32> {
        if let Some(v) = self.characteristics.get(name) {
            return Some(v);
        }
        match name.trim().to_lowercase().as_str() {
            "luck" => Some(self.luck.value()),
            "san" | "sanity" => Some(self.sanity),
            _ => self.skill(name).map(|(_, v)| v),
        }
    }

    /// Every name [`rating`](Self::rating) can resolve, canonical spelling.
    pub fn rollable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Characteristics::NAMES
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        names.push("Luck".to_string());
        names.push("Sanity".to_string());
        names.extend(self.skills.keys().cloned());
        names
    }

    /// Build and damage bonus from STR + SIZ.
    pub fn damage_bonus(&self) -> DamageBonus {
        DamageBonus::from_str_siz(self.characteristics.strength + self.characteristics.size)
    }

    /// Build modifier from STR + SIZ.
    pub fn build(&self) -> i32 {
        self.damage_bonus().build
    }

    /// Read one inventory line.
    pub fn item(&self, slot: &InventorySlot) -> Option<&str> {
        self.inventory
            .get(&slot.category)
            .and_then(|items| items.get(slot.index))
            .map(String::as_str)
    }

    /// Replace the line at `slot`, provided it still reads `expected`.
    ///
    /// Every other line is left untouched. If the slot is gone or holds
    /// different text the write is refused.
    pub fn replace_item(
        &mut self,
        slot: &InventorySlot,
        expected: &str,
        replacement: String,
    ) -> RulesResult<()> {
        let line = self
            .inventory
            .get_mut(&slot.category)
            .and_then(|items| items.get_mut(slot.index))
            .ok_or_else(|| RulesError::InventoryConflict(expected.to_string()))?;
        if line != expected {
            return Err(RulesError::InventoryConflict(expected.to_string()));
        }
        *line = replacement;
        Ok(())
    }
}
