//! Resolving free text to canonical skill and weapon names.

use crate::error::{RulesError, RulesResult};
use crate::sheet::CharacterSheet;

use super::{SimilarityOracle, TokenSetRatio};

/// Minimum score for a fuzzy skill match.
pub const SKILL_MATCH_THRESHOLD: u8 = 70;

/// Minimum score for a fuzzy weapon match. A wrong weapon silently brings the
/// wrong damage and malfunction profile, so the bar is higher.
pub const WEAPON_MATCH_THRESHOLD: u8 = 85;

/// Rating used for skills that are neither on the sheet nor in the base table.
pub const UNLISTED_BASE_CHANCE: u32 = 1;

/// Simplified skill names and the older names sheets may still carry.
const LEGACY_ALIASES: &[(&str, &str)] = &[
    ("Handgun", "Firearms (Handgun)"),
    ("Pistol", "Firearms (Handgun)"),
    ("Rifle/Shotgun", "Firearms (Rifle/Shotgun)"),
    ("Rifle", "Firearms (Rifle/Shotgun)"),
    ("Shotgun", "Firearms (Rifle/Shotgun)"),
    ("Submachine Gun", "Firearms (Submachine Gun)"),
    ("SMG", "Firearms (Submachine Gun)"),
    ("Machine Gun", "Firearms (Machine Gun)"),
    ("Brawl", "Fighting (Brawl)"),
];

/// Base chances for an untrained investigator.
const BASE_CHANCES: &[(&str, u32)] = &[
    ("Accounting", 5),
    ("Anthropology", 1),
    ("Appraise", 5),
    ("Archaeology", 1),
    ("Charm", 15),
    ("Climb", 20),
    ("Credit Rating", 0),
    ("Cthulhu Mythos", 0),
    ("Disguise", 5),
    ("Drive Auto", 20),
    ("Electrical Repair", 10),
    ("Fast Talk", 5),
    ("Fighting (Brawl)", 25),
    ("Firearms (Handgun)", 20),
    ("Firearms (Rifle/Shotgun)", 25),
    ("Firearms (Submachine Gun)", 15),
    ("Firearms (Machine Gun)", 10),
    ("First Aid", 30),
    ("History", 5),
    ("Intimidate", 15),
    ("Jump", 20),
    ("Law", 5),
    ("Library Use", 20),
    ("Listen", 20),
    ("Locksmith", 1),
    ("Mechanical Repair", 10),
    ("Medicine", 1),
    ("Natural World", 10),
    ("Navigate", 10),
    ("Occult", 5),
    ("Persuade", 10),
    ("Psychoanalysis", 1),
    ("Psychology", 10),
    ("Ride", 5),
    ("Sleight of Hand", 10),
    ("Spot Hidden", 25),
    ("Stealth", 20),
    ("Swim", 20),
    ("Throw", 20),
    ("Track", 10),
];

/// A canonical key picked for some input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The canonical key.
    pub key: String,
    /// Similarity score (100 for exact matches).
    pub score: u8,
}

/// Picks the canonical key that best matches free text.
///
/// A case-insensitive exact match wins outright. Otherwise every key is
/// scored and the best one is accepted if it reaches the threshold.
#[derive(Debug, Clone)]
pub struct SkillResolver<O = TokenSetRatio> {
    oracle: O,
    threshold: u8,
}

impl SkillResolver<TokenSetRatio> {
    /// Resolver tuned for skill names.
    pub fn for_skills() -> Self {
        Self::with_oracle(TokenSetRatio, SKILL_MATCH_THRESHOLD)
    }

    /// Resolver tuned for weapon names.
    pub fn for_weapons() -> Self {
        Self::with_oracle(TokenSetRatio, WEAPON_MATCH_THRESHOLD)
    }
}

impl<O: SimilarityOracle> SkillResolver<O> {
    /// Resolver with a custom oracle and threshold.
    pub fn with_oracle(oracle: O, threshold: u8) -> Self {
        Self { oracle, threshold }
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Resolve `input` against `keys`. Returns `None` if nothing is close enough.
    pub fn resolve<'a, I>(&self, input: &str, keys: I) -> Option<Resolved>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        let mut best: Option<Resolved> = None;
        for key in keys {
            if key.eq_ignore_ascii_case(input) {
                return Some(Resolved {
                    key: key.to_string(),
                    score: 100,
                });
            }
            let score = self.oracle.score(input, key);
            if score >= self.threshold && best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Resolved {
                    key: key.to_string(),
                    score,
                });
            }
        }
        best
    }
}

/// How a rating was found for a requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillSource {
    /// The name is on the sheet as typed.
    Exact,
    /// The sheet carries the skill under an older or simpler name.
    Alias(String),
    /// The name fuzzily matched a sheet entry.
    Fuzzy {
        /// Similarity score of the match.
        score: u8,
    },
    /// Nothing on the sheet matched; the base chance was used.
    Default,
}

/// The rating a character rolls against for some requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRating {
    /// Canonical name the rating came from.
    pub name: String,
    /// The rating.
    pub value: u32,
    /// How it was found.
    pub source: SkillSource,
}

/// Find the rating a character has for `name` on their sheet.
///
/// Tries the exact name, then a legacy alias of it, then a fuzzy match
/// against everything rollable on the sheet. Fails with
/// [`RulesError::UnresolvedSkill`] when none of them hit.
pub fn find_rating(sheet: &CharacterSheet, name: &str) -> RulesResult<ResolvedRating> {
    if let Some(value) = sheet.rating(name) {
        let canonical = sheet
            .skill(name)
            .map(|(k, _)| k.to_string())
            .unwrap_or_else(|| name.trim().to_string());
        return Ok(ResolvedRating {
            name: canonical,
            value,
            source: SkillSource::Exact,
        });
    }

    for alias in aliases_of(name) {
        if let Some((key, value)) = sheet.skill(alias) {
            return Ok(ResolvedRating {
                name: key.to_string(),
                value,
                source: SkillSource::Alias(alias.to_string()),
            });
        }
    }

    let names = sheet.rollable_names();
    SkillResolver::for_skills()
        .resolve(name, names.iter().map(String::as_str))
        .and_then(|found| sheet.rating(&found.key).map(|value| (found, value)))
        .map(|(found, value)| ResolvedRating {
            name: found.key,
            value,
            source: SkillSource::Fuzzy { score: found.score },
        })
        .ok_or_else(|| RulesError::UnresolvedSkill(name.trim().to_string()))
}

/// Find the rating a character should roll for `name`.
///
/// Same as [`find_rating`], falling back to the base chance when nothing on
/// the sheet matches.
pub fn resolve_rating(sheet: &CharacterSheet, name: &str) -> ResolvedRating {
    match find_rating(sheet, name) {
        Ok(rating) => rating,
        Err(unresolved) => {
            tracing::debug!(%unresolved, "using base chance");
            let canonical = aliases_of(name)
                .into_iter()
                .find(|a| a.starts_with("Firearms") || a.starts_with("Fighting"))
                .unwrap_or(name.trim());
            ResolvedRating {
                name: canonical.to_string(),
                value: base_chance(canonical, sheet),
                source: SkillSource::Default,
            }
        }
    }
}

/// Every other name `name` is known by.
fn aliases_of(name: &str) -> Vec<&'static str> {
    let name = name.trim();
    LEGACY_ALIASES
        .iter()
        .filter_map(|(simple, legacy)| {
            if simple.eq_ignore_ascii_case(name) {
                Some(*legacy)
            } else if legacy.eq_ignore_ascii_case(name) {
                Some(*simple)
            } else {
                None
            }
        })
        .collect()
}

/// The untrained rating for a skill.
///
/// Dodge is half DEX and the own language equals EDU; listed skills use the
/// standard table; anything else gets [`UNLISTED_BASE_CHANCE`].
pub fn base_chance(name: &str, sheet: &CharacterSheet) -> u32 {
    let name = name.trim();
    if name.eq_ignore_ascii_case("dodge") {
        return sheet.characteristics.dexterity / 2;
    }
    if name.eq_ignore_ascii_case("language (own)") {
        return sheet.characteristics.education;
    }

    let lookup = |n: &str| {
        BASE_CHANCES
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(n))
            .map(|(_, v)| *v)
    };
    lookup(name)
        .or_else(|| aliases_of(name).into_iter().find_map(lookup))
        .unwrap_or(UNLISTED_BASE_CHANCE)
}
