//! Reading weapons out of free-text inventory lines and writing them back.
//!
//! A weapon line looks like `[icon] Name [current/max] (JAMMED) note`:
//!
//! * the leading status icon is optional and ignored when reading;
//! * `[max]` alone means fully loaded, no bracket means the catalog capacity;
//! * `(JAMMED)` marks a weapon that must be cleared before it fires again;
//! * anything after the last ammo bracket is a note and is kept as written.
//!
//! Written lines always take the full form, with the icon only on jammed
//! weapons, so a line already in that form reads and writes back unchanged.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::sheet::{CharacterSheet, InventorySlot};

use super::catalog::{WeaponCatalog, WeaponCatalogEntry};

/// Icon written in front of a jammed weapon.
pub const JAM_ICON: &str = "⚠️";

static AMMO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*(?P<current>\d+)\s*(?:/\s*(?P<max>\d+)\s*)?\]").expect("valid regex")
});

static JAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\(\s*jammed\s*\)").expect("valid regex"));

/// A weapon carried by the character, bound to the line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponInstance {
    /// The catalog entry the line matched.
    pub entry: WeaponCatalogEntry,
    /// Where the line lives in the inventory.
    pub slot: InventorySlot,
    /// The name as the player wrote it.
    pub name: String,
    /// Rounds loaded.
    pub ammo: u32,
    /// Rounds per full load.
    pub capacity: u32,
    /// Whether the weapon is jammed.
    pub jammed: bool,
    /// Free text after the ammo bracket, written back unchanged.
    #[serde(default)]
    pub note: String,
    /// The exact line this instance was parsed from.
    pub source: String,
}

impl WeaponInstance {
    /// The inventory line for this weapon in its current state.
    pub fn to_line(&self) -> String {
        self.line_for(self.ammo, self.jammed)
    }

    /// The inventory line for this weapon with `ammo` loaded.
    pub fn line_for(&self, ammo: u32, jammed: bool) -> String {
        let line = format_line(&self.name, ammo, self.capacity, jammed);
        if self.note.is_empty() {
            line
        } else {
            format!("{line} {}", self.note)
        }
    }
}

impl std::fmt::Display for WeaponInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_line())
    }
}

/// The result of reading one inventory line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedWeaponLine {
    /// The line names a catalog weapon.
    Matched(Box<WeaponInstance>),
    /// No catalog weapon matched; the raw line.
    Unmatched(String),
}

/// Render a weapon line: `{icon }{name} [{ammo}/{capacity}]{ (JAMMED)}`.
pub fn format_line(name: &str, ammo: u32, capacity: u32, jammed: bool) -> String {
    if jammed {
        format!("{JAM_ICON} {name} [{ammo}/{capacity}] (JAMMED)")
    } else {
        format!("{name} [{ammo}/{capacity}]")
    }
}

/// Drop a leading status icon: any run of symbols before the name. A leading
/// dot stays, it belongs to calibres like ".38".
fn strip_icon(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        c.is_whitespace() || (!c.is_alphanumeric() && c != '.' && c != '(' && c != '[')
    })
}

/// The name used for catalog lookup: no leading "a " or "an ".
fn lookup_name(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for article in ["a ", "an "] {
        if lower.starts_with(article) {
            return name[article.len()..].trim_start();
        }
    }
    name
}

/// Drop the first jam marker from `text`. Returns the rest and whether a
/// marker was found.
fn take_jam_marker(text: &str) -> (String, bool) {
    match JAM_RE.find(text) {
        Some(m) => {
            let rest = format!("{} {}", text[..m.start()].trim(), text[m.end()..].trim());
            (rest.trim().to_string(), true)
        }
        None => (text.trim().to_string(), false),
    }
}

/// Read one inventory line at `slot`.
pub fn parse_line(line: &str, slot: InventorySlot, catalog: &WeaponCatalog) -> ParsedWeaponLine {
    let unmatched = || ParsedWeaponLine::Unmatched(line.to_string());
    let text = strip_icon(line).trim_end();

    let bracket = AMMO_RE.captures_iter(text).last();
    let (name, note, jammed, numbers) = match bracket.as_ref().and_then(|c| c.get(0)) {
        Some(whole) => {
            let (name, before) = take_jam_marker(&text[..whole.start()]);
            let (note, after) = take_jam_marker(&text[whole.end()..]);
            let number = |group: &str| {
                bracket
                    .as_ref()
                    .and_then(|c| c.name(group))
                    .and_then(|m| m.as_str().parse::<u32>().ok())
            };
            (name, note, before || after, (number("current"), number("max")))
        }
        None => match JAM_RE.find(text) {
            Some(m) => (
                text[..m.start()].trim().to_string(),
                text[m.end()..].trim().to_string(),
                true,
                (None, None),
            ),
            None => (text.trim().to_string(), String::new(), false, (None, None)),
        },
    };
    if name.is_empty() {
        return unmatched();
    }
    let Some(entry) = catalog.lookup(lookup_name(&name)) else {
        return unmatched();
    };

    let (ammo, capacity) = match numbers {
        (Some(current), Some(max)) => (current.min(max), max),
        (Some(max), None) => (max, max),
        _ => (entry.capacity, entry.capacity),
    };

    ParsedWeaponLine::Matched(Box::new(WeaponInstance {
        entry: entry.clone(),
        slot,
        name,
        ammo,
        capacity,
        jammed,
        note,
        source: line.to_string(),
    }))
}

impl ParsedWeaponLine {
    /// The weapon, or [`RulesError::UnresolvedWeapon`] with the raw line.
    pub fn into_weapon(self) -> RulesResult<WeaponInstance> {
        match self {
            Self::Matched(weapon) => Ok(*weapon),
            Self::Unmatched(raw) => Err(RulesError::UnresolvedWeapon(raw)),
        }
    }
}

/// Read every inventory line, weapon or not, in category then line order.
pub fn scan_inventory<'a>(
    sheet: &'a CharacterSheet,
    catalog: &'a WeaponCatalog,
) -> impl Iterator<Item = (InventorySlot, ParsedWeaponLine)> + 'a {
    sheet.inventory.iter().flat_map(move |(category, lines)| {
        lines.iter().enumerate().map(move |(index, line)| {
            let slot = InventorySlot {
                category: category.clone(),
                index,
            };
            (slot.clone(), parse_line(line, slot, catalog))
        })
    })
}

/// Every weapon in the character's inventory, in category then line order.
///
/// Lines that match no catalog weapon are skipped.
pub fn parse_inventory(sheet: &CharacterSheet, catalog: &WeaponCatalog) -> Vec<WeaponInstance> {
    scan_inventory(sheet, catalog)
        .filter_map(|(slot, parsed)| match parsed.into_weapon() {
            Ok(weapon) => Some(weapon),
            Err(unresolved) => {
                tracing::debug!(%unresolved, %slot, "skipping inventory line");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> WeaponCatalog {
        WeaponCatalog::new()
            .with_entry(WeaponCatalogEntry::new(".38 Revolver", "1D10", 6))
            .with_entry(WeaponCatalogEntry::new("Thompson", "1D10+2", 20).with_malfunction(96))
            .with_entry(
                WeaponCatalogEntry::new("Elephant Gun (2B)", "3D6+4", 2)
                    .with_skill("Firearms (Rifle/Shotgun)"),
            )
    }

    fn slot(index: usize) -> InventorySlot {
        InventorySlot {
            category: "Weapons".to_string(),
            index,
        }
    }

    fn matched(line: &str) -> WeaponInstance {
        match parse_line(line, slot(0), &catalog()) {
            ParsedWeaponLine::Matched(weapon) => *weapon,
            ParsedWeaponLine::Unmatched(raw) => panic!("'{raw}' did not match"),
        }
    }

    #[test]
    fn full_form() {
        let w = matched(".38 Revolver [4/6]");
        assert_eq!(w.name, ".38 Revolver");
        assert_eq!(w.entry.name, ".38 Revolver");
        assert_eq!((w.ammo, w.capacity, w.jammed), (4, 6, false));
        assert_eq!(w.source, ".38 Revolver [4/6]");
    }

    #[test]
    fn max_only_means_full() {
        let w = matched("Thompson [30]");
        assert_eq!((w.ammo, w.capacity), (30, 30));
    }

    #[test]
    fn no_bracket_uses_catalog_capacity() {
        let w = matched("Thompson");
        assert_eq!((w.ammo, w.capacity), (20, 20));
    }

    #[test]
    fn ammo_is_clamped_to_capacity() {
        let w = matched(".38 Revolver [9/6]");
        assert_eq!((w.ammo, w.capacity), (6, 6));
    }

    #[test]
    fn jammed_with_icon() {
        let w = matched("⚠️ Thompson [3/20] (JAMMED)");
        assert_eq!(w.name, "Thompson");
        assert!(w.jammed);
        assert_eq!(w.ammo, 3);

        let w = matched("thompson [3/20] (jammed)");
        assert!(w.jammed);
    }

    #[test]
    fn note_after_jam_marker_is_kept() {
        let w = matched("Thompson [3/20] (JAMMED) needs oil");
        assert_eq!(w.name, "Thompson");
        assert_eq!((w.ammo, w.capacity, w.jammed), (3, 20, true));
        assert_eq!(w.note, "needs oil");
        assert_eq!(w.to_line(), "⚠️ Thompson [3/20] (JAMMED) needs oil");

        let w = matched("Thompson [5/20] borrowed from Hal");
        assert_eq!((w.ammo, w.jammed), (5, false));
        assert_eq!(w.to_line(), "Thompson [5/20] borrowed from Hal");
    }

    #[test]
    fn jam_marker_without_bracket() {
        let w = matched("Thompson (JAMMED) needs oil");
        assert_eq!(w.name, "Thompson");
        assert!(w.jammed);
        assert_eq!(w.ammo, 20);
        assert_eq!(w.note, "needs oil");
    }

    #[test]
    fn article_is_stripped_for_lookup_only() {
        let w = matched("a .38 revolver [2/6]");
        assert_eq!(w.entry.name, ".38 Revolver");
        assert_eq!(w.name, "a .38 revolver");
        assert_eq!(w.to_line(), "a .38 revolver [2/6]");

        let w = matched("An Elephant Gun (2B) [1/2]");
        assert_eq!(w.entry.name, "Elephant Gun (2B)");
    }

    #[test]
    fn unknown_lines_are_unmatched() {
        assert_eq!(
            parse_line("Lucky rabbit's foot", slot(0), &catalog()),
            ParsedWeaponLine::Unmatched("Lucky rabbit's foot".to_string())
        );
        assert!(matches!(
            parse_line("[6/6]", slot(0), &catalog()),
            ParsedWeaponLine::Unmatched(_)
        ));
        assert!(matches!(
            parse_line("", slot(0), &catalog()),
            ParsedWeaponLine::Unmatched(_)
        ));
    }

    #[test]
    fn canonical_lines_round_trip() {
        for line in [
            ".38 Revolver [6/6]",
            "Thompson [0/20]",
            "⚠️ Thompson [12/20] (JAMMED)",
            "⚠️ Thompson [12/20] (JAMMED) needs oil",
        ] {
            assert_eq!(matched(line).to_line(), line);
        }
    }

    #[test]
    fn formatting() {
        assert_eq!(format_line("Thompson", 5, 20, false), "Thompson [5/20]");
        assert_eq!(
            format_line("Thompson", 5, 20, true),
            "⚠️ Thompson [5/20] (JAMMED)"
        );
    }

    #[test]
    fn inventory_keeps_slots_and_skips_junk() {
        let sheet = CharacterSheet::new("Test")
            .with_item("Gear", "Flashlight")
            .with_item("Weapons", "Pocket knife")
            .with_item("Weapons", ".38 Revolver [5/6]")
            .with_item("Weapons", "Thompson");
        let weapons = parse_inventory(&sheet, &catalog());
        assert_eq!(weapons.len(), 2);
        assert_eq!(weapons[0].slot, slot(1));
        assert_eq!(weapons[1].slot, slot(2));
        assert_eq!(weapons[1].ammo, 20);
    }

    #[test]
    fn scan_reports_every_line() {
        let sheet = CharacterSheet::new("Test")
            .with_item("Gear", "Flashlight")
            .with_item("Weapons", ".38 Revolver [5/6]");
        let lines: Vec<_> = scan_inventory(&sheet, &catalog()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0.category, "Gear");
        assert!(matches!(
            lines[0].1.clone().into_weapon(),
            Err(RulesError::UnresolvedWeapon(raw)) if raw == "Flashlight"
        ));
        assert!(lines[1].1.clone().into_weapon().is_ok());
    }
}
