use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use keeper_rules::RulesConfig;
use keeper_rules::weapons::{ParsedWeaponLine, WeaponInstance, scan_inventory};

pub fn run(sheet: &Path, catalog: &Path, config: &RulesConfig) -> Result<(), String> {
    let sheet = super::load_sheet(sheet)?;
    let catalog = super::load_catalog(catalog, config)?;

    let mut weapons: Vec<WeaponInstance> = Vec::new();
    let mut unmatched = 0;
    for (_, parsed) in scan_inventory(&sheet, &catalog) {
        match parsed {
            ParsedWeaponLine::Matched(weapon) => weapons.push(*weapon),
            ParsedWeaponLine::Unmatched(_) => unmatched += 1,
        }
    }

    if weapons.is_empty() {
        println!("  No weapons found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#", "Carried as", "Weapon", "Ammo", "State", "Damage", "Skill", "Malf.",
    ]);
    for (i, weapon) in weapons.iter().enumerate() {
        let malfunction = if weapon.entry.malfunction >= 100 {
            "—".to_string()
        } else {
            weapon.entry.malfunction.to_string()
        };
        table.add_row(vec![
            i.to_string(),
            weapon.name.clone(),
            weapon.entry.name.clone(),
            format!("{}/{}", weapon.ammo, weapon.capacity),
            weapon.state().to_string(),
            weapon.entry.damage_expression().to_string(),
            weapon.entry.skill.clone(),
            malfunction,
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} weapons, {unmatched} other item{}",
        weapons.len(),
        if unmatched == 1 { "" } else { "s" }
    );
    Ok(())
}
