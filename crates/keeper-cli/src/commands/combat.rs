use std::io::{self, BufRead};
use std::path::Path;

use colored::Colorize;

use keeper_rules::{CombatAction, CombatSession, DiceSource, RulesConfig};

use super::paint;

const HELP: &str = "  brawl | dodge | maneuver | shoot [bonus|penalty] | reload | fix | select <n> | weapons | exit";

pub fn run(
    sheet_path: &Path,
    catalog: &Path,
    config: &RulesConfig,
    mut dice: Box<dyn DiceSource>,
    save: bool,
) -> Result<(), String> {
    let mut sheet = super::load_sheet(sheet_path)?;
    let catalog = super::load_catalog(catalog, config)?;

    {
        let mut session = CombatSession::new(&mut sheet, &catalog, config, dice.as_mut());
        println!("  {} {}", "Combat:".bold(), session.sheet().name);
        print_weapons(&session);

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line.map_err(|e| e.to_string())?;
            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            match input.to_lowercase().as_str() {
                "help" | "?" => {
                    println!("{HELP}");
                    continue;
                }
                "weapons" => {
                    print_weapons(&session);
                    continue;
                }
                _ => {}
            }

            let Some(action) = CombatAction::parse(input) else {
                println!("  {}", format!("unknown action '{input}'").yellow());
                continue;
            };
            match session.act(action) {
                Ok(event) => match event.tier {
                    Some(tier) => println!("  [{}] {} ({})", event.turn, event.description, paint(tier)),
                    None => println!("  [{}] {}", event.turn, event.description),
                },
                Err(e) => println!("  {}", e.to_string().yellow()),
            }
            if session.is_closed() {
                break;
            }
        }

        if !session.is_closed() && !session.is_expired() {
            session.act(CombatAction::Exit).map_err(|e| e.to_string())?;
        }
        println!("  {} actions", session.log().len());
    }

    if save {
        super::save_sheet(sheet_path, &sheet)?;
    }
    Ok(())
}

fn print_weapons(session: &CombatSession<'_>) {
    if session.weapons().is_empty() {
        println!("  (no weapons)");
        return;
    }
    for (i, weapon) in session.weapons().iter().enumerate() {
        let marker = if session.active_index() == Some(i) { "*" } else { " " };
        println!("  {marker}{i}: {weapon} ({})", weapon.state());
    }
}
