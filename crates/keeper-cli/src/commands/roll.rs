use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use keeper_rules::matching::resolver::SkillSource;
use keeper_rules::resolution::{DecisionWindow, Offers};
use keeper_rules::resolution::offer::Policy;
use keeper_rules::{
    CheckRequest, Decider, Decision, DiceSource, Escalation, RollMode, RulesConfig, SkillCheck,
    perform_check,
};

use super::paint;

pub struct RollArgs<'a> {
    pub skill: &'a str,
    pub sheet: &'a Path,
    pub mode: &'a str,
    pub luck: bool,
    pub push: bool,
    pub ask: bool,
    pub dice: Box<dyn DiceSource>,
    pub config: &'a RulesConfig,
    pub save: bool,
}

/// Asks the player on stdin. EOF counts as letting the window run out.
struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Decider for Prompt<R> {
    fn decide(
        &mut self,
        check: &SkillCheck,
        offers: &Offers,
        window: &DecisionWindow,
    ) -> Decision<Escalation> {
        println!("  {check}");
        if let Some(luck) = &offers.luck {
            println!("    [l] {luck}");
        }
        if offers.push {
            println!("    [p] push the roll");
        }
        print!("    anything else declines ({}s) > ", window.remaining().as_secs());
        if io::stdout().flush().is_err() {
            return Decision::TimedOut;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => Decision::TimedOut,
            Ok(_) => match line.trim().to_lowercase().as_str() {
                "l" | "luck" => Decision::Chosen(Escalation::SpendLuck),
                "p" | "push" => Decision::Chosen(Escalation::Push),
                _ => Decision::Declined,
            },
        }
    }
}

pub fn run(args: RollArgs<'_>) -> Result<(), String> {
    let RollArgs {
        skill,
        sheet: sheet_path,
        mode,
        luck,
        push,
        ask,
        mut dice,
        config,
        save,
    } = args;

    let mode = RollMode::parse(mode).ok_or_else(|| format!("unknown roll mode '{mode}'"))?;
    let mut sheet = super::load_sheet(sheet_path)?;
    let request = CheckRequest::new(skill).with_mode(mode);

    let stdin = io::stdin();
    let mut prompt = Prompt {
        input: stdin.lock(),
    };
    let mut policy = Policy {
        spend_luck: luck,
        push,
    };
    let decider: &mut dyn Decider = if ask { &mut prompt } else { &mut policy };

    let result = perform_check(&mut sheet, &request, config, dice.as_mut(), decider)
        .map_err(|e| e.to_string())?;

    let check = &result.check;
    match &result.source {
        SkillSource::Exact => {}
        SkillSource::Alias(alias) => println!("  (rolling {} for '{alias}')", check.skill),
        SkillSource::Fuzzy { score } => {
            println!("  (rolling {} for '{skill}', match {score}%)", check.skill)
        }
        SkillSource::Default => println!("  (no '{skill}' on sheet, base chance)"),
    }
    println!("  Roll: {}", result.original);
    for step in &result.steps {
        println!("  {step}");
    }
    println!(
        "  {} ({}): {} -> {}",
        check.skill.bold(),
        check.rating,
        check.value,
        paint(check.tier)
    );
    if check.luck_spent > 0 {
        println!("  Luck spent: {}, {}", check.luck_spent, sheet.luck);
    }
    if check.pushed {
        println!("  Pushed");
    }
    if check.dire_consequences {
        println!("  {}", "Dire consequences!".red().bold());
    }

    if save {
        super::save_sheet(sheet_path, &sheet)?;
    }
    Ok(())
}
