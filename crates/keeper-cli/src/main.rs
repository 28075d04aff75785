//! Command-line driver for the Keeper rules core.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "keeper",
    about = "Keeper: percentile rules for investigative horror",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log rule decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Rules configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll a skill or characteristic for a character
    Roll {
        /// Skill or characteristic to roll (fuzzy matched)
        skill: String,

        /// Character sheet (JSON)
        #[arg(short, long)]
        sheet: PathBuf,

        /// Roll mode: normal, bonus, penalty
        #[arg(short, long, default_value = "normal")]
        mode: String,

        /// Spend luck whenever it is offered
        #[arg(long)]
        luck: bool,

        /// Push the roll if it fails
        #[arg(long)]
        push: bool,

        /// Ask on stdin instead of using --luck/--push
        #[arg(long, conflicts_with_all = ["luck", "push"])]
        ask: bool,

        /// RNG seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Scripted roll values, comma separated, used instead of random dice
        #[arg(long, value_delimiter = ',')]
        rolls: Vec<u32>,

        /// Write the updated sheet back to its file
        #[arg(long)]
        save: bool,
    },

    /// List the weapons a character carries
    Weapons {
        /// Character sheet (JSON)
        #[arg(short, long)]
        sheet: PathBuf,

        /// Weapon catalog (JSON)
        #[arg(short = 'w', long)]
        catalog: PathBuf,
    },

    /// Run a combat session, reading actions from stdin
    Combat {
        /// Character sheet (JSON)
        #[arg(short, long)]
        sheet: PathBuf,

        /// Weapon catalog (JSON)
        #[arg(short = 'w', long)]
        catalog: PathBuf,

        /// RNG seed (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Scripted roll values, comma separated, used instead of random dice
        #[arg(long, value_delimiter = ',')]
        rolls: Vec<u32>,

        /// Write the updated sheet back to its file
        #[arg(long)]
        save: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "keeper_rules=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = commands::load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Roll {
            skill,
            sheet,
            mode,
            luck,
            push,
            ask,
            seed,
            rolls,
            save,
        } => commands::roll::run(commands::roll::RollArgs {
            skill: &skill,
            sheet: &sheet,
            mode: &mode,
            luck,
            push,
            ask,
            dice: commands::dice(&config, seed, &rolls),
            config: &config,
            save,
        }),
        Commands::Weapons { sheet, catalog } => commands::weapons::run(&sheet, &catalog, &config),
        Commands::Combat {
            sheet,
            catalog,
            seed,
            rolls,
            save,
        } => commands::combat::run(
            &sheet,
            &catalog,
            &config,
            commands::dice(&config, seed, &rolls),
            save,
        ),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
