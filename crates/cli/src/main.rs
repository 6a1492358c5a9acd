mod render;

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use mechroster_core::{
    config::{self, AppConfig},
    RosterManager, SaveManager, Slot,
};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

const LOG_FILE: &str = "mechroster.log";
const LATEST_SAVE: &str = "latest";

#[derive(Parser)]
#[command(name = "mechroster", about = "Mech roster builder")]
struct Cli {
    /// Catalog data directory, overriding the configuration.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available mech templates.
    Mechs,
    /// List save files, newest first.
    Saves,
    /// Load a save and print every mech with its loadout.
    Show {
        /// Save file path, name in the save directory, or `latest`.
        save: String,
    },
    /// Describe a mech, weapon, wargear item, keyword or ability.
    Describe { name: String },
    /// Keyword glossary for a save, or the whole glossary.
    Keywords { save: Option<String> },
    /// Abilities of the mechs in a save.
    Abilities { save: String },
    /// Rewrite a save in canonical form.
    Normalize {
        save: String,
        /// Write to this path instead of overwriting the save.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Add a configured mech to a save, or to a new save.
    Add {
        mech: String,
        /// Weapon as `slot=name`, e.g. `left_arm=Rifle`. Repeatable.
        #[arg(long = "weapon", value_parser = parse_weapon)]
        weapons: Vec<(Slot, String)>,
        #[arg(long)]
        wargear: Option<String>,
        /// Existing save to extend; a new save is created otherwise.
        #[arg(long)]
        into: Option<String>,
        /// Name of the new save.
        #[arg(long, conflicts_with = "into")]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    config::ensure_default_config()?;
    let mut config = AppConfig::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_logging(&config.log_dir)?;
    debug!(data_dir = %config.data_dir.display(), save_dir = %config.save_dir.display(), "Configuration loaded");

    let saves = config.save_manager();
    let mut roster = RosterManager::new(config.catalog_loader().load());

    match cli.command {
        Commands::Mechs => {
            for (key, template) in roster.catalog().templates() {
                println!("{}", render::template_row(key, template));
            }
        }
        Commands::Saves => {
            for entry in saves.entries()? {
                println!("{}", render::save_row(&entry));
            }
        }
        Commands::Show { save } => {
            load_save(&mut roster, &saves, &save)?;
            println!("{}", render::roster(&roster));
        }
        Commands::Describe { name } => {
            let entry = roster
                .resolve_catalog_entry(&name)
                .ok_or_else(|| anyhow!("nothing in the catalog is named '{name}'"))?;
            println!("{}", render::entry(&entry));
        }
        Commands::Keywords { save } => {
            if let Some(save) = save {
                load_save(&mut roster, &saves, &save)?;
            }
            println!("{}", render::glossary(&roster.squad_keywords()));
        }
        Commands::Abilities { save } => {
            load_save(&mut roster, &saves, &save)?;
            println!("{}", render::glossary(&roster.squad_abilities()));
            for mech in roster.roster() {
                println!("\n{} {}", mech.id(), mech.name());
                println!("{}", render::glossary(&roster.mech_abilities(mech.id())?));
            }
        }
        Commands::Normalize { save, output } => {
            let path = load_save(&mut roster, &saves, &save)?;
            let target = output.unwrap_or(path);
            saves.write_lines(&target, &roster.serialize_roster())?;
            println!("Wrote {} mechs to {}", roster.len(), target.display());
        }
        Commands::Add {
            mech,
            weapons,
            wargear,
            into,
            name,
        } => {
            let target = into
                .map(|save| load_save(&mut roster, &saves, &save))
                .transpose()?;

            let id = roster.add_mech(&mech)?;
            for (slot, weapon) in &weapons {
                roster
                    .equip_weapon(id, *slot, weapon)
                    .with_context(|| format!("failed to equip {weapon} on {slot}"))?;
            }
            if let Some(wargear) = wargear {
                roster.equip_wargear(id, &wargear)?;
            }

            let lines = roster.serialize_roster();
            let path = match target {
                Some(path) => {
                    saves.write_lines(&path, &lines)?;
                    path
                }
                None => saves.create_save(name.as_deref(), &lines)?.path,
            };
            if let Some(mech) = roster.mech(id) {
                println!("{}", render::mech(mech));
            }
            println!("Saved to {}", path.display());
        }
    }

    Ok(())
}

/// Load a save into the roster, print its warnings and return its path.
fn load_save(roster: &mut RosterManager, saves: &SaveManager, save: &str) -> Result<PathBuf> {
    let path = resolve_save(saves, save)?;
    let text = saves.read_to_string(&path)?;
    let report = roster
        .load_roster(&text)
        .with_context(|| format!("failed to load {}", path.display()))?;
    if !report.warnings.is_empty() {
        eprintln!("{}", render::warnings(&report.warnings));
    }
    info!(path = %path.display(), mechs = report.loaded, "Roster loaded");
    Ok(path)
}

fn resolve_save(saves: &SaveManager, save: &str) -> Result<PathBuf> {
    if save == LATEST_SAVE {
        return saves
            .latest()?
            .map(|entry| entry.path)
            .ok_or_else(|| anyhow!("no saves in {}", saves.root().display()));
    }

    let direct = PathBuf::from(save);
    let candidates = [
        direct.clone(),
        saves.root().join(save),
        saves.root().join(format!("{save}.txt")),
    ];
    match candidates.into_iter().find(|path| path.is_file()) {
        Some(path) => Ok(path),
        None => bail!("save '{}' not found", direct.display()),
    }
}

fn parse_weapon(value: &str) -> Result<(Slot, String)> {
    let (slot, weapon) = value
        .split_once('=')
        .ok_or_else(|| anyhow!("expected slot=weapon, got '{value}'"))?;
    Ok((slot.parse()?, weapon.trim().to_string()))
}

fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let log_path = log_dir.join(LOG_FILE);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
