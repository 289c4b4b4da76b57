//! `texprint config show|path|init`

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use texprint_core::{settings, ConfigProvider, LayeredConfig, TexConfig};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration (file + LATEX_* environment).
    Show {
        /// Emit JSON instead of YAML.
        #[arg(long)]
        json: bool,
    },

    /// Print the path of the config file in use.
    Path,

    /// Write a config file with the default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(command: ConfigCommand, config: &LayeredConfig) -> Result<()> {
    match command {
        ConfigCommand::Show { json } => show(config, json),
        ConfigCommand::Path => {
            match config.file() {
                Some(path) => println!("{}", path.display()),
                None => println!("(none: environment only)"),
            }
            Ok(())
        }
        ConfigCommand::Init { force } => init(config, force),
    }
}

fn show(config: &LayeredConfig, json: bool) -> Result<()> {
    let snapshot = config
        .snapshot()
        .context("failed to load configuration")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", serde_yaml::to_string(&snapshot)?);
    }
    Ok(())
}

fn init(config: &LayeredConfig, force: bool) -> Result<()> {
    let Some(path) = config.file() else {
        bail!("no home directory found; pass --config FILE to choose where to write");
    };
    if path.exists() && !force {
        bail!(
            "config file '{}' already exists (use --force to overwrite)",
            path.display()
        );
    }
    settings::save_file(path, &TexConfig::default())
        .with_context(|| format!("failed to write '{}'", path.display()))?;
    println!("✓ Wrote default configuration to {}", path.display());
    Ok(())
}
