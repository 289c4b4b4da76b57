//! texprint: render LaTeX templates, compile them to PDF and print them.
//!
//! # Usage
//!
//! ```text
//! texprint pdf <template> [--templates DIR] [--context FILE] [--set k=v]… [--output FILE]
//! texprint print <template> [--templates DIR] [--context FILE] [--set k=v]… [--extra-options STR]
//! texprint compile <file.tex> [--job-name NAME] [--output FILE]
//! texprint config show|path|init
//! ```
//!
//! Global flags: `--config FILE` replaces `~/.texprint/config.yaml`,
//! `--verbose` raises logging to `debug` (`RUST_LOG` wins when set).

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{compile::CompileArgs, config::ConfigCommand, pdf::PdfArgs, print::PrintArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "texprint",
    version,
    about = "Render LaTeX templates to PDF and send them to a printer",
    long_about = None,
)]
struct Cli {
    /// Config file to use instead of ~/.texprint/config.yaml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log every compiler and printer invocation.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a template and write the compiled PDF.
    Pdf(PdfArgs),

    /// Render a template, compile it and send the PDF to the printer.
    Print(PrintArgs),

    /// Compile an existing LaTeX file.
    Compile(CompileArgs),

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let may_create = matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommand::Init { .. }
        }
    );
    let config = commands::config_provider(cli.config, may_create)?;
    match cli.command {
        Commands::Pdf(args) => args.run(&config),
        Commands::Print(args) => args.run(&config),
        Commands::Compile(args) => args.run(&config),
        Commands::Config { command } => commands::config::run(command, &config),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
