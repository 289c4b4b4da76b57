//! Subcommands and the pieces they share.

pub mod compile;
pub mod config;
pub mod pdf;
pub mod print;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use texprint_build::{BuildError, PipelineError};
use texprint_core::{ConfigError, LayeredConfig};
use texprint_renderer::{TemplateContext, TemplateEngine};

/// Config provider for this invocation: `--config FILE`, else
/// `~/.texprint/config.yaml`, else environment only.
///
/// An explicit file must exist unless `may_create` is set.
pub fn config_provider(explicit: Option<PathBuf>, may_create: bool) -> Result<LayeredConfig> {
    match explicit {
        Some(path) => {
            if !may_create && !path.is_file() {
                bail!("config file '{}' does not exist", path.display());
            }
            Ok(LayeredConfig::with_file(path))
        }
        None => match LayeredConfig::new() {
            Ok(config) => Ok(config),
            Err(ConfigError::HomeNotFound) => {
                tracing::debug!("no home directory; using environment configuration only");
                Ok(LayeredConfig::env_only())
            }
            Err(e) => Err(e.into()),
        },
    }
}

// ---------------------------------------------------------------------------
// Template arguments
// ---------------------------------------------------------------------------

/// Template selection and context, shared by `pdf` and `print`.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template name relative to the templates directory (e.g. `invoice.tex`).
    pub template: String,

    /// Directory searched recursively for `*.tex` templates.
    #[arg(long, short = 't', value_name = "DIR", default_value = "templates")]
    pub templates: PathBuf,

    /// YAML or JSON file with the template context (a mapping).
    #[arg(long, short = 'c', value_name = "FILE")]
    pub context: Option<PathBuf>,

    /// Set a string context value; overrides the context file.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub set: Vec<(String, String)>,
}

impl TemplateArgs {
    pub fn engine(&self) -> Result<TemplateEngine> {
        let engine = TemplateEngine::new(Some(self.templates.as_path())).with_context(|| {
            format!("failed to load templates from '{}'", self.templates.display())
        })?;
        if !engine.has_template(&self.template) {
            bail!(
                "template '{}' not found in '{}' (available: {})",
                self.template,
                self.templates.display(),
                available(&engine)
            );
        }
        Ok(engine)
    }

    pub fn context(&self) -> Result<TemplateContext> {
        let mut ctx = match &self.context {
            Some(path) => TemplateContext::from_file(path)
                .with_context(|| format!("failed to load context '{}'", path.display()))?,
            None => TemplateContext::new(),
        };
        for (key, value) in &self.set {
            ctx.insert(key.as_str(), value)
                .with_context(|| format!("invalid --set value for '{key}'"))?;
        }
        Ok(ctx)
    }
}

fn available(engine: &TemplateEngine) -> String {
    let names = engine.template_names();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

// ---------------------------------------------------------------------------
// Output and error reporting
// ---------------------------------------------------------------------------

/// Write PDF bytes to `output`, or to stdout when `None`.
pub fn write_pdf(output: Option<&Path>, pdf: &[u8]) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, pdf)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            eprintln!("✓ Wrote {} bytes to {}", pdf.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(pdf).context("failed to write PDF to stdout")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Print the first LaTeX error, if any, and convert for `anyhow`.
pub fn explain(err: PipelineError) -> anyhow::Error {
    if let PipelineError::Build(build) = &err {
        report(build);
    }
    err.into()
}

pub fn report(err: &BuildError) {
    if let BuildError::Compile { log, .. } = err {
        tracing::debug!(log = %log, "compiler log");
    }
    let Some(diagnostic) = err.diagnostic() else {
        return;
    };
    eprintln!("{} {}", "LaTeX error:".red().bold(), diagnostic.message);
    match (diagnostic.line, diagnostic.source_line) {
        (Some(line), Some(source)) => eprintln!("  {} {}", format!("l.{line}").dimmed(), source),
        (Some(line), None) => eprintln!("  {}", format!("l.{line}").dimmed()),
        _ => {}
    }
}
