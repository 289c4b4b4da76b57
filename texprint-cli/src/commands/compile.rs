//! `texprint compile <file.tex> [--job-name NAME] [--output FILE]`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use texprint_build::{read_artifact, CompileRequest, Compiler, DEFAULT_BASE_FILENAME};
use texprint_core::LayeredConfig;

use super::{report, write_pdf};

/// Compile an existing LaTeX file.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// LaTeX source file; `-` reads stdin.
    pub file: PathBuf,

    /// Base name for the files in the scratch workspace.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_BASE_FILENAME)]
    pub job_name: String,

    /// Write the PDF here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl CompileArgs {
    pub fn run(self, config: &LayeredConfig) -> Result<()> {
        let source = read_source(&self.file)?;
        let request = CompileRequest::new(source).with_base_filename(self.job_name)?;
        let pdf = Compiler::new(config)
            .process(&request, read_artifact)
            .map_err(|e| {
                report(&e);
                anyhow::Error::new(e)
            })
            .with_context(|| format!("failed to compile '{}'", self.file.display()))?;
        write_pdf(self.output.as_deref(), &pdf)
    }
}

fn read_source(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut source = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut source)
            .context("failed to read LaTeX source from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file.display()))
}
