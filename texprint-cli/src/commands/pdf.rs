//! `texprint pdf <template> [--output FILE]`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use texprint_build::compile_template_to_pdf;
use texprint_core::LayeredConfig;

use super::{explain, write_pdf, TemplateArgs};

/// Render a template and write the compiled PDF.
#[derive(Args, Debug)]
pub struct PdfArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Write the PDF here instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl PdfArgs {
    pub fn run(self, config: &LayeredConfig) -> Result<()> {
        let engine = self.template.engine()?;
        let ctx = self.template.context()?;
        let pdf = compile_template_to_pdf(&engine, &self.template.template, &ctx, config)
            .map_err(explain)?;
        write_pdf(self.output.as_deref(), &pdf)
    }
}
