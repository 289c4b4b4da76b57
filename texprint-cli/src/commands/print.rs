//! `texprint print <template> [--extra-options STR]`

use anyhow::Result;
use clap::Args;

use texprint_build::compile_template_and_print;
use texprint_core::LayeredConfig;

use super::{explain, TemplateArgs};

/// Render a template, compile it and send the PDF to the printer.
#[derive(Args, Debug)]
pub struct PrintArgs {
    #[command(flatten)]
    pub template: TemplateArgs,

    /// Extra print command options, appended after the configured ones
    /// (e.g. "-o sides=two-sided-long-edge").
    #[arg(long, value_name = "OPTIONS", default_value = "", allow_hyphen_values = true)]
    pub extra_options: String,
}

impl PrintArgs {
    pub fn run(self, config: &LayeredConfig) -> Result<()> {
        let engine = self.template.engine()?;
        let ctx = self.template.context()?;
        compile_template_and_print(
            &engine,
            &self.template.template,
            &ctx,
            config,
            &self.extra_options,
        )
        .map_err(explain)?;
        println!("✓ Sent '{}' to the printer", self.template.template);
        Ok(())
    }
}
