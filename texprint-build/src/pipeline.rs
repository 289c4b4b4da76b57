//! Public entry points: render → compile → {read | print}.
//!
//! Each call takes one configuration snapshot up front, so the compile and the
//! print step of a single call agree even if the environment changes midway.

use texprint_core::ConfigProvider;
use texprint_renderer::{TemplateContext, TemplateRenderer};

use crate::artifact::read_artifact;
use crate::compile::{CompileRequest, Compiler};
use crate::error::{BuildError, PipelineError};
use crate::print::Printer;

/// Compile raw LaTeX `source` and return the PDF bytes.
pub fn run_tex<P: ConfigProvider>(source: &str, config: P) -> Result<Vec<u8>, BuildError> {
    let snapshot = config.snapshot()?;
    Compiler::new(&snapshot).process(&CompileRequest::new(source), read_artifact)
}

/// Render `template_name` with `context`, compile it and return the PDF bytes.
pub fn compile_template_to_pdf<R, P>(
    renderer: &R,
    template_name: &str,
    context: &TemplateContext,
    config: P,
) -> Result<Vec<u8>, PipelineError>
where
    R: TemplateRenderer + ?Sized,
    P: ConfigProvider,
{
    let source = render(renderer, template_name, context)?;
    Ok(run_tex(&source, config)?)
}

/// Render `template_name` with `context`, compile it and send the PDF to the
/// configured printer. `extra_options` is appended to the print command.
pub fn compile_template_and_print<R, P>(
    renderer: &R,
    template_name: &str,
    context: &TemplateContext,
    config: P,
    extra_options: &str,
) -> Result<(), PipelineError>
where
    R: TemplateRenderer + ?Sized,
    P: ConfigProvider,
{
    let source = render(renderer, template_name, context)?;
    let snapshot = config.snapshot().map_err(BuildError::from)?;
    let printer = Printer::new(extra_options);
    Compiler::new(&snapshot).process(&CompileRequest::new(source), |artifact| {
        printer.print(artifact, &snapshot)
    })?;
    Ok(())
}

fn render<R>(
    renderer: &R,
    template_name: &str,
    context: &TemplateContext,
) -> Result<String, PipelineError>
where
    R: TemplateRenderer + ?Sized,
{
    let source = renderer.render(template_name, context)?;
    tracing::debug!(template = template_name, bytes = source.len(), "template rendered");
    Ok(source)
}
