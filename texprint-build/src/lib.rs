//! # texprint-build
//!
//! LaTeX compile orchestration and the two finishing steps.
//!
//! [`Compiler::process`] writes the source into a scratch workspace, runs the
//! configured engine, checks the outcome and hands the live workspace to a
//! finishing closure; the workspace is removed once the closure returns.
//! [`read_artifact`] and [`Printer::print`] are the stock finishing steps, and
//! [`pipeline`] wires template rendering in front of both.

pub mod artifact;
mod command;
pub mod compile;
pub mod diagnostics;
pub mod error;
pub mod pipeline;
pub mod print;

pub use artifact::read_artifact;
pub use compile::{Artifact, CompileRequest, Compiler, CompilerInvocation, DEFAULT_BASE_FILENAME};
pub use diagnostics::CompileDiagnostic;
pub use error::{BuildError, PipelineError};
pub use pipeline::{compile_template_and_print, compile_template_to_pdf, run_tex};
pub use print::{DeviceSelection, PrintJob, Printer};
