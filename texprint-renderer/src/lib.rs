//! # texprint-renderer
//!
//! Tera-based engine that renders LaTeX sources from `.tex` templates.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use texprint_renderer::{TemplateContext, TemplateEngine, TemplateRenderer};
//!
//! fn render_invoice() -> Result<String, texprint_renderer::RenderError> {
//!     let engine = TemplateEngine::new(Some(Path::new("templates")))?;
//!     let mut ctx = TemplateContext::new();
//!     ctx.insert("customer", &"ACME & Sons")?;
//!     engine.render("invoice.tex", &ctx)
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod filters;

pub use context::TemplateContext;
pub use engine::{TemplateEngine, TemplateRenderer};
pub use error::RenderError;
