//! Tera rendering engine for LaTeX templates.
//!
//! Templates are loaded from a directory tree: every `*.tex` file becomes a
//! template named by its path relative to the root, with `/` separators
//! (`letters/invoice.tex`). Raw templates can be added on top and replace
//! same-named files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::TemplateContext;
use crate::error::{io_err, RenderError};
use crate::filters;

const TEMPLATE_EXTENSION: &str = "tex";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_dir_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Err(io_err(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "template directory not found"),
        ));
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    files.sort();
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some(TEMPLATE_EXTENSION) {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(templates: BTreeMap<String, String>) -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    // LaTeX output: HTML autoescaping would corrupt it
    tera.autoescape_on(vec![]);
    filters::register(&mut tera);
    tera.add_raw_templates(templates)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Turns a template name plus context into LaTeX source.
pub trait TemplateRenderer {
    fn render(&self, template_name: &str, ctx: &TemplateContext) -> Result<String, RenderError>;
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine with the LaTeX filters registered.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Construct a [`TemplateEngine`], loading every `.tex` file under
    /// `template_dir`. `None` starts with no templates.
    pub fn new(template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut templates = BTreeMap::new();
        if let Some(dir) = template_dir {
            templates.extend(load_dir_templates(dir)?);
        }
        Ok(TemplateEngine { tera: build_tera(templates)? })
    }

    /// Construct an engine from in-memory `(name, content)` pairs.
    pub fn from_raw<I, N, C>(templates: I) -> Result<Self, RenderError>
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let templates = templates
            .into_iter()
            .map(|(n, c)| (n.into(), c.into()))
            .collect();
        Ok(TemplateEngine { tera: build_tera(templates)? })
    }

    /// Add or replace one template.
    pub fn add_raw_template(&mut self, name: &str, content: &str) -> Result<(), RenderError> {
        self.tera.add_raw_template(name, content)?;
        Ok(())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Registered template names, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }
}

impl TemplateRenderer for TemplateEngine {
    fn render(&self, template_name: &str, ctx: &TemplateContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        Ok(self.tera.render(template_name, &tera_ctx)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
