//! Compile orchestration.
//!
//! ## `Compiler::process`: one compile attempt
//!
//! 1. Create a scratch workspace (`texprint-*` temp directory).
//! 2. Write the source to `<base>.tex` (exclusive create).
//! 3. Snapshot the configuration.
//! 4. Run the engine `run_count` times inside the workspace, stopping at the
//!    first run that exits nonzero.
//! 5. Exit status 1 → [`BuildError::Compile`] with the engine log.
//! 6. No regular `<base>.pdf` → [`BuildError::ArtifactMissing`].
//! 7. Hand an [`Artifact`] to the finishing closure.
//! 8. Drop the workspace, whatever happened above.
//!
//! Statuses other than 0 and 1 are not failures on their own; only the
//! artifact check decides.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

use tempfile::TempDir;
use texprint_core::{ConfigProvider, TexConfig};

use crate::command::{self, decode};
use crate::error::{io_err, BuildError};

pub const DEFAULT_BASE_FILENAME: &str = "texput";

/// Name of the log the engine writes for the default job name.
const FALLBACK_LOG: &str = "texput.log";

const WORKSPACE_PREFIX: &str = "texprint-";

// ---------------------------------------------------------------------------
// CompileRequest
// ---------------------------------------------------------------------------

/// LaTeX source plus the base name used for every file in the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    source: String,
    base_filename: String,
}

impl CompileRequest {
    /// A request using the default `texput` base name.
    pub fn new(source: impl Into<String>) -> Self {
        CompileRequest {
            source: source.into(),
            base_filename: DEFAULT_BASE_FILENAME.to_string(),
        }
    }

    /// Use `base_filename` instead of `texput`.
    ///
    /// The name must be a plain file stem: no path separators, not `.`/`..`,
    /// and not starting with `-` (the engine would read it as an option).
    pub fn with_base_filename(mut self, base_filename: impl Into<String>) -> Result<Self, BuildError> {
        let name = base_filename.into();
        validate_base_filename(&name)?;
        self.base_filename = name;
        Ok(self)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn base_filename(&self) -> &str {
        &self.base_filename
    }

    pub fn tex_file_name(&self) -> String {
        format!("{}.tex", self.base_filename)
    }

    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.base_filename)
    }

    pub fn log_file_name(&self) -> String {
        format!("{}.log", self.base_filename)
    }
}

fn validate_base_filename(name: &str) -> Result<(), BuildError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not be a relative directory")
    } else if name.contains(&['/', '\\', '\0'][..]) {
        Some("must not contain path separators or NUL")
    } else if name.starts_with('-') {
        Some("must not start with '-'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(BuildError::InvalidBaseName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CompilerInvocation
// ---------------------------------------------------------------------------

/// Engine command line derived from one configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerInvocation {
    pub program: String,
    /// Arguments placed before `-interaction=batchmode`, taken from the
    /// interpreter setting itself (`latexmk -pdflua`).
    pub leading_args: Vec<String>,
    pub options: Vec<String>,
    pub run_count: u32,
}

impl CompilerInvocation {
    pub fn from_config(config: &TexConfig) -> Result<Self, BuildError> {
        let (program, leading_args) = command::split_program("interpreter", &config.interpreter)?;
        let options = command::split_words("interpreter_options", &config.interpreter_options)?;
        Ok(CompilerInvocation {
            program,
            leading_args,
            options,
            run_count: config.run_count.max(1),
        })
    }

    /// Arguments for a single run over `tex_file_name`.
    pub fn args(&self, tex_file_name: &str) -> Vec<String> {
        let mut args = self.leading_args.clone();
        args.push("-interaction=batchmode".to_string());
        args.extend(self.options.iter().cloned());
        args.push(tex_file_name.to_string());
        args
    }

    /// Single run rendered as a shell command, for logs.
    pub fn display(&self, tex_file_name: &str) -> String {
        command::render(std::iter::once(self.program.clone()).chain(self.args(tex_file_name)))
    }
}

/// Combined result of all runs of one attempt.
struct RunOutput {
    status: ExitStatus,
    runs: u32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn run_engine(
    invocation: &CompilerInvocation,
    workspace: &Path,
    tex_file_name: &str,
) -> Result<RunOutput, BuildError> {
    let args = invocation.args(tex_file_name);
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut runs = 0;
    loop {
        runs += 1;
        let started = Instant::now();
        tracing::debug!(
            run = runs,
            of = invocation.run_count,
            command = %invocation.display(tex_file_name),
            "running LaTeX engine"
        );
        let output = Command::new(&invocation.program)
            .args(&args)
            .current_dir(workspace)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BuildError::Spawn {
                program: invocation.program.clone(),
                source: e,
            })?;
        stdout.extend_from_slice(&output.stdout);
        stderr.extend_from_slice(&output.stderr);
        tracing::debug!(
            run = runs,
            status = %output.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LaTeX engine finished"
        );

        // later runs only happen after a clean one, like `a && b`
        if !output.status.success() || runs >= invocation.run_count {
            return Ok(RunOutput {
                status: output.status,
                runs,
                stdout,
                stderr,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Artifact
// ---------------------------------------------------------------------------

/// The produced PDF inside a live workspace.
///
/// Only handed out by reference to the finishing closure of
/// [`Compiler::process`]; the workspace is deleted after the closure returns.
#[derive(Debug)]
pub struct Artifact<'ws> {
    workspace: &'ws Path,
    file_name: String,
}

impl Artifact<'_> {
    pub fn workspace(&self) -> &Path {
        self.workspace
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> PathBuf {
        self.workspace.join(&self.file_name)
    }
}

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// Runs compile attempts with configuration from `P`.
#[derive(Debug, Clone)]
pub struct Compiler<P> {
    config: P,
    scratch_root: Option<PathBuf>,
}

impl<P: ConfigProvider> Compiler<P> {
    pub fn new(config: P) -> Self {
        Compiler {
            config,
            scratch_root: None,
        }
    }

    /// Create workspaces under `dir` instead of the system temp directory.
    pub fn with_scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(dir.into());
        self
    }

    /// Compile `request` and run `finish` on the resulting artifact.
    ///
    /// The workspace exists for exactly the duration of this call, including
    /// when `finish` returns an error or panics.
    pub fn process<R, F>(&self, request: &CompileRequest, finish: F) -> Result<R, BuildError>
    where
        F: FnOnce(&Artifact<'_>) -> Result<R, BuildError>,
    {
        let workspace = self.create_workspace()?;
        let dir = workspace.path();

        let tex_file_name = request.tex_file_name();
        write_source(&dir.join(&tex_file_name), request.source())?;

        let config = self.config.snapshot()?;
        let invocation = CompilerInvocation::from_config(&config)?;
        let output = run_engine(&invocation, dir, &tex_file_name)?;

        if output.status.code() == Some(1) {
            return Err(compile_failure(dir, request, &output));
        }

        let pdf_file_name = request.pdf_file_name();
        let pdf_path = dir.join(&pdf_file_name);
        if !is_regular_file(&pdf_path) {
            tracing::debug!(status = %output.status, "engine left no PDF behind");
            return Err(artifact_missing(&pdf_path, &output.stderr));
        }

        tracing::info!(
            runs = output.runs,
            stdout_bytes = output.stdout.len(),
            artifact = %pdf_file_name,
            "LaTeX compilation succeeded"
        );
        let artifact = Artifact {
            workspace: dir,
            file_name: pdf_file_name,
        };
        finish(&artifact)
        // `workspace` drops here and removes the directory
    }

    fn create_workspace(&self) -> Result<TempDir, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        match &self.scratch_root {
            Some(root) => builder.tempdir_in(root).map_err(|e| io_err(root, e)),
            None => builder
                .tempdir()
                .map_err(|e| io_err(std::env::temp_dir(), e)),
        }
    }
}

fn write_source(path: &Path, source: &str) -> Result<(), BuildError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    file.write_all(source.as_bytes()).map_err(|e| io_err(path, e))?;
    file.flush().map_err(|e| io_err(path, e))
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn compile_failure(dir: &Path, request: &CompileRequest, output: &RunOutput) -> BuildError {
    let candidates = [dir.join(request.log_file_name()), dir.join(FALLBACK_LOG)];
    for log_path in &candidates {
        if let Ok(bytes) = std::fs::read(log_path) {
            tracing::debug!(log = %log_path.display(), "engine exited with status 1");
            return BuildError::Compile {
                log: decode(&bytes),
                tex_source: request.source().to_string(),
            };
        }
    }
    artifact_missing(&candidates[0], &output.stderr)
}

fn artifact_missing(expected: &Path, stderr: &[u8]) -> BuildError {
    let message = if stderr.is_empty() {
        format!("file {} not found or is not a file", expected.display())
    } else {
        decode(stderr)
    };
    BuildError::ArtifactMissing { message }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
