//! Fake compiler and printer executables for process-level tests.

#![allow(dead_code)]

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use texprint_core::TexConfig;

/// Shell snippet that writes `<stem>.pdf` next to the `.tex` argument.
pub const MAKE_PDF: &str = r#"for a in "$@"; do last="$a"; done
echo "PDF-fake" > "${last%.tex}.pdf""#;

/// Write an executable `/bin/sh` script named `name` into `dir`.
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    make_executable(&path);
    path
}

pub fn make_executable(path: &Path) {
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

/// Quote a path so it survives shell word splitting of the config value.
pub fn quoted(path: &Path) -> String {
    shlex::try_quote(path.to_str().expect("utf-8 path"))
        .expect("quotable")
        .into_owned()
}

/// Config running `interpreter` as the compiler.
pub fn compiler_config(interpreter: &Path) -> TexConfig {
    TexConfig {
        interpreter: quoted(interpreter),
        ..TexConfig::default()
    }
}

/// Directory holding scripts and files the scripts write outside the
/// compile workspace.
pub struct Bench {
    pub dir: TempDir,
    pub scratch: TempDir,
}

impl Bench {
    pub fn new() -> Self {
        Bench {
            dir: TempDir::new().expect("bench dir"),
            scratch: TempDir::new().expect("scratch root"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn tool(&self, name: &str, body: &str) -> PathBuf {
        fake_tool(self.dir.path(), name, body)
    }

    /// Workspaces left behind under the scratch root.
    pub fn leftover_workspaces(&self) -> usize {
        fs::read_dir(self.scratch.path())
            .expect("read scratch root")
            .count()
    }
}

/// Formatted log output shared with a test subscriber.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber and return what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}
