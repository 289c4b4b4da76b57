//! Layered configuration: defaults → YAML file → `LATEX_*` environment.
//!
//! # Storage layout
//!
//! ```text
//! ~/.texprint/
//!   config.yaml   (optional, mode 0600 when written by `save_at`)
//! ```
//!
//! # API pattern
//!
//! Every function touching the home directory has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`

use std::path::{Path, PathBuf};

use crate::error::{io_err, ConfigError};
use crate::types::{TexConfig, ENV_KEYS};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.texprint/config.yaml`, pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".texprint").join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a config file. A missing file yields [`TexConfig::default`].
///
/// Returns `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_file(path: &Path) -> Result<TexConfig, ConfigError> {
    if !path.exists() {
        return Ok(TexConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(TexConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load `<home>/.texprint/config.yaml`.
pub fn load_at(home: &Path) -> Result<TexConfig, ConfigError> {
    load_file(&config_path_at(home))
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save `config` to `<home>/.texprint/config.yaml`.
pub fn save_at(home: &Path, config: &TexConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    save_file(&path, config)?;
    Ok(path)
}

/// Atomically save `config` to `path`, creating parent directories.
///
/// Write flow: serialize → `<name>.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_file(path: &Path, config: &TexConfig) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml).map_err(|e| io_err(&tmp_path, e))?;
    set_file_permissions(&tmp_path)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Providers
// ---------------------------------------------------------------------------

/// Source of a fresh [`TexConfig`] snapshot.
///
/// The compiler and the printer call [`ConfigProvider::snapshot`] once per
/// call and never cache the result.
pub trait ConfigProvider {
    fn snapshot(&self) -> Result<TexConfig, ConfigError>;
}

/// A fixed snapshot.
impl ConfigProvider for TexConfig {
    fn snapshot(&self) -> Result<TexConfig, ConfigError> {
        self.validate()?;
        Ok(self.clone())
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProvider for &P {
    fn snapshot(&self) -> Result<TexConfig, ConfigError> {
        (**self).snapshot()
    }
}

/// Re-reads the optional config file and the process environment on every
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    file: Option<PathBuf>,
}

impl LayeredConfig {
    /// Layer `~/.texprint/config.yaml` under the environment.
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::with_file(config_path()?))
    }

    /// Layer `<home>/.texprint/config.yaml` under the environment.
    pub fn at(home: &Path) -> Self {
        Self::with_file(config_path_at(home))
    }

    /// Layer an explicit config file under the environment.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        LayeredConfig {
            file: Some(path.into()),
        }
    }

    /// Environment only.
    pub fn env_only() -> Self {
        LayeredConfig { file: None }
    }

    /// Config file in use, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Build a snapshot from the file plus the given variables instead of
    /// the process environment.
    pub fn snapshot_with_vars<I, K, V>(&self, vars: I) -> Result<TexConfig, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let base = match &self.file {
            Some(path) => load_file(path)?,
            None => TexConfig::default(),
        };
        let config = base.apply_env(vars)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigProvider for LayeredConfig {
    fn snapshot(&self) -> Result<TexConfig, ConfigError> {
        self.snapshot_with_vars(latex_env()?)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// The `LATEX_*` variables that are set. Other variables are never read, so
/// non-Unicode values elsewhere in the environment are harmless.
fn latex_env() -> Result<Vec<(&'static str, String)>, ConfigError> {
    ENV_KEYS
        .iter()
        .filter_map(|&key| std::env::var_os(key).map(|value| (key, value)))
        .map(|(key, value)| {
            value
                .into_string()
                .map(|value| (key, value))
                .map_err(|_| ConfigError::Invalid {
                    key,
                    message: "value is not valid UTF-8".to_string(),
                })
        })
        .collect()
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
