//! Configuration snapshot shared by the compiler and the print dispatcher.
//!
//! A [`TexConfig`] is a plain value: callers take a fresh snapshot on every
//! compile or print call, so edits to the environment or the config file are
//! picked up without restarting anything.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_INTERPRETER: &str = "lualatex";
pub const DEFAULT_RUN_COUNT: u32 = 1;
pub const DEFAULT_PRINT_COMMAND: &str = "lpr";

// ---------------------------------------------------------------------------
// Environment keys
// ---------------------------------------------------------------------------

pub const ENV_INTERPRETER: &str = "LATEX_INTERPRETER";
pub const ENV_RUN_COUNT: &str = "LATEX_RUN_COUNT";
pub const ENV_INTERPRETER_OPTIONS: &str = "LATEX_INTERPRETER_OPTIONS";
pub const ENV_PRINTER: &str = "LATEX_PRINTER";
pub const ENV_PRINT_COMMAND: &str = "LATEX_UNIX_PRINT_COMMAND";
pub const ENV_PRINT_OPTIONS: &str = "LATEX_UNIX_PRINT_OPTIONS";

/// Every variable [`TexConfig::apply_env`] reads.
pub const ENV_KEYS: [&str; 6] = [
    ENV_INTERPRETER,
    ENV_RUN_COUNT,
    ENV_INTERPRETER_OPTIONS,
    ENV_PRINTER,
    ENV_PRINT_COMMAND,
    ENV_PRINT_OPTIONS,
];

// ---------------------------------------------------------------------------
// TexConfig
// ---------------------------------------------------------------------------

/// Settings for one compile or print call.
///
/// Every field has a default, so a config file may set any subset of keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TexConfig {
    /// LaTeX engine binary (`lualatex`, `pdflatex`, `xelatex`, …).
    pub interpreter: String,
    /// How many times the engine runs over the same workspace.
    pub run_count: u32,
    /// Extra engine arguments, split with shell word rules.
    pub interpreter_options: String,
    /// Destination printer; `None` uses the system default.
    pub printer: Option<String>,
    /// Print command binary.
    pub print_command: String,
    /// Extra print command arguments, split with shell word rules.
    pub print_options: String,
}

impl Default for TexConfig {
    fn default() -> Self {
        TexConfig {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            run_count: DEFAULT_RUN_COUNT,
            interpreter_options: String::new(),
            printer: None,
            print_command: DEFAULT_PRINT_COMMAND.to_string(),
            print_options: String::new(),
        }
    }
}

impl TexConfig {
    /// Reject values the compiler or printer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run_count == 0 {
            return Err(ConfigError::Invalid {
                key: "run_count",
                message: "must be at least 1".to_string(),
            });
        }
        if self.interpreter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "interpreter",
                message: "must not be empty".to_string(),
            });
        }
        if self.print_command.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "print_command",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Overlay `LATEX_*` variables from `vars` onto this snapshot.
    ///
    /// Unrelated keys are ignored. An empty `LATEX_INTERPRETER`,
    /// `LATEX_UNIX_PRINT_COMMAND` or `LATEX_PRINTER` counts as unset; empty
    /// option strings are kept as-is.
    pub fn apply_env<I, K, V>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                ENV_INTERPRETER if !value.trim().is_empty() => self.interpreter = value,
                ENV_RUN_COUNT => self.run_count = parse_run_count(&value)?,
                ENV_INTERPRETER_OPTIONS => self.interpreter_options = value,
                ENV_PRINTER => {
                    self.printer = if value.trim().is_empty() {
                        None
                    } else {
                        Some(value)
                    }
                }
                ENV_PRINT_COMMAND if !value.trim().is_empty() => self.print_command = value,
                ENV_PRINT_OPTIONS => self.print_options = value,
                _ => {}
            }
        }
        Ok(self)
    }
}

fn parse_run_count(raw: &str) -> Result<u32, ConfigError> {
    let count: u32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key: ENV_RUN_COUNT,
        message: format!("expected a positive integer, got '{raw}'"),
    })?;
    if count == 0 {
        return Err(ConfigError::Invalid {
            key: ENV_RUN_COUNT,
            message: "must be at least 1".to_string(),
        });
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = TexConfig::default();
        assert_eq!(cfg.interpreter, "lualatex");
        assert_eq!(cfg.run_count, 1);
        assert_eq!(cfg.interpreter_options, "");
        assert_eq!(cfg.printer, None);
        assert_eq!(cfg.print_command, "lpr");
        assert_eq!(cfg.print_options, "");
        cfg.validate().expect("defaults are valid");
    }

    #[test]
    fn env_overrides_every_key() {
        let cfg = TexConfig::default()
            .apply_env([
                ("LATEX_INTERPRETER", "pdflatex"),
                ("LATEX_RUN_COUNT", "3"),
                ("LATEX_INTERPRETER_OPTIONS", "-shell-escape"),
                ("LATEX_PRINTER", "hp1"),
                ("LATEX_UNIX_PRINT_COMMAND", "lp"),
                ("LATEX_UNIX_PRINT_OPTIONS", "-o sides=two-sided-long-edge"),
                ("PATH", "/usr/bin"),
            ])
            .expect("apply env");
        assert_eq!(cfg.interpreter, "pdflatex");
        assert_eq!(cfg.run_count, 3);
        assert_eq!(cfg.interpreter_options, "-shell-escape");
        assert_eq!(cfg.printer.as_deref(), Some("hp1"));
        assert_eq!(cfg.print_command, "lp");
        assert_eq!(cfg.print_options, "-o sides=two-sided-long-edge");
    }

    #[test]
    fn empty_printer_means_default_printer() {
        let base = TexConfig {
            printer: Some("office".to_string()),
            ..TexConfig::default()
        };
        let cfg = base.apply_env([("LATEX_PRINTER", "")]).unwrap();
        assert_eq!(cfg.printer, None);
    }

    #[test]
    fn empty_interpreter_keeps_previous_value() {
        let cfg = TexConfig::default()
            .apply_env([("LATEX_INTERPRETER", "  ")])
            .unwrap();
        assert_eq!(cfg.interpreter, "lualatex");
    }

    #[test]
    fn zero_run_count_rejected() {
        let err = TexConfig::default()
            .apply_env([("LATEX_RUN_COUNT", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "LATEX_RUN_COUNT", .. }));
    }

    #[test]
    fn non_numeric_run_count_rejected() {
        let err = TexConfig::default()
            .apply_env([("LATEX_RUN_COUNT", "twice")])
            .unwrap_err();
        assert!(err.to_string().contains("twice"), "got: {err}");
    }

    #[test]
    fn validate_rejects_zero_run_count_from_file_values() {
        let cfg = TexConfig {
            run_count: 0,
            ..TexConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
