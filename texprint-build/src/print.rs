//! Finishing step: send the PDF to a printer.
//!
//! The command line is `<command> [device flag] <print options…>
//! <extra option…> <pdf path>`. Known commands select the device with their
//! own flag:
//!
//! | Command | Device flag   |
//! |---------|---------------|
//! | `lp`    | `-d <device>` |
//! | `lpr`   | `-P <device>` |
//!
//! A configured device with any other command is ignored with a warning.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use texprint_core::TexConfig;

use crate::command::{self, decode};
use crate::compile::Artifact;
use crate::error::BuildError;

/// Print commands with a known device-selection flag.
pub const DEVICE_FLAGS: &[(&str, &str)] = &[("lp", "-d"), ("lpr", "-P")];

// ---------------------------------------------------------------------------
// Device selection
// ---------------------------------------------------------------------------

/// How the destination printer ends up on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSelection {
    /// No printer configured; the command's default is used.
    SystemDefault,
    /// `flag device` is added after the command.
    Flag { flag: &'static str, device: String },
    /// A printer is configured but the command has no known flag for it.
    Unsupported { command: String, device: String },
}

impl DeviceSelection {
    /// Look up `program` (matched on its file name) in [`DEVICE_FLAGS`].
    pub fn resolve(program: &str, printer: Option<&str>) -> Self {
        let Some(device) = printer else {
            return DeviceSelection::SystemDefault;
        };
        let name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);
        match DEVICE_FLAGS.iter().find(|(cmd, _)| *cmd == name) {
            Some((_, flag)) => DeviceSelection::Flag {
                flag,
                device: device.to_string(),
            },
            None => DeviceSelection::Unsupported {
                command: program.to_string(),
                device: device.to_string(),
            },
        }
    }

    fn args(&self) -> Vec<String> {
        match self {
            DeviceSelection::Flag { flag, device } => vec![(*flag).to_string(), device.clone()],
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PrintJob
// ---------------------------------------------------------------------------

/// A fully resolved print command for one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    program: String,
    args: Vec<String>,
    artifact: PathBuf,
    device: DeviceSelection,
}

impl PrintJob {
    /// Resolve the command line for `artifact` from a configuration snapshot
    /// plus the caller's free-form `extra_option`.
    pub fn build(
        config: &TexConfig,
        extra_option: &str,
        artifact: &Path,
    ) -> Result<Self, BuildError> {
        let (program, command_args) = command::split_program("print_command", &config.print_command)?;
        let device = DeviceSelection::resolve(&program, config.printer.as_deref());

        let mut args = command_args;
        args.extend(device.args());
        args.extend(command::split_words("print_options", &config.print_options)?);
        args.extend(command::split_words("extra print option", extra_option)?);

        Ok(PrintJob {
            program,
            args,
            artifact: artifact.to_path_buf(),
            device,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn device(&self) -> &DeviceSelection {
        &self.device
    }

    /// Full argument vector after the program, ending with the artifact path.
    pub fn args(&self) -> Vec<OsString> {
        self.args
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(self.artifact.clone().into_os_string()))
            .collect()
    }

    /// The command rendered with shell quoting, for logs and errors.
    pub fn display_command(&self) -> String {
        command::render(std::iter::once(OsString::from(&self.program)).chain(self.args()))
    }

    /// Run the command and wait for it.
    pub fn run(&self) -> Result<(), BuildError> {
        let full_command = self.display_command();
        tracing::debug!(command = %full_command, "running print command");
        let output = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BuildError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stderr = decode(&output.stderr);
        if !output.status.success() {
            return Err(BuildError::Print {
                command: full_command,
                stderr,
            });
        }
        if !output.stderr.is_empty() {
            tracing::warn!(
                command = %full_command,
                stderr = %stderr.trim_end(),
                "print command succeeded but wrote to stderr"
            );
        }
        tracing::info!(command = %full_command, "sent to printer");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Printer
// ---------------------------------------------------------------------------

/// Print finishing step carrying the caller's free-form extra option.
#[derive(Debug, Clone, Default)]
pub struct Printer {
    extra_option: String,
}

impl Printer {
    /// `extra_option` is appended after the configured print options.
    pub fn new(extra_option: impl Into<String>) -> Self {
        Printer {
            extra_option: extra_option.into(),
        }
    }

    /// Print `artifact` using the printer settings in `config`.
    pub fn print(&self, artifact: &Artifact<'_>, config: &TexConfig) -> Result<(), BuildError> {
        let job = PrintJob::build(config, &self.extra_option, &artifact.path())?;
        match job.device() {
            DeviceSelection::SystemDefault => {
                tracing::debug!("no printer configured, using the system default");
            }
            DeviceSelection::Unsupported { command, device } => {
                tracing::warn!(
                    command = %command,
                    device = %device,
                    "print command has no known device flag; printer setting ignored"
                );
            }
            DeviceSelection::Flag { .. } => {}
        }
        job.run()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(command: &str, printer: Option<&str>) -> TexConfig {
        TexConfig {
            print_command: command.to_string(),
            printer: printer.map(str::to_string),
            ..TexConfig::default()
        }
    }

    #[rstest]
    #[case::lp("lp", "lp -d hp1")]
    #[case::lpr("lpr", "lpr -P hp1")]
    #[case::absolute_lpr("/usr/bin/lpr", "/usr/bin/lpr -P hp1")]
    fn known_commands_get_device_flag(#[case] command: &str, #[case] prefix: &str) {
        let job = PrintJob::build(&config(command, Some("hp1")), "", Path::new("/w/texput.pdf"))
            .unwrap();
        assert!(
            job.display_command().starts_with(prefix),
            "got: {}",
            job.display_command()
        );
    }

    #[test]
    fn unknown_command_keeps_command_unchanged() {
        let job = PrintJob::build(&config("myprint", Some("hp1")), "", Path::new("/w/texput.pdf"))
            .unwrap();
        assert_eq!(
            job.device(),
            &DeviceSelection::Unsupported {
                command: "myprint".to_string(),
                device: "hp1".to_string()
            }
        );
        assert_eq!(job.display_command(), "myprint /w/texput.pdf");
    }

    #[test]
    fn no_printer_means_no_flag() {
        let job = PrintJob::build(&config("lp", None), "", Path::new("/w/texput.pdf")).unwrap();
        assert_eq!(job.device(), &DeviceSelection::SystemDefault);
        assert_eq!(job.display_command(), "lp /w/texput.pdf");
    }

    #[test]
    fn argument_order_is_device_options_extra_path() {
        let cfg = TexConfig {
            print_options: "-o sides=one-sided".to_string(),
            ..config("lpr", Some("hp1"))
        };
        let job = PrintJob::build(&cfg, "-#2", Path::new("/w/texput.pdf")).unwrap();
        let args: Vec<String> = job
            .args()
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["-P", "hp1", "-o", "sides=one-sided", "-#2", "/w/texput.pdf"]
        );
    }

    #[test]
    fn device_and_path_with_spaces_stay_single_arguments() {
        let job = PrintJob::build(
            &config("lp", Some("front desk \"A\"")),
            "",
            Path::new("/tmp/my work/it's.pdf"),
        )
        .unwrap();
        let args = job.args();
        assert_eq!(args.len(), 3);
        assert_eq!(args[1], OsString::from("front desk \"A\""));
        assert_eq!(args[2], OsString::from("/tmp/my work/it's.pdf"));
    }

    #[test]
    fn unbalanced_extra_option_is_rejected() {
        let err = PrintJob::build(&config("lp", None), "-o 'x", Path::new("/w/t.pdf")).unwrap_err();
        assert!(matches!(err, BuildError::InvalidOptions { .. }));
    }
}
