//! Argument-vector helpers shared by the compiler and the printer.
//!
//! Configured command and option strings are split with POSIX shell word
//! rules, so `-o "media=A4 Plus"` stays one argument. Nothing is ever handed
//! to a shell; quoting is only applied when a command is rendered for logs and
//! error messages.

use std::ffi::OsStr;

use crate::error::BuildError;

/// Split an option string into words. An empty string yields no words.
pub(crate) fn split_words(key: &'static str, value: &str) -> Result<Vec<String>, BuildError> {
    shlex::split(value).ok_or_else(|| BuildError::InvalidOptions {
        key,
        value: value.to_string(),
    })
}

/// Split a command string into its program and leading arguments.
pub(crate) fn split_program(
    key: &'static str,
    value: &str,
) -> Result<(String, Vec<String>), BuildError> {
    let mut words = split_words(key, value)?;
    if words.is_empty() {
        return Err(BuildError::InvalidOptions {
            key,
            value: value.to_string(),
        });
    }
    let program = words.remove(0);
    Ok((program, words))
}

/// Render an argument vector as a copy-pasteable shell command.
pub(crate) fn render<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    words
        .into_iter()
        .map(|w| quote(&w.as_ref().to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote(word: &str) -> String {
    match shlex::try_quote(word) {
        Ok(quoted) => quoted.into_owned(),
        // only NUL bytes are unquotable; they cannot reach exec anyway
        Err(_) => word.escape_default().to_string(),
    }
}

pub(crate) fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
