//! Pull the first error out of a TeX log.
//!
//! TeX reports errors as a line starting with `! `, followed a few lines later
//! by `l.<n> <context>` naming the input line.

/// First error found in a compiler log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    /// Error text after the `! ` marker.
    pub message: String,
    /// 1-based line in the compiled source, when the log names one.
    pub line: Option<usize>,
    /// The source line at `line`, when it exists.
    pub source_line: Option<String>,
}

/// Find the first `! ` error in `log` and locate it in `source`.
pub fn first_error(log: &str, source: &str) -> Option<CompileDiagnostic> {
    let mut lines = log.lines();
    let message = lines
        .by_ref()
        .find_map(|l| l.strip_prefix("! "))?
        .trim()
        .to_string();

    let line = lines
        // a following error ends the search
        .take_while(|l| !l.starts_with("! "))
        .find_map(parse_line_marker);
    let source_line = line
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| source.lines().nth(idx))
        .map(str::to_string);

    Some(CompileDiagnostic {
        message,
        line,
        source_line,
    })
}

/// One-line description used in error messages.
pub(crate) fn headline(log: &str) -> String {
    match first_error(log, "") {
        Some(CompileDiagnostic {
            message,
            line: Some(n),
            ..
        }) => format!("{message} (line {n})"),
        Some(d) => d.message,
        None => "see compiler log for details".to_string(),
    }
}

fn parse_line_marker(line: &str) -> Option<usize> {
    let rest = line.strip_prefix("l.")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
