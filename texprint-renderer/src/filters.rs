//! LaTeX-specific tera filters.
//!
//! | Filter         | Effect                                                     |
//! |----------------|------------------------------------------------------------|
//! | `latex_escape` | escape characters the LaTeX compiler would choke on        |
//! | `linebreaks`   | turn every newline into a forced LaTeX line break (`\\`)   |

use std::collections::HashMap;

use tera::{Tera, Value};

/// Register every filter in this module on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_filter("latex_escape", latex_escape_filter);
    tera.register_filter("linebreaks", linebreaks_filter);
}

/// Escape LaTeX special characters so they print as typed.
///
/// `\`, `~` and `^` become text commands; when such a character is followed
/// by a space the command ends in `\space` so the space survives.
pub fn latex_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + value.len() / 4);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        let before_space = chars.peek() == Some(&' ');
        match c {
            '\\' | '~' | '^' => {
                out.push_str(match c {
                    '\\' => r"\textbackslash",
                    '~' => r"\textasciitilde",
                    _ => r"\textasciicircum",
                });
                // the trailing space terminates the control word
                out.push_str(if before_space { r"\space" } else { " " });
            }
            '&' | '$' | '%' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\u{0b}' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Replace each `\n` with `\\` followed by the newline.
pub fn linebreaks(value: &str) -> String {
    value.replace('\n', "\\\\\n")
}

fn latex_escape_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(latex_escape(&value_as_text(value))))
}

fn linebreaks_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(linebreaks(&value_as_text(value))))
}

fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
