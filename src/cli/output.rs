//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically; the `color`
//! setting can switch colors off entirely.

use colored::Colorize;

/// Disable colored output for the rest of the process.
pub fn disable_colors() {
    colored::control::set_override(false);
}

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) -> String {
    msg.to_string().cyan().bold().to_string()
}

/// Node line: name, then dimmed family and identity
pub fn node_line(name: &str, family: &str, identity: u64) -> String {
    format!("{} {}", name.green(), format!("({} #{})", family, identity).dimmed())
}

/// Key/value detail line, indented
pub fn detail(key: &str, value: &(impl std::fmt::Display + ?Sized)) -> String {
    format!("  {}: {}", key.bold(), value)
}
