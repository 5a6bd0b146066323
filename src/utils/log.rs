//! Colored terminal logging.
//!
//! ```ignore
//! log!("build"; "rendered {} pages", count);
//! log!(full "warn"; "missing {}", path.display());
//! ```
//!
//! On a terminal, plain lines are cut to the terminal width. `full` lines
//! and anything written to a pipe are never truncated.

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
    tty::IsTty,
};
use std::{
    io::{Write, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Display length of `[module] ` for a module name of the given length.
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// log!(full "module"; "never truncated: {}", path);
/// ```
#[macro_export]
macro_rules! log {
    (full $module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log_full($module, &format!($($arg)*))
    }};
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
///
/// On a terminal, long messages are truncated to fit its width.
pub fn log(module: &str, message: &str) {
    let max_len = stdout()
        .is_tty()
        .then(|| (get_terminal_width() as usize).saturating_sub(calc_prefix_len(module.len())));
    write_line(&format_line(module, message, max_len));
}

/// Log a message that must reach the reader whole (summaries, warnings).
pub fn log_full(module: &str, message: &str) {
    write_line(&format_line(module, message, None));
}

fn format_line(module: &str, message: &str, max_len: Option<usize>) -> String {
    let prefix = colorize_prefix(module, &module.to_ascii_lowercase());
    let message = match max_len {
        Some(max_len) => truncate_str(message, max_len),
        None => message,
    };
    format!("{prefix} {message}")
}

fn write_line(line: &str) {
    let mut stdout = stdout().lock();
    if stdout.is_tty() {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }
    writeln!(stdout, "{line}").ok();
    stdout.flush().ok();
}

#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => prefix.bright_blue().bold(),
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes, on a char boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
