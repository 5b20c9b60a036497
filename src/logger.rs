//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("index"; "wrote {} items", count);
//! log!("warn"; "{}: {}", path.display(), reason);
//! ```
//!
//! Output format is `[module] message`, written to stderr so stdout carries
//! only command output. On a terminal, messages longer than the terminal are
//! cut at a character boundary so a log line never wraps. Redirected output
//! gets the full message and no escape sequences.

use colored::{ColoredString, Colorize};
use crossterm::{
    execute,
    terminal::{Clear, ClearType, size},
    tty::IsTty,
};
use std::{
    io::{self, Write, stderr},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Width used when the terminal size cannot be detected (pipes, CI).
const FALLBACK_WIDTH: u16 = 120;

/// `[` + `]` + trailing space
const PREFIX_OVERHEAD: usize = 3;

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(FALLBACK_WIDTH)) as usize
}

/// Write one log line to stderr.
pub fn log(module: &str, message: &str) {
    let stderr = stderr();
    let is_tty = stderr.is_tty();
    write_line(&mut stderr.lock(), is_tty, module, message).ok();
}

fn write_line(out: &mut impl Write, is_tty: bool, module: &str, message: &str) -> io::Result<()> {
    let prefix = colorize_prefix(module);

    if is_tty {
        let max_len = terminal_width().saturating_sub(module.len() + PREFIX_OVERHEAD);
        execute!(out, Clear(ClearType::UntilNewLine))?;
        writeln!(out, "{prefix} {}", truncate_str(message, max_len))?;
    } else {
        writeln!(out, "{prefix} {message}")?;
    }
    out.flush()
}

fn colorize_prefix(module: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" => prefix.bright_blue().bold(),
        "watch" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        "warn" => prefix.bright_magenta().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Cut `s` to at most `max_len` bytes without splitting a UTF-8 character.
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

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR_LINE: &str = "\x1b[K";

    #[test]
    fn test_truncate_str_fits() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_cuts() {
        assert_eq!(truncate_str("hello world", 5), "hello");
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_truncate_str_unicode_boundary() {
        // "é" is 2 bytes; cutting at 2 would split it
        assert_eq!(truncate_str("aé", 2), "a");
        assert_eq!(truncate_str("aé", 3), "aé");
        assert_eq!(truncate_str("你好", 4), "你");
    }

    #[test]
    fn test_write_line_redirected_is_plain() {
        let long = "x".repeat(500);
        let mut out = Vec::new();
        write_line(&mut out, false, "error", &long).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with(&format!(" {long}\n")));
        assert!(!line.contains(CLEAR_LINE));
    }

    #[test]
    fn test_write_line_terminal_clears_line() {
        let mut out = Vec::new();
        write_line(&mut out, true, "index", "done").unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with(CLEAR_LINE));
        assert!(line.ends_with("done\n"));
    }

    #[test]
    fn test_colorize_prefix_keeps_module_name() {
        colored::control::set_override(false);
        assert_eq!(colorize_prefix("index").to_string(), "[index]");
        assert_eq!(colorize_prefix("Warn").to_string(), "[Warn]");
        colored::control::unset_override();
    }
}
