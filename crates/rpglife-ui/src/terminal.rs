//! Terminal detection utilities.

use std::env;
use std::sync::atomic::{AtomicU8, Ordering};

const COLOR_DETECT: u8 = 0;
const COLOR_ON: u8 = 1;
const COLOR_OFF: u8 = 2;

static COLOR_OVERRIDE: AtomicU8 = AtomicU8::new(COLOR_DETECT);

/// Returns `true` if stdout is connected to a terminal (TTY).
pub fn is_tty() -> bool {
    crossterm::tty::IsTty::is_tty(&std::io::stdout())
}

/// Returns the terminal width in columns, defaulting to 80 if detection fails.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _rows)| cols as usize)
        .unwrap_or(80)
}

/// Forces color on or off for the rest of the process. `None` restores
/// detection.
pub fn set_color_override(choice: Option<bool>) {
    let value = match choice {
        Some(true) => COLOR_ON,
        Some(false) => COLOR_OFF,
        None => COLOR_DETECT,
    };
    COLOR_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Determines if ANSI color codes should be used.
///
/// An explicit [`set_color_override`] wins. Otherwise:
/// - `NO_COLOR` (any value): disables color (<https://no-color.org/>)
/// - `CLICOLOR=0`: disables color
/// - `TERM=dumb`: disables color
/// - `CLICOLOR_FORCE` (any value): forces color even in non-TTY
/// - Falls back to TTY detection
pub fn supports_color() -> bool {
    match COLOR_OVERRIDE.load(Ordering::Relaxed) {
        COLOR_ON => return true,
        COLOR_OFF => return false,
        _ => {}
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").as_deref() == Ok("0") {
        return false;
    }
    if env::var("TERM").as_deref() == Ok("dumb") {
        return false;
    }
    if env::var_os("CLICOLOR_FORCE").is_some() {
        return true;
    }

    is_tty()
}

/// Returns `true` if emoji icons should be printed next to names.
///
/// Disabled in non-TTY mode and by `RPGLIFE_NO_EMOJI`.
pub fn should_use_emoji() -> bool {
    if env::var_os("RPGLIFE_NO_EMOJI").is_some() {
        return false;
    }
    is_tty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_width_returns_positive() {
        assert!(terminal_width() > 0);
    }

    #[test]
    fn override_wins_over_detection() {
        set_color_override(Some(false));
        assert!(!supports_color());
        set_color_override(None);
    }
}
