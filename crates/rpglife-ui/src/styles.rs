//! Color palette and styling functions for rpglife output.
//!
//! Semantic colors come from the Ayu Dark palette. Difficulty tiers use
//! their own ramp from gray (trivial) to red (epic), and categories carry
//! their own hex color which is rendered as truecolor.

use owo_colors::OwoColorize;

use rpglife_core::enums::TransactionKind;
use rpglife_core::tier::Tier;

use crate::terminal::{supports_color, terminal_width};

// ---------------------------------------------------------------------------
// Palette (RGB values)
// ---------------------------------------------------------------------------

const PASS: (u8, u8, u8) = (0xc2, 0xd9, 0x4c); // #c2d94c - bright green
const WARN: (u8, u8, u8) = (0xff, 0xb4, 0x54); // #ffb454 - bright yellow
const MUTED: (u8, u8, u8) = (0x6c, 0x76, 0x80); // #6c7680 - muted gray
const ACCENT: (u8, u8, u8) = (0x59, 0xc2, 0xff); // #59c2ff - bright blue
const GOLD: (u8, u8, u8) = (0xe6, 0xb4, 0x50); // #e6b450 - level and points
const FLAME: (u8, u8, u8) = (0xff, 0x8f, 0x40); // #ff8f40 - streaks

/// Difficulty ramp, indexed by tier - 1.
pub const DIFFICULTY_COLORS: [&str; 5] = ["#95A5A6", "#2ECC71", "#3498DB", "#E67E22", "#E74C3C"];

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

pub const ICON_PASS: &str = "\u{2713}"; // ✓
pub const ICON_LOCKED: &str = "\u{25CB}"; // ○
pub const ICON_STAR: &str = "\u{2605}"; // ★
pub const ICON_STAR_EMPTY: &str = "\u{2606}"; // ☆

const BAR_FULL: char = '\u{2588}'; // █
const BAR_EMPTY: char = '\u{2591}'; // ░

/// Separators never grow wider than this.
pub const SEPARATOR_MAX_WIDTH: usize = 40;

const SEPARATOR_LIGHT: char = '\u{2500}'; // ─

// ---------------------------------------------------------------------------
// Helper: apply truecolor only when color is supported
// ---------------------------------------------------------------------------

fn color_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).to_string()
    } else {
        s.to_string()
    }
}

fn color_bold_str(s: &str, rgb: (u8, u8, u8)) -> String {
    if supports_color() {
        s.truecolor(rgb.0, rgb.1, rgb.2).bold().to_string()
    } else {
        s.to_string()
    }
}

/// Parses `#RRGGBB` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Renders `s` in a `#RRGGBB` color. Unparseable colors leave `s` plain.
pub fn render_hex(s: &str, hex: &str) -> String {
    match parse_hex(hex) {
        Some(rgb) => color_str(s, rgb),
        None => s.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Core semantic render helpers
// ---------------------------------------------------------------------------

pub fn render_pass(s: &str) -> String {
    color_str(s, PASS)
}

pub fn render_warn(s: &str) -> String {
    color_str(s, WARN)
}

pub fn render_muted(s: &str) -> String {
    color_str(s, MUTED)
}

pub fn render_bold(s: &str) -> String {
    if supports_color() {
        s.bold().to_string()
    } else {
        s.to_string()
    }
}

/// Renders a section header in uppercase with accent color and bold.
pub fn render_header(s: &str) -> String {
    color_bold_str(&s.to_uppercase(), ACCENT)
}

/// A light rule across the terminal, capped at [`SEPARATOR_MAX_WIDTH`].
pub fn render_separator() -> String {
    let width = terminal_width().clamp(1, SEPARATOR_MAX_WIDTH);
    render_muted(&SEPARATOR_LIGHT.to_string().repeat(width))
}

pub fn render_pass_icon() -> String {
    color_str(ICON_PASS, PASS)
}

// ---------------------------------------------------------------------------
// Progression
// ---------------------------------------------------------------------------

/// `Lv 4`, bold gold.
pub fn render_level(level: u32) -> String {
    color_bold_str(&format!("Lv {level}"), GOLD)
}

/// `120 pts`, gold.
pub fn render_points(points: i64) -> String {
    color_str(&format!("{points} pts"), GOLD)
}

/// `5 days`. Zero-length streaks are muted.
pub fn render_streak(days: u32) -> String {
    let label = if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    };
    if days == 0 {
        render_muted(&label)
    } else {
        color_str(&label, FLAME)
    }
}

/// A fixed-width bar for a fraction in `[0, 1]`. Out-of-range input is
/// clamped.
pub fn render_progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let full: String = std::iter::repeat_n(BAR_FULL, filled).collect();
    let empty: String = std::iter::repeat_n(BAR_EMPTY, width - filled).collect();
    format!("{}{}", color_str(&full, PASS), render_muted(&empty))
}

/// Signed ledger amount: earnings green with a `+`, spends yellow.
pub fn render_amount(amount: i64, kind: TransactionKind) -> String {
    if kind.is_spend() {
        render_warn(&amount.to_string())
    } else {
        render_pass(&format!("+{amount}"))
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// `★★★☆☆` for tier 3.
pub fn tier_stars(tier: Tier) -> String {
    let n = usize::from(tier.get());
    format!("{}{}", ICON_STAR.repeat(n), ICON_STAR_EMPTY.repeat(5 - n))
}

/// Hex color for a difficulty tier.
pub fn difficulty_color(tier: Tier) -> &'static str {
    DIFFICULTY_COLORS[usize::from(tier.get()) - 1]
}

/// Difficulty label in its tier color, e.g. `Medium`.
pub fn render_difficulty(tier: Tier) -> String {
    render_hex(tier.difficulty_label(), difficulty_color(tier))
}

/// Reward value as stars in the tier color.
pub fn render_value(tier: Tier) -> String {
    render_hex(&tier_stars(tier), difficulty_color(tier))
}
