//! Terminal styling for rpglife output.
//!
//! Provides color detection and render helpers for levels, streaks,
//! difficulty tiers and progress bars.

pub mod styles;
pub mod terminal;
