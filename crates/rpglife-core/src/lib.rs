//! Core types and progression rules for rpglife.
//!
//! Everything in this crate is pure: leveling math, the point economy's
//! accept/reject decisions, the streak rule, feature gating and achievement
//! evaluation. Persistence lives in `rpglife-storage`, and the
//! read-modify-write operations that tie the two together live in
//! `rpglife-engine`.

pub mod achievement;
pub mod economy;
pub mod enums;
pub mod gating;
pub mod model;
pub mod progression;
pub mod streak;
pub mod tier;
