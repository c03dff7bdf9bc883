//! Configuration management for rpglife.
//!
//! Handles loading and saving `.rpglife/config.yaml`, discovering the
//! `.rpglife/` data directory, and resolving where the database lives.

pub mod config;
pub mod data_dir;

pub use config::{ColorChoice, ConfigError, RpgConfig, load_config, save_config};
pub use data_dir::{ensure_data_dir, find_data_dir};
