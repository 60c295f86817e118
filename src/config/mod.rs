//! Configuration loading for the sentence study tool.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so a study session can still start.

mod defaults;
mod io;
mod models;
mod tables;

pub use io::{clamp_config, load_config, parse_config, serialize_config};
pub use models::{AppConfig, LogLevel, SheetsConfig};
