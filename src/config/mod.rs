//! Configuration management for siriwave.
//!
//! Settings live in `~/.config/siriwave/siriwave.toml`. Every table and key is
//! optional; anything left out falls back to the built-in defaults.

pub mod file;

pub use file::{get_config_path, SiriwaveConfig};
