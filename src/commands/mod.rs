//! Application command handlers for siriwave.
//!
//! # Commands
//! - `visualize`: Live waveform from the microphone or the demo curve (default)
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod config;
pub mod list_devices;
pub mod logs;
pub mod visualize;

pub use config::handle_config;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
pub use visualize::{handle_visualize, VisualizeArgs};
