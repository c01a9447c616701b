//! Waveform synthesis core.
//!
//! Turns decibel readings into a normalized amplitude and synthesizes the
//! layered sine polylines drawn each frame. Nothing in here touches audio
//! devices or the terminal; callers feed floats in and stroke the returned
//! geometry themselves.

pub mod config;
pub mod normalizer;
pub mod renderer;

pub use config::{WaveColor, WaveConfig, WaveConfigError};
pub use normalizer::{average_power_db, normalized_power_level};
pub use renderer::{Bounds, Point, WaveLayer, WaveformRenderer};
