//! Terminal rendering: the wave canvas, the live visualizer, and error screens.

pub mod canvas;
pub mod error;
pub mod visualizer;

pub use error::report_error;
pub use visualizer::{FrameStatus, VisualizerCommand, WaveTui};
