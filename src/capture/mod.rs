//! Audio level sources feeding the waveform.
//!
//! The frame loop only needs one decibel reading per frame. It gets that
//! either from a live microphone ([`LevelMeter`]) or from a synthetic
//! speech-like curve ([`SyntheticLevel`]) for demo mode.

pub mod device;
pub mod meter;
pub mod synthetic;

pub use device::{list_input_devices, InputDeviceInfo};
pub use meter::LevelMeter;
pub use synthetic::SyntheticLevel;

use thiserror::Error;

/// Audio capture could not be set up or kept running.
///
/// Every variant means the same thing to the application: no microphone
/// input is available. Renderer state is never touched by these.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoInputDevice,
    #[error(
        "Audio input device '{0}' not found. Use 'siriwave list-devices' to see available devices."
    )]
    DeviceNotFound(String),
    #[error("Device index {index} is out of range ({available} input devices found)")]
    DeviceIndexOutOfRange { index: usize, available: usize },
    #[error("Failed to enumerate audio devices: {0}")]
    Enumerate(String),
    #[error("Unsupported input sample format: {0}")]
    UnsupportedSampleFormat(String),
    #[error("Audio stream error: {0}")]
    Stream(String),
}

/// Where per-frame decibel readings come from.
pub enum LevelSource {
    Microphone(LevelMeter),
    Synthetic(SyntheticLevel),
}

impl LevelSource {
    /// Current loudness in dBFS.
    pub fn decibels(&mut self) -> f32 {
        match self {
            Self::Microphone(meter) => meter.average_power(),
            Self::Synthetic(synthetic) => synthetic.next_decibels(),
        }
    }

    /// Flips pause state and returns whether the source is now paused.
    pub fn toggle_pause(&mut self) -> bool {
        match self {
            Self::Microphone(meter) => {
                meter.toggle_pause();
                meter.is_paused()
            }
            Self::Synthetic(synthetic) => synthetic.toggle_pause(),
        }
    }

    /// Short label for the status footer.
    pub fn label(&self) -> &str {
        match self {
            Self::Microphone(meter) => meter.device_name().unwrap_or("microphone"),
            Self::Synthetic(_) => "demo",
        }
    }
}
