//! Live microphone level metering.
//!
//! Opens an input stream on the configured device, mixes every callback down
//! to mono, and keeps a short sliding window of recent samples. The frame
//! loop asks for the average power of that window once per frame, the same
//! way a hardware meter is polled.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::device::{resolve_input_device, suppress_alsa_warnings};
use super::CaptureError;
use crate::waveform::{average_power_db, normalizer::SILENCE_DB};

/// Polls the average power of the most recent input audio.
///
/// Features:
/// - Captures from a named, indexed, or default input device
/// - Mixes multi-channel input to mono by averaging channels
/// - Keeps only a fixed-length window of the newest samples
/// - Pause and resume without tearing down the stream
pub struct LevelMeter {
    /// Newest mono samples, at most `window_len` of them
    window: Arc<Mutex<VecDeque<f32>>>,
    /// Active input stream (kept alive while metering)
    stream: Option<cpal::Stream>,
    /// Whether incoming audio is currently discarded
    is_paused: Arc<Mutex<bool>>,
    /// Device spec: "default", an index, or a device name
    device_spec: String,
    /// Resolved device name once started
    device_name: Option<String>,
    window_duration: Duration,
    sample_rate: u32,
}

impl LevelMeter {
    /// Creates an idle meter. Nothing is opened until [`LevelMeter::start`].
    ///
    /// # Arguments
    /// * `device_spec` - "default", a numeric index, or a device name
    /// * `window_duration` - How much recent audio each reading averages over
    pub fn new(device_spec: impl Into<String>, window_duration: Duration) -> Self {
        Self {
            window: Arc::new(Mutex::new(VecDeque::new())),
            stream: None,
            is_paused: Arc::new(Mutex::new(false)),
            device_spec: device_spec.into(),
            device_name: None,
            window_duration,
            sample_rate: 0,
        }
    }

    /// Opens the input device and starts the capture stream.
    ///
    /// # Errors
    /// - If the device cannot be found
    /// - If the device reports an unsupported sample format
    /// - If the stream cannot be built or started
    pub fn start(&mut self) -> Result<(), CaptureError> {
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();
            resolve_input_device(&host, &self.device_spec)
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Metering device: {}", device_name);

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.into();

        let sample_rate = stream_config.sample_rate.0;
        let channels = stream_config.channels as usize;
        let window_len = window_length(sample_rate, self.window_duration);

        tracing::debug!(
            "Device configuration: {}Hz, {} channels, {:?}, window of {} samples",
            sample_rate,
            channels,
            sample_format,
            window_len
        );

        let stream = match sample_format {
            cpal::SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config, window_len),
            cpal::SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config, window_len),
            cpal::SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config, window_len),
            other => Err(CaptureError::UnsupportedSampleFormat(format!("{other:?}"))),
        }?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        self.stream = Some(stream);
        self.sample_rate = sample_rate;
        self.device_name = Some(device_name);
        tracing::debug!("Audio stream started");
        Ok(())
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        window_len: usize,
    ) -> Result<cpal::Stream, CaptureError>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let window = Arc::clone(&self.window);
        let paused = Arc::clone(&self.is_paused);
        let channels = config.channels as usize;

        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    if *paused.lock().unwrap() {
                        return;
                    }
                    let mut window = window.lock().unwrap();
                    push_mono(&mut window, data, channels, window_len);
                },
                |err| {
                    tracing::error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| CaptureError::Stream(e.to_string()))
    }

    /// Average power of the current window in dBFS.
    ///
    /// Returns `SILENCE_DB` while paused or before any audio arrived.
    pub fn average_power(&self) -> f32 {
        if self.is_paused() {
            return SILENCE_DB;
        }
        let window = self.window.lock().unwrap();
        let (head, tail) = window.as_slices();
        if tail.is_empty() {
            average_power_db(head)
        } else {
            let samples: Vec<f32> = head.iter().chain(tail).copied().collect();
            average_power_db(&samples)
        }
    }

    /// Stops the stream and forgets buffered audio.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            self.window.lock().unwrap().clear();
            tracing::debug!("Audio stream stopped");
        }
    }

    pub fn is_paused(&self) -> bool {
        *self.is_paused.lock().unwrap()
    }

    /// Toggles between paused and live metering.
    pub fn toggle_pause(&self) {
        let mut paused = self.is_paused.lock().unwrap();
        *paused = !*paused;
        if *paused {
            self.window.lock().unwrap().clear();
            tracing::debug!("Metering paused");
        } else {
            tracing::debug!("Metering resumed");
        }
    }

    /// Actual device sample rate, or 0 before [`LevelMeter::start`].
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Resolved device name, once started.
    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }
}

impl Drop for LevelMeter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Number of samples covering `duration` at `sample_rate`, at least one.
fn window_length(sample_rate: u32, duration: Duration) -> usize {
    ((sample_rate as f64 * duration.as_secs_f64()).round() as usize).max(1)
}

/// Mixes interleaved frames to mono and appends them, evicting the oldest
/// samples beyond `window_len`.
fn push_mono<T>(window: &mut VecDeque<f32>, data: &[T], channels: usize, window_len: usize)
where
    T: Sample,
    f32: FromSample<T>,
{
    let channels = channels.max(1);
    for frame in data.chunks_exact(channels) {
        let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
        window.push_back(sum / channels as f32);
    }

    let excess = window.len().saturating_sub(window_len);
    window.drain(..excess);
}
