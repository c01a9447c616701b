//! Deterministic speech-like level curve for demo mode.

use std::f32::consts::TAU;

use crate::waveform::normalizer::{MIN_DECIBELS, SILENCE_DB};

/// Loudest reading the curve produces, in dBFS.
const PEAK_DECIBELS: f32 = -6.0;

/// Generates one decibel reading per frame without any audio hardware.
///
/// Two sines give a syllable-like rise and fall, and a slow third one opens
/// short gaps of silence between "phrases".
#[derive(Debug, Clone)]
pub struct SyntheticLevel {
    time: f32,
    step: f32,
    paused: bool,
}

impl SyntheticLevel {
    /// `rate_hz` is how often [`SyntheticLevel::next_decibels`] will be called.
    pub fn new(rate_hz: u32) -> Self {
        Self {
            time: 0.0,
            step: 1.0 / rate_hz.max(1) as f32,
            paused: false,
        }
    }

    /// Advances by one frame and returns the reading, within
    /// `MIN_DECIBELS..=PEAK_DECIBELS` or `SILENCE_DB` while paused.
    pub fn next_decibels(&mut self) -> f32 {
        if self.paused {
            return SILENCE_DB;
        }

        let t = self.time;
        self.time += self.step;

        if (TAU * 0.23 * t).sin() < -0.6 {
            return MIN_DECIBELS;
        }

        let syllables = 0.5 + 0.3 * (TAU * 0.7 * t).sin() + 0.2 * (TAU * 3.1 * t).sin();
        MIN_DECIBELS + (PEAK_DECIBELS - MIN_DECIBELS) * syllables.clamp(0.0, 1.0)
    }

    /// Flips pause state and returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}
