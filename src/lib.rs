//! Siri-style animated waveform visualization.
//!
//! The [`waveform`] module is the reusable core: decibel normalization and
//! per-frame multi-wave geometry. The remaining modules make up the
//! `siriwave` terminal application around it.

pub mod app;
pub mod capture;
pub mod commands;
pub mod config;
pub mod logging;
pub mod setup;
pub mod ui;
pub mod waveform;
