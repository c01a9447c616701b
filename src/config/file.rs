//! Configuration file management for siriwave.
//!
//! This module handles loading and saving application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::waveform::{WaveColor, WaveConfig};

/// Audio capture configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `siriwave list-devices`
    /// - device name from `siriwave list-devices`
    pub device: String,
    /// Length of the sliding window the level meter averages over, in milliseconds
    pub meter_window_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: "default".to_string(),
            meter_window_ms: 50,
        }
    }
}

/// Terminal display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Frames per second; each frame samples the level once
    pub fps: u32,
    /// Background colour the wave alpha is blended against
    pub background: WaveColor,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            background: WaveColor::rgb(0, 0, 0),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiriwaveConfig {
    pub audio: AudioConfig,
    pub display: DisplayConfig,
    pub wave: WaveConfig,
}

impl SiriwaveConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed or the wave settings are invalid
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        let config_content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::from_toml(&config_content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    /// - If the TOML is malformed
    /// - If the wave or display settings are out of range
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: SiriwaveConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that would otherwise fail at render time.
    ///
    /// # Errors
    /// - If `display.fps` is zero
    /// - If the `[wave]` table is invalid
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.display.fps == 0 {
            return Err(anyhow!("display.fps must be at least 1"));
        }
        self.wave
            .validate()
            .map_err(|e| anyhow!("Invalid [wave] settings: {e}"))
    }
}

/// Retrieves the path to the config file, creating its directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("siriwave");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("siriwave.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = SiriwaveConfig::from_toml("").unwrap();
        assert_eq!(config, SiriwaveConfig::default());
        assert_eq!(config.audio.device, "default");
        assert_eq!(config.display.fps, 60);
    }

    #[test]
    fn test_partial_tables() {
        let config = SiriwaveConfig::from_toml(
            r##"
            [audio]
            device = "2"

            [wave]
            number_of_waves = 8
            wave_color = "#3fa9f5"
            "##,
        )
        .unwrap();
        assert_eq!(config.audio.device, "2");
        assert_eq!(config.audio.meter_window_ms, 50);
        assert_eq!(config.wave.number_of_waves, 8);
        assert_eq!(config.wave.wave_color, WaveColor::rgb(0x3f, 0xa9, 0xf5));
        assert_eq!(config.wave.frequency, 1.5);
    }

    #[test]
    fn test_invalid_wave_settings_rejected() {
        let err = SiriwaveConfig::from_toml("[wave]\nnumber_of_waves = 0\n").unwrap_err();
        assert!(err.to_string().contains("number_of_waves"));
    }

    #[test]
    fn test_negative_idle_amplitude_rejected() {
        let err = SiriwaveConfig::from_toml("[wave]\nidle_amplitude = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("idle_amplitude"));
    }

    #[test]
    fn test_zero_fps_rejected() {
        assert!(SiriwaveConfig::from_toml("[display]\nfps = 0\n").is_err());
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(SiriwaveConfig::from_toml("[wave]\nwave_color = \"white\"\n").is_err());
    }

    #[test]
    fn test_serialized_form_reloads() {
        let mut config = SiriwaveConfig::default();
        config.wave.wave_color = WaveColor::rgb(1, 2, 3).with_alpha(0.5);
        config.display.fps = 30;
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("wave_color = \"#01020380\""));

        let reloaded = SiriwaveConfig::from_toml(&text).unwrap();
        assert_eq!(reloaded.display.fps, 30);
        assert_eq!(reloaded.wave.wave_color.blue, 3);
    }
}
