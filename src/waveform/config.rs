//! Tunable wave parameters and their validation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons a [`WaveConfig`] cannot drive a renderer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaveConfigError {
    #[error("number_of_waves must be at least 1")]
    NoWaves,
    #[error("density must be a positive finite number, got {0}")]
    InvalidDensity(f32),
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("idle_amplitude must not be negative, got {0}")]
    NegativeIdleAmplitude(f32),
    #[error("wave_color alpha must be within 0.0..=1.0, got {0}")]
    AlphaOutOfRange(f32),
    #[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),
}

/// Base stroke colour. Alpha is kept as a float so per-layer fading does
/// not lose precision before blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: f32,
}

impl WaveColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Returns the same colour with `alpha` replaced.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

impl Default for WaveColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for WaveColor {
    type Err = WaveConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WaveConfigError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 {
            byte(6)? as f32 / 255.0
        } else {
            1.0
        };

        Ok(Self {
            red: byte(0)?,
            green: byte(2)?,
            blue: byte(4)?,
            alpha,
        })
    }
}

impl fmt::Display for WaveColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)?;
        if self.alpha < 1.0 {
            let alpha = (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
            write!(f, "{alpha:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for WaveColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WaveColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Shape and style of the wave stack.
///
/// Owned by the caller and handed to [`super::WaveformRenderer`] at
/// construction; the renderer never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Sine cycles across the view width. Higher values give more peaks.
    pub frequency: f32,
    /// Amplitude used when the incoming level is near zero, so the idle
    /// display still moves a little.
    pub idle_amplitude: f32,
    /// Phase delta applied on every level update. Controls animation speed
    /// and direction.
    pub phase_shift: f32,
    /// Horizontal distance between sampled points. Lower is smoother and
    /// costs more per frame.
    pub density: f32,
    /// Stroke width of the primary (index 0) wave.
    pub primary_line_width: f32,
    /// Stroke width of every secondary wave.
    pub secondary_line_width: f32,
    /// Number of stacked waves.
    pub number_of_waves: usize,
    pub wave_color: WaveColor,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            frequency: 1.5,
            idle_amplitude: 0.01,
            phase_shift: -0.15,
            density: 5.0,
            primary_line_width: 3.0,
            secondary_line_width: 1.0,
            number_of_waves: 5,
            wave_color: WaveColor::WHITE,
        }
    }
}

impl WaveConfig {
    /// Rejects configurations that would divide by zero, loop forever, or
    /// feed NaN into the geometry.
    ///
    /// # Errors
    /// - If `number_of_waves` is zero
    /// - If `density` is not a positive finite number
    /// - If any other numeric field is not finite
    /// - If `idle_amplitude` is negative
    /// - If the colour alpha is outside `0.0..=1.0`
    pub fn validate(&self) -> Result<(), WaveConfigError> {
        if self.number_of_waves == 0 {
            return Err(WaveConfigError::NoWaves);
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(WaveConfigError::InvalidDensity(self.density));
        }

        let finite_fields = [
            ("frequency", self.frequency),
            ("idle_amplitude", self.idle_amplitude),
            ("phase_shift", self.phase_shift),
            ("primary_line_width", self.primary_line_width),
            ("secondary_line_width", self.secondary_line_width),
        ];
        for (field, value) in finite_fields {
            if !value.is_finite() {
                return Err(WaveConfigError::NotFinite { field, value });
            }
        }

        if self.idle_amplitude < 0.0 {
            return Err(WaveConfigError::NegativeIdleAmplitude(self.idle_amplitude));
        }

        if !(0.0..=1.0).contains(&self.wave_color.alpha) {
            return Err(WaveConfigError::AlphaOutOfRange(self.wave_color.alpha));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = WaveConfig::default();
        assert_eq!(config.number_of_waves, 5);
        assert_eq!(config.wave_color, WaveColor::WHITE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_waves_rejected() {
        let config = WaveConfig {
            number_of_waves: 0,
            ..WaveConfig::default()
        };
        assert_eq!(config.validate(), Err(WaveConfigError::NoWaves));
    }

    #[test]
    fn test_bad_density_rejected() {
        for density in [0.0, -5.0, f32::NAN, f32::INFINITY] {
            let config = WaveConfig {
                density,
                ..WaveConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(WaveConfigError::InvalidDensity(_))
            ));
        }
    }

    #[test]
    fn test_non_finite_field_named_in_error() {
        let config = WaveConfig {
            phase_shift: f32::NAN,
            ..WaveConfig::default()
        };
        match config.validate() {
            Err(WaveConfigError::NotFinite { field, .. }) => assert_eq!(field, "phase_shift"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_negative_idle_amplitude_rejected() {
        let config = WaveConfig {
            idle_amplitude: -0.5,
            ..WaveConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(WaveConfigError::NegativeIdleAmplitude(-0.5))
        );

        let silent = WaveConfig {
            idle_amplitude: 0.0,
            ..WaveConfig::default()
        };
        assert!(silent.validate().is_ok());
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let config = WaveConfig {
            wave_color: WaveColor::WHITE.with_alpha(1.5),
            ..WaveConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(WaveConfigError::AlphaOutOfRange(1.5))
        );
    }

    #[test]
    fn test_color_parse() {
        let color: WaveColor = "#3fa9f5".parse().unwrap();
        assert_eq!((color.red, color.green, color.blue), (0x3f, 0xa9, 0xf5));
        assert_eq!(color.alpha, 1.0);

        let translucent: WaveColor = "#FF000080".parse().unwrap();
        assert_eq!(translucent.red, 255);
        assert_approx_eq!(translucent.alpha, 128.0 / 255.0, 1e-6);
    }

    #[test]
    fn test_color_parse_rejects_garbage() {
        for input in ["ffffff", "#fff", "#gggggg", "#ffffffff00", "#ffé000"] {
            assert!(input.parse::<WaveColor>().is_err(), "accepted {input}");
        }
    }

    #[test]
    fn test_color_display() {
        assert_eq!(WaveColor::rgb(0, 128, 255).to_string(), "#0080ff");
        assert_eq!(
            WaveColor::rgb(0, 128, 255).with_alpha(0.5).to_string(),
            "#0080ff80"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: WaveConfig = toml::from_str(
            r##"
            number_of_waves = 3
            wave_color = "#00ff00"
            "##,
        )
        .unwrap();
        assert_eq!(config.number_of_waves, 3);
        assert_eq!(config.wave_color, WaveColor::rgb(0, 255, 0));
        assert_eq!(config.density, 5.0);
        assert_eq!(config.phase_shift, -0.15);
    }
}
