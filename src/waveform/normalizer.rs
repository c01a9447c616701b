//! Decibel to perceptual amplitude conversion.

/// Readings below this level are treated as silence.
pub const MIN_DECIBELS: f32 = -60.0;

/// Reported for an empty or all-zero sample window.
pub const SILENCE_DB: f32 = -160.0;

/// Converts an average-power reading in dBFS into a [0, 1] amplitude.
///
/// The level is rescaled so that `MIN_DECIBELS` maps to 0 and full scale to
/// 1, then passed through a square root so quiet speech still moves the
/// waves visibly.
///
/// Exactly 0.0 dB is treated as "no signal" and returns 0.0, like anything
/// quieter than `MIN_DECIBELS`. Non-finite readings also return 0.0, and
/// readings above full scale saturate at 1.0.
pub fn normalized_power_level(decibels: f32) -> f32 {
    if !decibels.is_finite() || decibels < MIN_DECIBELS || decibels == 0.0 {
        return 0.0;
    }

    let low_threshold = 10f32.powf(0.05 * MIN_DECIBELS);
    let scaled = 10f32.powf(0.05 * decibels);
    let level = ((scaled - low_threshold) * (1.0 / (1.0 - low_threshold))).powf(0.5);

    level.min(1.0)
}

/// Average power of a block of samples in dBFS.
///
/// Samples are expected in the -1.0..=1.0 range.
pub fn average_power_db(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return SILENCE_DB;
    }

    let mean_square =
        samples.iter().map(|&s| (s as f64) * (s as f64)).sum::<f64>() / samples.len() as f64;
    let rms = mean_square.sqrt() as f32;

    if rms > 0.0 {
        (20.0 * rms.log10()).max(SILENCE_DB)
    } else {
        SILENCE_DB
    }
}
