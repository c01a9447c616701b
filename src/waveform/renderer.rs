//! Multi-wave geometry synthesis.
//!
//! [`WaveformRenderer`] keeps the animation phase and current amplitude. Each
//! level update nudges the phase; each render produces one polyline per wave
//! layer, fading and shrinking from the primary wave outwards.

use std::f32::consts::PI;

use super::config::{WaveColor, WaveConfig, WaveConfigError};

/// Upper bound on vertices per layer. Wider views are cut off at the right.
pub const MAX_POINTS_PER_LAYER: usize = 1 << 16;

/// Size of the drawing area in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A polyline vertex. `y` grows downward from the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One wave of a rendered frame, ready to be stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLayer {
    /// Position in the stack; 0 is the primary wave.
    pub index: usize,
    pub stroke_width: f32,
    /// Opacity factor applied to the base colour, within roughly 1/3..=1.
    pub alpha_multiplier: f32,
    /// Height factor for this layer. Negative values flip the wave.
    pub normalized_amplitude: f32,
    /// Base colour with the layer's alpha already applied.
    pub color: WaveColor,
    /// Ordered vertices; the first one starts the path.
    pub points: Vec<Point>,
}

impl WaveLayer {
    /// Consecutive vertex pairs, one per straight segment of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }
}

/// Animation state plus the configuration it is rendered with.
///
/// Not synchronized. Level updates and renders must come from the same
/// thread, or be serialized by the caller.
#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    config: WaveConfig,
    phase: f32,
    amplitude: f32,
    redraw_requested: bool,
}

impl WaveformRenderer {
    /// Creates a renderer at phase 0 and full amplitude.
    ///
    /// # Errors
    /// - If the configuration fails [`WaveConfig::validate`]
    pub fn new(config: WaveConfig) -> Result<Self, WaveConfigError> {
        config.validate()?;
        tracing::debug!(
            waves = config.number_of_waves,
            frequency = config.frequency,
            density = config.density,
            "Waveform renderer created"
        );
        Ok(Self {
            config,
            phase: 0.0,
            amplitude: 1.0,
            redraw_requested: true,
        })
    }

    /// Feeds a new normalized level and advances the animation by one step.
    ///
    /// The amplitude never drops below `idle_amplitude` and is not capped
    /// above.
    pub fn update_level(&mut self, level: f32) {
        self.phase += self.config.phase_shift;
        self.amplitude = level.max(self.config.idle_amplitude);
        self.redraw_requested = true;
    }

    /// Returns whether state changed since the last call, clearing the flag.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Synthesizes every wave layer for a view of the given size.
    ///
    /// Layers come back in draw order, primary wave first. Degenerate bounds
    /// (zero or negative width, non-finite sizes) produce no layers.
    pub fn render(&self, bounds: Bounds) -> Vec<WaveLayer> {
        if !bounds.width.is_finite() || !bounds.height.is_finite() || bounds.width <= 0.0 {
            return Vec::new();
        }

        (0..self.config.number_of_waves)
            .map(|index| self.render_layer(index, bounds))
            .collect()
    }

    fn render_layer(&self, index: usize, bounds: Bounds) -> WaveLayer {
        let config = &self.config;
        let waves = config.number_of_waves as f32;

        let stroke_width = if index == 0 {
            config.primary_line_width
        } else {
            config.secondary_line_width
        };

        let half_height = bounds.height / 2.0;
        let width = bounds.width;
        let mid = width / 2.0;

        // Keep the stroke inside the view at the crest.
        let max_amplitude = half_height - stroke_width * 2.0;

        let progress = 1.0 - index as f32 / waves;
        let normalized_amplitude = (1.5 * progress - 2.0 / waves) * self.amplitude;
        let alpha_multiplier = (progress / 3.0 * 2.0 + 1.0 / 3.0).min(1.0);
        let color = config
            .wave_color
            .with_alpha(alpha_multiplier * config.wave_color.alpha);

        let limit = width + config.density;
        let steps = ((limit / config.density).ceil() as usize)
            .saturating_add(1)
            .min(MAX_POINTS_PER_LAYER);
        let points = (0..steps)
            .map(|step| step as f32 * config.density)
            .take_while(|&x| x < limit)
            .map(|x| {
                let envelope = -((x - mid) / mid).powi(2) + 1.0;
                let y = envelope
                    * max_amplitude
                    * normalized_amplitude
                    * (2.0 * PI * (x / width) * config.frequency + self.phase).sin()
                    + half_height;
                Point { x, y }
            })
            .collect();

        WaveLayer {
            index,
            stroke_width,
            alpha_multiplier,
            normalized_amplitude,
            color,
            points,
        }
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn renderer() -> WaveformRenderer {
        WaveformRenderer::new(WaveConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let renderer = renderer();
        assert_eq!(renderer.phase(), 0.0);
        assert_eq!(renderer.amplitude(), 1.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = WaveConfig {
            number_of_waves: 0,
            ..WaveConfig::default()
        };
        assert!(WaveformRenderer::new(config).is_err());
    }

    #[test]
    fn test_update_level_steps_phase() {
        let mut renderer = renderer();
        renderer.update_level(0.5);
        assert_eq!(renderer.amplitude(), 0.5);
        assert_approx_eq!(renderer.phase(), -0.15, 1e-6);

        renderer.update_level(0.5);
        assert_eq!(renderer.amplitude(), 0.5);
        assert_approx_eq!(renderer.phase(), -0.30, 1e-6);
    }

    #[test]
    fn test_update_level_enforces_idle_floor() {
        let mut renderer = renderer();
        for level in [0.0, -1.0, 0.005, f32::NAN] {
            renderer.update_level(level);
            assert_eq!(renderer.amplitude(), 0.01, "level = {level}");
        }
    }

    #[test]
    fn test_update_level_does_not_cap_overshoot() {
        let mut renderer = renderer();
        renderer.update_level(1.7);
        assert_eq!(renderer.amplitude(), 1.7);
    }

    #[test]
    fn test_phase_decreases_monotonically() {
        let mut renderer = renderer();
        let mut previous = renderer.phase();
        for _ in 0..100 {
            renderer.update_level(0.3);
            assert!(renderer.phase() < previous);
            assert_approx_eq!(previous - renderer.phase(), 0.15, 1e-4);
            previous = renderer.phase();
        }
    }

    #[test]
    fn test_redraw_request_flag() {
        let mut renderer = renderer();
        assert!(renderer.take_redraw_request());
        assert!(!renderer.take_redraw_request());
        renderer.update_level(0.2);
        assert!(renderer.take_redraw_request());
        assert!(!renderer.take_redraw_request());
    }

    #[test]
    fn test_layer_count_and_widths() {
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(300.0, 100.0));
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0].stroke_width, 3.0);
        for (i, layer) in layers.iter().enumerate().skip(1) {
            assert_eq!(layer.index, i);
            assert_eq!(layer.stroke_width, 1.0);
        }
    }

    #[test]
    fn test_single_wave() {
        let config = WaveConfig {
            number_of_waves: 1,
            ..WaveConfig::default()
        };
        let renderer = WaveformRenderer::new(config).unwrap();
        let layers = renderer.render(Bounds::new(120.0, 60.0));
        assert_eq!(layers.len(), 1);
        // (1.5 * 1 - 2 / 1) * 1.0
        assert_approx_eq!(layers[0].normalized_amplitude, -0.5, 1e-6);
    }

    #[test]
    fn test_point_count_overshoots_by_one_step() {
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(300.0, 100.0));
        for layer in &layers {
            // x = 0, 5, ..., 300
            assert_eq!(layer.points.len(), 61);
            assert_eq!(layer.points.first().unwrap().x, 0.0);
            assert_eq!(layer.points.last().unwrap().x, 300.0);
            assert_eq!(layer.segments().count(), 60);
        }

        let ragged = renderer.render(Bounds::new(302.0, 100.0));
        // The last sample lands past the right edge.
        assert_eq!(ragged[0].points.len(), 62);
        assert_eq!(ragged[0].points.last().unwrap().x, 305.0);
    }

    #[test]
    fn test_reference_frame() {
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(300.0, 100.0));
        let primary = &layers[0];

        assert_eq!(primary.stroke_width, 3.0);
        assert_approx_eq!(primary.normalized_amplitude, 1.1, 1e-6);
        assert_eq!(primary.alpha_multiplier, 1.0);

        // Envelope is zero at the left edge.
        assert_eq!(primary.points[0].y, 50.0);

        // At the centre the envelope is 1 and sin(1.5 * pi) = -1.
        let max_amplitude = 50.0 - 3.0 * 2.0;
        let centre = primary.points.iter().find(|p| p.x == 150.0).unwrap();
        assert_approx_eq!(centre.y, 50.0 - max_amplitude * 1.1, 1e-3);
    }

    #[test]
    fn test_layer_amplitudes_and_alpha() {
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(300.0, 100.0));

        let expected_amplitude = [1.1, 0.8, 0.5, 0.2, -0.1];
        let expected_alpha = [1.0, 0.866_666_7, 0.733_333_3, 0.6, 0.466_666_7];
        for (layer, (amplitude, alpha)) in layers
            .iter()
            .zip(expected_amplitude.iter().zip(expected_alpha.iter()))
        {
            assert_approx_eq!(layer.normalized_amplitude, *amplitude, 1e-5);
            assert_approx_eq!(layer.alpha_multiplier, *alpha, 1e-5);
            assert_approx_eq!(layer.color.alpha, *alpha, 1e-5);
            assert_eq!(layer.color.red, 255);
        }
    }

    #[test]
    fn test_alpha_scales_base_color_alpha() {
        let config = WaveConfig {
            wave_color: WaveColor::rgb(10, 20, 30).with_alpha(0.5),
            ..WaveConfig::default()
        };
        let renderer = WaveformRenderer::new(config).unwrap();
        let layers = renderer.render(Bounds::new(100.0, 50.0));
        assert_approx_eq!(layers[0].color.alpha, 0.5, 1e-6);
        assert_approx_eq!(layers[3].color.alpha, 0.3, 1e-6);
        assert_eq!(layers[3].color.blue, 30);
    }

    #[test]
    fn test_points_stay_within_envelope() {
        let mut renderer = renderer();
        renderer.update_level(0.8);
        renderer.update_level(0.8);
        let bounds = Bounds::new(300.0, 100.0);
        let half_height = bounds.height / 2.0;

        for layer in renderer.render(bounds) {
            let max_amplitude = half_height - layer.stroke_width * 2.0;
            let reach = max_amplitude * layer.normalized_amplitude.abs();
            for point in layer.points.iter().filter(|p| p.x <= bounds.width) {
                assert!(
                    (point.y - half_height).abs() <= reach + 1e-3,
                    "layer {} point {:?} outside +/-{}",
                    layer.index,
                    point,
                    reach
                );
            }
        }
    }

    #[test]
    fn test_phase_moves_the_wave() {
        let mut renderer = renderer();
        let bounds = Bounds::new(300.0, 100.0);
        let before = renderer.render(bounds);
        renderer.update_level(1.0);
        let after = renderer.render(bounds);
        assert_ne!(before[0].points[10].y, after[0].points[10].y);
    }

    #[test]
    fn test_degenerate_bounds_render_nothing() {
        let renderer = renderer();
        assert!(renderer.render(Bounds::new(0.0, 100.0)).is_empty());
        assert!(renderer.render(Bounds::new(-10.0, 100.0)).is_empty());
        assert!(renderer.render(Bounds::new(f32::NAN, 100.0)).is_empty());
        assert!(renderer.render(Bounds::new(100.0, f32::INFINITY)).is_empty());
    }

    #[test]
    fn test_huge_width_is_capped() {
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(1e10, 100.0));
        assert_eq!(layers.len(), 5);
        for layer in &layers {
            assert_eq!(layer.points.len(), MAX_POINTS_PER_LAYER);
            assert_eq!(layer.points[1].x, 5.0);
        }
    }

    #[test]
    fn test_tiny_height_keeps_formula() {
        // max_amplitude goes negative here; the wave flips rather than erroring.
        let renderer = renderer();
        let layers = renderer.render(Bounds::new(100.0, 4.0));
        assert_eq!(layers.len(), 5);
        assert!(layers.iter().all(|l| l.points.iter().all(|p| p.y.is_finite())));
    }
}
