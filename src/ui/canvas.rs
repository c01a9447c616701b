//! Braille canvas backend for wave layers.
//!
//! Wave geometry is in "points" with y growing downward. One point maps to one
//! braille dot, so a cell is 2 points wide and 4 points tall.

use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::canvas::{Canvas, Line as CanvasLine},
};

use crate::waveform::{Bounds, WaveColor, WaveLayer};

/// Braille dots per terminal cell, horizontally and vertically.
const DOTS_PER_CELL: (u16, u16) = (2, 4);

/// Geometry bounds matching the dot resolution of `area`.
pub fn canvas_bounds(area: Rect) -> Bounds {
    Bounds::new(
        f32::from(area.width) * f32::from(DOTS_PER_CELL.0),
        f32::from(area.height) * f32::from(DOTS_PER_CELL.1),
    )
}

/// Mixes `color` over an opaque `background` using the colour's alpha.
///
/// Terminal cells have no alpha channel, so translucent layers are
/// pre-blended here.
pub fn blend(color: WaveColor, background: WaveColor) -> Color {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| {
        let (fg, bg) = (f32::from(fg), f32::from(bg));
        (bg + (fg - bg) * alpha).round().clamp(0.0, 255.0) as u8
    };
    Color::Rgb(
        mix(color.red, background.red),
        mix(color.green, background.green),
        mix(color.blue, background.blue),
    )
}

/// Vertical offsets, in dots, of the parallel passes that fake a stroke
/// width. Always at least one pass, centred on the line.
fn stroke_offsets(stroke_width: f32) -> impl Iterator<Item = f64> {
    let passes = stroke_width.round().max(1.0) as usize;
    let centre = (passes - 1) as f64 / 2.0;
    (0..passes).map(move |pass| pass as f64 - centre)
}

/// Strokes one frame's wave layers in order, later layers on top.
pub struct WaveCanvas<'a> {
    layers: &'a [WaveLayer],
    bounds: Bounds,
    background: WaveColor,
}

impl<'a> WaveCanvas<'a> {
    /// `bounds` must be the bounds the layers were rendered for.
    pub fn new(layers: &'a [WaveLayer], bounds: Bounds, background: WaveColor) -> Self {
        Self {
            layers,
            bounds,
            background,
        }
    }
}

impl Widget for WaveCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let width = f64::from(self.bounds.width);
        let height = f64::from(self.bounds.height);
        let dot_height = height / (f64::from(area.height) * f64::from(DOTS_PER_CELL.1));
        let background = Color::Rgb(
            self.background.red,
            self.background.green,
            self.background.blue,
        );

        Canvas::default()
            .marker(Marker::Braille)
            .background_color(background)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for layer in self.layers {
                    let color = blend(layer.color, self.background);
                    for offset in stroke_offsets(layer.stroke_width) {
                        let dy = offset * dot_height;
                        for (from, to) in layer.segments() {
                            // Canvas y grows upward.
                            ctx.draw(&CanvasLine {
                                x1: f64::from(from.x),
                                y1: height - f64::from(from.y) + dy,
                                x2: f64::from(to.x),
                                y2: height - f64::from(to.y) + dy,
                                color,
                            });
                        }
                    }
                }
            })
            .render(area, buf);
    }
}
