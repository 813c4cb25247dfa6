//! Synthwave perspective grid
//!
//! Nothing here is pooled. Every frame is a pure function of the viewport
//! size and a time counter that advances by a fixed step per frame, so the
//! sky, sun, grid lines and stars are recomputed from scratch each time.

use backdrop_animation::FrameTime;
use backdrop_core::ViewportSize;
use backdrop_paint::{Canvas, Color, Gradient, GradientStop, PaintContext, PathBuilder, Point};

use super::Scene;
use crate::config::{BackdropConfig, PerspectiveConfig};
use crate::error::{BackdropError, Result};
use crate::surface::Surface;

/// Spacing of vertical lines at the horizon
const GRID_SPACING: f32 = 50.0;
/// Vertical sampling step for the curved lines
const LINE_STEP: f32 = 5.0;
const LINE_WIDTH: f32 = 2.0;
const PEAK_LINE_OPACITY: f32 = 0.8;

fn neon_pink() -> Color {
    Color::from_rgba8(255, 41, 117, 255)
}

fn neon_cyan() -> Color {
    Color::from_rgba8(0, 255, 255, 255)
}

/// Horizon height for a viewport
pub fn horizon(size: ViewportSize) -> f32 {
    size.height * 0.8
}

/// Opacity of horizontal line `i` (1-based) out of `count`
pub fn horizontal_opacity(i: u32, count: u32) -> f32 {
    (1.0 - i as f32 / count.max(1) as f32) * PEAK_LINE_OPACITY
}

/// Height of horizontal line `i`, `None` once it would sit above the top edge
pub fn horizontal_y(i: u32, size: ViewportSize) -> Option<f32> {
    let y = horizon(size) - (i as f32).powf(1.5) * 15.0;
    (y >= 0.0).then_some(y)
}

/// Opacity of vertical line `i` in `-count..=count`
pub fn vertical_opacity(i: i32, count: u32) -> f32 {
    (1.0 - i.unsigned_abs() as f32 / count.max(1) as f32) * PEAK_LINE_OPACITY
}

/// Horizontal position of vertical line `i` at height `y`
pub fn vertical_x(i: i32, y: f32, size: ViewportSize, time: f32) -> f32 {
    let horizon = horizon(size);
    let progress = (y - horizon) / (size.height - horizon);
    let spread = i as f32 * GRID_SPACING * (1.0 + progress * 2.0);
    let wave = (time + y * 0.01).sin() * 10.0 * progress;
    size.width / 2.0 + spread + wave
}

/// One star in the drifting field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarSample {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Stable radius in [1, 3) for star `index`
fn star_radius(index: u32) -> f32 {
    let hash = index.wrapping_add(1).wrapping_mul(0x9E37_79B1);
    1.0 + (hash >> 8) as f32 / (1u32 << 24) as f32 * 2.0
}

/// Position of star `index` of `count` at `time`
pub fn star_sample(index: u32, count: u32, size: ViewportSize, time: f32) -> StarSample {
    let i = index as f32;
    let half_width = size.width * 0.5;
    let band = horizon(size) * 0.9;
    StarSample {
        x: (i * 0.1 + time * 0.3).sin() * half_width + half_width,
        y: (i * size.height / count.max(1) as f32 + time * 50.0).rem_euclid(band),
        radius: star_radius(index),
    }
}

/// Synthwave scene
pub struct PerspectiveGrid {
    canvas: Box<dyn Canvas>,
    paint: PaintContext,
    config: PerspectiveConfig,
    size: ViewportSize,
    time: f32,
}

impl PerspectiveGrid {
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    fn draw_sky(&mut self) {
        let (w, h) = (self.size.width, self.size.height);
        let sky = Gradient::linear(
            Point::ZERO,
            Point::new(0.0, h),
            vec![
                GradientStop::new(0.0, Color::from_hex(0x120458)),
                GradientStop::new(0.6, Color::from_hex(0x0d0221)),
            ],
        );
        self.paint.fill_rect(0.0, 0.0, w, h, sky);
    }

    fn draw_sun(&mut self) {
        let center = Point::new(self.size.width / 2.0, self.size.height * 0.85);
        let radius = self.size.height * 0.3;
        let red = Color::from_hex(0xfc1142);
        let sun = Gradient::radial(
            center,
            radius,
            vec![
                GradientStop::new(0.0, Color::from_hex(0xff2975)),
                GradientStop::new(0.5, red),
                GradientStop::new(1.0, red.with_alpha(0.0)),
            ],
        );
        self.paint.fill_circle(center.x, center.y, radius, sun);
    }

    fn draw_horizontal_lines(&mut self) {
        let count = self.config.horizontal_lines;
        for i in 1..=count {
            let Some(y) = horizontal_y(i, self.size) else {
                continue;
            };
            let line = PathBuilder::new()
                .segment(Point::new(0.0, y), Point::new(self.size.width, y))
                .build();
            let color = neon_pink().with_alpha(horizontal_opacity(i, count));
            self.paint.stroke_path(line, color, LINE_WIDTH);
        }
    }

    fn draw_vertical_lines(&mut self) {
        let count = self.config.vertical_lines as i32;
        let horizon = horizon(self.size);
        for i in -count..=count {
            let mut line = PathBuilder::new().move_to(vertical_x(i, horizon, self.size, self.time), horizon);
            let mut y = horizon;
            while y <= self.size.height {
                line = line.line_to(vertical_x(i, y, self.size, self.time), y);
                y += LINE_STEP;
            }
            let color = neon_cyan().with_alpha(vertical_opacity(i, self.config.vertical_lines));
            self.paint.stroke_path(line.build(), color, LINE_WIDTH);
        }
    }

    fn draw_stars(&mut self) {
        let white = Color::WHITE.with_alpha(0.8);
        let count = self.config.star_count;
        for i in 0..count {
            let star = star_sample(i, count, self.size, self.time);
            self.paint.fill_circle(star.x, star.y, star.radius, white);
        }
    }
}

impl Scene for PerspectiveGrid {
    const NAME: &'static str = "synthwave";

    fn create(config: &BackdropConfig, surface: &mut dyn Surface, size: ViewportSize) -> Result<Self> {
        let canvas = surface.canvas_2d().ok_or_else(|| {
            BackdropError::SurfaceUnavailable("2D canvas context unavailable".to_string())
        })?;
        Ok(Self {
            canvas,
            paint: PaintContext::new(),
            config: config.perspective.clone(),
            size,
            time: 0.0,
        })
    }

    fn frame(&mut self, _time: FrameTime) {
        if self.size.is_degenerate() {
            return;
        }
        self.time += self.config.time_step;

        self.draw_sky();
        self.draw_sun();
        self.draw_horizontal_lines();
        self.draw_vertical_lines();
        self.draw_stars();

        let commands = self.paint.take_commands();
        tracing::trace!(commands = commands.len(), "synthwave frame");
        self.canvas.submit(commands);
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use backdrop_paint::PaintCommand;

    const SIZE: ViewportSize = ViewportSize::new(800.0, 600.0);

    fn frame() -> FrameTime {
        FrameTime {
            timestamp_ms: 0.0,
            delta_ms: 16.0,
            frame: 0,
        }
    }

    #[test]
    fn test_horizontal_opacity_non_increasing() {
        let opacities: Vec<f32> = (1..=20).map(|i| horizontal_opacity(i, 20)).collect();
        assert!(opacities.windows(2).all(|w| w[0] >= w[1]));
        assert!((opacities[0] - 0.76).abs() < 1e-6);
        assert_eq!(opacities[19], 0.0);
    }

    #[test]
    fn test_lines_above_top_are_skipped() {
        // horizon 480: 15 * i^1.5 > 480 once i > ~10.08
        assert!(horizontal_y(10, SIZE).is_some());
        assert!(horizontal_y(11, SIZE).is_none());
    }

    #[test]
    fn test_vertical_lines_fan_out() {
        let time = 0.0;
        let at_horizon = vertical_x(3, horizon(SIZE), SIZE, time);
        let at_bottom = vertical_x(3, SIZE.height, SIZE, time);
        assert_eq!(at_horizon, 400.0 + 150.0);
        // spread triples at the bottom edge, plus the wave term
        assert!((at_bottom - (400.0 + 450.0 + (6.0f32).sin() * 10.0)).abs() < 1e-3);
        assert_eq!(vertical_x(0, horizon(SIZE), SIZE, 1.0), 400.0);
    }

    #[test]
    fn test_stars_are_pure() {
        let a = star_sample(17, 100, SIZE, 2.5);
        let b = star_sample(17, 100, SIZE, 2.5);
        assert_eq!(a, b);
        for i in 0..100 {
            let star = star_sample(i, 100, SIZE, 3.0);
            assert!(star.radius >= 1.0 && star.radius < 3.0);
            assert!(star.y >= 0.0 && star.y < horizon(SIZE) * 0.9);
            assert!(star.x >= 0.0 && star.x <= 800.0);
        }
    }

    #[test]
    fn test_frame_contents() {
        let config = BackdropConfig::default();
        let mut surface = HeadlessSurface::new();
        let mut scene = PerspectiveGrid::create(&config, &mut surface, SIZE).unwrap();
        scene.frame(frame());
        assert!((scene.time() - 0.01).abs() < 1e-6);

        let commands = surface.canvas().unwrap().last_frame();
        let fills = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::FillCircle { .. }))
            .count();
        let strokes = commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::StrokePath { .. }))
            .count();
        // sun plus 100 stars; 10 visible horizontal lines plus 41 verticals
        assert_eq!(fills, 101);
        assert_eq!(strokes, 10 + 41);
        assert!(matches!(commands[0], PaintCommand::FillRect { .. }));
    }

    #[test]
    fn test_zero_line_counts_keep_alpha_finite() {
        assert_eq!(vertical_opacity(0, 0), PEAK_LINE_OPACITY);
        assert!(horizontal_opacity(1, 0).is_finite());

        let mut config = BackdropConfig::default();
        config.perspective.vertical_lines = 0;
        config.perspective.horizontal_lines = 0;
        let mut surface = HeadlessSurface::new();
        let mut scene = PerspectiveGrid::create(&config, &mut surface, SIZE).unwrap();
        scene.frame(frame());

        let commands = surface.canvas().unwrap().last_frame();
        let strokes: Vec<f32> = commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::StrokePath { style, .. } => Some(style.color.a),
                _ => None,
            })
            .collect();
        // only the center vertical line remains
        assert_eq!(strokes.len(), 1);
        assert!(strokes.iter().all(|a| a.is_finite()));
    }

    #[test]
    fn test_degenerate_size_draws_nothing() {
        let config = BackdropConfig::default();
        let mut surface = HeadlessSurface::new();
        let mut scene =
            PerspectiveGrid::create(&config, &mut surface, ViewportSize::new(800.0, 0.0)).unwrap();
        scene.frame(frame());
        assert_eq!(surface.canvas().unwrap().frame_count(), 0);
        assert_eq!(scene.time(), 0.0);

        scene.resize(SIZE);
        scene.frame(frame());
        assert_eq!(surface.canvas().unwrap().frame_count(), 1);
    }
}
