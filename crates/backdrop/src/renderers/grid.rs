//! Symbol rain over a pulsing grid
//!
//! A pool of glyph columns, each following one of four motion patterns, is
//! drawn over a slowly rotating diagonal grid with rings and spokes. The
//! surface is never cleared; a translucent black fill each frame leaves
//! fading trails behind the glyphs.
//!
//! Columns advance on their own cadence rather than every frame: a column
//! accumulates frame time and only draws and moves once the accumulator
//! exceeds `cadence / speed`.

use std::f32::consts::{FRAC_PI_4, TAU};

use backdrop_animation::FrameTime;
use backdrop_core::ViewportSize;
use backdrop_paint::{Canvas, Color, PaintContext, PathBuilder, Point, Transform2D};
use rand::rngs::SmallRng;
use rand::Rng;

use super::Scene;
use crate::config::{BackdropConfig, GridConfig};
use crate::error::{BackdropError, Result};
use crate::rng::scene_rng;
use crate::surface::Surface;

const KANA_AND_SIGNS: &str = "01234567890アイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワヲンΔΘΛΞΠΣΦΨΩ∞⊕⊗∭∂∫≈≠≤≥⌈⌉⌊⌋";
const CODE_SIGNS: &str = "{}[]()<>:;+-*/=&|!?%@#$_~";
const DIGITS: &str = "0123456789";

/// Columns closer than this to the center respawn on the outer circle
const VORTEX_CORE_RADIUS: f32 = 20.0;
/// How far past the side edges a column may drift before it resets
const EDGE_MARGIN: f32 = 50.0;

/// Glyphs a column can show
#[derive(Clone, Debug)]
pub struct GlyphSet {
    glyphs: Vec<char>,
    digits: Vec<char>,
}

impl GlyphSet {
    /// Kana, Greek, math and code signs, with digits weighted up
    pub fn standard() -> Self {
        let mut glyphs: Vec<char> = KANA_AND_SIGNS.chars().chain(CODE_SIGNS.chars()).collect();
        for _ in 0..3 {
            glyphs.extend(DIGITS.chars());
        }
        Self {
            glyphs,
            digits: DIGITS.chars().collect(),
        }
    }

    pub fn pick(&self, rng: &mut impl Rng) -> char {
        self.glyphs[rng.gen_range(0..self.glyphs.len())]
    }

    pub fn pick_digit(&self, rng: &mut impl Rng) -> char {
        self.digits[rng.gen_range(0..self.digits.len())]
    }

    /// Glyph for a column moving in `direction`; vortex columns favor digits
    pub fn pick_for(&self, direction: Direction, rng: &mut impl Rng) -> char {
        if direction == Direction::Vortex && rng.gen_bool(0.4) {
            self.pick_digit(rng)
        } else {
            self.pick(rng)
        }
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.glyphs.contains(&glyph)
    }
}

/// Column motion pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Down and to the left
    Left,
    /// Down and to the right
    Right,
    /// Straight toward the viewport center
    Center,
    /// Inward spiral around the viewport center
    Vortex,
}

impl Direction {
    /// Draw pool; vortex is three times as likely as the others
    const WEIGHTED: [Direction; 6] = [
        Direction::Left,
        Direction::Right,
        Direction::Center,
        Direction::Vortex,
        Direction::Vortex,
        Direction::Vortex,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::WEIGHTED[rng.gen_range(0..Self::WEIGHTED.len())]
    }
}

/// One glyph column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
    pub glyph: char,
    /// Font size in pixels
    pub size: f32,
    pub opacity: f32,
    /// Green channel of the glyph color
    pub green: u8,
    pub speed: f32,
    /// Milliseconds between advances at speed 1
    pub cadence_ms: f32,
    /// Milliseconds since the last advance
    pub accumulator_ms: f32,
}

fn random_speed(direction: Direction, rng: &mut impl Rng) -> f32 {
    let speed = rng.gen_range(0.5..2.0);
    if direction == Direction::Vortex {
        speed * 0.5
    } else {
        speed
    }
}

fn random_cadence(rng: &mut impl Rng) -> f32 {
    rng.gen_range(20.0..220.0)
}

fn random_green(rng: &mut impl Rng) -> u8 {
    rng.gen_range(205..255)
}

/// Radius of the circle vortex columns start on
pub fn vortex_radius(size: ViewportSize) -> f32 {
    size.min_side() * 0.4
}

fn on_vortex_circle(size: ViewportSize, rng: &mut impl Rng) -> (f32, f32) {
    let (cx, cy) = size.center();
    let angle = rng.gen_range(0.0..TAU);
    let radius = vortex_radius(size);
    (cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// Number of columns for a viewport width
pub fn column_count(width: f32, config: &GridConfig) -> usize {
    if !(width > 0.0) || !(config.glyph_size > 0.0) {
        return 0;
    }
    ((width / config.glyph_size).floor() * config.column_density).floor() as usize
}

impl Column {
    /// A fresh column at its initial spawn position
    pub fn spawn(size: ViewportSize, glyph_size: f32, glyphs: &GlyphSet, rng: &mut SmallRng) -> Self {
        let (w, h) = (size.width, size.height);
        let direction = Direction::random(rng);

        let (x, y) = match direction {
            Direction::Left => (w - rng.gen::<f32>() * w * 0.5, rng.gen::<f32>() * h * 0.3),
            Direction::Right => (rng.gen::<f32>() * w * 0.5, rng.gen::<f32>() * h * 0.3),
            Direction::Center => (rng.gen::<f32>() * w, rng.gen::<f32>() * h * 0.3),
            Direction::Vortex => on_vortex_circle(size, rng),
        };

        let glyph = glyphs.pick_for(direction, rng);
        let opacity = rng.gen_range(0.5..1.0);
        let size_px = rng.gen_range(glyph_size..glyph_size + 10.0);
        let green = random_green(rng);
        let cadence_ms = random_cadence(rng);

        Self {
            x,
            y,
            direction,
            glyph,
            size: size_px,
            opacity,
            green,
            speed: random_speed(direction, rng),
            cadence_ms,
            accumulator_ms: rng.gen_range(0.0..500.0),
        }
    }

    /// Whether enough time has accumulated to advance
    pub fn is_due(&self) -> bool {
        self.accumulator_ms > self.cadence_ms / self.speed
    }

    pub fn color(&self) -> Color {
        Color::rgba8(0, self.green, 0, self.opacity)
    }

    /// Move one step along the motion pattern
    pub fn step(&mut self, size: ViewportSize, rng: &mut SmallRng) {
        let s = self.speed;
        match self.direction {
            Direction::Left => {
                self.x -= s;
                self.y += s;
            }
            Direction::Right => {
                self.x += s;
                self.y += s;
            }
            Direction::Center => {
                let (cx, cy) = size.center();
                let bearing = (cy - self.y).atan2(cx - self.x);
                self.x += bearing.cos() * s;
                self.y += bearing.sin() * s;
            }
            Direction::Vortex => {
                let (cx, cy) = size.center();
                let (dx, dy) = (self.x - cx, self.y - cy);
                let angle = dy.atan2(dx) + s * 0.02;
                let radius = (dx * dx + dy * dy).sqrt() - s * 0.2;
                if radius < VORTEX_CORE_RADIUS {
                    (self.x, self.y) = on_vortex_circle(size, rng);
                } else {
                    self.x = cx + angle.cos() * radius;
                    self.y = cy + angle.sin() * radius;
                }
            }
        }
    }

    pub fn is_out_of_bounds(&self, size: ViewportSize) -> bool {
        self.y > size.height || self.x < -EDGE_MARGIN || self.x > size.width + EDGE_MARGIN
    }

    /// Respawn in place after leaving the viewport
    pub fn reset(&mut self, size: ViewportSize, glyph_size: f32, glyphs: &GlyphSet, rng: &mut SmallRng) {
        let (w, h) = (size.width, size.height);
        (self.x, self.y) = match self.direction {
            Direction::Left => (w - rng.gen::<f32>() * w * 0.3, rng.gen::<f32>() * h * 0.3),
            Direction::Right => (rng.gen::<f32>() * w * 0.3, rng.gen::<f32>() * h * 0.3),
            Direction::Center => match rng.gen_range(0..4) {
                0 => (rng.gen::<f32>() * w, 0.0),
                1 => (w, rng.gen::<f32>() * h),
                2 => (rng.gen::<f32>() * w, h),
                _ => (0.0, rng.gen::<f32>() * h),
            },
            Direction::Vortex => on_vortex_circle(size, rng),
        };

        self.speed = random_speed(self.direction, rng);
        self.size = rng.gen_range(glyph_size..glyph_size + 10.0);
        self.cadence_ms = random_cadence(rng);
        self.glyph = glyphs.pick_for(self.direction, rng);
        self.green = random_green(rng);
    }
}

/// Symbol rain scene
pub struct GridParticles {
    canvas: Box<dyn Canvas>,
    paint: PaintContext,
    config: GridConfig,
    glyphs: GlyphSet,
    rng: SmallRng,
    columns: Vec<Column>,
    size: ViewportSize,
    pulse_phase: f32,
    vortex_angle: f32,
}

impl GridParticles {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn pulse_phase(&self) -> f32 {
        self.pulse_phase
    }

    /// Overlay brightness, oscillating in [0.6, 1.0]
    pub fn intensity(&self) -> f32 {
        self.pulse_phase.sin() * 0.2 + 0.8
    }

    fn regenerate(&mut self) {
        self.columns.clear();
        if self.size.is_degenerate() {
            tracing::debug!(
                width = self.size.width,
                height = self.size.height,
                "degenerate viewport, column pool emptied"
            );
            return;
        }
        let count = column_count(self.size.width, &self.config);
        let glyph_size = self.config.glyph_size;
        self.columns.reserve(count);
        for _ in 0..count {
            let column = Column::spawn(self.size, glyph_size, &self.glyphs, &mut self.rng);
            self.columns.push(column);
        }
        tracing::debug!(columns = count, "column pool regenerated");
    }

    fn draw_grid(&mut self, intensity: f32) {
        let cell = self.config.glyph_size * 4.0;
        let (w, h) = (self.size.width, self.size.height);
        let (cx, cy) = self.size.center();
        if !(cell > 0.0) {
            return;
        }

        // Diagonal lattice, overscanned so rotation never shows its edge
        let rotation = FRAC_PI_4 + (self.pulse_phase * 0.5).sin() * 0.05;
        self.paint.push_transform(Transform2D::rotate_about(rotation, cx, cy));
        let mut lattice = PathBuilder::new();
        let mut y = -h;
        while y < h * 2.0 {
            lattice = lattice.segment(Point::new(-w, y), Point::new(w * 2.0, y));
            y += cell;
        }
        let mut x = -w;
        while x < w * 2.0 {
            lattice = lattice.segment(Point::new(x, -h), Point::new(x, h * 2.0));
            x += cell;
        }
        self.paint
            .stroke_path(lattice.build(), Color::rgba8(0, 255, 0, 0.1 * intensity), 1.0);
        self.paint.pop_transform();

        let max_radius = self.size.half_diagonal();
        let mut r = cell;
        while r < max_radius {
            let alpha = 0.05 * intensity * (1.0 - r / max_radius);
            self.paint
                .stroke_circle(cx, cy, r, Color::rgba8(0, 255, 0, alpha), 1.0);
            r += cell;
        }

        let spokes = self.config.spoke_count;
        let mut fan = PathBuilder::new();
        for i in 0..spokes {
            let angle = i as f32 / spokes as f32 * TAU + self.vortex_angle;
            fan = fan.segment(
                Point::new(cx, cy),
                Point::new(cx + angle.cos() * max_radius, cy + angle.sin() * max_radius),
            );
        }
        self.paint
            .stroke_path(fan.build(), Color::rgba8(0, 255, 0, 0.07 * intensity), 1.0);
    }

    fn advance_columns(&mut self, dt: f32) {
        let size = self.size;
        let glyph_size = self.config.glyph_size;
        for column in &mut self.columns {
            column.accumulator_ms += dt;
            if !column.is_due() {
                continue;
            }

            self.paint.draw_text(
                column.glyph.to_string(),
                column.x,
                column.y,
                column.size,
                column.color(),
            );

            let change_odds = if column.direction == Direction::Vortex { 0.3 } else { 0.1 };
            if self.rng.gen_bool(change_odds) {
                column.glyph = self.glyphs.pick_for(column.direction, &mut self.rng);
                if self.rng.gen_bool(0.2) {
                    column.cadence_ms = random_cadence(&mut self.rng);
                }
            }

            column.step(size, &mut self.rng);
            if column.is_out_of_bounds(size) {
                column.reset(size, glyph_size, &self.glyphs, &mut self.rng);
            }
            column.accumulator_ms = 0.0;
        }
    }
}

impl Scene for GridParticles {
    const NAME: &'static str = "matrix";

    fn create(config: &BackdropConfig, surface: &mut dyn Surface, size: ViewportSize) -> Result<Self> {
        let canvas = surface.canvas_2d().ok_or_else(|| {
            BackdropError::SurfaceUnavailable("2D canvas context unavailable".to_string())
        })?;

        let mut scene = Self {
            canvas,
            paint: PaintContext::new(),
            config: config.grid.clone(),
            glyphs: GlyphSet::standard(),
            rng: scene_rng(config.seed),
            columns: Vec::new(),
            size,
            pulse_phase: 0.0,
            vortex_angle: 0.0,
        };
        scene.regenerate();
        Ok(scene)
    }

    fn frame(&mut self, time: FrameTime) {
        if self.size.is_degenerate() {
            return;
        }
        let dt = time.delta_ms as f32;

        self.pulse_phase += dt * 0.001;
        self.vortex_angle += dt * 0.0005;
        let intensity = self.intensity();

        let (w, h) = (self.size.width, self.size.height);
        self.paint
            .fill_rect(0.0, 0.0, w, h, Color::new(0.0, 0.0, 0.0, self.config.fade_alpha));
        self.draw_grid(intensity);
        self.advance_columns(dt);

        let commands = self.paint.take_commands();
        tracing::trace!(commands = commands.len(), "matrix frame");
        self.canvas.submit(commands);
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        self.regenerate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use backdrop_paint::{PaintCommand, PathCommand};

    fn scene_at(width: f32, height: f32) -> (GridParticles, HeadlessSurface) {
        let config = BackdropConfig {
            seed: Some(42),
            ..Default::default()
        };
        let mut surface = HeadlessSurface::new();
        let scene = GridParticles::create(&config, &mut surface, ViewportSize::new(width, height)).unwrap();
        (scene, surface)
    }

    fn frame(delta_ms: f64) -> FrameTime {
        FrameTime {
            timestamp_ms: 0.0,
            delta_ms,
            frame: 1,
        }
    }

    #[test]
    fn test_column_count_from_width() {
        let config = GridConfig::default();
        assert_eq!(column_count(800.0, &config), 75);
        assert_eq!(column_count(810.0, &config), 75);
        assert_eq!(column_count(0.0, &config), 0);
        assert_eq!(column_count(-5.0, &config), 0);

        let (scene, _) = scene_at(800.0, 600.0);
        assert_eq!(scene.columns().len(), 75);
    }

    #[test]
    fn test_spawn_regions() {
        let size = ViewportSize::new(800.0, 600.0);
        let (scene, _) = scene_at(800.0, 600.0);
        let (cx, cy) = size.center();
        for column in scene.columns() {
            match column.direction {
                Direction::Left => {
                    assert!(column.x > 400.0 && column.x <= 800.0);
                    assert!(column.y >= 0.0 && column.y < 180.0);
                }
                Direction::Right => {
                    assert!(column.x >= 0.0 && column.x < 400.0);
                    assert!(column.y >= 0.0 && column.y < 180.0);
                }
                Direction::Center => {
                    assert!(column.x >= 0.0 && column.x < 800.0);
                    assert!(column.y >= 0.0 && column.y < 180.0);
                }
                Direction::Vortex => {
                    let r = ((column.x - cx).powi(2) + (column.y - cy).powi(2)).sqrt();
                    assert!((r - vortex_radius(size)).abs() < 1e-2);
                    assert!(column.speed >= 0.25 && column.speed < 1.0);
                }
            }
            assert!(column.size >= 16.0 && column.size < 26.0);
            assert!(column.opacity >= 0.5 && column.opacity < 1.0);
            assert!(column.green >= 205);
            assert!(column.cadence_ms >= 20.0 && column.cadence_ms < 220.0);
            assert!(column.accumulator_ms >= 0.0 && column.accumulator_ms < 500.0);
        }
    }

    #[test]
    fn test_degenerate_then_valid_resize() {
        let (mut scene, surface) = scene_at(800.0, 600.0);
        let canvas = surface.canvas().unwrap().clone();

        scene.resize(ViewportSize::new(0.0, 600.0));
        assert!(scene.columns().is_empty());
        scene.frame(frame(16.0));
        assert_eq!(canvas.frame_count(), 0);

        scene.resize(ViewportSize::new(800.0, 600.0));
        assert_eq!(scene.columns().len(), 75);
        scene.frame(frame(16.0));
        assert_eq!(canvas.frame_count(), 1);
    }

    #[test]
    fn test_frame_starts_with_fade() {
        let (mut scene, surface) = scene_at(800.0, 600.0);
        scene.frame(frame(16.0));

        let commands = surface.canvas().unwrap().last_frame();
        match &commands[0] {
            PaintCommand::FillRect { rect, .. } => {
                assert_eq!((rect.width, rect.height), (800.0, 600.0));
            }
            other => panic!("expected fade fill, got {other:?}"),
        }
    }

    #[test]
    fn test_cadence_gates_drawing() {
        let (mut scene, surface) = scene_at(800.0, 600.0);
        for column in &mut scene.columns {
            column.accumulator_ms = 0.0;
            column.cadence_ms = 100.0;
            column.speed = 1.0;
        }

        scene.frame(frame(50.0));
        let glyphs = |s: &HeadlessSurface| {
            s.canvas()
                .unwrap()
                .last_frame()
                .iter()
                .filter(|c| matches!(c, PaintCommand::DrawText { .. }))
                .count()
        };
        assert_eq!(glyphs(&surface), 0);
        assert!(scene.columns().iter().all(|c| c.accumulator_ms == 50.0));

        scene.frame(frame(60.0));
        assert_eq!(glyphs(&surface), 75);
        assert!(scene.columns().iter().all(|c| c.accumulator_ms == 0.0));
    }

    #[test]
    fn test_overlay_follows_pulse() {
        let (mut scene, surface) = scene_at(800.0, 600.0);
        scene.pulse_phase = 1.2;
        scene.vortex_angle = 0.0;
        scene.frame(frame(0.0));

        let intensity = 1.2f32.sin() * 0.2 + 0.8;
        assert!((scene.intensity() - intensity).abs() < 1e-6);

        let commands = surface.canvas().unwrap().last_frame();

        let transform = commands
            .iter()
            .find_map(|c| match c {
                PaintCommand::PushTransform { transform } => Some(*transform),
                _ => None,
            })
            .unwrap();
        let rotation = FRAC_PI_4 + 0.6f32.sin() * 0.05;
        let expected = Transform2D::rotate_about(rotation, 400.0, 300.0);
        for (got, want) in [
            (transform.a, expected.a),
            (transform.b, expected.b),
            (transform.c, expected.c),
            (transform.d, expected.d),
            (transform.e, expected.e),
            (transform.f, expected.f),
        ] {
            assert!((got - want).abs() < 1e-3, "{got} vs {want}");
        }
        // only the lattice is drawn rotated
        let overlay: Vec<_> = commands
            .iter()
            .filter(|c| !matches!(c, PaintCommand::DrawText { .. }))
            .collect();
        assert!(matches!(overlay[1], PaintCommand::PushTransform { .. }));
        assert!(matches!(overlay[2], PaintCommand::StrokePath { .. }));
        assert!(matches!(overlay[3], PaintCommand::PopTransform));

        // cell 64, half diagonal 500
        let rings: Vec<(f32, f32)> = commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::StrokeCircle { circle, style } => {
                    assert_eq!(circle.center, Point::new(400.0, 300.0));
                    Some((circle.radius, style.color.a))
                }
                _ => None,
            })
            .collect();
        assert_eq!(rings.len(), 7);
        for (i, &(r, alpha)) in rings.iter().enumerate() {
            assert_eq!(r, 64.0 * (i + 1) as f32);
            assert!((alpha - 0.05 * intensity * (1.0 - r / 500.0)).abs() < 1e-6);
        }
        assert!(rings.windows(2).all(|w| w[1].1 < w[0].1));

        let strokes: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::StrokePath { path, style } => Some((path, style)),
                _ => None,
            })
            .collect();
        assert_eq!(strokes.len(), 2);
        let (lattice, lattice_style) = strokes[0];
        assert!(lattice.subpath_count() > 0);
        assert!((lattice_style.color.a - 0.1 * intensity).abs() < 1e-6);

        let (fan, fan_style) = strokes[1];
        assert_eq!(fan.subpath_count(), 12);
        assert!((fan_style.color.a - 0.07 * intensity).abs() < 1e-6);
        match fan.commands()[1] {
            PathCommand::LineTo(end) => {
                assert!((end.x - 900.0).abs() < 1e-3 && (end.y - 300.0).abs() < 1e-3);
            }
            other => panic!("expected spoke end, got {other:?}"),
        }
    }

    #[test]
    fn test_advance_changes_glyphs_and_cadence() {
        const UNSET_GLYPH: char = 'x';
        const UNSET_CADENCE: f32 = 1000.0;
        let (mut scene, _) = scene_at(800.0, 600.0);
        assert!(!scene.glyphs.contains(UNSET_GLYPH));

        #[derive(Default)]
        struct Tally {
            advances: u32,
            glyph_changes: u32,
            cadence_changes: u32,
            digits: u32,
        }
        let (mut vortex, mut other) = (Tally::default(), Tally::default());

        for _ in 0..400 {
            for column in &mut scene.columns {
                (column.x, column.y) = if column.direction == Direction::Vortex {
                    (500.0, 300.0)
                } else {
                    (200.0, 150.0)
                };
                column.glyph = UNSET_GLYPH;
                column.cadence_ms = UNSET_CADENCE;
                column.accumulator_ms = 1.0e6;
            }
            scene.advance_columns(0.0);
            scene.paint.take_commands();

            for column in &scene.columns {
                let tally = if column.direction == Direction::Vortex {
                    &mut vortex
                } else {
                    &mut other
                };
                tally.advances += 1;
                assert_eq!(column.accumulator_ms, 0.0);
                if column.glyph != UNSET_GLYPH {
                    tally.glyph_changes += 1;
                    if column.glyph.is_ascii_digit() {
                        tally.digits += 1;
                    }
                }
                if column.cadence_ms != UNSET_CADENCE {
                    assert_ne!(column.glyph, UNSET_GLYPH, "cadence changed without a glyph change");
                    assert!(column.cadence_ms >= 20.0 && column.cadence_ms < 220.0);
                    tally.cadence_changes += 1;
                }
            }
        }

        let rate = |n: u32, d: u32| n as f32 / d as f32;
        assert!(vortex.advances > 1000 && other.advances > 1000);
        assert!((rate(vortex.glyph_changes, vortex.advances) - 0.3).abs() < 0.03);
        assert!((rate(other.glyph_changes, other.advances) - 0.1).abs() < 0.02);

        let changes = vortex.glyph_changes + other.glyph_changes;
        let cadence_changes = vortex.cadence_changes + other.cadence_changes;
        assert!((rate(cadence_changes, changes) - 0.2).abs() < 0.03);

        let standard_share = rate(
            scene.glyphs.glyphs.iter().filter(|g| g.is_ascii_digit()).count() as u32,
            scene.glyphs.glyphs.len() as u32,
        );
        let other_share = rate(other.digits, other.glyph_changes);
        let vortex_share = rate(vortex.digits, vortex.glyph_changes);
        assert!((other_share - standard_share).abs() < 0.06);
        assert!((vortex_share - (0.4 + 0.6 * standard_share)).abs() < 0.05);
        assert!(vortex_share > other_share + 0.15);
    }

    #[test]
    fn test_motion_patterns() {
        let size = ViewportSize::new(800.0, 600.0);
        let glyphs = GlyphSet::standard();
        let mut rng = scene_rng(Some(1));
        let mut column = Column::spawn(size, 16.0, &glyphs, &mut rng);
        column.speed = 2.0;

        column.direction = Direction::Left;
        (column.x, column.y) = (500.0, 100.0);
        column.step(size, &mut rng);
        assert_eq!((column.x, column.y), (498.0, 102.0));

        column.direction = Direction::Right;
        column.step(size, &mut rng);
        assert_eq!((column.x, column.y), (500.0, 104.0));

        column.direction = Direction::Center;
        (column.x, column.y) = (400.0, 100.0);
        column.step(size, &mut rng);
        assert!((column.x - 400.0).abs() < 1e-4);
        assert!((column.y - 102.0).abs() < 1e-4);

        column.direction = Direction::Vortex;
        (column.x, column.y) = (500.0, 300.0);
        column.step(size, &mut rng);
        let r = ((column.x - 400.0).powi(2) + (column.y - 300.0).powi(2)).sqrt();
        assert!((r - 99.6).abs() < 1e-3);
        assert!(column.y > 300.0);
    }

    #[test]
    fn test_vortex_core_respawns_on_circle() {
        let size = ViewportSize::new(800.0, 600.0);
        let glyphs = GlyphSet::standard();
        let mut rng = scene_rng(Some(2));
        let mut column = Column::spawn(size, 16.0, &glyphs, &mut rng);
        column.direction = Direction::Vortex;
        column.speed = 1.0;
        (column.x, column.y) = (410.0, 300.0);

        column.step(size, &mut rng);
        let r = ((column.x - 400.0).powi(2) + (column.y - 300.0).powi(2)).sqrt();
        assert!((r - vortex_radius(size)).abs() < 1e-2);
    }

    #[test]
    fn test_reset_keeps_direction_and_opacity() {
        let size = ViewportSize::new(800.0, 600.0);
        let glyphs = GlyphSet::standard();
        let mut rng = scene_rng(Some(3));
        let mut column = Column::spawn(size, 16.0, &glyphs, &mut rng);
        column.direction = Direction::Left;
        column.y = 700.0;
        let opacity = column.opacity;
        assert!(column.is_out_of_bounds(size));

        column.reset(size, 16.0, &glyphs, &mut rng);
        assert_eq!(column.direction, Direction::Left);
        assert_eq!(column.opacity, opacity);
        assert!(column.x > 560.0 && column.x <= 800.0);
        assert!(column.y >= 0.0 && column.y < 180.0);
        assert!(glyphs.contains(column.glyph));
        assert!(!column.is_out_of_bounds(size));
    }
}
