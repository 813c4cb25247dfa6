//! Paint context - the main drawing API

use crate::color::Color;
use crate::gradient::Gradient;
use crate::path::{Path, Point};
use crate::primitives::*;

/// Fill style for shapes
#[derive(Clone, Debug, PartialEq)]
pub enum FillStyle {
    Color(Color),
    Gradient(Gradient),
}

impl From<Color> for FillStyle {
    fn from(color: Color) -> Self {
        FillStyle::Color(color)
    }
}

impl From<Gradient> for FillStyle {
    fn from(gradient: Gradient) -> Self {
        FillStyle::Gradient(gradient)
    }
}

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// A paint command for the canvas backend
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        style: FillStyle,
    },
    FillCircle {
        circle: Circle,
        style: FillStyle,
    },
    StrokeCircle {
        circle: Circle,
        style: StrokeStyle,
    },
    StrokePath {
        path: Path,
        style: StrokeStyle,
    },
    /// Text drawn with a monospace font, baseline at `position`
    DrawText {
        text: String,
        position: Point,
        size: f32,
        color: Color,
    },
    PushTransform {
        transform: Transform2D,
    },
    PopTransform,
}

impl PaintCommand {
    /// True for commands that put pixels on the surface
    pub fn is_draw(&self) -> bool {
        !matches!(
            self,
            PaintCommand::PushTransform { .. } | PaintCommand::PopTransform
        )
    }
}

/// 2D affine transform, laid out like Canvas `setTransform(a, b, c, d, e, f)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: x,
            f: y,
        }
    }

    pub fn rotate(angle: f32) -> Self {
        let cos = angle.cos();
        let sin = angle.sin();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Rotation by `angle` around the pivot `(cx, cy)`
    pub fn rotate_about(angle: f32, cx: f32, cy: f32) -> Self {
        Self::translate(cx, cy)
            .multiply(&Self::rotate(angle))
            .multiply(&Self::translate(-cx, -cy))
    }

    /// `self * other`: `other` is applied to points first
    pub fn multiply(&self, other: &Transform2D) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.c * point.y + self.e,
            self.b * point.x + self.d * point.y + self.f,
        )
    }
}

/// The paint context used to record one frame of drawing
pub struct PaintContext {
    commands: Vec<PaintCommand>,
    transform_stack: Vec<Transform2D>,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            transform_stack: Vec::new(),
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        self.transform_stack.clear();
        std::mem::take(&mut self.commands)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Depth of the transform stack
    pub fn transform_depth(&self) -> usize {
        self.transform_stack.len()
    }

    // === Shape drawing ===

    pub fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        style: impl Into<FillStyle>,
    ) {
        self.commands.push(PaintCommand::FillRect {
            rect: Rect::new(x, y, width, height),
            style: style.into(),
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, style: impl Into<FillStyle>) {
        self.commands.push(PaintCommand::FillCircle {
            circle: Circle::new(Point::new(cx, cy), radius),
            style: style.into(),
        });
    }

    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, width: f32) {
        self.commands.push(PaintCommand::StrokeCircle {
            circle: Circle::new(Point::new(cx, cy), radius),
            style: StrokeStyle { color, width },
        });
    }

    // === Path drawing ===

    pub fn stroke_path(&mut self, path: Path, color: Color, width: f32) {
        if path.is_empty() {
            return;
        }
        self.commands.push(PaintCommand::StrokePath {
            path,
            style: StrokeStyle { color, width },
        });
    }

    // === Text ===

    pub fn draw_text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.commands.push(PaintCommand::DrawText {
            text: text.into(),
            position: Point::new(x, y),
            size,
            color,
        });
    }

    // === Transforms ===

    pub fn push_transform(&mut self, transform: Transform2D) {
        self.transform_stack.push(transform);
        self.commands.push(PaintCommand::PushTransform { transform });
    }

    pub fn pop_transform(&mut self) {
        if self.transform_stack.pop().is_some() {
            self.commands.push(PaintCommand::PopTransform);
        }
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.push_transform(Transform2D::translate(x, y));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.push_transform(Transform2D::rotate(angle));
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new()
    }
}
