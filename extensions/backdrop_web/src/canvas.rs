//! 2D canvas backend
//!
//! Replays recorded paint commands on a `CanvasRenderingContext2d`.

use backdrop_paint::{Canvas, Color, FillStyle, Gradient, PaintCommand, Path, PathCommand};
use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

const GLYPH_FONT: &str = "monospace";

/// CSS `rgba()` for a color
pub fn css_color(color: Color) -> String {
    let [r, g, b, _] = color.to_rgba8();
    format!("rgba({r}, {g}, {b}, {})", color.a.clamp(0.0, 1.0))
}

pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn gradient(&self, gradient: &Gradient) -> Result<CanvasGradient, JsValue> {
        let canvas_gradient = match gradient {
            Gradient::Linear { start, end, .. } => self.ctx.create_linear_gradient(
                start.x as f64,
                start.y as f64,
                end.x as f64,
                end.y as f64,
            ),
            Gradient::Radial { center, radius, .. } => self.ctx.create_radial_gradient(
                center.x as f64,
                center.y as f64,
                0.0,
                center.x as f64,
                center.y as f64,
                *radius as f64,
            )?,
        };
        for stop in gradient.stops() {
            canvas_gradient.add_color_stop(stop.offset.clamp(0.0, 1.0), &css_color(stop.color))?;
        }
        Ok(canvas_gradient)
    }

    fn set_fill(&self, style: &FillStyle) -> Result<(), JsValue> {
        match style {
            FillStyle::Color(color) => self.ctx.set_fill_style_str(&css_color(*color)),
            FillStyle::Gradient(gradient) => {
                self.ctx.set_fill_style_canvas_gradient(&self.gradient(gradient)?)
            }
        }
        Ok(())
    }

    fn trace_path(&self, path: &Path) -> Result<(), JsValue> {
        self.ctx.begin_path();
        for command in path.commands() {
            match *command {
                PathCommand::MoveTo(p) => self.ctx.move_to(p.x as f64, p.y as f64),
                PathCommand::LineTo(p) => self.ctx.line_to(p.x as f64, p.y as f64),
                PathCommand::Arc {
                    center,
                    radius,
                    start_angle,
                    end_angle,
                } => self.ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius as f64,
                    start_angle as f64,
                    end_angle as f64,
                )?,
            }
        }
        Ok(())
    }

    fn replay(&self, command: &PaintCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            PaintCommand::FillRect { rect, style } => {
                self.set_fill(style)?;
                ctx.fill_rect(
                    rect.x as f64,
                    rect.y as f64,
                    rect.width as f64,
                    rect.height as f64,
                );
            }
            PaintCommand::FillCircle { circle, style } => {
                self.set_fill(style)?;
                ctx.begin_path();
                ctx.arc(
                    circle.center.x as f64,
                    circle.center.y as f64,
                    circle.radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
            }
            PaintCommand::StrokeCircle { circle, style } => {
                ctx.set_stroke_style_str(&css_color(style.color));
                ctx.set_line_width(style.width as f64);
                ctx.begin_path();
                ctx.arc(
                    circle.center.x as f64,
                    circle.center.y as f64,
                    circle.radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.stroke();
            }
            PaintCommand::StrokePath { path, style } => {
                ctx.set_stroke_style_str(&css_color(style.color));
                ctx.set_line_width(style.width as f64);
                self.trace_path(path)?;
                ctx.stroke();
            }
            PaintCommand::DrawText {
                text,
                position,
                size,
                color,
            } => {
                ctx.set_font(&format!("{size}px {GLYPH_FONT}"));
                ctx.set_fill_style_str(&css_color(*color));
                ctx.fill_text(text, position.x as f64, position.y as f64)?;
            }
            PaintCommand::PushTransform { transform: t } => {
                ctx.save();
                ctx.transform(
                    t.a as f64, t.b as f64, t.c as f64, t.d as f64, t.e as f64, t.f as f64,
                )?;
            }
            PaintCommand::PopTransform => ctx.restore(),
        }
        Ok(())
    }
}

impl Canvas for WebCanvas {
    fn submit(&mut self, commands: Vec<PaintCommand>) {
        for command in &commands {
            if let Err(err) = self.replay(command) {
                tracing::warn!(?err, "canvas command failed");
            }
        }
    }
}
