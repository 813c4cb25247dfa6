//! Gradient fills

use crate::color::Color;
use crate::path::Point;

/// A gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32, // 0.0 to 1.0
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Gradient type
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    /// Concentric radial gradient from `center` (offset 0) out to `radius` (offset 1)
    Radial {
        center: Point,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

impl Gradient {
    pub fn linear(start: Point, end: Point, stops: Vec<GradientStop>) -> Self {
        Gradient::Linear { start, end, stops }
    }

    pub fn radial(center: Point, radius: f32, stops: Vec<GradientStop>) -> Self {
        Gradient::Radial {
            center,
            radius,
            stops,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. } | Gradient::Radial { stops, .. } => stops,
        }
    }

    /// Sample the color at `offset`, clamping outside the first/last stop.
    ///
    /// Stops are expected in ascending offset order, as Canvas requires.
    pub fn sample(&self, offset: f32) -> Color {
        sample_stops(self.stops(), offset)
    }
}

/// Sample an ordered stop list at `offset`
pub fn sample_stops(stops: &[GradientStop], offset: f32) -> Color {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Color::TRANSPARENT,
    };
    if offset <= first.offset {
        return first.color;
    }
    if offset >= last.offset {
        return last.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if offset >= a.offset && offset <= b.offset {
            let span = b.offset - a.offset;
            if span <= f32::EPSILON {
                return b.color;
            }
            return a.color.lerp(b.color, (offset - a.offset) / span);
        }
    }
    last.color
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> Gradient {
        Gradient::linear(
            Point::ZERO,
            Point::new(0.0, 100.0),
            vec![
                GradientStop::new(0.0, Color::BLACK),
                GradientStop::new(0.5, Color::WHITE),
            ],
        )
    }

    #[test]
    fn sample_clamps_past_last_stop() {
        assert_eq!(two_stop().sample(0.9), Color::WHITE);
        assert_eq!(two_stop().sample(-1.0), Color::BLACK);
    }

    #[test]
    fn sample_interpolates_between_stops() {
        let mid = two_stop().sample(0.25);
        assert!((mid.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_stops_are_transparent() {
        assert_eq!(sample_stops(&[], 0.3), Color::TRANSPARENT);
    }
}
