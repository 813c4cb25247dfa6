//! Backdrop Paint API
//!
//! A small 2D drawing API modelled on HTML Canvas. Drawing calls are recorded
//! as [`PaintCommand`]s by a [`PaintContext`] and handed to a [`Canvas`]
//! backend once per frame.
//!
//! # Features
//!
//! - Rectangles, circles, stroked paths and single-glyph text
//! - Solid colors and linear/radial gradients
//! - Affine transform stack
//! - Headless [`RecordingCanvas`] for tests and offline runs

pub mod canvas;
pub mod color;
pub mod context;
pub mod gradient;
pub mod path;
pub mod primitives;

pub use canvas::{Canvas, RecordingCanvas};
pub use color::Color;
pub use context::{FillStyle, PaintCommand, PaintContext, StrokeStyle, Transform2D};
pub use gradient::{Gradient, GradientStop};
pub use path::{Path, PathBuilder, PathCommand, Point};
pub use primitives::*;
