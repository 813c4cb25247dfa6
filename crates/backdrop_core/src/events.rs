//! Viewport events
//!
//! The only two inputs a background reacts to. Hosts translate their native
//! resize and pointer notifications into these before handing them on.

use crate::viewport::ViewportSize;

/// An event reported by the host viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// The container changed size
    Resize { width: f32, height: f32 },
    /// The pointer moved; coordinates are local to the rendering surface
    PointerMove { x: f32, y: f32 },
}

impl ViewportEvent {
    pub fn resize(width: f32, height: f32) -> Self {
        ViewportEvent::Resize { width, height }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        ViewportEvent::PointerMove { x, y }
    }

    /// New viewport size carried by a resize event
    pub fn size(&self) -> Option<ViewportSize> {
        match *self {
            ViewportEvent::Resize { width, height } => Some(ViewportSize::new(width, height)),
            ViewportEvent::PointerMove { .. } => None,
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            ViewportEvent::Resize { .. } => "resize",
            ViewportEvent::PointerMove { .. } => "pointer_move",
        }
    }
}
