//! Renderer handles
//!
//! A handle is one renderer instance, walked through its lifecycle exactly
//! once. The controller owns at most one at a time and drops it after
//! [`RendererHandle::stop`].

use backdrop_core::{LifecycleState, ViewportSize};

use crate::error::Result;
use crate::surface::Surface;

pub trait RendererHandle {
    /// Acquire drawing resources from `surface` and schedule the frame loop.
    ///
    /// On failure nothing is scheduled and the handle ends up Stopped.
    fn start(&mut self, surface: &mut dyn Surface, size: ViewportSize) -> Result<()>;

    /// Adapt to a new container size
    fn resize(&mut self, width: f32, height: f32);

    /// Pointer position in surface-local pixels
    fn on_pointer_move(&mut self, x: f32, y: f32);

    /// Cancel the frame loop and release every drawing resource.
    /// Idempotent.
    fn stop(&mut self);

    fn lifecycle(&self) -> LifecycleState;

    fn is_running(&self) -> bool {
        self.lifecycle() == LifecycleState::Running
    }
}
