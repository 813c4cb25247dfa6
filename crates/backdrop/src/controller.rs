//! Background controller
//!
//! Owns the surface, the frame scheduler and at most one running renderer.
//! Switching variants stops and drops the current renderer before the next
//! one is created, so two renderers never hold drawing resources at once.

use backdrop_animation::FrameScheduler;
use backdrop_core::{LifecycleState, ViewportEvent, ViewportSize};

use crate::config::BackdropConfig;
use crate::error::Result;
use crate::handle::RendererHandle;
use crate::renderers::{DefaultRendererFactory, RendererFactory};
use crate::surface::Surface;
use crate::variant::BackgroundVariant;

pub struct BackgroundController {
    surface: Box<dyn Surface>,
    scheduler: FrameScheduler,
    factory: Box<dyn RendererFactory>,
    variant: BackgroundVariant,
    active: Option<Box<dyn RendererHandle>>,
    viewport: ViewportSize,
}

impl BackgroundController {
    /// Controller with the built-in renderers
    pub fn new(surface: Box<dyn Surface>, config: BackdropConfig) -> Self {
        let scheduler = FrameScheduler::with_max_delta(config.max_frame_delta_ms);
        let factory = Box::new(DefaultRendererFactory::new(config));
        Self::with_factory(surface, scheduler, factory)
    }

    pub fn with_factory(
        surface: Box<dyn Surface>,
        scheduler: FrameScheduler,
        factory: Box<dyn RendererFactory>,
    ) -> Self {
        Self {
            surface,
            scheduler,
            factory,
            variant: BackgroundVariant::None,
            active: None,
            viewport: ViewportSize::default(),
        }
    }

    /// Switch to `variant`.
    ///
    /// Selecting the current variant does nothing. If the new renderer fails
    /// to start the controller falls back to [`BackgroundVariant::None`] and
    /// returns the error.
    pub fn set_variant(&mut self, variant: BackgroundVariant) -> Result<()> {
        if variant == self.variant {
            return Ok(());
        }
        let previous = self.variant;

        if let Some(mut active) = self.active.take() {
            active.stop();
        }
        self.variant = BackgroundVariant::None;

        let Some(mut handle) = self.factory.create(variant, &self.scheduler) else {
            tracing::info!(from = %previous, to = %variant, "background switched");
            self.variant = variant;
            return Ok(());
        };

        if let Err(err) = handle.start(self.surface.as_mut(), self.viewport) {
            tracing::warn!(variant = %variant, %err, "background failed to start, falling back to none");
            return Err(err);
        }

        tracing::info!(from = %previous, to = %variant, "background switched");
        self.active = Some(handle);
        self.variant = variant;
        Ok(())
    }

    /// Container resized
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = ViewportSize::new(width, height);
        if let Some(active) = self.active.as_mut() {
            active.resize(width, height);
        }
    }

    /// Pointer moved, in container-local pixels. Dropped when nothing runs.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some(active) = self.active.as_mut() {
            active.on_pointer_move(x, y);
        }
    }

    pub fn handle_event(&mut self, event: ViewportEvent) {
        tracing::trace!(event = event.name(), "viewport event");
        match event {
            ViewportEvent::Resize { width, height } => self.resize(width, height),
            ViewportEvent::PointerMove { x, y } => self.pointer_move(x, y),
        }
    }

    /// Run one animation frame, returning how many callbacks ran
    pub fn tick(&self, timestamp_ms: f64) -> usize {
        self.scheduler.tick(timestamp_ms)
    }

    pub fn variant(&self) -> BackgroundVariant {
        self.variant
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Lifecycle state of the active renderer
    pub fn active_lifecycle(&self) -> Option<LifecycleState> {
        self.active.as_ref().map(|a| a.lifecycle())
    }
}

impl Drop for BackgroundController {
    fn drop(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.stop();
        }
    }
}

impl std::fmt::Debug for BackgroundController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundController")
            .field("variant", &self.variant)
            .field("viewport", &self.viewport)
            .field("active", &self.active_lifecycle())
            .field("scheduler", &self.scheduler)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    fn controller() -> BackgroundController {
        let config = BackdropConfig {
            seed: Some(1),
            ..Default::default()
        };
        let mut controller = BackgroundController::new(Box::new(HeadlessSurface::new()), config);
        controller.resize(800.0, 600.0);
        controller
    }

    #[test]
    fn test_starts_with_none() {
        let controller = controller();
        assert_eq!(controller.variant(), BackgroundVariant::None);
        assert!(!controller.is_active());
        assert_eq!(controller.tick(0.0), 0);
    }

    #[test]
    fn test_switching_keeps_one_callback() {
        let mut controller = controller();
        for &variant in BackgroundVariant::all() {
            controller.set_variant(variant).unwrap();
            let expected = usize::from(variant != BackgroundVariant::None);
            assert_eq!(controller.scheduler().len(), expected);
            assert_eq!(controller.tick(16.0), expected);
        }
        controller.set_variant(BackgroundVariant::None).unwrap();
        assert!(controller.scheduler().is_empty());
    }

    #[test]
    fn test_same_variant_is_noop() {
        let mut controller = controller();
        controller.set_variant(BackgroundVariant::Grid).unwrap();
        let ticks = controller.scheduler().ticks();
        controller.tick(0.0);
        controller.set_variant(BackgroundVariant::Grid).unwrap();
        assert_eq!(controller.scheduler().ticks(), ticks + 1);
        assert_eq!(controller.active_lifecycle(), Some(LifecycleState::Running));
    }

    #[test]
    fn test_events_route_to_active() {
        let mut controller = controller();
        controller.set_variant(BackgroundVariant::PointSprite).unwrap();
        controller.handle_event(ViewportEvent::resize(1024.0, 768.0));
        controller.handle_event(ViewportEvent::pointer_move(512.0, 384.0));
        assert_eq!(controller.viewport(), ViewportSize::new(1024.0, 768.0));
        assert_eq!(controller.tick(0.0), 1);
    }
}
