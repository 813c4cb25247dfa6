//! Background renderers
//!
//! Each style is a [`Scene`]: the per-frame algorithm plus the state it
//! animates. [`AnimatedRenderer`] wraps a scene in the lifecycle every style
//! shares. It creates the scene on start, registers one repeating frame
//! callback, forwards resize and pointer input while running, and drops the
//! scene together with everything it holds on stop.

pub mod grid;
pub mod perspective;
pub mod point_sprite;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use backdrop_animation::{FrameCallbackId, FrameScheduler, FrameTime};
use backdrop_core::{Lifecycle, LifecycleError, LifecycleEvent, LifecycleState, ViewportSize};

use crate::config::BackdropConfig;
use crate::error::Result;
use crate::handle::RendererHandle;
use crate::surface::Surface;
use crate::variant::BackgroundVariant;

pub use grid::GridParticles;
pub use perspective::PerspectiveGrid;
pub use point_sprite::PointSpriteField;

/// Symbol rain renderer
pub type GridParticleRenderer = AnimatedRenderer<GridParticles>;
/// Synthwave renderer
pub type PerspectiveGridRenderer = AnimatedRenderer<PerspectiveGrid>;
/// Starfield renderer
pub type PointSpriteFieldRenderer = AnimatedRenderer<PointSpriteField>;

/// A background style's state and per-frame algorithm
pub trait Scene: Sized + 'static {
    /// Name used in logs
    const NAME: &'static str;

    /// Acquire drawing resources and build initial state
    fn create(config: &BackdropConfig, surface: &mut dyn Surface, size: ViewportSize)
        -> Result<Self>;

    /// Advance and draw one frame
    fn frame(&mut self, time: FrameTime);

    /// Adapt to a new viewport size (possibly degenerate)
    fn resize(&mut self, size: ViewportSize);

    fn pointer_move(&mut self, _x: f32, _y: f32) {}
}

struct Running<S> {
    scene: Rc<RefCell<S>>,
    frame: FrameCallbackId,
}

/// Lifecycle wrapper shared by every style
pub struct AnimatedRenderer<S: Scene> {
    config: BackdropConfig,
    scheduler: FrameScheduler,
    lifecycle: Lifecycle,
    size: ViewportSize,
    running: Option<Running<S>>,
}

impl<S: Scene> AnimatedRenderer<S> {
    pub fn new(config: BackdropConfig, scheduler: FrameScheduler) -> Self {
        Self {
            config,
            scheduler,
            lifecycle: Lifecycle::new(),
            size: ViewportSize::default(),
            running: None,
        }
    }

    /// The running scene, for inspection
    pub fn scene(&self) -> Option<Ref<'_, S>> {
        self.running.as_ref().map(|r| r.scene.borrow())
    }

    /// The registered frame callback while running
    pub fn frame_callback(&self) -> Option<FrameCallbackId> {
        self.running.as_ref().map(|r| r.frame)
    }

    /// Last viewport size seen by this renderer
    pub fn size(&self) -> ViewportSize {
        self.size
    }
}

impl<S: Scene> RendererHandle for AnimatedRenderer<S> {
    fn start(&mut self, surface: &mut dyn Surface, size: ViewportSize) -> Result<()> {
        if !self.lifecycle.can_send(LifecycleEvent::Start) {
            return Err(LifecycleError::InvalidTransition {
                from: self.lifecycle.current(),
                event: LifecycleEvent::Start,
            }
            .into());
        }

        self.size = size;
        let scene = match S::create(&self.config, surface, size) {
            Ok(scene) => scene,
            Err(err) => {
                tracing::warn!(renderer = S::NAME, %err, "renderer failed to start");
                self.lifecycle.send(LifecycleEvent::Fail)?;
                return Err(err);
            }
        };

        let scene = Rc::new(RefCell::new(scene));
        let frame_scene = Rc::clone(&scene);
        let frame = self
            .scheduler
            .request(move |time| frame_scene.borrow_mut().frame(time));

        self.running = Some(Running { scene, frame });
        self.lifecycle.send(LifecycleEvent::Start)?;
        tracing::info!(
            renderer = S::NAME,
            width = size.width,
            height = size.height,
            "renderer started"
        );
        Ok(())
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.size = ViewportSize::new(width, height);
        match &self.running {
            Some(running) => running.scene.borrow_mut().resize(self.size),
            None => tracing::trace!(renderer = S::NAME, "resize ignored, not running"),
        }
    }

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        if let Some(running) = &self.running {
            running.scene.borrow_mut().pointer_move(x, y);
        }
    }

    fn stop(&mut self) {
        if self.lifecycle.is_stopped() {
            return;
        }
        if let Some(running) = self.running.take() {
            self.scheduler.cancel(running.frame);
            // Dropping the last reference releases canvas and GPU resources
            drop(running.scene);
        }
        if self.lifecycle.send(LifecycleEvent::Stop).is_ok() {
            tracing::info!(renderer = S::NAME, "renderer stopped");
        }
    }

    fn lifecycle(&self) -> LifecycleState {
        self.lifecycle.current()
    }
}

impl<S: Scene> Drop for AnimatedRenderer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builds the renderer for a variant
pub trait RendererFactory {
    /// `None` for [`BackgroundVariant::None`]
    fn create(
        &self,
        variant: BackgroundVariant,
        scheduler: &FrameScheduler,
    ) -> Option<Box<dyn RendererHandle>>;
}

/// Factory for the built-in styles
#[derive(Clone, Debug, Default)]
pub struct DefaultRendererFactory {
    config: BackdropConfig,
}

impl DefaultRendererFactory {
    pub fn new(config: BackdropConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }
}

impl RendererFactory for DefaultRendererFactory {
    fn create(
        &self,
        variant: BackgroundVariant,
        scheduler: &FrameScheduler,
    ) -> Option<Box<dyn RendererHandle>> {
        let config = self.config.clone();
        let scheduler = scheduler.clone();
        match variant {
            BackgroundVariant::None => None,
            BackgroundVariant::Grid => Some(Box::new(GridParticleRenderer::new(config, scheduler))),
            BackgroundVariant::Perspective => {
                Some(Box::new(PerspectiveGridRenderer::new(config, scheduler)))
            }
            BackgroundVariant::PointSprite => {
                Some(Box::new(PointSpriteFieldRenderer::new(config, scheduler)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;

    fn seeded() -> BackdropConfig {
        BackdropConfig {
            seed: Some(11),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_registers_one_callback() {
        let scheduler = FrameScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut renderer = GridParticleRenderer::new(seeded(), scheduler.clone());

        renderer
            .start(&mut surface, ViewportSize::new(800.0, 600.0))
            .unwrap();
        assert!(renderer.is_running());
        assert_eq!(scheduler.len(), 1);

        scheduler.tick(0.0);
        scheduler.tick(16.0);
        assert_eq!(surface.canvas().unwrap().frame_count(), 2);
    }

    #[test]
    fn test_stop_releases_everything() {
        let scheduler = FrameScheduler::new();
        let mut surface = HeadlessSurface::new();
        let canvas = surface.canvas().cloned().unwrap();
        let mut renderer = PerspectiveGridRenderer::new(seeded(), scheduler.clone());

        renderer
            .start(&mut surface, ViewportSize::new(800.0, 600.0))
            .unwrap();
        assert_eq!(canvas.handle_count(), 3);

        renderer.stop();
        assert!(scheduler.is_empty());
        assert!(renderer.scene().is_none());
        // surface and test handles only
        assert_eq!(canvas.handle_count(), 2);
        assert_eq!(renderer.lifecycle(), LifecycleState::Stopped);

        renderer.stop();
        assert_eq!(renderer.lifecycle(), LifecycleState::Stopped);
    }

    #[test]
    fn test_stopped_renderer_cannot_restart() {
        let scheduler = FrameScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut renderer = GridParticleRenderer::new(seeded(), scheduler.clone());
        renderer.stop();

        let err = renderer
            .start(&mut surface, ViewportSize::new(800.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, crate::BackdropError::InvalidLifecycle(_)));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_failed_start_schedules_nothing() {
        let scheduler = FrameScheduler::new();
        let mut surface = HeadlessSurface::unavailable();
        let mut renderer = GridParticleRenderer::new(seeded(), scheduler.clone());

        let err = renderer
            .start(&mut surface, ViewportSize::new(800.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, crate::BackdropError::SurfaceUnavailable(_)));
        assert!(scheduler.is_empty());
        assert_eq!(renderer.lifecycle(), LifecycleState::Stopped);
    }

    #[test]
    fn test_input_after_stop_is_dropped() {
        let scheduler = FrameScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut renderer = PointSpriteFieldRenderer::new(seeded(), scheduler.clone());
        renderer
            .start(&mut surface, ViewportSize::new(800.0, 600.0))
            .unwrap();
        renderer.stop();

        renderer.resize(1024.0, 768.0);
        renderer.on_pointer_move(10.0, 10.0);
        assert!(renderer.scene().is_none());
        assert_eq!(surface.sprites().unwrap().live_backends(), 0);
    }

    #[test]
    fn test_default_factory_variants() {
        let factory = DefaultRendererFactory::default();
        let scheduler = FrameScheduler::new();
        assert!(factory.create(BackgroundVariant::None, &scheduler).is_none());
        for variant in &BackgroundVariant::all()[1..] {
            let handle = factory.create(*variant, &scheduler).unwrap();
            assert_eq!(handle.lifecycle(), LifecycleState::Uninitialized);
        }
    }
}
