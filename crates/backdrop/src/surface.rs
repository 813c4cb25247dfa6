//! Drawable surfaces
//!
//! A [`Surface`] hands a starting renderer the drawing resource it needs: a
//! 2D canvas for the canvas styles, a point-sprite backend for the GPU style.
//! Either may be missing, in which case the renderer fails to start.

use std::cell::RefCell;
use std::rc::Rc;

use backdrop_gpu::{GpuContext, GpuPointSprite, PointSpriteRenderer, SpriteUniforms};
use backdrop_paint::{Canvas, RecordingCanvas};

use crate::error::{BackdropError, Result};

/// GPU point-sprite drawing, as used by the starfield
pub trait SpriteBackend {
    /// Replace the sprite instances drawn by the next frame
    fn upload(&mut self, sprites: &[GpuPointSprite]);
    /// Resize the render target in pixels
    fn resize(&mut self, width: u32, height: u32) -> backdrop_gpu::Result<()>;
    /// Clear and draw one frame
    fn render(&mut self, uniforms: &SpriteUniforms, clear: wgpu::Color) -> backdrop_gpu::Result<()>;
}

impl SpriteBackend for PointSpriteRenderer {
    fn upload(&mut self, sprites: &[GpuPointSprite]) {
        PointSpriteRenderer::upload(self, sprites)
    }

    fn resize(&mut self, width: u32, height: u32) -> backdrop_gpu::Result<()> {
        PointSpriteRenderer::resize(self, width, height)
    }

    fn render(&mut self, uniforms: &SpriteUniforms, clear: wgpu::Color) -> backdrop_gpu::Result<()> {
        PointSpriteRenderer::render(self, uniforms, clear)
    }
}

/// Source of drawing resources for starting renderers
pub trait Surface {
    /// A 2D canvas, or `None` if no 2D context can be obtained
    fn canvas_2d(&mut self) -> Option<Box<dyn Canvas>>;

    /// A point-sprite backend sized for `capacity` sprites
    fn point_sprites(
        &mut self,
        capacity: usize,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SpriteBackend>>;
}

#[derive(Debug, Default)]
struct SpriteStats {
    uploads: usize,
    frames: usize,
    last_count: usize,
    last_uniforms: Option<SpriteUniforms>,
    resizes: Vec<(u32, u32)>,
}

/// Shared log of what recording sprite backends were asked to do.
///
/// Clones share the same log; [`SpriteRecording::live_backends`] counts the
/// backends that still hold it.
#[derive(Clone, Debug, Default)]
pub struct SpriteRecording {
    inner: Rc<RefCell<SpriteStats>>,
}

impl SpriteRecording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> usize {
        self.inner.borrow().uploads
    }

    /// Frames rendered so far
    pub fn frames(&self) -> usize {
        self.inner.borrow().frames
    }

    /// Sprite count of the latest upload
    pub fn last_count(&self) -> usize {
        self.inner.borrow().last_count
    }

    pub fn last_uniforms(&self) -> Option<SpriteUniforms> {
        self.inner.borrow().last_uniforms
    }

    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.inner.borrow().resizes.clone()
    }

    /// Backends created from this recording that have not been dropped
    pub fn live_backends(&self) -> usize {
        Rc::strong_count(&self.inner) - 1
    }

    /// A backend that logs into this recording and draws nothing
    pub fn backend(&self) -> RecordingSpriteBackend {
        RecordingSpriteBackend {
            stats: Rc::clone(&self.inner),
            target: None,
        }
    }

    /// Log into this recording while forwarding every call to `target`
    pub fn observe(&self, target: Box<dyn SpriteBackend>) -> RecordingSpriteBackend {
        RecordingSpriteBackend {
            stats: Rc::clone(&self.inner),
            target: Some(target),
        }
    }
}

/// Sprite backend that records its calls, optionally in front of a real one
pub struct RecordingSpriteBackend {
    stats: Rc<RefCell<SpriteStats>>,
    target: Option<Box<dyn SpriteBackend>>,
}

impl SpriteBackend for RecordingSpriteBackend {
    fn upload(&mut self, sprites: &[GpuPointSprite]) {
        if let Some(target) = self.target.as_mut() {
            target.upload(sprites);
        }
        let mut stats = self.stats.borrow_mut();
        stats.uploads += 1;
        stats.last_count = sprites.len();
    }

    fn resize(&mut self, width: u32, height: u32) -> backdrop_gpu::Result<()> {
        if let Some(target) = self.target.as_mut() {
            target.resize(width, height)?;
        }
        self.stats.borrow_mut().resizes.push((width, height));
        Ok(())
    }

    fn render(&mut self, uniforms: &SpriteUniforms, clear: wgpu::Color) -> backdrop_gpu::Result<()> {
        if let Some(target) = self.target.as_mut() {
            target.render(uniforms, clear)?;
        }
        let mut stats = self.stats.borrow_mut();
        stats.frames += 1;
        stats.last_uniforms = Some(*uniforms);
        Ok(())
    }
}

/// Surface for native hosts and tests.
///
/// Canvas output goes to a [`RecordingCanvas`]. Point sprites are logged to a
/// [`SpriteRecording`] and, when a [`GpuContext`] is attached, also drawn.
pub struct HeadlessSurface {
    canvas: Option<RecordingCanvas>,
    gpu: Option<Rc<GpuContext>>,
    sprites: Option<SpriteRecording>,
}

impl HeadlessSurface {
    /// Recording canvas and recording sprites
    pub fn new() -> Self {
        Self {
            canvas: Some(RecordingCanvas::new()),
            gpu: None,
            sprites: Some(SpriteRecording::new()),
        }
    }

    /// Recording canvas and real GPU sprites, still logged
    pub fn with_gpu(gpu: Rc<GpuContext>) -> Self {
        Self {
            canvas: Some(RecordingCanvas::new()),
            gpu: Some(gpu),
            sprites: Some(SpriteRecording::new()),
        }
    }

    /// Recording canvas only; point sprites are unavailable
    pub fn canvas_only() -> Self {
        Self {
            canvas: Some(RecordingCanvas::new()),
            gpu: None,
            sprites: None,
        }
    }

    /// Nothing can be drawn
    pub fn unavailable() -> Self {
        Self {
            canvas: None,
            gpu: None,
            sprites: None,
        }
    }

    /// Observer handle on the canvas output
    pub fn canvas(&self) -> Option<&RecordingCanvas> {
        self.canvas.as_ref()
    }

    /// Observer handle on the recorded sprite output
    pub fn sprites(&self) -> Option<&SpriteRecording> {
        self.sprites.as_ref()
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for HeadlessSurface {
    fn canvas_2d(&mut self) -> Option<Box<dyn Canvas>> {
        self.canvas
            .as_ref()
            .map(|canvas| Box::new(canvas.clone()) as Box<dyn Canvas>)
    }

    fn point_sprites(
        &mut self,
        capacity: usize,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SpriteBackend>> {
        match (&self.gpu, &self.sprites) {
            (Some(gpu), sprites) => {
                gpu.resize(width.max(1), height.max(1))?;
                let renderer: Box<dyn SpriteBackend> =
                    Box::new(PointSpriteRenderer::new(Rc::clone(gpu), capacity));
                let backend: Box<dyn SpriteBackend> = match sprites {
                    Some(sprites) => Box::new(sprites.observe(renderer)),
                    None => renderer,
                };
                Ok(backend)
            }
            (None, Some(sprites)) => Ok(Box::new(sprites.backend())),
            (None, None) => Err(BackdropError::SurfaceUnavailable(
                "no GPU context attached".to_string(),
            )),
        }
    }
}
