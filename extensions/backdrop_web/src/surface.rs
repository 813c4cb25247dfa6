//! Browser surface
//!
//! A canvas element can hold only one kind of context, so the 2D styles and
//! the GPU style draw into separate canvases stacked by the page.

use std::rc::Rc;

use backdrop::{BackdropError, Result, SpriteBackend, Surface};
use backdrop_gpu::{GpuContext, GpuError, PointSpriteRenderer};
use backdrop_paint::Canvas;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::canvas::WebCanvas;

/// 2D context of `canvas`, if the browser grants one
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// GPU context presenting to `canvas`
#[cfg(target_arch = "wasm32")]
pub async fn create_gpu(canvas: HtmlCanvasElement) -> std::result::Result<GpuContext, GpuError> {
    let width = canvas.width().max(1);
    let height = canvas.height().max(1);
    let instance = GpuContext::create_instance();
    let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
    GpuContext::with_surface(&instance, surface, width, height).await
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn create_gpu(_canvas: HtmlCanvasElement) -> std::result::Result<GpuContext, GpuError> {
    Err(GpuError::SurfaceUnsupported)
}

pub struct WebSurface {
    canvas: HtmlCanvasElement,
    ctx: Option<CanvasRenderingContext2d>,
    gpu_canvas: Option<HtmlCanvasElement>,
    gpu: Option<Rc<GpuContext>>,
}

impl WebSurface {
    pub fn new(
        canvas: HtmlCanvasElement,
        gpu_canvas: Option<HtmlCanvasElement>,
        gpu: Option<Rc<GpuContext>>,
    ) -> Self {
        let ctx = context_2d(&canvas);
        Self {
            canvas,
            ctx,
            gpu_canvas,
            gpu,
        }
    }

    pub fn has_gpu(&self) -> bool {
        self.gpu.is_some()
    }

    fn clear_2d(&self) {
        if let Some(ctx) = &self.ctx {
            ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        }
    }
}

impl Surface for WebSurface {
    fn canvas_2d(&mut self) -> Option<Box<dyn Canvas>> {
        // Renderers expect an empty canvas
        self.clear_2d();
        let ctx = self.ctx.clone()?;
        Some(Box::new(WebCanvas::new(ctx)))
    }

    fn point_sprites(
        &mut self,
        capacity: usize,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn SpriteBackend>> {
        let gpu = self.gpu.as_ref().ok_or_else(|| {
            BackdropError::SurfaceUnavailable("WebGPU and WebGL are unavailable".to_string())
        })?;
        if let Some(canvas) = &self.gpu_canvas {
            canvas.set_width(width.max(1));
            canvas.set_height(height.max(1));
        }
        gpu.resize(width.max(1), height.max(1))?;
        self.clear_2d();
        Ok(Box::new(PointSpriteRenderer::new(Rc::clone(gpu), capacity)))
    }
}
