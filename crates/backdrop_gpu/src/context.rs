//! GPU context
//!
//! Device, queue and the current render target. A context is created once by
//! the host and handed to each point-sprite renderer as it starts; renderers
//! never create devices of their own.

use std::cell::RefCell;
use std::sync::Arc;

use crate::error::{GpuError, Result};

enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

/// The texture a single frame renders into
pub enum FrameTarget {
    Surface {
        frame: wgpu::SurfaceTexture,
        view: wgpu::TextureView,
    },
    Offscreen {
        view: wgpu::TextureView,
    },
}

impl FrameTarget {
    pub fn view(&self) -> &wgpu::TextureView {
        match self {
            FrameTarget::Surface { view, .. } | FrameTarget::Offscreen { view } => view,
        }
    }

    /// Present the frame (no-op offscreen)
    pub fn present(self) {
        if let FrameTarget::Surface { frame, .. } = self {
            frame.present();
        }
    }
}

/// Shared GPU state
pub struct GpuContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    format: wgpu::TextureFormat,
    target: RefCell<RenderTarget>,
}

impl GpuContext {
    /// Instance restricted to the backends we ship for this platform
    pub fn create_instance() -> wgpu::Instance {
        wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: Self::preferred_backends(),
            ..Default::default()
        })
    }

    fn preferred_backends() -> wgpu::Backends {
        #[cfg(target_arch = "wasm32")]
        {
            wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL
        }
        #[cfg(target_os = "macos")]
        {
            wgpu::Backends::METAL
        }
        #[cfg(target_os = "windows")]
        {
            wgpu::Backends::DX12
        }
        #[cfg(all(target_os = "linux", not(target_arch = "wasm32")))]
        {
            wgpu::Backends::VULKAN | wgpu::Backends::GL
        }
        #[cfg(not(any(
            target_arch = "wasm32",
            target_os = "macos",
            target_os = "windows",
            target_os = "linux"
        )))]
        {
            wgpu::Backends::all()
        }
    }

    /// Context rendering into an offscreen texture
    pub async fn headless(width: u32, height: u32) -> Result<Self> {
        check_size(width, height)?;
        let instance = Self::create_instance();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNotFound)?;

        let (device, queue) = request_device(&adapter).await?;
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let texture = create_offscreen(&device, format, width, height);

        tracing::debug!(
            adapter = %adapter.get_info().name,
            width,
            height,
            "headless GPU context created"
        );

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            format,
            target: RefCell::new(RenderTarget::Offscreen { texture }),
        })
    }

    /// Blocking variant of [`GpuContext::headless`] for native hosts
    pub fn headless_blocking(width: u32, height: u32) -> Result<Self> {
        pollster::block_on(Self::headless(width, height))
    }

    /// Context presenting to a window or canvas surface created from `instance`
    pub async fn with_surface(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        check_size(width, height)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::AdapterNotFound)?;

        let (device, queue) = request_device(&adapter).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(GpuError::SurfaceUnsupported)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        tracing::debug!(
            adapter = %adapter.get_info().name,
            ?format,
            width,
            height,
            "surface GPU context created"
        );

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            format,
            target: RefCell::new(RenderTarget::Surface { surface, config }),
        })
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn is_headless(&self) -> bool {
        matches!(&*self.target.borrow(), RenderTarget::Offscreen { .. })
    }

    /// Current render target size in pixels
    pub fn size(&self) -> (u32, u32) {
        match &*self.target.borrow() {
            RenderTarget::Surface { config, .. } => (config.width, config.height),
            RenderTarget::Offscreen { texture } => (texture.width(), texture.height()),
        }
    }

    /// Resize the render target
    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        check_size(width, height)?;
        if self.size() == (width, height) {
            return Ok(());
        }

        let mut target = self.target.borrow_mut();
        match &mut *target {
            RenderTarget::Surface { surface, config } => {
                config.width = width;
                config.height = height;
                surface.configure(&self.device, config);
            }
            RenderTarget::Offscreen { texture } => {
                texture.destroy();
                *texture = create_offscreen(&self.device, self.format, width, height);
            }
        }
        tracing::debug!(width, height, "GPU render target resized");
        Ok(())
    }

    /// Acquire the texture for the next frame.
    ///
    /// A lost or outdated surface is reconfigured before the error is
    /// returned, so the following frame can succeed.
    pub fn acquire(&self) -> Result<FrameTarget> {
        let target = self.target.borrow();
        match &*target {
            RenderTarget::Surface { surface, config } => match surface.get_current_texture() {
                Ok(frame) => {
                    let view = frame
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());
                    Ok(FrameTarget::Surface { frame, view })
                }
                Err(err) => {
                    if matches!(err, wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) {
                        surface.configure(&self.device, config);
                    }
                    Err(GpuError::Frame(err))
                }
            },
            RenderTarget::Offscreen { texture } => Ok(FrameTarget::Offscreen {
                view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            }),
        }
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GpuError::InvalidSize { width, height });
    }
    Ok(())
}

async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
    let required_limits =
        wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
    let pair = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Backdrop GPU Device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
            },
            None,
        )
        .await?;
    Ok(pair)
}

fn create_offscreen(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("backdrop_offscreen"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}
