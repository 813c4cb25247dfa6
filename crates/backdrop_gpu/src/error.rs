//! GPU error types

use thiserror::Error;

/// Errors raised while setting up or driving the GPU
#[derive(Error, Debug)]
pub enum GpuError {
    #[error("no suitable GPU adapter found")]
    AdapterNotFound,

    #[error("failed to request GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("surface is not supported by the selected adapter")]
    SurfaceUnsupported,

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("invalid render target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, GpuError>;
