//! Backdrop GPU
//!
//! Point-sprite rendering on wgpu. Sprites are drawn as instanced,
//! camera-facing quads textured with a soft circular falloff and composited
//! additively, so dense clusters glow.
//!
//! The [`GpuContext`] owns device, queue and render target and is shared by
//! whichever renderer currently draws. A [`PointSpriteRenderer`] owns every
//! pipeline, buffer and texture it creates and destroys them when dropped.

pub mod context;
pub mod error;
pub mod primitives;
pub mod renderer;
pub mod shaders;
pub mod texture;

pub use context::{FrameTarget, GpuContext};
pub use error::{GpuError, Result};
pub use primitives::{GpuPointSprite, SpriteUniforms};
pub use renderer::PointSpriteRenderer;
pub use texture::{falloff_pixels, FALLOFF_SIZE};
