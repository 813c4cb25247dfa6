//! GPU data layouts
//!
//! Structures here are copied straight into GPU buffers. All use `#[repr(C)]`
//! and implement `bytemuck::Pod`; field order and padding must match
//! [`crate::shaders::POINT_SPRITE_SHADER`].

/// One point sprite instance (32 bytes)
///
/// Memory layout:
/// - position: `vec3<f32>` (12 bytes, location 0)
/// - size:     `f32`       (4 bytes, location 1)
/// - color:    `vec3<f32>` (12 bytes, location 2)
/// - padding               (4 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuPointSprite {
    /// Object-space position
    pub position: [f32; 3],
    /// World-space size, scaled by `point_scale / -z_view` into pixels
    pub size: f32,
    /// Linear RGB tint in [0, 1]
    pub color: [f32; 3],
    pub _pad: f32,
}

impl GpuPointSprite {
    pub fn new(position: [f32; 3], size: f32, color: [f32; 3]) -> Self {
        Self {
            position,
            size,
            color,
            _pad: 0.0,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32,
        2 => Float32x3,
    ];

    /// Per-instance vertex buffer layout
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuPointSprite>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-frame uniforms (144 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteUniforms {
    /// Column-major projection matrix
    pub projection: [[f32; 4]; 4],
    /// Column-major model-view matrix
    pub model_view: [[f32; 4]; 4],
    /// Render target size in pixels
    pub viewport: [f32; 2],
    /// Pixel size of a unit sprite at view depth 1
    pub point_scale: f32,
    pub _pad: f32,
}

impl Default for SpriteUniforms {
    fn default() -> Self {
        const IDENTITY: [[f32; 4]; 4] = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        Self {
            projection: IDENTITY,
            model_view: IDENTITY,
            viewport: [1.0, 1.0],
            point_scale: 1.0,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<GpuPointSprite>(), 32);
        assert_eq!(std::mem::size_of::<SpriteUniforms>(), 144);
        // Uniform buffers bind in 16-byte units
        assert_eq!(std::mem::size_of::<SpriteUniforms>() % 16, 0);
    }

    #[test]
    fn test_attribute_offsets() {
        let offsets: Vec<u64> = GpuPointSprite::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 16]);
        assert_eq!(GpuPointSprite::layout().step_mode, wgpu::VertexStepMode::Instance);
    }
}
