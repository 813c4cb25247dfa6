//! Point-sprite renderer
//!
//! Owns the pipeline, the uniform and instance buffers and the falloff
//! texture for one running particle field. Dropping the renderer destroys
//! the buffers and the texture immediately instead of waiting for the device
//! to reclaim them.

use std::rc::Rc;

use crate::context::GpuContext;
use crate::error::Result;
use crate::primitives::{GpuPointSprite, SpriteUniforms};
use crate::shaders::{POINT_SPRITE_SHADER, VERTICES_PER_SPRITE};
use crate::texture::create_falloff_texture;

pub struct PointSpriteRenderer {
    ctx: Rc<GpuContext>,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    falloff_texture: wgpu::Texture,
    capacity: usize,
    instance_count: u32,
}

impl PointSpriteRenderer {
    /// Build the pipeline and allocate room for `capacity` sprites
    pub fn new(ctx: Rc<GpuContext>, capacity: usize) -> Self {
        let device = ctx.device();
        let capacity = capacity.max(1);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(POINT_SPRITE_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point Sprite Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Sprite Uniforms"),
            size: std::mem::size_of::<SpriteUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point Sprite Instances"),
            size: (capacity * std::mem::size_of::<GpuPointSprite>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (falloff_texture, falloff_view) = create_falloff_texture(device, ctx.queue());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Point Sprite Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point Sprite Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&falloff_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point Sprite Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Additive: overlapping sprites brighten instead of occluding
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Sprite Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuPointSprite::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // No depth test: additive sprites are order independent
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::debug!(capacity, format = ?ctx.format(), "point sprite pipeline created");

        Self {
            ctx,
            pipeline,
            bind_group,
            uniform_buffer,
            instance_buffer,
            falloff_texture,
            capacity,
            instance_count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sprites drawn by the next [`render`](Self::render)
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Replace the sprite instances; anything past capacity is dropped
    pub fn upload(&mut self, sprites: &[GpuPointSprite]) {
        let count = sprites.len().min(self.capacity);
        if count < sprites.len() {
            tracing::warn!(
                requested = sprites.len(),
                capacity = self.capacity,
                "point sprite upload truncated"
            );
        }
        if count > 0 {
            self.ctx.queue().write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&sprites[..count]),
            );
        }
        self.instance_count = count as u32;
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.ctx.resize(width, height)
    }

    /// Clear to `clear` and draw every uploaded sprite
    pub fn render(&mut self, uniforms: &SpriteUniforms, clear: wgpu::Color) -> Result<()> {
        let frame = self.ctx.acquire()?;

        self.ctx
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let mut encoder = self
            .ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Point Sprite Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Sprite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.instance_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.bind_group, &[]);
                pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                pass.draw(0..VERTICES_PER_SPRITE, 0..self.instance_count);
            }
        }

        self.ctx.queue().submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

impl Drop for PointSpriteRenderer {
    fn drop(&mut self) {
        self.instance_buffer.destroy();
        self.uniform_buffer.destroy();
        self.falloff_texture.destroy();
        tracing::debug!(capacity = self.capacity, "point sprite resources released");
    }
}
