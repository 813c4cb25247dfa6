//! WGSL shaders

/// Instanced point sprites.
///
/// Each instance expands to a camera-facing quad (six vertices, two
/// triangles) whose pixel diameter is `size * point_scale / -z_view`. The
/// fragment stage multiplies the instance tint by the falloff texture.
pub const POINT_SPRITE_SHADER: &str = r#"
struct Uniforms {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
    viewport: vec2<f32>,
    point_scale: f32,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var falloff_texture: texture_2d<f32>;
@group(0) @binding(2) var falloff_sampler: sampler;

struct SpriteInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, sprite: SpriteInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    let view_position = uniforms.model_view * vec4<f32>(sprite.position, 1.0);
    let clip = uniforms.projection * view_position;

    // Pixel diameter -> NDC half extent is diameter / viewport
    let diameter = sprite.size * uniforms.point_scale / max(-view_position.z, 0.0001);
    let offset = corner * diameter / uniforms.viewport;

    var out: VertexOutput;
    out.clip_position = vec4<f32>(clip.xy + offset * clip.w, clip.z, clip.w);
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    out.color = sprite.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let falloff = textureSample(falloff_texture, falloff_sampler, in.uv);
    return vec4<f32>(in.color * falloff.rgb, falloff.a);
}
"#;

/// Vertices drawn per sprite instance
pub const VERTICES_PER_SPRITE: u32 = 6;
