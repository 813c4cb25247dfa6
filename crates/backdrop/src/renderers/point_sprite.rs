//! Point-sprite starfield
//!
//! A pool of particles on a spherical shell, drawn as additive GPU point
//! sprites. The pointer moves a dispersion center; every frame each particle
//! is displaced away from (or toward) it by an amount that depends on its
//! color channels and a slow wave, so colors separate like a prism.

use backdrop_animation::FrameTime;
use backdrop_core::ViewportSize;
use backdrop_gpu::{GpuPointSprite, SpriteUniforms};
use glam::{Mat4, Vec3};
use rand::Rng;

use super::Scene;
use crate::config::{BackdropConfig, PointSpriteConfig};
use crate::error::Result;
use crate::rng::scene_rng;
use crate::surface::{SpriteBackend, Surface};

/// Curated star colors
pub const PALETTE: [[f32; 3]; 6] = [
    [1.0, 1.0, 1.0], // white
    [0.9, 0.9, 1.0], // bluish white
    [1.0, 0.9, 0.7], // yellowish white
    [0.9, 0.6, 0.6], // reddish
    [0.6, 0.8, 1.0], // blue
    [0.7, 1.0, 0.7], // green nebula
];

pub const MIN_SPRITE_SIZE: f32 = 0.02;
pub const SPRITE_SIZE_RANGE: f32 = 0.15;

/// Rotation speed around y, radians per second
const SPIN_Y: f32 = 0.005;
/// Rotation speed around x, radians per second
const SPIN_X: f32 = 0.001;

const FOV_Y_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;
const CAMERA_Z: f32 = 20.0;
const POINT_SCALE: f32 = 300.0;

/// #000005
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 5.0 / 255.0,
    a: 1.0,
};

/// Uniform sample on the shell between `inner` and `outer`
pub fn sample_shell<R: Rng>(rng: &mut R, inner: f32, outer: f32) -> Vec3 {
    let radius = inner + rng.gen::<f32>() * (outer - inner);
    let theta = rng.gen::<f32>() * std::f32::consts::TAU;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub original: Vec3,
    pub current: Vec3,
    /// RGB in [0, 1]
    pub color: Vec3,
    pub size: f32,
}

/// The particle pool, generated once per start
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Sample `config.particle_count` particles
    pub fn generate(config: &PointSpriteConfig, seed: Option<u64>) -> Self {
        let mut rng = scene_rng(seed);
        let particles = (0..config.particle_count)
            .map(|_| {
                let position = sample_shell(&mut rng, config.inner_radius, config.outer_radius);
                let color = if rng.gen::<f32>() < config.palette_fraction {
                    Vec3::from(PALETTE[rng.gen_range(0..PALETTE.len())])
                } else {
                    Vec3::new(rng.gen(), rng.gen(), rng.gen())
                };
                Particle {
                    original: position,
                    current: position,
                    color,
                    size: MIN_SPRITE_SIZE + rng.gen::<f32>() * SPRITE_SIZE_RANGE,
                }
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Recompute every current position from its original
    pub fn apply(&mut self, dispersion: &DispersionField, elapsed_s: f32) {
        for particle in &mut self.particles {
            particle.current = dispersion.displace(particle.original, particle.color, elapsed_s);
        }
    }

    /// Refill `out` with GPU instances for the current positions
    pub fn write_sprites(&self, out: &mut Vec<GpuPointSprite>) {
        out.clear();
        out.extend(self.particles.iter().map(|p| {
            GpuPointSprite::new(p.current.to_array(), p.size, p.color.to_array())
        }));
    }
}

/// Pointer-driven displacement center
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispersionField {
    center: Vec3,
    strength: f32,
    epsilon: f32,
    range: f32,
}

impl DispersionField {
    pub fn new(strength: f32, epsilon: f32, range: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            strength,
            epsilon,
            range,
        }
    }

    pub fn from_config(config: &PointSpriteConfig) -> Self {
        Self::new(
            config.dispersion_strength,
            config.dispersion_epsilon,
            config.pointer_range,
        )
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
    }

    /// Move the center from a pointer position in viewport pixels.
    ///
    /// Ignored while the viewport is degenerate.
    pub fn set_from_pointer(&mut self, x: f32, y: f32, size: ViewportSize) {
        if size.is_degenerate() {
            return;
        }
        let nx = (2.0 * x / size.width - 1.0).clamp(-1.0, 1.0);
        let ny = (1.0 - 2.0 * y / size.height).clamp(-1.0, 1.0);
        self.center = Vec3::new(nx * self.range, ny * self.range, 0.0);
    }

    /// Displaced position of a particle at `original` with `color`
    pub fn displace(&self, original: Vec3, color: Vec3, elapsed_s: f32) -> Vec3 {
        let offset = original - self.center;
        let distance = offset.length();
        if distance < self.epsilon {
            return original;
        }
        let factor = (color * 1.5 - Vec3::splat(0.5)) * self.strength;
        let wave = (elapsed_s * 0.3 + distance * 0.15).sin() * 0.2;
        original + offset * factor * wave
    }
}

/// Projection for the given aspect ratio
pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR)
}

/// Camera at `z = 20` looking at the pool, which is rotated x then y
pub fn model_view(rotation_x: f32, rotation_y: f32) -> Mat4 {
    let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_Z));
    let model = Mat4::from_rotation_x(rotation_x) * Mat4::from_rotation_y(rotation_y);
    view * model
}

/// Starfield scene
pub struct PointSpriteField {
    backend: Box<dyn SpriteBackend>,
    particles: ParticleField,
    dispersion: DispersionField,
    sprites: Vec<GpuPointSprite>,
    size: ViewportSize,
    elapsed_s: f32,
    rotation_x: f32,
    rotation_y: f32,
}

impl PointSpriteField {
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn dispersion(&self) -> &DispersionField {
        &self.dispersion
    }

    pub fn rotation(&self) -> (f32, f32) {
        (self.rotation_x, self.rotation_y)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_s
    }

    fn uniforms(&self) -> SpriteUniforms {
        let aspect = self.size.aspect().unwrap_or(1.0);
        SpriteUniforms {
            projection: projection(aspect).to_cols_array_2d(),
            model_view: model_view(self.rotation_x, self.rotation_y).to_cols_array_2d(),
            viewport: [self.size.width, self.size.height],
            point_scale: POINT_SCALE,
            _pad: 0.0,
        }
    }
}

impl Scene for PointSpriteField {
    const NAME: &'static str = "space";

    fn create(config: &BackdropConfig, surface: &mut dyn Surface, size: ViewportSize) -> Result<Self> {
        let sprite_config = &config.point_sprite;
        let (width, height) = size.pixel_size().unwrap_or((1, 1));
        let backend = surface.point_sprites(sprite_config.particle_count, width, height)?;

        let particles = ParticleField::generate(sprite_config, config.seed);
        tracing::debug!(particles = particles.len(), "starfield pool generated");

        Ok(Self {
            backend,
            sprites: Vec::with_capacity(particles.len()),
            particles,
            dispersion: DispersionField::from_config(sprite_config),
            size,
            elapsed_s: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
        })
    }

    fn frame(&mut self, time: FrameTime) {
        if self.size.is_degenerate() {
            return;
        }
        let dt = (time.delta_ms / 1000.0) as f32;
        self.elapsed_s += dt;

        self.particles.apply(&self.dispersion, self.elapsed_s);
        self.rotation_y += SPIN_Y * dt;
        self.rotation_x += SPIN_X * dt;

        self.particles.write_sprites(&mut self.sprites);
        self.backend.upload(&self.sprites);
        let uniforms = self.uniforms();
        if let Err(err) = self.backend.render(&uniforms, CLEAR_COLOR) {
            tracing::warn!(%err, "starfield frame skipped");
            return;
        }
        tracing::trace!(sprites = self.sprites.len(), "starfield frame");
    }

    fn resize(&mut self, size: ViewportSize) {
        self.size = size;
        if let Some((width, height)) = size.pixel_size() {
            if let Err(err) = self.backend.resize(width, height) {
                tracing::warn!(%err, width, height, "starfield resize failed");
            }
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        self.dispersion.set_from_pointer(x, y, self.size);
    }
}
