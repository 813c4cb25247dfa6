//! Falloff texture
//!
//! A soft circular sprite: opaque white in the middle fading to transparent
//! at the edge. Generated on the CPU so it can be checked without a GPU.

use backdrop_paint::{gradient::sample_stops, Color, GradientStop};

/// Edge length of the falloff texture in pixels
pub const FALLOFF_SIZE: u32 = 64;

fn falloff_stops() -> [GradientStop; 4] {
    [
        GradientStop::new(0.0, Color::WHITE),
        GradientStop::new(0.2, Color::rgba8(240, 240, 240, 0.8)),
        GradientStop::new(0.4, Color::rgba8(220, 220, 220, 0.4)),
        GradientStop::new(1.0, Color::TRANSPARENT),
    ]
}

/// RGBA8 pixels of a `size` x `size` radial falloff
pub fn falloff_pixels(size: u32) -> Vec<u8> {
    let stops = falloff_stops();
    let half = size as f32 / 2.0;
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let offset = ((dx * dx + dy * dy).sqrt() / half).min(1.0);
            pixels.extend_from_slice(&sample_stops(&stops, offset).to_rgba8());
        }
    }
    pixels
}

/// Upload the falloff texture and return it with a view
pub(crate) fn create_falloff_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: FALLOFF_SIZE,
        height: FALLOFF_SIZE,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("sprite_falloff"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &falloff_pixels(FALLOFF_SIZE),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(FALLOFF_SIZE * 4),
            rows_per_image: Some(FALLOFF_SIZE),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixels: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * size + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    #[test]
    fn test_center_bright_corner_clear() {
        let pixels = falloff_pixels(FALLOFF_SIZE);
        assert_eq!(pixels.len(), (FALLOFF_SIZE * FALLOFF_SIZE * 4) as usize);

        let center = pixel(&pixels, FALLOFF_SIZE, 32, 32);
        assert!(center[3] > 240);
        assert_eq!(pixel(&pixels, FALLOFF_SIZE, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_alpha_falls_off_radially() {
        let pixels = falloff_pixels(FALLOFF_SIZE);
        let alphas: Vec<u8> = (32..64)
            .map(|x| pixel(&pixels, FALLOFF_SIZE, x, 32)[3])
            .collect();
        assert!(alphas.windows(2).all(|w| w[0] >= w[1]));
    }
}
