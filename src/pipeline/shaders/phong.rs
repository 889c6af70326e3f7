use crate::core::color::{Color, quantize, to_unit_rgb};
use crate::scene::texture::TextureProvider;
use image::Rgba;
use nalgebra::{Point3, Vector2, Vector3};

pub const SHININESS: f32 = 64.0;
pub const AMBIENT_STRENGTH: f32 = 0.30;
pub const DIFFUSE_STRENGTH: f32 = 0.70;
pub const SPECULAR_STRENGTH: f32 = 0.20;

/// Per-frame lighting state: one directional light and the eye position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Unit vector pointing from the scene towards the light.
    pub light_dir: Vector3<f32>,
    pub eye: Point3<f32>,
}

impl Lighting {
    /// Normalizes `light_dir` once for the whole frame.
    pub fn new(light_dir: Vector3<f32>, eye: Point3<f32>) -> Self {
        Self {
            light_dir: light_dir.try_normalize(f32::EPSILON).unwrap_or(light_dir),
            eye,
        }
    }
}

/// Phong colour of a fragment.
///
/// `normal` is the interpolated vertex normal (re-normalized here),
/// `frag_pos` the interpolated world position. Each channel is
/// `albedo * (ambient + diffuse) + specular`, clamped and truncated to 8 bits;
/// alpha is copied from `albedo`.
pub fn phong_color(
    normal: &Vector3<f32>,
    frag_pos: &Point3<f32>,
    lighting: &Lighting,
    albedo: Color,
) -> Color {
    let n = normal.try_normalize(1e-12).unwrap_or_else(Vector3::z);
    let l = lighting.light_dir;
    let v = (lighting.eye - frag_pos)
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::zeros);

    let diff = n.dot(&l).max(0.0);

    // Mirror of the incoming light direction (-L) about the normal.
    let incoming = -l;
    let reflected = (incoming - n * (2.0 * incoming.dot(&n)))
        .try_normalize(1e-12)
        .unwrap_or_else(Vector3::zeros);
    let spec = reflected.dot(&v).max(0.0).powf(SHININESS);

    let base = to_unit_rgb(albedo);
    let lit = base * (AMBIENT_STRENGTH + DIFFUSE_STRENGTH * diff)
        + Vector3::repeat(SPECULAR_STRENGTH * spec);

    quantize(lit, albedo[3])
}

/// Nearest-texel lookup: `trunc(uv * size)`, clamped to the texture.
pub fn sample_nearest(texture: &dyn TextureProvider, uv: &Vector2<f32>) -> Color {
    let w = texture.width() as i32;
    let h = texture.height() as i32;
    if w <= 0 || h <= 0 {
        return Rgba([255, 255, 255, 255]);
    }

    let tx = ((uv.x * w as f32) as i32).clamp(0, w - 1);
    let ty = ((uv.y * h as f32) as i32).clamp(0, h - 1);
    texture.sample(tx as u32, ty as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use image::RgbaImage;

    const GRAY: Color = Rgba([180, 180, 180, 255]);

    fn close(a: u8, b: u8) -> bool {
        (a as i32 - b as i32).abs() <= 1
    }

    #[test]
    fn head_on_light_without_highlight_returns_albedo() {
        // Light along the normal, eye off to the side.
        let lighting = Lighting::new(Vector3::new(0.0, 0.0, -1.0), Point3::new(1.0, 0.0, 4.0));
        let c = phong_color(
            &Vector3::new(0.0, 0.0, -1.0),
            &Point3::new(0.33, 0.33, 0.0),
            &lighting,
            GRAY,
        );
        assert!(close(c[0], 180) && close(c[1], 180) && close(c[2], 180), "{c:?}");
        assert_eq!(c[3], 255);
    }

    #[test]
    fn back_lit_surface_gets_ambient_only() {
        let lighting = Lighting::new(Vector3::new(0.0, 0.0, -1.0), Point3::new(0.0, 0.0, 5.0));
        let c = phong_color(&Vector3::z(), &Point3::origin(), &lighting, GRAY);
        // 180 * 0.3 = 54
        assert!(close(c[0], 54), "{c:?}");
    }

    #[test]
    fn mirror_direction_adds_full_specular() {
        // Light and eye both straight above the surface: R == V.
        let lighting = Lighting::new(Vector3::z(), Point3::new(0.0, 0.0, 5.0));
        let black = Rgba([0, 0, 0, 128]);
        let c = phong_color(&Vector3::z(), &Point3::origin(), &lighting, black);
        // 0.2 * 255 = 51
        assert!(close(c[0], 51), "{c:?}");
        assert_eq!(c[3], 128);
    }

    #[test]
    fn bright_albedo_is_clamped() {
        let lighting = Lighting::new(Vector3::z(), Point3::new(0.0, 0.0, 5.0));
        let white = Rgba([255, 255, 255, 255]);
        let c = phong_color(&Vector3::z(), &Point3::origin(), &lighting, white);
        assert_eq!(c, white);
    }

    #[test]
    fn light_direction_is_normalized_once() {
        let lighting = Lighting::new(Vector3::new(0.0, 0.0, -7.0), Point3::origin());
        assert!((lighting.light_dir.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_normal_falls_back_to_up() {
        let lighting = Lighting::new(Vector3::z(), Point3::new(3.0, 0.0, 0.1));
        let c = phong_color(&Vector3::zeros(), &Point3::origin(), &lighting, GRAY);
        assert!(close(c[0], 180), "{c:?}");
    }

    #[test]
    fn nearest_sampling_truncates_and_clamps() {
        let mut img = RgbaImage::new(4, 1);
        for x in 0..4 {
            img.put_pixel(x, 0, Rgba([x as u8 * 10, 0, 0, 255]));
        }
        let texture = Texture::from_image(img);
        assert_eq!(sample_nearest(&texture, &Vector2::new(0.49, 0.0))[0], 10);
        assert_eq!(sample_nearest(&texture, &Vector2::new(0.5, 0.0))[0], 20);
        assert_eq!(sample_nearest(&texture, &Vector2::new(1.7, 3.0))[0], 30);
        assert_eq!(sample_nearest(&texture, &Vector2::new(-0.8, -2.0))[0], 0);
    }
}
