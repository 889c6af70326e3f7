use crate::core::color::Color;
use crate::core::math::interpolation::{interpolate, interpolate_point};
use crate::pipeline::shaders::phong::{Lighting, phong_color, sample_nearest};
use crate::scene::texture::TextureProvider;
use nalgebra::{Point3, Vector2, Vector3};

/// How the fragments of one triangle are coloured.
///
/// Resolved once per triangle before its pixel loop; the rasterizer only
/// calls [`Shading::shade`] for fragments that passed the depth test.
#[derive(Clone, Copy)]
pub enum Shading<'a> {
    /// Constant colour, no lighting.
    FlatColor(Color),
    /// Phong lighting over a constant albedo.
    PhongFlat {
        normals: [Vector3<f32>; 3],
        world: [Point3<f32>; 3],
        albedo: Color,
    },
    /// Phong lighting over a nearest-sampled texture albedo.
    ///
    /// UVs are interpolated linearly in screen space (no perspective
    /// correction).
    PhongTextured {
        normals: [Vector3<f32>; 3],
        world: [Point3<f32>; 3],
        uvs: [Vector2<f32>; 3],
        texture: &'a dyn TextureProvider,
    },
}

impl Shading<'_> {
    /// Colour of the fragment at barycentric weights `bary`.
    #[inline]
    pub fn shade(&self, bary: &Vector3<f32>, lighting: &Lighting) -> Color {
        match self {
            Shading::FlatColor(color) => *color,
            Shading::PhongFlat {
                normals,
                world,
                albedo,
            } => {
                let normal = interpolate(normals, bary);
                let frag_pos = interpolate_point(world, bary);
                phong_color(&normal, &frag_pos, lighting, *albedo)
            }
            Shading::PhongTextured {
                normals,
                world,
                uvs,
                texture,
            } => {
                let uv = interpolate(uvs, bary);
                let albedo = sample_nearest(*texture, &uv);
                let normal = interpolate(normals, bary);
                let frag_pos = interpolate_point(world, bary);
                phong_color(&normal, &frag_pos, lighting, albedo)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::texture::Texture;
    use image::{Rgba, RgbaImage};

    // Eye far off the reflection axis, so specular is effectively zero.
    fn lighting() -> Lighting {
        Lighting::new(Vector3::new(0.0, 0.0, 1.0), Point3::new(10.0, 0.0, 0.1))
    }

    #[test]
    fn flat_color_ignores_lighting() {
        let shading = Shading::FlatColor(Rgba([1, 2, 3, 4]));
        let c = shading.shade(&Vector3::new(0.2, 0.3, 0.5), &lighting());
        assert_eq!(c, Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn textured_samples_interpolated_uv() {
        // 2x1 texture: left texel red, right texel blue.
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        let texture = Texture::from_image(img);

        let shading = Shading::PhongTextured {
            normals: [Vector3::z(); 3],
            world: [Point3::origin(); 3],
            uvs: [
                Vector2::new(0.9, 0.0),
                Vector2::new(0.9, 0.0),
                Vector2::new(0.1, 0.0),
            ],
            texture: &texture,
        };
        // Mostly the first two corners: u = 0.9 -> right texel.
        let c = shading.shade(&Vector3::new(0.5, 0.5, 0.0), &lighting());
        assert_eq!(c[0], 0);
        assert!(c[2] > 200);
        // Only the last corner: u = 0.1 -> left texel.
        let c = shading.shade(&Vector3::new(0.0, 0.0, 1.0), &lighting());
        assert!(c[0] > 200);
        assert_eq!(c[2], 0);
    }
}
