use crate::core::color::Color;
use crate::error::Error;
use image::{Rgba, RgbaImage, imageops};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Read-only texel access used by the shader.
///
/// Texel `(0, 0)` is the bottom-left corner, so `v = 0` addresses the bottom
/// row of the source image.
pub trait TextureProvider {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Texel at integer coordinates. Out-of-range coordinates are clamped.
    fn sample(&self, x: u32, y: u32) -> Color;

    fn is_present(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// A diffuse map held in memory as 8-bit RGBA.
#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// Wraps a top-down image (as decoded from a file), flipping it so that
    /// row 0 is the bottom of the picture.
    pub fn from_image(mut image: RgbaImage) -> Self {
        imageops::flip_vertical_in_place(&mut image);
        Self { image }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)?.to_rgba8();
        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref,
            img.width(),
            img.height()
        );
        Ok(Self::from_image(img))
    }

    /// `<obj path without extension>_diffuse.tga`.
    pub fn diffuse_path_for<P: AsRef<Path>>(obj_path: P) -> PathBuf {
        let obj_path = obj_path.as_ref();
        let stem = obj_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        obj_path.with_file_name(format!("{stem}_diffuse.tga"))
    }

    /// Loads the texture if possible; a missing or unreadable file is a
    /// warning and the caller falls back to flat albedo.
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<Self> {
        match Self::load(&path) {
            Ok(texture) if texture.is_present() => Some(texture),
            Ok(_) => {
                warn!("Texture {:?} is empty, using flat albedo", path.as_ref());
                None
            }
            Err(e) => {
                warn!(
                    "Texture {:?} not loaded ({}), using flat albedo",
                    path.as_ref(),
                    e
                );
                None
            }
        }
    }
}

impl TextureProvider for Texture {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn sample(&self, x: u32, y: u32) -> Color {
        if !self.is_present() {
            return Rgba([255, 255, 255, 255]);
        }
        let x = x.min(self.image.width() - 1);
        let y = y.min(self.image.height() - 1);
        *self.image.get_pixel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_stored_bottom_up() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, Rgba([1, 0, 0, 255])); // top
        img.put_pixel(0, 1, Rgba([2, 0, 0, 255])); // bottom
        let tex = Texture::from_image(img);
        assert_eq!(tex.sample(0, 0)[0], 2);
        assert_eq!(tex.sample(0, 1)[0], 1);
    }

    #[test]
    fn sample_clamps_coordinates() {
        let tex = Texture::from_image(RgbaImage::from_pixel(2, 2, Rgba([7, 7, 7, 7])));
        assert_eq!(tex.sample(99, 99), Rgba([7, 7, 7, 7]));
    }

    #[test]
    fn empty_texture_is_not_present() {
        let tex = Texture::from_image(RgbaImage::new(0, 0));
        assert!(!tex.is_present());
    }

    #[test]
    fn diffuse_path_replaces_extension() {
        let p = Texture::diffuse_path_for("obj/african_head.obj");
        assert_eq!(p, PathBuf::from("obj/african_head_diffuse.tga"));
    }

    #[test]
    fn missing_texture_is_optional() {
        assert!(Texture::load_optional("definitely/not/here_diffuse.tga").is_none());
    }
}
