use crate::core::framebuffer::FrameBuffer;
use crate::error::Error;
use image::{DynamicImage, GrayImage, ImageFormat, RgbaImage};
use log::info;
use rayon::prelude::*;
use std::path::Path;

/// Converts the framebuffer to a top-down RGBA image.
///
/// The framebuffer stores its bottom row first, so rows are flipped here.
pub fn framebuffer_to_image(framebuffer: &FrameBuffer) -> RgbaImage {
    let (width, height) = (framebuffer.width, framebuffer.height);
    let colors = framebuffer.colors();
    let mut raw = vec![0u8; width * height * 4];

    if width > 0 {
        raw.par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(row, out)| {
                let src = &colors[(height - 1 - row) * width..][..width];
                for (px, color) in out.chunks_exact_mut(4).zip(src) {
                    px.copy_from_slice(&color.0);
                }
            });
    }

    RgbaImage::from_raw(width as u32, height as u32, raw).unwrap_or_default()
}

/// Grayscale view of the depth buffer, top-down like the colour output.
///
/// Untouched pixels (negative infinity) are black; finite depths are mapped
/// linearly onto 1..=255, nearest brightest.
pub fn depth_to_image(framebuffer: &FrameBuffer) -> GrayImage {
    let (width, height) = (framebuffer.width, framebuffer.height);
    let depths = framebuffer.depths();

    let (min, max) = depths
        .par_iter()
        .copied()
        .filter(|d| d.is_finite())
        .fold(
            || (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), d| (lo.min(d), hi.max(d)),
        )
        .reduce(
            || (f32::INFINITY, f32::NEG_INFINITY),
            |a, b| (a.0.min(b.0), a.1.max(b.1)),
        );
    let span = max - min;

    let mut raw = vec![0u8; width * height];
    if width > 0 {
        raw.par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, out)| {
                let src = &depths[(height - 1 - row) * width..][..width];
                for (px, &d) in out.iter_mut().zip(src) {
                    *px = if !d.is_finite() {
                        0
                    } else if span > 0.0 {
                        1 + ((d - min) / span * 254.0).round() as u8
                    } else {
                        255
                    };
                }
            });
    }

    GrayImage::from_raw(width as u32, height as u32, raw).unwrap_or_default()
}

/// Writes the image in the format implied by the file extension, TGA when
/// the extension is unknown.
fn save_dynamic(img: DynamicImage, path: &Path) -> Result<(), Error> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Tga);
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };
    img.save_with_format(path, format)?;
    info!("Saved {:?} ({}x{}, {:?})", path, img.width(), img.height(), format);
    Ok(())
}

/// The output sink: writes the colour buffer once, after the frame is done.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), Error> {
    save_dynamic(
        DynamicImage::ImageRgba8(framebuffer_to_image(framebuffer)),
        path.as_ref(),
    )
}

pub fn save_depth_image<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<(), Error> {
    save_dynamic(
        DynamicImage::ImageLuma8(depth_to_image(framebuffer)),
        path.as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgba};

    #[test]
    fn output_is_flipped_to_top_down() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.set_pixel(0, 0, Rgba([255, 0, 0, 255]));
        fb.set_pixel(2, 1, Rgba([0, 255, 0, 255]));

        let img = framebuffer_to_image(&fb);
        assert_eq!(img.dimensions(), (3, 2));
        // Bottom-left of the framebuffer is the last image row.
        assert_eq!(*img.get_pixel(0, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*img.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn depth_maps_far_to_one_and_near_to_255() {
        let mut fb = FrameBuffer::new(3, 1);
        fb.depth_test_and_update(0, 0, -10.0);
        fb.depth_test_and_update(1, 0, 90.0);

        let img = depth_to_image(&fb);
        assert_eq!(*img.get_pixel(0, 0), Luma([1]));
        assert_eq!(*img.get_pixel(1, 0), Luma([255]));
        assert_eq!(*img.get_pixel(2, 0), Luma([0]));
    }

    #[test]
    fn single_depth_value_is_white() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.depth_test_and_update(1, 0, 3.0);
        let img = depth_to_image(&fb);
        assert_eq!(img.as_raw(), &vec![0, 255]);
    }

    #[test]
    fn saved_tga_reads_back() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.clear(Rgba([10, 20, 30, 255]));
        fb.set_pixel(0, 3, Rgba([200, 100, 50, 255]));

        let path = std::env::temp_dir().join("phong_rasterizer_image_test.tga");
        save_framebuffer(&fb, &path).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.dimensions(), (4, 4));
        assert_eq!(*back.get_pixel(0, 0), Rgba([200, 100, 50, 255]));
        assert_eq!(*back.get_pixel(3, 3), Rgba([10, 20, 30, 255]));
    }
}
