use image::Rgba;
use nalgebra::Vector3;

/// 8-bit RGBA colour as stored in the framebuffer and in textures.
pub type Color = Rgba<u8>;

/// Converts the RGB channels of an 8-bit colour to [0, 1] floats.
pub fn to_unit_rgb(color: Color) -> Vector3<f32> {
    Vector3::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
    )
}

/// Clamps each channel to [0, 1] and truncates it to 8 bits.
pub fn quantize(rgb: Vector3<f32>, alpha: u8) -> Color {
    let r = (rgb.x.clamp(0.0, 1.0) * 255.0) as u8;
    let g = (rgb.y.clamp(0.0, 1.0) * 255.0) as u8;
    let b = (rgb.z.clamp(0.0, 1.0) * 255.0) as u8;
    Rgba([r, g, b, alpha])
}

/// `existing * (1 - alpha) + overlay * alpha`, per channel including alpha.
///
/// Results are rounded, so every channel stays between the two inputs.
pub fn blend(existing: Color, overlay: Color, alpha: f32) -> Color {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for (c, slot) in out.iter_mut().enumerate() {
        let mixed = existing[c] as f32 * (1.0 - alpha) + overlay[c] as f32 * alpha;
        *slot = mixed.round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}
