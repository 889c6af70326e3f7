use crate::core::color::{Color, blend};
use image::Rgba;

/// Colour and depth storage for one frame.
///
/// Both buffers are `width * height`, row-major, with `y = 0` at the bottom
/// of the image (screen y grows upward, as produced by the viewport matrix).
/// Depth follows the "larger is nearer" convention and starts at negative
/// infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<Color>,
    depth_buffer: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Rgba([0, 0, 0, 0]); size],
            depth_buffer: vec![f32::NEG_INFINITY; size],
        }
    }

    /// Resets every pixel to `color` and every depth to negative infinity.
    pub fn clear(&mut self, color: Color) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(f32::NEG_INFINITY);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Strict "nearer passes" test without touching the stored depth.
    #[inline]
    pub fn depth_test(&self, x: usize, y: usize, depth: f32) -> bool {
        self.in_bounds(x, y) && depth > self.depth_buffer[self.index(x, y)]
    }

    /// Runs the depth test and stores `depth` if it passes.
    #[inline]
    pub fn depth_test_and_update(&mut self, x: usize, y: usize, depth: f32) -> bool {
        if !self.depth_test(x, y, depth) {
            return false;
        }
        let idx = self.index(x, y);
        self.depth_buffer[idx] = depth;
        true
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = color;
        }
    }

    /// Alpha-blends `color` over the stored pixel. Depth is left alone.
    #[inline]
    pub fn blend_pixel(&mut self, x: usize, y: usize, color: Color, alpha: f32) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.color_buffer[idx] = blend(self.color_buffer[idx], color, alpha);
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.color_buffer[self.index(x, y)])
    }

    pub fn get_depth(&self, x: usize, y: usize) -> Option<f32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.depth_buffer[self.index(x, y)])
    }

    /// Row-major colour buffer, bottom row first.
    pub fn colors(&self) -> &[Color] {
        &self.color_buffer
    }

    /// Row-major depth buffer, bottom row first.
    pub fn depths(&self) -> &[f32] {
        &self.depth_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_infinitely_far() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.depths().len(), 12);
        assert!(fb.depths().iter().all(|d| *d == f32::NEG_INFINITY));
    }

    #[test]
    fn depth_test_is_strict_and_larger_wins() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(fb.depth_test_and_update(1, 1, -5.0));
        assert!(!fb.depth_test_and_update(1, 1, -5.0));
        assert!(!fb.depth_test_and_update(1, 1, -6.0));
        assert!(fb.depth_test_and_update(1, 1, 3.0));
        assert_eq!(fb.get_depth(1, 1), Some(3.0));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(!fb.depth_test_and_update(2, 0, 1.0));
        fb.set_pixel(0, 2, Rgba([1, 2, 3, 4]));
        assert_eq!(fb.get_pixel(0, 2), None);
    }

    #[test]
    fn blend_keeps_depth() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.depth_test_and_update(0, 0, 10.0);
        fb.set_pixel(0, 0, Rgba([0, 0, 0, 255]));
        fb.blend_pixel(0, 0, Rgba([200, 200, 200, 255]), 0.5);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba([100, 100, 100, 255])));
        assert_eq!(fb.get_depth(0, 0), Some(10.0));
    }

    #[test]
    fn clear_resets_both_buffers() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.depth_test_and_update(0, 0, 1.0);
        fb.set_pixel(0, 0, Rgba([9, 9, 9, 9]));
        fb.clear(Rgba([0, 0, 0, 255]));
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba([0, 0, 0, 255])));
        assert_eq!(fb.get_depth(0, 0), Some(f32::NEG_INFINITY));
    }
}
