use crate::core::color::Color;
use crate::core::math::transform::{TransformChain, TransformFactory};
use crate::pipeline::shaders::phong::Lighting;
use crate::scene::camera::Camera;
use crate::scene::light::DirectionalLight;
use crate::scene::overlay::OverlayVolume;
use image::Rgba;
use serde::Deserialize;

/// Albedo used for faces without texture coordinates or without a texture.
pub const DEFAULT_ALBEDO: Color = Rgba([180, 180, 180, 255]);
/// Depth range of the viewport transform.
pub const DEFAULT_DEPTH_RANGE: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Phong lighting, textured where the face has UVs and a texture exists.
    #[default]
    Phong,
    /// Constant albedo, no lighting.
    Unlit,
}

/// Everything one frame needs besides the mesh and the target buffers.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub camera: Camera,
    pub light: DirectionalLight,
    pub transform: TransformChain,
    pub lighting: Lighting,
    pub albedo: Color,
    pub background: Color,
    pub shading_mode: ShadingMode,
    pub overlay: Option<OverlayVolume>,
}

impl RenderContext {
    /// Builds the transform chain for a `width` x `height` viewport.
    pub fn new(camera: Camera, light: DirectionalLight, width: usize, height: usize) -> Self {
        let transform = TransformChain::new(
            camera.view_matrix(),
            camera.projection_matrix(),
            TransformFactory::viewport(0.0, 0.0, width as f32, height as f32, DEFAULT_DEPTH_RANGE),
        );
        let lighting = Lighting::new(light.direction, camera.eye);
        Self {
            camera,
            light,
            transform,
            lighting,
            albedo: DEFAULT_ALBEDO,
            background: Rgba([0, 0, 0, 255]),
            shading_mode: ShadingMode::Phong,
            overlay: None,
        }
    }

    /// Replaces the viewport depth range and rebuilds the chain.
    pub fn with_depth_range(mut self, width: usize, height: usize, depth_range: f32) -> Self {
        self.transform = TransformChain::new(
            self.transform.model_view,
            self.transform.projection,
            TransformFactory::viewport(0.0, 0.0, width as f32, height as f32, depth_range),
        );
        self
    }

    pub fn with_overlay(mut self, overlay: Option<OverlayVolume>) -> Self {
        self.overlay = overlay;
        self
    }
}
