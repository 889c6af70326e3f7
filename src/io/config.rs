use crate::core::color::Color;
use crate::error::Error;
use crate::scene::camera::Camera;
use crate::scene::context::{DEFAULT_ALBEDO, DEFAULT_DEPTH_RANGE, RenderContext, ShadingMode};
use crate::scene::light::DirectionalLight;
use crate::scene::overlay::{
    DEFAULT_OVERLAY_ALPHA, DEFAULT_OVERLAY_COLOR, DEFAULT_OVERLAY_HALF_EXTENT, OverlayVolume,
};
use image::Rgba;
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level TOML configuration. Every table and field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    // --- Output ---
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    /// Grayscale visualization of the final depth buffer.
    #[serde(default)]
    pub depth_output: Option<String>,

    // --- Pipeline ---
    #[serde(default = "default_depth_range")]
    pub depth_range: f32,
    #[serde(default = "default_background")]
    pub background: [u8; 4],
    #[serde(default)]
    pub shading: ShadingMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            depth_output: None,
            depth_range: default_depth_range(),
            background: default_background(),
            shading: ShadingMode::default(),
        }
    }
}

fn default_width() -> usize {
    1920
}
fn default_height() -> usize {
    1920
}
fn default_output() -> String {
    "output.tga".to_string()
}
fn default_depth_range() -> f32 {
    DEFAULT_DEPTH_RANGE
}
fn default_background() -> [u8; 4] {
    [0, 0, 0, 255]
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
    /// Diffuse map; defaults to `<obj stem>_diffuse.tga` beside the OBJ.
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default = "default_albedo")]
    pub albedo: [u8; 4],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            texture: None,
            normalize: true,
            albedo: default_albedo(),
        }
    }
}

fn default_model_path() -> String {
    "obj/african_head.obj".to_string()
}
fn default_albedo() -> [u8; 4] {
    DEFAULT_ALBEDO.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_eye")]
    pub eye: [f32; 3],
    #[serde(default)]
    pub center: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: default_eye(),
            center: [0.0, 0.0, 0.0],
            up: default_up(),
        }
    }
}

fn default_eye() -> [f32; 3] {
    [1.0, 0.0, 4.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [0.0, 0.0, -1.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,
    #[serde(default = "default_overlay_color")]
    pub color: [u8; 4],
    #[serde(default = "default_overlay_alpha")]
    pub alpha: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            half_extent: default_half_extent(),
            color: default_overlay_color(),
            alpha: default_overlay_alpha(),
        }
    }
}

fn default_half_extent() -> f32 {
    DEFAULT_OVERLAY_HALF_EXTENT
}
fn default_overlay_color() -> [u8; 4] {
    DEFAULT_OVERLAY_COLOR.0
}
fn default_overlay_alpha() -> f32 {
    DEFAULT_OVERLAY_ALPHA
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, Error> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        let r = &self.render;
        if r.width == 0 || r.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                r.width, r.height
            )));
        }
        if r.depth_range.is_nan() || r.depth_range <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "depth_range must be positive, got {}",
                r.depth_range
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay.alpha) {
            return Err(Error::InvalidConfig(format!(
                "overlay alpha must be within [0, 1], got {}",
                self.overlay.alpha
            )));
        }
        if Vector3::from(self.light.direction).norm() <= f32::EPSILON {
            return Err(Error::InvalidConfig(
                "light direction must not be zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn albedo(&self) -> Color {
        Rgba(self.model.albedo)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Point3::from(self.camera.eye),
            Point3::from(self.camera.center),
            Vector3::from(self.camera.up),
        )
    }

    pub fn overlay_volume(&self) -> Option<OverlayVolume> {
        let o = &self.overlay;
        o.enabled
            .then(|| OverlayVolume::cube(o.half_extent, Rgba(o.color), o.alpha))
    }

    /// Builds the per-frame context described by this configuration.
    pub fn render_context(&self) -> RenderContext {
        let r = &self.render;
        let mut context = RenderContext::new(
            self.camera(),
            DirectionalLight::new(Vector3::from(self.light.direction)),
            r.width,
            r.height,
        )
        .with_depth_range(r.width, r.height, r.depth_range)
        .with_overlay(self.overlay_volume());
        context.albedo = self.albedo();
        context.background = Rgba(r.background);
        context.shading_mode = r.shading;
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.render.width, 1920);
        assert_eq!(config.render.height, 1920);
        assert_eq!(config.render.output, "output.tga");
        assert_eq!(config.render.shading, ShadingMode::Phong);
        assert_eq!(config.model.path, "obj/african_head.obj");
        assert!(config.model.normalize);
        assert_eq!(config.albedo(), DEFAULT_ALBEDO);
        assert_eq!(config.camera.eye, [1.0, 0.0, 4.0]);
        assert!(config.overlay_volume().is_none());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [render]
            width = 320
            shading = "unlit"

            [overlay]
            enabled = true
            alpha = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 1920);
        assert_eq!(config.render.shading, ShadingMode::Unlit);

        let overlay = config.overlay_volume().unwrap();
        assert_eq!(overlay.alpha, 0.5);
        assert_eq!(overlay.color, DEFAULT_OVERLAY_COLOR);
        assert_eq!(overlay.triangles.len(), 12);
    }

    #[test]
    fn rejects_bad_values() {
        for toml in [
            "[render]\nwidth = 0",
            "[render]\ndepth_range = -1.0",
            "[overlay]\nalpha = 1.5",
            "[light]\ndirection = [0.0, 0.0, 0.0]",
        ] {
            assert!(
                matches!(Config::from_toml(toml), Err(Error::InvalidConfig(_))),
                "{toml}"
            );
        }
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml("[render\nwidth = 3"),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("phong_rasterizer_no_such_config.toml");
        assert!(matches!(
            Config::load(&path),
            Err(Error::ConfigRead { .. })
        ));
    }

    #[test]
    fn context_follows_config() {
        let config = Config::from_toml(
            r#"
            [render]
            width = 64
            height = 32
            background = [10, 20, 30, 255]

            [model]
            albedo = [1, 2, 3, 4]
            "#,
        )
        .unwrap();
        let context = config.render_context();
        assert_eq!(context.albedo, Rgba([1, 2, 3, 4]));
        assert_eq!(context.background, Rgba([10, 20, 30, 255]));
        // The camera's look-at point lands in the middle of the viewport.
        let center = context.transform.project(&Point3::origin());
        assert!((center.x - 32.0).abs() < 1e-3);
        assert!((center.y - 16.0).abs() < 1e-3);
    }
}
