use thiserror::Error;

/// Failures the render pass itself can report.
///
/// Everything else that can go wrong inside the pipeline (degenerate
/// triangles, bad UV or normal indices, a zero eye distance) is recovered
/// locally and never surfaces here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("mesh has nothing to render ({vertices} vertices, {faces} faces)")]
    InputInvalid { vertices: usize, faces: usize },
}

/// Application-level errors: loading inputs, writing outputs, rendering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to load OBJ '{path}': {source}")]
    ObjLoad {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
