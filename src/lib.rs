//! A CPU-only triangle rasterizer.
//!
//! Turns a (optionally textured) mesh into a Phong-shaded RGBA image using a
//! z-buffer for hidden-surface removal, then composites a translucent overlay
//! volume onto the shaded image against the same z-buffer.

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod scene;
