use clap::Parser;
use log::{error, info};
use phong_rasterizer::app;
use phong_rasterizer::io::config::Config;
use phong_rasterizer::scene::context::ShadingMode;

/// Software rasterizer: renders an OBJ model with Phong shading to an image.
#[derive(Parser, Debug)]
#[command(name = "phong-rasterizer")]
#[command(about = "CPU triangle rasterizer with Phong shading and a translucent overlay")]
struct Cli {
    /// OBJ model to render (overrides [model].path)
    #[arg(value_name = "OBJ")]
    model: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output image path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Draw the translucent overlay cube
    #[arg(long)]
    overlay: bool,

    /// Also write a grayscale depth image
    #[arg(long, value_name = "FILE")]
    depth_output: Option<String>,

    /// Flat albedo, no lighting
    #[arg(long)]
    unlit: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, String> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading config file: {path}");
                Config::load(path).map_err(|e| e.to_string())?
            }
            None => Config::default(),
        };

        if let Some(model) = self.model {
            config.model.path = model;
        }
        if let Some(output) = self.output {
            config.render.output = output;
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if self.overlay {
            config.overlay.enabled = true;
        }
        if let Some(depth) = self.depth_output {
            config.render.depth_output = Some(depth);
        }
        if self.unlit {
            config.render.shading = ShadingMode::Unlit;
        }

        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn main() -> Result<(), String> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .format_level(true)
        .init();

    let config = Cli::parse().into_config().inspect_err(|e| error!("{e}"))?;

    match app::run(&config) {
        Ok(_) => {
            info!("Render saved to {}", config.render.output);
            Ok(())
        }
        Err(e) => {
            error!("Render failed: {e}");
            Err(e.to_string())
        }
    }
}
