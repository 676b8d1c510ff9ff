// Command-line arguments of the demo window.
//
//   color-dropper beach.jpg
//   color-dropper beach.jpg --grid-size 11 --cell-size 12
//   color-dropper beach.jpg --config dropper.json --debug

use std::path::PathBuf;

use clap::Parser;

use crate::config::DropperConfig;
use crate::error::Error;

/// Hover an image and pick colors through a pixel magnifier.
#[derive(Parser, Debug)]
#[command(name = "color-dropper", version, about)]
pub struct CliArgs {
    /// Image drawn on the surface (stretched to --width x --height).
    pub image: PathBuf,

    /// JSON config file (grid size, cell size, style names).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pixels sampled per magnifier row/column. Overrides the config file.
    #[arg(short, long, value_name = "N")]
    pub grid_size: Option<u32>,

    /// On-screen size of one magnifier cell. Overrides the config file.
    #[arg(long, value_name = "PX")]
    pub cell_size: Option<u32>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 960)]
    pub width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 540)]
    pub height: u32,

    /// Verbose logging (RUST_LOG is honoured).
    #[arg(long)]
    pub debug: bool,
}

impl CliArgs {
    /// Config file (or defaults) with the command-line overrides applied, validated.
    pub fn dropper_config(&self) -> Result<DropperConfig, Error> {
        let mut config = match &self.config {
            Some(path) => DropperConfig::from_json_file(path)?,
            None => DropperConfig::default(),
        };
        if let Some(n) = self.grid_size {
            config.grid_size = n;
        }
        if let Some(px) = self.cell_size {
            config.cell_size = px;
        }
        config.validate()?;
        Ok(config)
    }
}
