// Dropper configuration: grid size, cell size and the host's style names.
// Fixed at construction; `validate` runs once and the values are trusted after.
// Style names are opaque here and go to the overlay container untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default number of sampled pixels per magnifier row/column.
pub const DEFAULT_GRID_SIZE: u32 = 19;

/// Default on-screen size of one magnifier cell (in pixels).
pub const DEFAULT_CELL_SIZE: u32 = 8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropperConfig {
    pub grid_size: u32,
    pub cell_size: u32,
    pub styles: StyleNames,
}

impl Default for DropperConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
            styles: StyleNames::default(),
        }
    }
}

/// Class / style names used by the rendering layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleNames {
    pub magnifier: String,
    pub color_text: String,
    pub magnifier_pixel: String,
    pub magnifier_selected_pixel: String,
    pub body_cursor: String,
    pub drop_icon_selected: String,
    pub magnifier_show: String,
    pub dropper_active: String,
    pub css_grid_size: String,
    pub css_cell_size: String,
    pub css_selected_color: String,
}

impl Default for StyleNames {
    fn default() -> Self {
        Self {
            magnifier: "magnifier".into(),
            color_text: "color-text".into(),
            magnifier_pixel: "pixel".into(),
            magnifier_selected_pixel: "pixel--selected".into(),
            body_cursor: "body--color-dropper-cursor".into(),
            drop_icon_selected: "drop-color-icon--selected".into(),
            magnifier_show: "magnifier--show".into(),
            dropper_active: "content--color-dropper-active".into(),
            css_grid_size: "--grid-size".into(),
            css_cell_size: "--cell-size".into(),
            css_selected_color: "--selected-color".into(),
        }
    }
}

impl DropperConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DropperConfig = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.grid_size == 0 {
            return Err(Error::Config("grid_size must be a positive integer".into()));
        }
        if self.cell_size == 0 {
            return Err(Error::Config("cell_size must be a positive integer".into()));
        }
        Ok(())
    }

    /// Number of cells in the magnifier grid.
    pub fn cell_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }
}
