// The floating magnifier: a fixed grid of color cells, a live color label and
// the position it follows. Owned and mutated only by the controller.

use crate::color::HexColor;
use crate::config::DropperConfig;
use crate::surface::center_index;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MagnifierCell {
    pub fill: Option<HexColor>, // None until the first paint
    pub selected: bool,         // outlined center cell
}

pub struct Magnifier {
    grid_size: u32,
    cell_size: u32,
    cells: Vec<MagnifierCell>,  // allocated once, repainted in place
    center: usize,
    label: String,
    selected_color: Option<HexColor>,
    position: Option<(f32, f32)>, // last viewport pointer position
    mounted: bool,
    paints: u64,
}

impl Magnifier {
    /// Build the grid with the center cell marked using the same index rule as sampling.
    pub fn new(config: &DropperConfig) -> Self {
        let center = center_index(config.grid_size);
        let cells = (0..config.cell_count())
            .map(|i| MagnifierCell { fill: None, selected: i == center })
            .collect();

        tracing::info!(grid = config.grid_size, cell_px = config.cell_size, "magnifier created");

        Self {
            grid_size: config.grid_size,
            cell_size: config.cell_size,
            cells,
            center,
            label: String::new(),
            selected_color: None,
            position: None,
            mounted: false,
            paints: 0,
        }
    }

    /// Copy `colors[i]` into cell `i`. Extra colors are ignored, missing ones leave the cell as is.
    pub fn paint(&mut self, colors: &[HexColor]) {
        for (cell, color) in self.cells.iter_mut().zip(colors) {
            cell.fill = Some(color.clone());
        }
        self.paints += 1;
        tracing::debug!(paints = self.paints, "magnifier painted");
    }

    /// Live readout: label text and border color.
    pub fn show_color(&mut self, color: &HexColor) {
        self.label.clear();
        self.label.push_str(color.as_str());
        self.selected_color = Some(color.clone());
    }

    /// Forget everything sampled so far (cells, label, border).
    pub fn clear_readout(&mut self) {
        for cell in &mut self.cells {
            cell.fill = None;
        }
        self.label.clear();
        self.selected_color = None;
    }

    pub fn follow(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    pub fn cells(&self) -> &[MagnifierCell] {
        &self.cells
    }

    pub fn center_index(&self) -> usize {
        self.center
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn selected_color(&self) -> Option<&HexColor> {
        self.selected_color.as_ref()
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// How many grid paints have been applied (frame-coalesced).
    pub fn paint_count(&self) -> u64 {
        self.paints
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Width/height of the cell grid on screen.
    pub fn side_px(&self) -> u32 {
        self.grid_size * self.cell_size
    }
}
