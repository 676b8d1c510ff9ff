// Cursor position + backing pixel buffer -> color samples.
// Visual expectation: every pointer move over the surface produces one SampleEvent
// carrying the magnifier block and the exact pixel under the cursor.

use std::path::Path;

use image::imageops::FilterType;
use image::{ImageBuffer, RgbaImage};

use crate::color::{pixel_to_hex, HexColor};
use crate::error::Error;
use crate::events::{Neighborhood, SampleEvent, Topic};
use crate::types::{PixelSample, Rect};

/// A rectangular RGBA buffer addressable by `(x, y)`.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// Read an in-bounds pixel. Callers check bounds first.
    fn pixel(&self, x: u32, y: u32) -> PixelSample;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel(&self, x: u32, y: u32) -> PixelSample {
        let [r, g, b, a] = self.get_pixel(x, y).0;
        PixelSample::new(r, g, b, a)
    }
}

/// Index of the highlighted cell in a `grid_size²` block: `round(n²/2) - 1`.
/// An empty grid maps to 0.
pub fn center_index(grid_size: u32) -> usize {
    let cells = grid_size as usize * grid_size as usize;
    ((cells + 1) / 2).saturating_sub(1)
}

/// Top-left corner of the block around `(x, y)`.
/// For odd sizes `(x, y)` lands exactly on [`center_index`]; even sizes have no
/// true center and that cell is offset from the cursor pixel.
fn block_origin(x: i64, y: i64, grid_size: u32) -> (i64, i64) {
    let half = (grid_size / 2) as i64;
    (x.saturating_sub(half), y.saturating_sub(half))
}

pub struct SamplingSurface<S = RgbaImage> {
    source: S,     // read-only pixel buffer
    bounds: Rect,  // where the surface sits in the viewport
    grid_size: u32,
    samples: Topic<SampleEvent>,
}

impl SamplingSurface<RgbaImage> {
    /// Decode an image file and stretch it to the surface size in `bounds`.
    pub fn load(path: impl AsRef<Path>, bounds: Rect, grid_size: u32) -> Result<Self, Error> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let width = bounds.width.max(1.0) as u32;
        let height = bounds.height.max(1.0) as u32;
        let rgba = decoded.resize_exact(width, height, FilterType::Triangle).to_rgba8();
        tracing::info!(path = %path.display(), width, height, "surface image loaded");
        Ok(Self::new(rgba, bounds, grid_size))
    }
}

impl<S: PixelSource> SamplingSurface<S> {
    /// `grid_size` comes from validated configuration and is not re-checked per call.
    pub fn new(source: S, bounds: Rect, grid_size: u32) -> Self {
        Self { source, bounds, grid_size, samples: Topic::new() }
    }

    /// Channel the surface publishes on. Subscribe to receive every sample.
    pub fn samples(&self) -> Topic<SampleEvent> {
        self.samples.clone()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Layout moved; later pointer mappings use the new rect.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Viewport -> surface-local pixel coordinates (floored, not clamped).
    pub fn pointer_to_local(&self, pointer_x: f32, pointer_y: f32) -> (i64, i64) {
        let x = (pointer_x - self.bounds.left).floor() as i64;
        let y = (pointer_y - self.bounds.top).floor() as i64;
        (x, y)
    }

    /// Anything outside the buffer reads as fully transparent black.
    fn read(&self, x: i64, y: i64) -> PixelSample {
        let (w, h) = self.source.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return PixelSample::TRANSPARENT;
        }
        self.source.pixel(x as u32, y as u32)
    }

    /// `grid_size × grid_size` block around `(x, y)`, row-major.
    pub fn sample_neighborhood(&self, x: i64, y: i64, grid_size: u32) -> Neighborhood {
        let (ox, oy) = block_origin(x, y, grid_size);
        let n = grid_size as i64;
        let mut out = Vec::with_capacity((n * n) as usize);
        for row in 0..n {
            for col in 0..n {
                // Past the i64 range is off the buffer as well.
                let pixel = match (ox.checked_add(col), oy.checked_add(row)) {
                    (Some(x), Some(y)) => self.read(x, y),
                    _ => PixelSample::TRANSPARENT,
                };
                out.push(pixel_to_hex(pixel));
            }
        }
        out
    }

    pub fn sample_center(&self, x: i64, y: i64) -> HexColor {
        pixel_to_hex(self.read(x, y))
    }

    /// Both samples for one cursor position, taken from the same buffer state.
    pub fn sample(&self, x: i64, y: i64) -> SampleEvent {
        SampleEvent {
            neighborhood: self.sample_neighborhood(x, y, self.grid_size),
            center_color: self.sample_center(x, y),
        }
    }

    /// Host notification: the pointer moved over the surface.
    /// Publishes exactly one SampleEvent before returning.
    pub fn pointer_moved(&self, pointer_x: f32, pointer_y: f32) {
        let (x, y) = self.pointer_to_local(pointer_x, pointer_y);
        let event = self.sample(x, y);
        tracing::trace!(x, y, center = %event.center_color, "surface sampled");
        self.samples.publish(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// 8x8 image where every pixel encodes its own coordinates.
    fn coordinate_image() -> RgbaImage {
        ImageBuffer::from_fn(8, 8, |x, y| Rgba([x as u8, y as u8, 0, 255]))
    }

    #[test]
    fn center_index_matches_rounding_rule() {
        assert_eq!(center_index(1), 0);
        assert_eq!(center_index(2), 1);
        assert_eq!(center_index(3), 4);
        assert_eq!(center_index(4), 7);
        assert_eq!(center_index(19), 180);
        assert_eq!(center_index(0), 0);
    }

    #[test]
    fn pointer_mapping_floors_and_passes_out_of_range_through() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(10.0, 20.0, 8.0, 8.0), 3);
        assert_eq!(surface.pointer_to_local(12.7, 25.2), (2, 5));
        assert_eq!(surface.pointer_to_local(9.5, 19.0), (-1, -1));
        assert_eq!(surface.pointer_to_local(30.0, 40.0), (20, 20));
    }

    #[test]
    fn neighborhood_length_is_grid_squared() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        for n in [1u32, 2, 3, 4, 6, 8, 19] {
            assert_eq!(surface.sample_neighborhood(4, 4, n).len(), (n * n) as usize);
        }
    }

    #[test]
    fn center_cell_is_the_pixel_under_the_cursor() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        for n in [1u32, 3, 5, 7] {
            for (x, y) in [(0, 0), (3, 4), (7, 7), (-2, 9)] {
                let block = surface.sample_neighborhood(x, y, n);
                assert_eq!(block[center_index(n)], surface.sample_center(x, y), "n={n} at ({x},{y})");
            }
        }
    }

    #[test]
    fn odd_block_is_centered_row_major() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        let block = surface.sample_neighborhood(4, 4, 3);
        assert_eq!(block[0].as_str(), "#030300");
        assert_eq!(block[1].as_str(), "#040300");
        assert_eq!(block[3].as_str(), "#030400");
        assert_eq!(block[8].as_str(), "#050500");
    }

    #[test]
    fn even_block_starts_half_a_grid_up_left() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 2);
        let block = surface.sample_neighborhood(3, 4, 2);
        assert_eq!(block[0].as_str(), "#020300");
        assert_eq!(block[3].as_str(), "#030400");
        assert_eq!(block[3], surface.sample_center(3, 4));
        assert_eq!(block[center_index(2)].as_str(), "#030300");
    }

    #[test]
    fn edge_cells_read_as_transparent() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        let block = surface.sample_neighborhood(0, 0, 3);
        assert_eq!(block[0].as_str(), "#00000000");
        assert_eq!(block[2].as_str(), "#00000000");
        assert_eq!(block[4].as_str(), "#000000");
        assert_eq!(block[8].as_str(), "#010100");
        assert_eq!(surface.sample_center(-1, 3).as_str(), "#00000000");
    }

    #[test]
    fn extreme_coordinates_sample_transparent() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        for (x, y) in [(i64::MAX, 1), (1, i64::MAX), (i64::MIN, 1), (i64::MIN, i64::MAX)] {
            let block = surface.sample_neighborhood(x, y, 3);
            assert_eq!(block.len(), 9);
            assert!(block.iter().all(|h| h.as_str() == "#00000000"), "at ({x},{y})");
            assert_eq!(surface.sample_center(x, y).as_str(), "#00000000");
        }
    }

    #[test]
    fn infinite_pointer_publishes_a_transparent_sample() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        assert_eq!(surface.pointer_to_local(f32::INFINITY, 1.0), (i64::MAX, 1));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = surface.samples().subscribe(move |e: &SampleEvent| s.borrow_mut().push(e.clone()));
        surface.pointer_moved(f32::INFINITY, f32::NEG_INFINITY);
        assert_eq!(seen.borrow()[0].center_color.as_str(), "#00000000");
    }

    #[test]
    fn pointer_move_publishes_one_event() {
        let surface = SamplingSurface::new(coordinate_image(), Rect::new(100.0, 50.0, 8.0, 8.0), 3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = surface.samples().subscribe(move |e: &SampleEvent| s.borrow_mut().push(e.clone()));

        surface.pointer_moved(102.5, 55.9);
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].center_color.as_str(), "#020500");
        assert_eq!(seen[0].neighborhood[center_index(3)], seen[0].center_color);
    }

    #[test]
    fn bounds_update_changes_mapping() {
        let mut surface = SamplingSurface::new(coordinate_image(), Rect::new(0.0, 0.0, 8.0, 8.0), 3);
        surface.set_bounds(Rect::new(5.0, 5.0, 8.0, 8.0));
        assert_eq!(surface.pointer_to_local(6.0, 6.0), (1, 1));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SamplingSurface::load("no/such/image.png", Rect::new(0.0, 0.0, 4.0, 4.0), 3);
        assert!(matches!(err, Err(Error::ImageLoad { .. })));
    }
}
