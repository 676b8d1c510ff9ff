// Core types shared by the sampling engine and the demo window.

/// Software framebuffer pushed to the window each frame.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }
}

/// Axis-aligned rectangle in viewport coordinates (what a bounding-rect query returns).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && y >= self.top && x < self.left + self.width && y < self.top + self.height
    }
}

/// One raw pixel read from a surface. Immutable once read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8, // 0 = fully transparent, 255 = fully opaque
}

impl PixelSample {
    /// What a read outside the buffer yields.
    pub const TRANSPARENT: PixelSample = PixelSample { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == u8::MAX
    }
}

/// Whether the dropper tool is live. The only flag that decides sampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolState {
    #[default]
    Inactive,
    Active,
}

impl ToolState {
    pub fn flipped(self) -> Self {
        match self {
            ToolState::Inactive => ToolState::Active,
            ToolState::Active => ToolState::Inactive,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, ToolState::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 20.0, 4.0, 2.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(13.9, 21.9));
        assert!(!r.contains(14.0, 20.0));
        assert!(!r.contains(10.0, 22.0));
        assert!(!r.contains(9.9, 20.5));
    }

    #[test]
    fn tool_state_flips_both_ways() {
        assert_eq!(ToolState::default(), ToolState::Inactive);
        assert_eq!(ToolState::Inactive.flipped(), ToolState::Active);
        assert_eq!(ToolState::Active.flipped(), ToolState::Inactive);
        assert!(ToolState::Active.is_active());
    }
}
