// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window showing the sampled surface under a small toolbar.
// 2) The floating magnifier: cell grid, outlined center cell, colored border, hex label.
// 3) A tiny 5x7 bitmap font for the label and the toolbar text.

use std::cell::Cell;
use std::rc::Rc;

use image::RgbaImage;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::color::HexColor;
use crate::config::StyleNames;
use crate::controller::OverlayContainer;
use crate::error::Error;
use crate::gamma::GammaLut;
use crate::magnifier::Magnifier;
use crate::types::{FrameBuffer, PixelSample, Rect};

pub const TOOLBAR_HEIGHT: usize = 28;
const BORDER: i32 = 4;       // magnifier frame, painted with the center color
const LABEL_HEIGHT: i32 = 11;

pub struct Drawer {
    window: Window,       // the on-screen window you see
    left_was_down: bool,  // for click edge detection
}

impl Drawer {
    /// Create a window of the given size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, left_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// D toggles the dropper.
    pub fn d_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::D, KeyRepeat::No)
    }

    /// Pointer in window coordinates, `None` while it is outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    /// True once per left-button press (on the press edge).
    pub fn left_clicked(&mut self) -> bool {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.left_was_down;
        self.left_was_down = down;
        clicked
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.window.set_cursor_visibility(visible);
    }
}

/* ---------- Host chrome: the window's side of the overlay ---------- */

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChromeFlags {
    pub tool_active: bool,     // button highlighted, system cursor hidden
    pub magnifier_shown: bool, // magnifier mounted over the surface
}

/// Shared flags the controller flips and the render loop reads.
#[derive(Clone, Default)]
pub struct Chrome(Rc<Cell<ChromeFlags>>);

impl Chrome {
    pub fn flags(&self) -> ChromeFlags {
        self.0.get()
    }

    fn update(&self, f: impl FnOnce(&mut ChromeFlags)) {
        let mut flags = self.0.get();
        f(&mut flags);
        self.0.set(flags);
    }
}

impl OverlayContainer for Chrome {
    fn mount(&mut self) {
        self.update(|f| f.magnifier_shown = true);
    }

    fn unmount(&mut self) {
        self.update(|f| f.magnifier_shown = false);
    }

    fn set_tool_active(&mut self, active: bool, styles: &StyleNames) {
        tracing::debug!(
            active,
            cursor = %styles.body_cursor,
            icon = %styles.drop_icon_selected,
            wrapper = %styles.dropper_active,
            "tool modifiers toggled"
        );
        self.update(|f| f.tool_active = active);
    }
}

/* ---------- Software drawing: pixels, rects, lines ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// Filled rectangle, clipped to the framebuffer.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, color: u32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(fb.width as i32);
    let y1 = (y + h).min(fb.height as i32);
    for py in y0..y1 {
        let row = py as usize * fb.width;
        for px in x0..x1 {
            fb.pixels[row + px as usize] = color;
        }
    }
}

/// Rectangle outline `thickness` pixels wide, drawn inside (x,y,w,h).
pub fn stroke_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32, thickness: i32, color: u32) {
    fill_rect(fb, x, y, w, thickness, color);
    fill_rect(fb, x, y + h - thickness, w, thickness, color);
    fill_rect(fb, x, y, thickness, h, color);
    fill_rect(fb, x + w - thickness, y, thickness, h, color);
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Small crosshair centered at (cx,cy); stands in for the hidden system cursor.
pub fn draw_crosshair(fb: &mut FrameBuffer, cx: i32, cy: i32, size: i32, color: u32) {
    draw_line(fb, cx - size, cy, cx - 2, cy, color);
    draw_line(fb, cx + 2, cy, cx + size, cy, color);
    draw_line(fb, cx, cy - size, cx, cy - 2, color);
    draw_line(fb, cx, cy + 2, cx, cy + size, color);
    put_pixel(fb, cx, cy, color);
}

/// Light/dark 8px checkerboard shown behind transparent pixels.
#[inline]
fn checker(x: i32, y: i32) -> u32 {
    if ((x >> 3) + (y >> 3)) & 1 == 0 { 0x00CC_CCCC } else { 0x0099_9999 }
}

/// Black or white, whichever reads better on `bg` (ITU-R BT.601 luma).
fn contrast_text(bg: u32) -> u32 {
    let r = ((bg >> 16) & 0xFF) as f32;
    let g = ((bg >> 8) & 0xFF) as f32;
    let b = (bg & 0xFF) as f32;
    if 0.299 * r + 0.587 * g + 0.114 * b > 128.0 { 0x0000_0000 } else { 0x00FF_FFFF }
}

/* ---------- Scene pieces ---------- */

/// Blit the surface image at `bounds`, compositing transparency over the checkerboard.
pub fn draw_surface(fb: &mut FrameBuffer, image: &RgbaImage, bounds: Rect, lut: &GammaLut) {
    let ox = bounds.left as i32;
    let oy = bounds.top as i32;
    for (x, y, px) in image.enumerate_pixels() {
        let (sx, sy) = (ox + x as i32, oy + y as i32);
        let [r, g, b, a] = px.0;
        put_pixel(fb, sx, sy, lut.over(PixelSample::new(r, g, b, a), checker(sx, sy)));
    }
}

/// Toolbar strip: dropper button (highlighted while active) and the committed-color placeholder.
/// Color swatch; translucent colors show the checkerboard through them.
fn fill_swatch(fb: &mut FrameBuffer, x0: i32, y0: i32, w: i32, h: i32, color: &HexColor, lut: &GammaLut) {
    let sample = color.to_pixel();
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            put_pixel(fb, x, y, lut.over(sample, checker(x, y)));
        }
    }
}

pub fn draw_toolbar(
    fb: &mut FrameBuffer,
    button: Rect,
    flags: ChromeFlags,
    committed: Option<&HexColor>,
    lut: &GammaLut,
) {
    fill_rect(fb, 0, 0, fb.width as i32, TOOLBAR_HEIGHT as i32, 0x0022_2222);

    let (bx, by, bw, bh) = (button.left as i32, button.top as i32, button.width as i32, button.height as i32);
    let (face, ink) = if flags.tool_active { (0x0033_99FF, 0x00FF_FFFF) } else { (0x0044_4444, 0x00DD_DDDD) };
    fill_rect(fb, bx, by, bw, bh, face);
    draw_text_5x7(fb, bx + 6, by + (bh - 7) / 2, if flags.tool_active { "D: DROPPER ON" } else { "D: DROPPER OFF" }, ink);

    let px = bx + bw + 16;
    draw_text_5x7(fb, px, by + (bh - 7) / 2, "PICKED:", 0x00DD_DDDD);
    let swatch_x = px + 7 * 6 + 6;
    match committed {
        Some(color) => {
            fill_swatch(fb, swatch_x, by, bh, bh, color, lut);
            stroke_rect(fb, swatch_x, by, bh, bh, 1, 0x00FF_FFFF);
            draw_text_5x7(fb, swatch_x + bh + 6, by + (bh - 7) / 2, color.as_str(), 0x00FF_FFFF);
        }
        None => draw_text_5x7(fb, swatch_x, by + (bh - 7) / 2, "NONE", 0x0088_8888),
    }

    let hint = "ESC: QUIT";
    draw_text_5x7(fb, fb.width as i32 - hint.len() as i32 * 6 - 8, by + (bh - 7) / 2, hint, 0x0088_8888);
}

/// Magnifier centered on its last pointer position.
/// Visual: a square of enlarged pixels, the center one outlined, framed in the
/// picked color, with the hex code underneath.
pub fn draw_magnifier(fb: &mut FrameBuffer, magnifier: &Magnifier, lut: &GammaLut) {
    let Some((mx, my)) = magnifier.position() else { return };

    let cell = magnifier.cell_size() as i32;
    let side = magnifier.side_px() as i32;
    let grid = magnifier.grid_size() as usize;
    let left = mx as i32 - side / 2;
    let top = my as i32 - side / 2;

    let frame = magnifier.selected_color().map(HexColor::to_rgb_u32).unwrap_or(0x0000_0000);
    fill_rect(fb, left - BORDER, top - BORDER, side + 2 * BORDER, side + 2 * BORDER + LABEL_HEIGHT, frame);

    for (i, c) in magnifier.cells().iter().enumerate() {
        let cx = left + (i % grid) as i32 * cell;
        let cy = top + (i / grid) as i32 * cell;
        let sample = c.fill.as_ref().map(HexColor::to_pixel).unwrap_or(PixelSample::TRANSPARENT);
        for y in cy..cy + cell {
            for x in cx..cx + cell {
                put_pixel(fb, x, y, lut.over(sample, checker(x, y)));
            }
        }
    }

    let center = &magnifier.cells()[magnifier.center_index()];
    if center.selected {
        let i = magnifier.center_index();
        let cx = left + (i % grid) as i32 * cell;
        let cy = top + (i / grid) as i32 * cell;
        stroke_rect(fb, cx - 1, cy - 1, cell + 2, cell + 2, 1, 0x00FF_FFFF);
    }

    let label = magnifier.label();
    let text_x = left + (side - label.len() as i32 * 6) / 2;
    draw_text_5x7(fb, text_x, top + side + 2, label, contrast_text(frame));
}

/* ---------- 5x7 bitmap font (hex digits + the toolbar words) ---------- */

/// Return a 5x7 glyph bitmap. Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
/// Lowercase letters share the uppercase shapes.
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),

        '#' => g!(0b01010,0b01010,0b11111,0b01010,0b11111,0b01010,0b01010),
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel shadow for contrast.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else { return };
    let shadow = if color == 0 { 0x00FF_FFFF } else { 0x0000_0000 };
    for (offset, ink) in [(1, shadow), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, ink);
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs (6px advance).
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}
