// Raw pixel samples -> display colors.
// `#rrggbb` for fully opaque pixels, `#rrggbbaa` for everything else.

use std::fmt;

use crate::types::PixelSample;

/// Normalized hex encoding of a [`PixelSample`].
///
/// Only produced by [`pixel_to_hex`] / [`rgba_to_hex`], so the string is always
/// lowercase and either 7 or 9 characters long.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back into channels. Six-digit colors come back fully opaque.
    pub fn to_pixel(&self) -> PixelSample {
        // Always well formed; see `parse_hex`.
        parse_hex(&self.0).unwrap_or(PixelSample::TRANSPARENT)
    }

    /// Pack as 0x00RRGGBB for minifb (alpha dropped).
    pub fn to_rgb_u32(&self) -> u32 {
        let p = self.to_pixel();
        ((p.r as u32) << 16) | ((p.g as u32) << 8) | p.b as u32
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Convert an 8-bit RGBA sample. Alpha is normalized to [0,1] before formatting.
pub fn pixel_to_hex(p: PixelSample) -> HexColor {
    rgba_to_hex(p.r as i32, p.g as i32, p.b as i32, p.a as f32 / 255.0)
}

/// Format loosely-typed channels. r,g,b are clamped to [0,255] and alpha to [0,1]
/// before formatting; the alpha pair is omitted when alpha is exactly 1.
pub fn rgba_to_hex(r: i32, g: i32, b: i32, alpha: f32) -> HexColor {
    let r = r.clamp(0, 255);
    let g = g.clamp(0, 255);
    let b = b.clamp(0, 255);
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };

    if alpha == 1.0 {
        HexColor(format!("#{r:02x}{g:02x}{b:02x}"))
    } else {
        let a = (alpha * 255.0).round() as u8;
        HexColor(format!("#{r:02x}{g:02x}{b:02x}{a:02x}"))
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` (either case). Anything else is `None`.
pub fn parse_hex(s: &str) -> Option<PixelSample> {
    let digits = s.strip_prefix('#')?;
    if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if digits.len() == 8 { channel(6)? } else { u8::MAX };
    Some(PixelSample::new(r, g, b, a))
}
