// Table-driven sRGB <-> linear conversion for drawing translucent samples.
// Visual: a half-transparent cell shows the checkerboard through it without
// the dark fringes a plain sRGB mix produces.

use crate::types::PixelSample;

const LINEAR_STEPS: usize = 4096;

pub struct GammaLut {
    to_linear: [f32; 256],           // sRGB byte -> linear light in [0,1]
    to_srgb: [u8; LINEAR_STEPS],     // quantized linear -> sRGB byte
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    /// Build both tables once at startup.
    pub fn new() -> Self {
        let to_linear = std::array::from_fn(|v| {
            let c = v as f32 / 255.0;
            if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
        });
        let to_srgb = std::array::from_fn(|i| {
            let l = i as f32 / (LINEAR_STEPS - 1) as f32;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            (s * 255.0).round().clamp(0.0, 255.0) as u8
        });
        Self { to_linear, to_srgb }
    }

    #[inline]
    pub fn linear(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    pub fn srgb(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * (LINEAR_STEPS - 1) as f32).round() as usize;
        self.to_srgb[idx]
    }

    /// Source-over of `fg` onto an opaque 0x00RRGGBB backdrop, mixed in linear light.
    pub fn over(&self, fg: PixelSample, backdrop: u32) -> u32 {
        match fg.a {
            0 => return backdrop,
            255 => return ((fg.r as u32) << 16) | ((fg.g as u32) << 8) | fg.b as u32,
            _ => {}
        }
        let a = fg.a as f32 / 255.0;
        let mix = |front: u8, shift: u32| -> u32 {
            let back = ((backdrop >> shift) & 0xFF) as u8;
            let l = a * self.linear(front) + (1.0 - a) * self.linear(back);
            (self.srgb(l) as u32) << shift
        };
        mix(fg.r, 16) | mix(fg.g, 8) | mix(fg.b, 0)
    }
}
