//! Color type definitions, for both framebuffer usage and material usage

use crate::utils::clamp;

pub mod blend;

pub use self::blend::{Blend, SourceOver};

/// RGBA color with `f32` channels in the range `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const TRANSPARENT: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Color {
        Color { r, g, b, a: 1.0 }
    }

    /// Creates an opaque color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Color {
        Color::rgb(((hex >> 16) & 0xFF) as f32 / 255.0,
                   ((hex >> 8) & 0xFF) as f32 / 255.0,
                   (hex & 0xFF) as f32 / 255.0)
    }

    /// Creates an opaque color from hue, saturation and lightness.
    ///
    /// Hue wraps around the unit interval, so `1.25` is the same hue as `0.25`.
    /// Saturation and lightness are clamped to `[0, 1]`.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Color {
        let h = h.rem_euclid(1.0);
        let s = clamp(s, 0.0, 1.0);
        let l = clamp(l, 0.0, 1.0);

        if s == 0.0 {
            return Color::rgb(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        // hue in sextants, so primaries land on exact integers
        let h = h * 6.0;

        Color::rgb(hue_to_rgb(q, p, h + 2.0),
                   hue_to_rgb(q, p, h),
                   hue_to_rgb(q, p, h - 2.0))
    }

    /// Copy the color, but with the given alpha channel value
    #[inline]
    pub fn with_alpha(self, a: f32) -> Color {
        Color { a, ..self }
    }

    /// Converts to 8-bit RGBA, clamping each channel
    pub fn to_rgba8(&self) -> [u8; 4] {
        let c = |v: f32| (clamp(v, 0.0, 1.0) * 255.0).round() as u8;

        [c(self.r), c(self.g), c(self.b), c(self.a)]
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(6.0);

    if t < 1.0 {
        p + (q - p) * t
    } else if t < 3.0 {
        q
    } else if t < 4.0 {
        p + (q - p) * (4.0 - t)
    } else {
        p
    }
}
