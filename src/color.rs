// src/color.rs

//! Defines the `Rgb` pixel type and the fixed-point 8-bit color math used by
//! layers and the compositor.
//!
//! All arithmetic here follows the "fixed" 8-bit conventions common to LED
//! libraries: a scale of 255 is the identity (not an off-by-one darkening) and
//! ratio blending is exact at both ends of the range. Layers and the
//! compositor rely on these being bit-exact, so every helper is a plain
//! integer function.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB pixel.
///
/// Equality is exact channel-wise comparison. Serialized as a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    /// Mid grey, the default text color.
    pub const GREY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a pixel from a `0xRRGGBB` code.
    pub const fn from_code(code: u32) -> Self {
        Self::new((code >> 16) as u8, (code >> 8) as u8, code as u8)
    }

    /// Expands a packed 5-6-5 color to 24 bits.
    ///
    /// Uses rounding multipliers so that full-scale 5/6-bit values map to 255
    /// and zero maps to zero.
    pub const fn from_565(color: u16) -> Self {
        let c = color as u32;
        let r = ((((c >> 11) & 0x1F) * 527) + 23) >> 6;
        let g = ((((c >> 5) & 0x3F) * 259) + 33) >> 6;
        let b = (((c & 0x1F) * 527) + 23) >> 6;
        Self::new(r as u8, g as u8, b as u8)
    }

    /// Packs this pixel into 5-6-5, dropping the low bits of each channel.
    pub const fn to_565(self) -> u16 {
        color565(self.r, self.g, self.b)
    }

    /// Scales every channel by `scale / 255` (see [`scale8`]).
    #[inline]
    pub fn scaled(self, scale: u8) -> Self {
        Self::new(scale8(self.r, scale), scale8(self.g, scale), scale8(self.b, scale))
    }

    /// In-place variant of [`Rgb::scaled`].
    #[inline]
    pub fn nscale8(&mut self, scale: u8) {
        *self = self.scaled(scale);
    }

    /// Unweighted mean of the three channels, truncated.
    #[inline]
    pub fn channel_average(self) -> u8 {
        ((u16::from(self.r) + u16::from(self.g) + u16::from(self.b)) / 3) as u8
    }

    #[inline]
    fn map_channels(self, other: Rgb, f: impl Fn(u8, u8) -> u8) -> Rgb {
        Rgb::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Rgb::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Packs 8-bit channels into a 5-6-5 color.
#[inline]
pub const fn color565(r: u8, g: u8, b: u8) -> u16 {
    (((r & 0xF8) as u16) << 8) | (((g & 0xFC) as u16) << 3) | ((b >> 3) as u16)
}

/// Scales `i` by `scale / 256` with the "fixed" convention: `scale8(x, 255) == x`.
#[inline]
pub const fn scale8(i: u8, scale: u8) -> u8 {
    ((i as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Linear interpolation between two 8-bit values, `amount_of_b` in 0..=255.
///
/// Computed as `((a << 8 | b) + b*amt - a*amt) >> 8`, which is exact
/// at both ends and never wraps.
#[inline]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let (a, b, amt) = (a as u32, b as u32, amount_of_b as u32);
    let partial = ((a << 8) | b) + b * amt - a * amt;
    (partial >> 8) as u8
}

/// Ratio-blend between two pixels: 0 yields `p1`, 255 yields `p2`.
#[inline]
pub fn ratio_blend(p1: Rgb, p2: Rgb, amount_of_p2: u8) -> Rgb {
    match amount_of_p2 {
        0 => p1,
        255 => p2,
        amt => p1.map_channels(p2, |a, b| blend8(a, b, amt)),
    }
}

/// Per-channel combination formula used by advanced compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    /// The foreground channel.
    #[default]
    Normal,
    /// `a * b / 255`, always darker.
    Multiply,
    /// `255 - (255 - a) * (255 - b) / 255`, always lighter.
    Screen,
    /// Multiply in the shadows, screen in the highlights of the background.
    Overlay,
}

impl BlendMode {
    /// Combines one background channel `a` with one foreground channel `b`.
    #[inline]
    pub fn apply_channel(self, a: u8, b: u8) -> u8 {
        let (a, b) = (u32::from(a), u32::from(b));
        let v = match self {
            BlendMode::Normal => b,
            BlendMode::Multiply => a * b / 255,
            BlendMode::Screen => 255 - (255 - a) * (255 - b) / 255,
            BlendMode::Overlay => {
                if a < 128 {
                    2 * a * b / 255
                } else {
                    255 - 2 * (255 - a) * (255 - b) / 255
                }
            }
        };
        v as u8
    }

    /// Combines two whole pixels channel by channel.
    #[inline]
    pub fn apply(self, base: Rgb, overlay: Rgb) -> Rgb {
        base.map_channels(overlay, |a, b| self.apply_channel(a, b))
    }
}

/// Blends `overlay` onto `base` with `mode`, then mixes the mode result back
/// with `base` by `opacity`.
///
/// `opacity == 0` returns `base` and `opacity == 255` with [`BlendMode::Normal`]
/// returns `overlay`; these are taken as early returns and agree bit-for-bit
/// with the general path.
pub fn blend_pixels(base: Rgb, overlay: Rgb, mode: BlendMode, opacity: u8) -> Rgb {
    if opacity == 0 {
        return base;
    }
    if opacity == 255 && mode == BlendMode::Normal {
        return overlay;
    }
    ratio_blend(base, mode.apply(base, overlay), opacity)
}
