// src/surface.rs

//! Narrow capability traits for drawable pixel surfaces.
//!
//! The compositor only ever needs to *read* its operands (and write back into
//! one of them for in-place stacking), and the text helper only needs to draw
//! pixels and know the surface size. `Layer` implements both traits; nothing
//! else in the crate depends on the concrete layer type.

use crate::color::Rgb;

/// The transparency convention carried by every surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transparency {
    /// The sentinel pixel value meaning "no content".
    pub color: Rgb,
    /// Whether blend-mode compositing honors the sentinel at all.
    pub enabled: bool,
}

impl Default for Transparency {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            enabled: true,
        }
    }
}

impl Transparency {
    /// Whether `pixel` is the sentinel color, regardless of `enabled`.
    #[inline]
    pub fn matches(&self, pixel: Rgb) -> bool {
        pixel == self.color
    }

    /// Whether `pixel` should be treated as see-through by blend-mode compositing.
    #[inline]
    pub fn hides(&self, pixel: Rgb) -> bool {
        self.enabled && self.matches(pixel)
    }
}

/// A readable pixel surface.
pub trait Surface {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u16, u16);

    /// Reads the pixel at `(x, y)`.
    ///
    /// Callers must keep `x < width` and `y < height`; out-of-range reads may panic.
    fn pixel(&self, x: u16, y: u16) -> Rgb;

    fn transparency(&self) -> Transparency;
}

/// A surface that can be drawn into.
pub trait DrawTarget: Surface {
    /// Bounds-checked write; out-of-range coordinates are ignored.
    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb);

    /// Write without the signed range check, for loops over pre-validated ranges.
    fn draw_pixel_unchecked(&mut self, x: u16, y: u16, color: Rgb);

    /// Bounds-checked write of a packed 5-6-5 color.
    fn draw_pixel_565(&mut self, x: i16, y: i16, color: u16) {
        self.draw_pixel(x, y, Rgb::from_565(color));
    }
}

/// The largest extent shared by every surface in `surfaces`.
pub(crate) fn common_extent(surfaces: &[&dyn Surface]) -> (u16, u16) {
    surfaces
        .iter()
        .map(|s| s.dimensions())
        .reduce(|(w, h), (sw, sh)| (w.min(sw), h.min(sh)))
        .unwrap_or((0, 0))
}
