// src/layer.rs

//! Defines the `Layer`, an off-screen RGB framebuffer for one display layer.
//!
//! A layer owns a single contiguous `Vec<Rgb>` indexed as `y * width + x`.
//! That one allocation is exposed both through 2-D accessors
//! (`get_pixel`/`set_pixel` and friends) and as a linear slice for bulk
//! operations such as fills, brightness scaling and averaging, so mutation
//! through either path is always visible through the other.
//!
//! Checked accessors take signed coordinates and silently ignore anything out
//! of range. Geometric transforms live in `layer::transform`, photometric ones
//! in `layer::adjust` and read-only statistics in `layer::analysis`.

mod adjust;
mod analysis;
mod transform;


use std::mem;

use log::{debug, warn};

use crate::color::{color565, Rgb};
use crate::config::LayerConfig;
use crate::error::LayerError;
use crate::sink::{BoxedSink, PixelSink};
use crate::surface::{DrawTarget, Surface, Transparency};

/// Pixel-data budget above which a layer is still allocated but logged as oversized.
pub const DEFAULT_MAX_LAYER_MEMORY: usize = 1024 * 1024;

/// Largest width or height a layer may have; coordinates are signed 16-bit.
pub const MAX_DIMENSION: u16 = i16::MAX as u16;

/// An independently owned 2-D pixel buffer.
#[derive(Debug)]
pub struct Layer {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
    transparency: Transparency,
    sink: BoxedSink,
}

impl Layer {
    /// Allocates a black `width × height` layer that displays through `sink`.
    ///
    /// # Errors
    /// * [`LayerError::InvalidDimension`] if either side is zero or larger than
    ///   [`MAX_DIMENSION`].
    /// * [`LayerError::AllocationFailed`] if the pixel storage cannot be reserved.
    pub fn new(width: u16, height: u16, sink: impl PixelSink + 'static) -> Result<Self, LayerError> {
        Self::with_memory_budget(width, height, DEFAULT_MAX_LAYER_MEMORY, sink)
    }

    /// Like [`Layer::new`], warning when the pixel data exceeds `budget_bytes`.
    pub fn with_memory_budget(
        width: u16,
        height: u16,
        budget_bytes: usize,
        sink: impl PixelSink + 'static,
    ) -> Result<Self, LayerError> {
        let pixels = allocate_pixels(width, height, budget_bytes)?;
        Ok(Self::from_parts(width, height, pixels, sink))
    }

    /// Builds a layer from configuration, honoring its transparency settings.
    pub fn from_config(config: &LayerConfig, sink: impl PixelSink + 'static) -> Result<Self, LayerError> {
        let mut layer =
            Self::with_memory_budget(config.width, config.height, config.max_memory_bytes, sink)?;
        layer.transparency = Transparency {
            color: config.transparency.color,
            enabled: config.transparency.enabled,
        };
        Ok(layer)
    }

    /// Allocates a layer, falling back to a degraded 0×0 layer on failure.
    ///
    /// Every operation on a degraded layer is a no-op and `is_initialized()`
    /// reports `false`.
    pub fn new_or_empty(width: u16, height: u16, sink: impl PixelSink + 'static) -> Self {
        match allocate_pixels(width, height, DEFAULT_MAX_LAYER_MEMORY) {
            Ok(pixels) => Self::from_parts(width, height, pixels, sink),
            Err(err) => {
                warn!("Layer: {}. Continuing with an empty layer.", err);
                Self::from_parts(0, 0, Vec::new(), sink)
            }
        }
    }

    fn from_parts(width: u16, height: u16, pixels: Vec<Rgb>, sink: impl PixelSink + 'static) -> Self {
        Self {
            width,
            height,
            pixels,
            transparency: Transparency::default(),
            sink: BoxedSink::new(sink),
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn transparency(&self) -> Transparency {
        self.transparency
    }

    /// Enables or disables the transparency convention for blend-mode compositing.
    pub fn set_transparency(&mut self, enabled: bool) {
        self.transparency.enabled = enabled;
    }

    /// Changes the sentinel color treated as "no content".
    pub fn set_transparency_color(&mut self, color: Rgb) {
        self.transparency.color = color;
    }

    /// The whole buffer as one row-major slice.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    /// Row `y`, or an empty slice when out of range.
    pub fn row(&self, y: u16) -> &[Rgb] {
        if y >= self.height {
            return &[];
        }
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Converts signed coordinates to an in-bounds index, if they are in range.
    #[inline]
    fn checked_index(&self, x: i16, y: i16) -> Option<usize> {
        self.is_valid_coordinate(x, y)
            .then(|| self.index(x as u16, y as u16))
    }

    pub fn is_valid_coordinate(&self, x: i16, y: i16) -> bool {
        x >= 0 && y >= 0 && (x as u16) < self.width && (y as u16) < self.height
    }

    /// Bounds-checked write; out-of-range coordinates are ignored.
    #[inline]
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb) {
        if let Some(i) = self.checked_index(x, y) {
            self.pixels[i] = color;
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i16, y: i16, r: u8, g: u8, b: u8) {
        self.draw_pixel(x, y, Rgb::new(r, g, b));
    }

    /// Expands a packed 5-6-5 color and writes it with bounds checking.
    pub fn draw_pixel_565(&mut self, x: i16, y: i16, color: u16) {
        let c = Rgb::from_565(color);
        self.set_pixel(x, y, c.r, c.g, c.b);
    }

    /// Write for hot loops whose coordinates are already validated.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the layer.
    #[inline(always)]
    pub fn draw_pixel_unchecked(&mut self, x: u16, y: u16, color: Rgb) {
        debug_assert!(x < self.width && y < self.height);
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Bounds-checked read; black when out of range.
    #[inline]
    pub fn get_pixel(&self, x: i16, y: i16) -> Rgb {
        self.checked_index(x, y)
            .map_or(Rgb::BLACK, |i| self.pixels[i])
    }

    /// Sets every pixel to black, whatever the transparency color is.
    pub fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    /// Fills the intersection of the rectangle with the layer.
    ///
    /// Rectangles fully outside the layer, or with a non-positive width or
    /// height after clipping, leave the layer untouched.
    pub fn fast_fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb) {
        let x0 = i32::from(x).max(0);
        let y0 = i32::from(y).max(0);
        let x1 = (i32::from(x) + i32::from(w)).min(i32::from(self.width));
        let y1 = (i32::from(y) + i32::from(h)).min(i32::from(self.height));
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let stride = self.width as usize;
        for row in y0 as usize..y1 as usize {
            let start = row * stride;
            self.pixels[start + x0 as usize..start + x1 as usize].fill(color);
        }
    }

    pub fn fast_fill_screen(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, x: i16, y: i16, w: i16, h: i16, color: Rgb) {
        self.fast_fill_rect(x, y, w, h, color);
    }

    pub fn fill_rect_565(&mut self, x: i16, y: i16, w: i16, h: i16, color: u16) {
        self.fast_fill_rect(x, y, w, h, Rgb::from_565(color));
    }

    pub fn fill_screen(&mut self, color: Rgb) {
        self.fast_fill_screen(color);
    }

    pub fn fill_screen_565(&mut self, color: u16) {
        self.fast_fill_screen(Rgb::from_565(color));
    }

    /// Packs 8-bit channels into the 5-6-5 form used by external text renderers.
    #[inline]
    pub fn color565(&self, r: u8, g: u8, b: u8) -> u16 {
        color565(r, g, b)
    }

    /// Flushes the layer to its sink in row-major order.
    ///
    /// With `skip_transparent`, pixels equal to the transparency color are not
    /// emitted at all.
    pub fn display(&mut self, skip_transparent: bool) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        for (i, &px) in self.pixels.iter().enumerate() {
            if skip_transparent && self.transparency.matches(px) {
                continue;
            }
            self.sink.emit((i % w) as u16, (i / w) as u16, px);
        }
    }

    /// Whether the pixel storage was allocated and matches the dimensions.
    pub fn is_initialized(&self) -> bool {
        !self.pixels.is_empty() && self.pixels.len() == self.width as usize * self.height as usize
    }

    /// Bytes held by this layer: the pixel allocation plus the layer itself.
    pub fn memory_usage(&self) -> usize {
        self.pixels.capacity() * mem::size_of::<Rgb>() + mem::size_of::<Self>()
    }
}

/// Reserves `width × height` black pixels without aborting on allocation failure.
fn allocate_pixels(width: u16, height: u16, budget_bytes: usize) -> Result<Vec<Rgb>, LayerError> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(LayerError::InvalidDimension {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    let count = width as usize * height as usize;
    let bytes = count * mem::size_of::<Rgb>();
    if bytes > budget_bytes {
        warn!(
            "Layer: {}x{} needs {} bytes, over the {} byte budget.",
            width, height, bytes, budget_bytes
        );
    }

    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(count)
        .map_err(|_| LayerError::AllocationFailed { width, height, bytes })?;
    pixels.resize(count, Rgb::BLACK);
    debug!("Layer: allocated {}x{} ({} bytes).", width, height, bytes);
    Ok(pixels)
}

impl Surface for Layer {
    #[inline]
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[inline]
    fn pixel(&self, x: u16, y: u16) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    #[inline]
    fn transparency(&self) -> Transparency {
        self.transparency
    }
}

impl DrawTarget for Layer {
    #[inline]
    fn draw_pixel(&mut self, x: i16, y: i16, color: Rgb) {
        Layer::draw_pixel(self, x, y, color);
    }

    #[inline]
    fn draw_pixel_unchecked(&mut self, x: u16, y: u16, color: Rgb) {
        Layer::draw_pixel_unchecked(self, x, y, color);
    }

    fn draw_pixel_565(&mut self, x: i16, y: i16, color: u16) {
        Layer::draw_pixel_565(self, x, y, color);
    }
}
