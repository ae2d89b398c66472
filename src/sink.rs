// src/sink.rs

//! The output sink contract: a per-pixel consumer that layers and the
//! compositor stream their results into.
//!
//! Sinks are invoked synchronously, once per emitted pixel, in row-major order
//! (`y` outer, `x` inner). What "not emitted" means downstream is up to the
//! sink; for skipped pixels it is simply never called.

use std::fmt;

use crate::color::Rgb;

/// A consumer of `(x, y, r, g, b)` pixels, typically a display driver.
///
/// Any `FnMut(i16, i16, u8, u8, u8)` closure is a sink.
pub trait PixelSink {
    fn emit(&mut self, x: i16, y: i16, r: u8, g: u8, b: u8);
}

impl<F> PixelSink for F
where
    F: FnMut(i16, i16, u8, u8, u8),
{
    #[inline]
    fn emit(&mut self, x: i16, y: i16, r: u8, g: u8, b: u8) {
        self(x, y, r, g, b)
    }
}

/// A sink that discards everything. Useful for layers that are only ever
/// composited and never displayed directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PixelSink for NullSink {
    #[inline]
    fn emit(&mut self, _x: i16, _y: i16, _r: u8, _g: u8, _b: u8) {}
}

/// Owned, type-erased sink held by layers and the compositor.
pub(crate) struct BoxedSink(Box<dyn PixelSink>);

impl BoxedSink {
    pub(crate) fn new(sink: impl PixelSink + 'static) -> Self {
        Self(Box::new(sink))
    }

    #[inline]
    pub(crate) fn emit(&mut self, x: u16, y: u16, color: Rgb) {
        // Surface extents are capped at i16::MAX, so the casts are lossless.
        self.0.emit(x as i16, y as i16, color.r, color.g, color.b);
    }
}

impl fmt::Debug for BoxedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PixelSink")
    }
}
