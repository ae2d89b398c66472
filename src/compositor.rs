// src/compositor.rs

//! This module defines the `LayerCompositor`.
//!
//! The compositor flattens two or more surfaces into one result, either
//! writing back into a background surface or streaming every pixel through
//! its `PixelSink`. It is stateless beyond the sink: no call depends on any
//! earlier call, and surfaces are only borrowed for the duration of a call.
//!
//! Operands of different sizes are clipped to their smallest common extent and
//! iterated row-major (`y` outer, `x` inner).
//!
//! Transparency handling differs per operation:
//! - `stack`, `silhouette` and `blend` compare foreground pixels against the
//!   foreground's transparency color unconditionally.
//! - `blend_advanced`, `alpha_composite` and `composite_multiple` only do so
//!   when the foreground has transparency enabled.
//! - `mask` has no transparency handling at all.

#[cfg(test)]
mod tests;

use log::debug;

use crate::color::{blend_pixels, ratio_blend, BlendMode, Rgb};
use crate::error::CompositeError;
use crate::sink::{BoxedSink, PixelSink};
use crate::surface::{common_extent, DrawTarget, Surface};

/// Most layers `composite_multiple` accepts.
pub const MAX_COMPOSITE_LAYERS: usize = 4;

/// Ratio giving an even mix in [`LayerCompositor::blend`].
pub const DEFAULT_BLEND_RATIO: u8 = 127;

/// Stateless layer-combining algorithms bound to one output sink.
#[derive(Debug)]
pub struct LayerCompositor {
    sink: BoxedSink,
}

impl LayerCompositor {
    pub fn new(sink: impl PixelSink + 'static) -> Self {
        Self {
            sink: BoxedSink::new(sink),
        }
    }

    /// Clips `surfaces` to their common extent, noting mismatches.
    fn extent(op: &str, surfaces: &[&dyn Surface]) -> (u16, u16) {
        let extent = common_extent(surfaces);
        if surfaces.iter().any(|s| s.dimensions() != extent) {
            debug!(
                "Compositor: {} operands differ in size; clipping to {}x{}.",
                op, extent.0, extent.1
            );
        }
        extent
    }

    /// Emits `pixel_at(x, y)` for every coordinate of the extent.
    fn stream(&mut self, (w, h): (u16, u16), pixel_at: impl Fn(u16, u16) -> Rgb) {
        for y in 0..h {
            for x in 0..w {
                self.sink.emit(x, y, pixel_at(x, y));
            }
        }
    }

    /// Foreground over background: transparent foreground pixels show the
    /// background through.
    ///
    /// With `write_back` the result replaces the background's pixels (nothing
    /// is emitted), so further passes can build on it. Otherwise the result is
    /// streamed and the background is left untouched.
    pub fn stack<B: DrawTarget>(&mut self, bg: &mut B, fg: &dyn Surface, write_back: bool) {
        let extent = {
            let bg_surface: &dyn Surface = &*bg;
            Self::extent("stack", &[bg_surface, fg])
        };
        let key = fg.transparency();
        if write_back {
            let (w, h) = extent;
            for y in 0..h {
                for x in 0..w {
                    let top = fg.pixel(x, y);
                    if !key.matches(top) {
                        bg.draw_pixel_unchecked(x, y, top);
                    }
                }
            }
        } else {
            let bg: &dyn Surface = &*bg;
            self.stream(extent, |x, y| {
                let top = fg.pixel(x, y);
                if key.matches(top) {
                    bg.pixel(x, y)
                } else {
                    top
                }
            });
        }
    }

    /// Cookie-cutter: the background shows wherever the foreground has
    /// content, black everywhere else.
    pub fn silhouette(&mut self, bg: &dyn Surface, fg: &dyn Surface) {
        let extent = Self::extent("silhouette", &[bg, fg]);
        let key = fg.transparency();
        self.stream(extent, |x, y| {
            if key.matches(fg.pixel(x, y)) {
                Rgb::BLACK
            } else {
                bg.pixel(x, y)
            }
        });
    }

    /// Mixes opaque foreground pixels into the background by `ratio`
    /// (0 = background, 255 = foreground, [`DEFAULT_BLEND_RATIO`] ≈ half).
    pub fn blend(&mut self, bg: &dyn Surface, fg: &dyn Surface, ratio: u8) {
        let extent = Self::extent("blend", &[bg, fg]);
        let key = fg.transparency();
        self.stream(extent, |x, y| {
            let (under, top) = (bg.pixel(x, y), fg.pixel(x, y));
            if key.matches(top) {
                under
            } else {
                ratio_blend(under, top, ratio)
            }
        });
    }

    /// Per-pixel blend-mode compositing (see [`blend_pixels`]).
    ///
    /// Foreground pixels hidden by an enabled transparency convention pass the
    /// background through unchanged.
    pub fn blend_advanced(&mut self, bg: &dyn Surface, fg: &dyn Surface, mode: BlendMode, opacity: u8) {
        let extent = Self::extent("blend_advanced", &[bg, fg]);
        let key = fg.transparency();
        self.stream(extent, |x, y| {
            let (under, top) = (bg.pixel(x, y), fg.pixel(x, y));
            if key.hides(top) {
                under
            } else {
                blend_pixels(under, top, mode, opacity)
            }
        });
    }

    /// Blends background toward foreground using the mask's per-pixel channel
    /// average as alpha: white shows the foreground, black the background.
    pub fn mask(&mut self, bg: &dyn Surface, fg: &dyn Surface, mask: &dyn Surface) {
        let extent = Self::extent("mask", &[bg, fg, mask]);
        self.stream(extent, |x, y| {
            let alpha = mask.pixel(x, y).channel_average();
            ratio_blend(bg.pixel(x, y), fg.pixel(x, y), alpha)
        });
    }

    /// Uniform-alpha blend that honors the foreground's transparency flag:
    /// with transparency disabled every foreground pixel is blended.
    pub fn alpha_composite(&mut self, bg: &dyn Surface, fg: &dyn Surface, alpha: u8) {
        let extent = Self::extent("alpha_composite", &[bg, fg]);
        let key = fg.transparency();
        self.stream(extent, |x, y| {
            let (under, top) = (bg.pixel(x, y), fg.pixel(x, y));
            if key.hides(top) {
                under
            } else {
                ratio_blend(under, top, alpha)
            }
        });
    }

    /// Folds [`LayerCompositor::blend_advanced`]'s per-pixel rule over
    /// `layers`, bottom first, and streams the final result.
    ///
    /// Layer 0 is the running background; layer `i > 0` is applied with
    /// `modes[i]` and `opacities[i]` (index 0 of both is ignored).
    ///
    /// # Errors
    /// Rejects, before emitting anything, an empty `layers`, more than
    /// [`MAX_COMPOSITE_LAYERS`] layers, or `modes`/`opacities` whose length
    /// differs from the layer count.
    pub fn composite_multiple(
        &mut self,
        layers: &[&dyn Surface],
        modes: &[BlendMode],
        opacities: &[u8],
    ) -> Result<(), CompositeError> {
        if layers.is_empty() {
            return Err(CompositeError::NoLayers);
        }
        if layers.len() > MAX_COMPOSITE_LAYERS {
            return Err(CompositeError::TooManyLayers {
                count: layers.len(),
                max: MAX_COMPOSITE_LAYERS,
            });
        }
        for (what, actual) in [("blend modes", modes.len()), ("opacities", opacities.len())] {
            if actual != layers.len() {
                return Err(CompositeError::OperandMismatch {
                    what,
                    expected: layers.len(),
                    actual,
                });
            }
        }

        let extent = Self::extent("composite_multiple", layers);
        let (base, overlays) = (layers[0], &layers[1..]);
        self.stream(extent, |x, y| {
            overlays
                .iter()
                .zip(modes[1..].iter().zip(&opacities[1..]))
                .fold(base.pixel(x, y), |under, (layer, (&mode, &opacity))| {
                    let top = layer.pixel(x, y);
                    if layer.transparency().hides(top) {
                        under
                    } else {
                        blend_pixels(under, top, mode, opacity)
                    }
                })
        });
        Ok(())
    }
}
