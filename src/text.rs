// src/text.rs

//! Centred text placement.
//!
//! Glyph rasterization and font metrics belong to an external text renderer,
//! reached through the `TextRenderer` trait. This module only decides where
//! the renderer's cursor goes so a measured run of text ends up horizontally
//! centred and anchored to the top, middle or bottom of a surface.
//!
//! The built-in font positions its cursor at the top-left corner of a
//! character cell, while custom fonts position it on the text baseline, so
//! the two cases use separate placement rules.

use crate::color::Rgb;
use crate::layer::Layer;
use crate::surface::DrawTarget;

/// Vertical placement of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Top,
    Middle,
    #[default]
    Bottom,
}

/// Bounding box of a measured text run, as reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Renderer-side settings handed over with every draw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    /// Cursor origin; top-left for the built-in font, baseline for custom fonts.
    pub cursor: (i16, i16),
    /// Packed 5-6-5 color.
    pub color: u16,
    /// Whether text running past the right edge wraps to a new line.
    pub wrap: bool,
}

/// An external glyph renderer.
pub trait TextRenderer {
    /// A renderer-specific custom font. `None` selects the built-in font.
    type Font;

    /// Measures `text` as if drawn with its cursor at the origin.
    fn text_bounds(&mut self, text: &str, font: Option<&Self::Font>) -> TextBounds;

    /// Stamps `text` into `target`.
    fn draw_text(
        &mut self,
        target: &mut dyn DrawTarget,
        text: &str,
        font: Option<&Self::Font>,
        style: TextStyle,
    );
}

/// Computes the cursor that centres a `text_width × text_height` block on a
/// `width × height` surface.
///
/// # Arguments
/// * `custom_font`: whether the cursor denotes a baseline (custom font) rather
///   than a top-left corner (built-in font).
/// * `y_adjust`: vertical offset applied after anchoring. The built-in font
///   ignores it.
pub fn centre_text_cursor(
    (width, height): (u16, u16),
    (text_width, text_height): (u16, u16),
    anchor: TextAnchor,
    custom_font: bool,
    y_adjust: i16,
) -> (i16, i16) {
    let (w, h) = (i32::from(width), i32::from(height));
    let (tw, th) = (i32::from(text_width), i32::from(text_height));
    let adj = i32::from(y_adjust);
    let x = (w - tw) / 2;

    let (cx, cy) = if custom_font {
        match anchor {
            TextAnchor::Top => (x, th + adj),
            TextAnchor::Bottom => (x + 1, (h - 1) + adj),
            TextAnchor::Middle => (x, (h / 2) + (th / 2) + adj),
        }
    } else {
        match anchor {
            TextAnchor::Top => (x, 0),
            TextAnchor::Bottom => (x, h - th),
            TextAnchor::Middle => (x, (h - th) / 2),
        }
    };
    (clamp_i16(cx), clamp_i16(cy))
}

fn clamp_i16(v: i32) -> i16 {
    v.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Measures `text`, places the cursor with [`centre_text_cursor`] and asks
/// `renderer` to draw it into `target` without wrapping.
pub fn draw_centre_text<R: TextRenderer>(
    target: &mut dyn DrawTarget,
    renderer: &mut R,
    text: &str,
    anchor: TextAnchor,
    font: Option<&R::Font>,
    color: Rgb,
    y_adjust: i16,
) {
    let bounds = renderer.text_bounds(text, font);
    let cursor = centre_text_cursor(
        target.dimensions(),
        (bounds.width, bounds.height),
        anchor,
        font.is_some(),
        y_adjust,
    );
    let style = TextStyle {
        cursor,
        color: color.to_565(),
        wrap: false,
    };
    renderer.draw_text(target, text, font, style);
}

impl Layer {
    /// Draws `text` centred on this layer; see [`draw_centre_text`].
    ///
    /// The conventional defaults are [`TextAnchor::Bottom`], the built-in
    /// font, [`Rgb::GREY`] and no vertical adjustment.
    pub fn draw_centre_text<R: TextRenderer>(
        &mut self,
        renderer: &mut R,
        text: &str,
        anchor: TextAnchor,
        font: Option<&R::Font>,
        color: Rgb,
        y_adjust: i16,
    ) {
        draw_centre_text(self, renderer, text, anchor, font, color, y_adjust);
    }
}
