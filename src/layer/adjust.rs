// src/layer/adjust.rs

//! Photometric adjustments applied over the linear pixel view.

use log::warn;

use super::Layer;
use crate::color::Rgb;

impl Layer {
    /// Scales every channel by `value / 255`. 255 is the identity, 0 is black.
    pub fn dim(&mut self, value: u8) {
        for px in &mut self.pixels {
            px.nscale8(value);
        }
    }

    /// Same contract as [`Layer::dim`].
    pub fn adjust_brightness(&mut self, scale: u8) {
        if scale == 255 {
            return;
        }
        self.dim(scale);
    }

    /// Applies `255 * (v / 255) ^ gamma` to every channel via a lookup table.
    ///
    /// Non-finite or non-positive `gamma` values are ignored.
    pub fn adjust_gamma(&mut self, gamma: f32) {
        if !gamma.is_finite() || gamma <= 0.0 {
            warn!("Layer: ignoring invalid gamma {}.", gamma);
            return;
        }
        let table: [u8; 256] = std::array::from_fn(|i| {
            let v = (i as f32 / 255.0).powf(gamma) * 255.0 + 0.5;
            v.clamp(0.0, 255.0) as u8
        });
        for px in &mut self.pixels {
            *px = Rgb::new(
                table[px.r as usize],
                table[px.g as usize],
                table[px.b as usize],
            );
        }
    }

    /// Replaces every pixel `p` by `matrix × [p.r, p.g, p.b]`, rounded and
    /// clamped to 0..=255. Row 0 produces red, row 1 green, row 2 blue.
    pub fn apply_color_matrix(&mut self, matrix: &[[f32; 3]; 3]) {
        let channel = |row: &[f32; 3], px: Rgb| -> u8 {
            let v = row[0] * f32::from(px.r) + row[1] * f32::from(px.g) + row[2] * f32::from(px.b);
            v.round().clamp(0.0, 255.0) as u8
        };
        for px in &mut self.pixels {
            let src = *px;
            *px = Rgb::new(
                channel(&matrix[0], src),
                channel(&matrix[1], src),
                channel(&matrix[2], src),
            );
        }
    }
}
