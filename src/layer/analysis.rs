// src/layer/analysis.rs

//! Read-only statistics over a layer's pixels.

use std::collections::HashMap;

use super::Layer;
use crate::color::Rgb;

impl Layer {
    /// Per-channel mean, truncated. Black for a zero-area layer.
    pub fn get_average_color(&self) -> Rgb {
        let count = self.pixels.len() as u64;
        if count == 0 {
            return Rgb::BLACK;
        }
        let (r, g, b) = self.pixels.iter().fold((0u64, 0u64, 0u64), |(r, g, b), px| {
            (r + u64::from(px.r), g + u64::from(px.g), b + u64::from(px.b))
        });
        Rgb::new((r / count) as u8, (g / count) as u8, (b / count) as u8)
    }

    /// The most frequent pixel value. Ties go to the value seen first in
    /// row-major order; black for a zero-area layer.
    pub fn get_dominant_color(&self) -> Rgb {
        let mut counts: HashMap<Rgb, u32> = HashMap::new();
        for &px in &self.pixels {
            *counts.entry(px).or_insert(0) += 1;
        }
        let mut best: Option<(u32, Rgb)> = None;
        for px in &self.pixels {
            let n = counts.get(px).copied().unwrap_or(0);
            if best.map_or(true, |(top, _)| n > top) {
                best = Some((n, *px));
            }
        }
        best.map_or(Rgb::BLACK, |(_, px)| px)
    }

    /// Number of pixels exactly equal to `target`.
    pub fn get_pixel_count(&self, target: Rgb) -> u32 {
        self.pixels.iter().filter(|&&px| px == target).count() as u32
    }
}
