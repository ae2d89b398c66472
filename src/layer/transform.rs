// src/layer/transform.rs

//! Geometric transforms: scrolling, moving, centering, blurring, copying,
//! flipping and rotating layer content in place.

use log::trace;

use super::Layer;
use crate::color::{ratio_blend, Rgb};

impl Layer {
    /// Shifts every row by `n` pixels (positive = right), filling the vacated
    /// band with `fill`. A shift of at least the layer width fills everything.
    pub fn scroll_x(&mut self, n: i16, fill: Rgb) {
        let w = self.width as usize;
        if n == 0 || w == 0 {
            return;
        }
        let shift = n.unsigned_abs() as usize;
        if shift >= w {
            trace!("Layer: scroll_x({}) covers the full width; filling.", n);
            self.pixels.fill(fill);
            return;
        }
        for row in self.pixels.chunks_exact_mut(w) {
            if n > 0 {
                row.copy_within(0..w - shift, shift);
                row[..shift].fill(fill);
            } else {
                row.copy_within(shift.., 0);
                row[w - shift..].fill(fill);
            }
        }
    }

    /// Shifts all rows by `n` pixels (positive = down), filling the vacated
    /// rows with `fill`. A shift of at least the layer height fills everything.
    pub fn scroll_y(&mut self, n: i16, fill: Rgb) {
        let (w, h) = (self.width as usize, self.height as usize);
        if n == 0 || h == 0 {
            return;
        }
        let rows = n.unsigned_abs() as usize;
        if rows >= h {
            trace!("Layer: scroll_y({}) covers the full height; filling.", n);
            self.pixels.fill(fill);
            return;
        }
        let band = rows * w;
        let len = self.pixels.len();
        if n > 0 {
            self.pixels.copy_within(0..len - band, band);
            self.pixels[..band].fill(fill);
        } else {
            self.pixels.copy_within(band.., 0);
            self.pixels[len - band..].fill(fill);
        }
    }

    /// Moves content left (negative) or right (positive), filling the vacated
    /// columns with the transparency color.
    ///
    /// Each row is walked against the direction of travel so every source pixel
    /// is read before it is overwritten.
    pub fn move_x(&mut self, delta: i32) {
        let (w, h) = (i32::from(self.width), self.height);
        if delta == 0 || w == 0 {
            return;
        }
        let delta = delta.clamp(-w, w);
        let fill = self.transparency.color;
        for y in 0..h {
            if delta > 0 {
                for x in (0..w).rev() {
                    let src = x - delta;
                    let px = if src >= 0 { self.pixels[self.index(src as u16, y)] } else { fill };
                    self.draw_pixel_unchecked(x as u16, y, px);
                }
            } else {
                for x in 0..w {
                    let src = x - delta;
                    let px = if src < w { self.pixels[self.index(src as u16, y)] } else { fill };
                    self.draw_pixel_unchecked(x as u16, y, px);
                }
            }
        }
    }

    /// Vertical move. Not implemented: the layer is left untouched.
    pub fn move_y(&mut self, delta: i32) {
        trace!("Layer: move_y({}) has no effect.", delta);
    }

    fn column_has_content(&self, x: u16) -> bool {
        (0..self.height).any(|y| !self.transparency.matches(self.pixels[self.index(x, y)]))
    }

    /// First column, scanning left to right, holding a non-transparent pixel.
    pub fn leftmost_content_column(&self) -> Option<u16> {
        (0..self.width).find(|&x| self.column_has_content(x))
    }

    /// Last column, scanning right to left, holding a non-transparent pixel.
    pub fn rightmost_content_column(&self) -> Option<u16> {
        (0..self.width).rev().find(|&x| self.column_has_content(x))
    }

    /// Centres the horizontal span of non-transparent content within the layer.
    ///
    /// An entirely transparent layer is left as is.
    pub fn auto_center_x(&mut self) {
        let (Some(left), Some(right)) = (self.leftmost_content_column(), self.rightmost_content_column())
        else {
            trace!("Layer: auto_center_x found no content.");
            return;
        };
        let (left, right_exclusive) = (i32::from(left), i32::from(right) + 1);
        let target_left = (i32::from(self.width) - (right_exclusive - left)) / 2;
        self.move_x(target_left - left);
    }

    /// 3×3 box blur of every interior pixel, mixed with the original by `amount`
    /// (0 = unchanged, 255 = fully replaced). The outer border is untouched.
    pub fn blur(&mut self, amount: u8) {
        let (w, h) = (self.width as usize, self.height as usize);
        if amount == 0 || w < 3 || h < 3 {
            return;
        }
        let src = self.pixels.clone();
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let (mut r, mut g, mut b) = (0u16, 0u16, 0u16);
                for ny in y - 1..=y + 1 {
                    for px in &src[ny * w + x - 1..=ny * w + x + 1] {
                        r += u16::from(px.r);
                        g += u16::from(px.g);
                        b += u16::from(px.b);
                    }
                }
                let average = Rgb::new((r / 9) as u8, (g / 9) as u8, (b / 9) as u8);
                let i = y * w + x;
                self.pixels[i] = ratio_blend(src[i], average, amount);
            }
        }
    }

    /// Copies a `w × h` rectangle from `(src_x, src_y)` to `(dst_x, dst_y)`.
    ///
    /// Only pixels whose source and destination both fall inside the layer are
    /// copied. Overlapping rectangles behave as if copied through a scratch buffer.
    pub fn copy_rect(&mut self, src_x: i16, src_y: i16, dst_x: i16, dst_y: i16, w: i16, h: i16) {
        let (lw, lh) = (i32::from(self.width), i32::from(self.height));
        let (sx, sy, dx, dy) = (i32::from(src_x), i32::from(src_y), i32::from(dst_x), i32::from(dst_y));
        let i0 = 0.max(-sx).max(-dx);
        let i1 = i32::from(w).min(lw - sx).min(lw - dx);
        let j0 = 0.max(-sy).max(-dy);
        let j1 = i32::from(h).min(lh - sy).min(lh - dy);
        if i1 <= i0 || j1 <= j0 {
            return;
        }

        let mut scratch = Vec::with_capacity(((i1 - i0) * (j1 - j0)) as usize);
        for j in j0..j1 {
            for i in i0..i1 {
                scratch.push(self.pixels[self.index((sx + i) as u16, (sy + j) as u16)]);
            }
        }
        let mut copied = scratch.into_iter();
        for j in j0..j1 {
            for i in i0..i1 {
                if let Some(px) = copied.next() {
                    self.draw_pixel_unchecked((dx + i) as u16, (dy + j) as u16, px);
                }
            }
        }
    }

    /// Mirrors the layer left to right.
    pub fn flip_horizontal(&mut self) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(w) {
            row.reverse();
        }
    }

    /// Mirrors the layer top to bottom.
    pub fn flip_vertical(&mut self) {
        let (w, h) = (self.width as usize, self.height as usize);
        for y in 0..h / 2 {
            let (top, bottom) = self.pixels.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Rotates content a quarter turn clockwise.
    ///
    /// Destination `(x, y)` takes source `(y, height - 1 - x)`. On non-square
    /// layers, destinations whose source lies outside the layer become black.
    pub fn rotate90(&mut self) {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return;
        }
        let src = self.pixels.clone();
        for y in 0..h {
            for x in 0..w {
                let px = if y < w && x < h {
                    src[self.index(y, h - 1 - x)]
                } else {
                    Rgb::BLACK
                };
                self.draw_pixel_unchecked(x, y, px);
            }
        }
    }
}
