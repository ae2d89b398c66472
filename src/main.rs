// src/main.rs

//! `matrix-preview`: renders a demo frame with the layer compositor and prints
//! it to the terminal using 24-bit ANSI colors.
//!
//! Usage: `matrix-preview [config.json]`. Without an argument the built-in
//! defaults are used.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use anyhow::Context;
use log::{info, warn};

use matrix_layers::{BlendMode, Config, Layer, LayerCompositor, NullSink, Rgb};

/// Row-major frame assembled from compositor output.
struct Frame {
    width: u16,
    height: u16,
    pixels: Vec<Rgb>,
}

impl Frame {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    fn put(&mut self, x: i16, y: i16, color: Rgb) {
        if x < 0 || y < 0 || x as u16 >= self.width || y as u16 >= self.height {
            return;
        }
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    fn get(&self, x: u16, y: u16) -> Rgb {
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(Rgb::BLACK)
    }

    /// Prints two pixel rows per text line using upper-half blocks.
    fn print(&self, out: &mut impl Write) -> io::Result<()> {
        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.get(x, y);
                let bottom = if y + 1 < self.height { self.get(x, y + 1) } else { Rgb::BLACK };
                write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                )?;
            }
            writeln!(out, "\x1b[0m")?;
        }
        out.flush()
    }
}

fn draw_background(layer: &mut Layer) {
    let (w, h) = (layer.width(), layer.height());
    for y in 0..h {
        for x in 0..w {
            let r = (u32::from(x) * 255 / u32::from(w.max(2) - 1)) as u8;
            let b = (u32::from(y) * 255 / u32::from(h.max(2) - 1)) as u8;
            layer.set_pixel(x as i16, y as i16, r / 2, 24, b);
        }
    }
}

fn draw_shapes(layer: &mut Layer) {
    let (w, h) = (layer.width() as i16, layer.height() as i16);
    layer.fill_rect(2, h / 4, w / 4, h / 2, Rgb::new(240, 200, 40));
    layer.fill_rect(w / 3, h / 3, w / 6, h / 3, Rgb::WHITE);
    layer.auto_center_x();
}

fn draw_glow(layer: &mut Layer) {
    let (w, h) = (layer.width() as i16, layer.height() as i16);
    layer.fill_rect(w / 2 - 4, 0, 8, h, Rgb::new(40, 160, 255));
    layer.blur(200);
}

/// Main entry point for the `matrix-preview` application.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("Failed to load configuration from {}", path))?
        }
        None => {
            info!("No configuration given; using defaults.");
            Config::default()
        }
    };
    info!(
        "Preview size {}x{}, mode {:?}.",
        config.layer.width, config.layer.height, config.compositor.default_mode
    );

    let mut background =
        Layer::from_config(&config.layer, NullSink).context("Failed to create background layer")?;
    let mut shapes = Layer::from_config(&config.layer, NullSink).context("Failed to create shapes layer")?;
    let mut glow = Layer::from_config(&config.layer, NullSink).context("Failed to create glow layer")?;
    info!(
        "Created 3 layers, {} bytes each.",
        background.memory_usage()
    );

    draw_background(&mut background);
    draw_shapes(&mut shapes);
    draw_glow(&mut glow);
    if shapes.get_pixel_count(shapes.transparency().color) == shapes.pixels().len() as u32 {
        warn!("Shapes layer is empty after drawing.");
    }

    let frame = Rc::new(RefCell::new(Frame::new(config.layer.width, config.layer.height)));
    let sink_frame = Rc::clone(&frame);
    let mut compositor = LayerCompositor::new(move |x: i16, y: i16, r: u8, g: u8, b: u8| {
        sink_frame.borrow_mut().put(x, y, Rgb::new(r, g, b));
    });

    let modes = [BlendMode::Normal, config.compositor.default_mode, BlendMode::Screen];
    let opacities = [255, config.compositor.opacity, config.compositor.blend_ratio];
    compositor
        .composite_multiple(&[&background, &shapes, &glow], &modes, &opacities)
        .context("Failed to composite preview layers")?;

    let stdout = io::stdout();
    frame
        .borrow()
        .print(&mut stdout.lock())
        .context("Failed to write preview to stdout")?;
    info!("Average color of the shapes layer: {:?}.", shapes.get_average_color());

    Ok(())
}
