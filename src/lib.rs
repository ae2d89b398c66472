//! Matrix-layers library crate.
//!
//! Off-screen RGB layers for small LED matrix displays, plus a compositor that
//! flattens several layers into one frame and streams it to a display driver
//! through a per-pixel sink.

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod layer;
pub mod sink;
pub mod surface;
pub mod text;

pub use color::{blend_pixels, ratio_blend, BlendMode, Rgb};
pub use compositor::LayerCompositor;
pub use config::Config;
pub use error::{CompositeError, ConfigError, LayerError};
pub use layer::Layer;
pub use sink::{NullSink, PixelSink};
pub use surface::{DrawTarget, Surface, Transparency};
pub use text::{TextAnchor, TextBounds, TextRenderer, TextStyle};
