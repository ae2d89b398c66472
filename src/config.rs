// src/config.rs

//! Configuration structures for layers and the compositor.
//!
//! Every struct deserializes with `#[serde(default)]`, so a configuration file
//! only needs to name the settings it changes. Defaults describe a 64×32 panel
//! with black as the transparency color and an even blend ratio.

use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{BlendMode, Rgb};
use crate::compositor::DEFAULT_BLEND_RATIO;
use crate::error::ConfigError;
use crate::layer::DEFAULT_MAX_LAYER_MEMORY;

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Settings applied to layers built with [`Layer::from_config`](crate::layer::Layer::from_config).
    pub layer: LayerConfig,
    /// Default compositing parameters.
    pub compositor: CompositorConfig,
}

impl Config {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        debug!("Config: loaded {}.", path.display());
        Ok(config)
    }
}

// --- Layer Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub width: u16,
    pub height: u16,
    pub transparency: TransparencyConfig,
    /// Pixel-data size above which allocation is logged as oversized.
    pub max_memory_bytes: usize,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            width: 64,
            height: 32,
            transparency: TransparencyConfig::default(),
            max_memory_bytes: DEFAULT_MAX_LAYER_MEMORY,
        }
    }
}

/// The sentinel color treated as "no content" and whether blend-mode
/// compositing honors it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransparencyConfig {
    /// Written as an `[r, g, b]` array.
    pub color: Rgb,
    pub enabled: bool,
}

impl Default for TransparencyConfig {
    fn default() -> Self {
        TransparencyConfig {
            color: Rgb::BLACK,
            enabled: true,
        }
    }
}

// --- Compositor Configuration ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Ratio for plain blending (0 = background, 255 = foreground).
    pub blend_ratio: u8,
    /// Mode for blend-mode compositing: `normal`, `multiply`, `screen` or `overlay`.
    pub default_mode: BlendMode,
    pub opacity: u8,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        CompositorConfig {
            blend_ratio: DEFAULT_BLEND_RATIO,
            default_mode: BlendMode::Normal,
            opacity: 255,
        }
    }
}
