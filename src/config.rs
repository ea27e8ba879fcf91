// src/config.rs

//! Configuration structures for the `gridconv` tool.
//!
//! The configuration is a JSON document deserialized with serde. Every
//! section and field has a default, so an empty object `{}` is a valid
//! configuration. The process-wide [`CONFIG`] reads the file named by the
//! `GRIDCONV_CONFIG` environment variable on first use.

use anyhow::Context;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::convolution::ConvolveOptions;
use crate::element::Element;
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::kernels::KernelPreset;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "GRIDCONV_CONFIG";

/// Global configuration, loaded once.
///
/// Falls back to [`Config::default`] when the variable is unset or the file
/// cannot be loaded.
pub static CONFIG: Lazy<Config> = Lazy::new(|| match std::env::var_os(CONFIG_ENV) {
    None => Config::default(),
    Some(path) => match Config::load(&path) {
        Ok(config) => {
            info!("Loaded configuration from {:?}", path);
            config
        }
        Err(e) => {
            warn!("{:#}; using default configuration", e);
            Config::default()
        }
    },
});

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub convolution: ConvolutionConfig,
    pub output: OutputConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("In {}", path.display()))
    }
}

// --- Convolution Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvolutionConfig {
    /// Split rows across worker threads.
    pub parallel: bool,
    /// Worker count when `parallel` is set. `0` picks the available
    /// parallelism.
    pub threads: usize,
    pub kernel: KernelConfig,
}

impl Default for ConvolutionConfig {
    fn default() -> Self {
        ConvolutionConfig {
            parallel: true,
            threads: 0,
            kernel: KernelConfig::default(),
        }
    }
}

impl ConvolutionConfig {
    /// Threading options for the configured strategy.
    pub fn options(&self) -> ConvolveOptions {
        match (self.parallel, self.threads) {
            (false, _) => ConvolveOptions::with_threads(1),
            (true, 0) => ConvolveOptions::default(),
            (true, n) => ConvolveOptions::with_threads(n),
        }
    }
}

/// A kernel given either by preset name or as explicit rows.
///
/// ```json
/// { "kernel": "gaussian" }
/// { "kernel": [[{"Integer": 0}, {"Integer": 1}], [{"Integer": 1}, {"Integer": 0}]] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KernelConfig {
    Preset(KernelPreset),
    Rows(Vec<Vec<Element>>),
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig::Preset(KernelPreset::default())
    }
}

impl KernelConfig {
    pub fn build(&self) -> Result<Grid> {
        match self {
            KernelConfig::Preset(preset) => preset.build(),
            KernelConfig::Rows(rows) if rows.is_empty() => Err(GridError::EmptyGrid),
            KernelConfig::Rows(rows) => Grid::from_rows(rows.clone()),
        }
    }
}

// --- Output Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Warn when output cells have to be clamped into 0..=255.
    pub clamp_warning: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            clamp_warning: true,
        }
    }
}
