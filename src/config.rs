use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Display configuration for the driver binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: usize,
    pub scale: u32,
    pub timeout_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            rows: 50,
            cols: 50,
            cell_size: 10,
            scale: 1,
            timeout_secs: 30,
        }
    }
}

impl DisplayConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }
}

/// Configuration builder
pub struct ConfigBuilder {
    config: DisplayConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder {
            config: DisplayConfig::default(),
        }
    }

    pub fn grid(mut self, rows: usize, cols: usize) -> Self {
        self.config.rows = rows;
        self.config.cols = cols;
        self
    }

    pub fn cell_size(mut self, cell_size: usize) -> Self {
        self.config.cell_size = cell_size;
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.config.scale = scale;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> DisplayConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder::new()
    }
}
