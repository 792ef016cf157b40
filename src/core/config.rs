//! Runner configuration.
//!
//! Settings come from `slipway.toml` at the project root when present and
//! fall back to built-in defaults otherwise. The file is optional by design:
//! a stock aggregator checkout builds with no configuration at all.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "slipway.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Product name: artifact name prefix and the host binary name.
    pub product: String,
    /// Package path passed to the compiler.
    pub main_package: String,
    /// Build output directory, relative to the project root.
    pub build_dir: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            product: "aggregator".to_string(),
            main_package: "./cmd/aggregator".to_string(),
            build_dir: "build".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Load from `slipway.toml` under `root` when present, defaults otherwise.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .map_err(|e| Error::internal_io(format!("Failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&raw).map_err(|e| Error::config_invalid(&path, e.to_string()))
    }

    pub fn build_dir_path(&self, root: &Path) -> PathBuf {
        root.join(&self.build_dir)
    }

    /// Host binary name: the plain `build` output and the root-level file
    /// removed by `clean`.
    pub fn host_binary_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.product)
        } else {
            self.product.clone()
        }
    }
}
