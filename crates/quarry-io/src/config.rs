// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Project settings read from `Assets.toml`.

use quarry_core::{AssetError, AssetResult};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the optional settings file in a project directory.
pub const CONFIG_FILE: &str = "Assets.toml";

/// Where a project keeps its assets and registry.
///
/// ```toml
/// asset_root = "assets"
/// registry_file = "assets/AssetRegistry.yaml"
/// thumbnail_size = 128
/// ```
///
/// Every key is optional. After [`ProjectConfig::from_project_dir`] the paths are
/// absolute, resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// The directory scanned for assets.
    pub asset_root: PathBuf,
    /// The persisted handle registry.
    pub registry_file: PathBuf,
    /// Longest edge of generated thumbnails, in pixels.
    pub thumbnail_size: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            registry_file: PathBuf::from("assets/AssetRegistry.yaml"),
            thumbnail_size: 128,
        }
    }
}

impl ProjectConfig {
    /// Parses `path` as an `Assets.toml` document, leaving paths as written.
    pub fn load(path: &Path) -> AssetResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
        toml::from_str(&text).map_err(|e| AssetError::format(path, e))
    }

    /// Reads `<dir>/Assets.toml` if it exists, or uses the defaults, then resolves
    /// relative paths against `dir`.
    pub fn from_project_dir(dir: impl AsRef<Path>) -> AssetResult<Self> {
        let dir = dir.as_ref();
        let config_path = dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            log::info!("ProjectConfig: loading '{}'", config_path.display());
            Self::load(&config_path)?
        } else {
            log::info!(
                "ProjectConfig: no '{}' in '{}', using defaults",
                CONFIG_FILE,
                dir.display()
            );
            Self::default()
        };
        Ok(config.resolved_against(dir))
    }

    /// Makes every relative path absolute by joining it onto `dir`.
    pub fn resolved_against(mut self, dir: &Path) -> Self {
        if self.asset_root.is_relative() {
            self.asset_root = dir.join(&self.asset_root);
        }
        if self.registry_file.is_relative() {
            self.registry_file = dir.join(&self.registry_file);
        }
        self
    }

    /// Where font atlases are cached.
    pub fn font_cache_dir(&self) -> PathBuf {
        self.asset_root.join("cache").join("fonts")
    }

    /// Where thumbnails are cached.
    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        self.asset_root.join("cache").join("thumbnails")
    }
}
