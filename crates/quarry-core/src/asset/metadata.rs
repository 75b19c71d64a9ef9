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


use super::{AssetHandle, AssetType};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The catalog's record for one asset: its identity card.
///
/// `path` is always relative to the asset root and uses `/` as separator. It is
/// the key used to match files against the previous snapshot during a rescan,
/// since a newly seen file has no handle yet.
///
/// The serde representation is the registry file record:
///
/// ```yaml
/// - Handle: 9210382738120398
///   Path: textures/foo.png
///   Type: Texture
///   ModificationTime: 1700000000000000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// The stable identity of the asset.
    #[serde(rename = "Handle")]
    pub handle: AssetHandle,

    /// Path relative to the asset root, `/`-separated.
    #[serde(rename = "Path")]
    pub path: String,

    /// The kind of the asset.
    #[serde(rename = "Type")]
    pub asset_type: AssetType,

    /// Last observed modification time, in nanoseconds since the Unix epoch.
    #[serde(rename = "ModificationTime")]
    pub modified_at: u64,
}

impl AssetMetadata {
    /// Creates a new metadata record.
    pub fn new(
        handle: AssetHandle,
        path: impl Into<String>,
        asset_type: AssetType,
        modified_at: u64,
    ) -> Self {
        Self {
            handle,
            path: path.into(),
            asset_type,
            modified_at,
        }
    }

    /// Resolves the asset's location on disk against `root`.
    pub fn absolute_path(&self, root: &Path) -> PathBuf {
        self.path.split('/').fold(root.to_path_buf(), |acc, part| acc.join(part))
    }

    /// The final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_joins_components() {
        let meta = AssetMetadata::new(
            AssetHandle::from_raw(1),
            "textures/ui/button.png",
            AssetType::Texture,
            0,
        );
        let root = Path::new("project").join("assets");
        assert_eq!(
            meta.absolute_path(&root),
            root.join("textures").join("ui").join("button.png")
        );
        assert_eq!(meta.file_name(), "button.png");
    }
}
