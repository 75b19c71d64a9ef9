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


//! The persisted registry file.
//!
//! A human-editable YAML document with one record per non-directory asset:
//!
//! ```yaml
//! Assets:
//! - Handle: 9210382738120398
//!   Path: textures/foo.png
//!   Type: Texture
//!   ModificationTime: 1700000000000000000
//! ```

use quarry_core::{asset::AssetMetadata, AssetError, AssetResult};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Deserialize)]
struct RegistryDocument {
    #[serde(rename = "Assets", default)]
    assets: Vec<AssetMetadata>,
}

#[derive(Serialize)]
struct RegistryDocumentRef<'a> {
    #[serde(rename = "Assets")]
    assets: Vec<&'a AssetMetadata>,
}

/// Reads every record from the registry file. An empty file holds no records.
pub(crate) fn read(path: &Path) -> AssetResult<Vec<AssetMetadata>> {
    let text = fs::read_to_string(path).map_err(|e| AssetError::io(path, e))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: RegistryDocument =
        serde_yaml::from_str(&text).map_err(|e| AssetError::format(path, e))?;
    Ok(document.assets)
}

/// Replaces the registry file with `records`, in the order given.
pub(crate) fn write<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a AssetMetadata>,
) -> AssetResult<()> {
    let document = RegistryDocumentRef {
        assets: records.into_iter().collect(),
    };
    let text = serde_yaml::to_string(&document).map_err(|e| AssetError::format(path, e))?;
    fs::write(path, text).map_err(|e| AssetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::asset::{AssetHandle, AssetType};

    #[test]
    fn written_document_uses_registry_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AssetRegistry.yaml");
        let record = AssetMetadata::new(
            AssetHandle::from_raw(42),
            "textures/foo.png",
            AssetType::Texture,
            1_700_000_000,
        );

        write(&path, [&record]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Assets:"));
        assert!(text.contains("Handle: 42"));
        assert!(text.contains("Path: textures/foo.png"));
        assert!(text.contains("Type: Texture"));
        assert!(text.contains("ModificationTime: 1700000000"));

        assert_eq!(read(&path).unwrap(), vec![record]);
    }

    #[test]
    fn reads_hand_written_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AssetRegistry.yaml");
        fs::write(
            &path,
            "Assets:\n  - Handle: 7\n    Path: a.lua\n    Type: Script\n    ModificationTime: 3\n",
        )
        .unwrap();

        assert_eq!(
            read(&path).unwrap(),
            vec![AssetMetadata::new(
                AssetHandle::from_raw(7),
                "a.lua",
                AssetType::Script,
                3
            )]
        );
    }

    #[test]
    fn empty_file_has_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AssetRegistry.yaml");
        fs::write(&path, "").unwrap();
        assert!(read(&path).unwrap().is_empty());

        write(&path, Vec::<&AssetMetadata>::new()).unwrap();
        assert!(read(&path).unwrap().is_empty());
    }

    #[test]
    fn malformed_document_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AssetRegistry.yaml");
        fs::write(&path, "Assets:\n  - Handle: nope\n").unwrap();
        assert!(matches!(read(&path), Err(AssetError::Format { .. })));
    }
}
