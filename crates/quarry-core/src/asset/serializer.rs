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


use super::{AssetMetadata, AssetType, LoadedAsset};
use crate::error::{AssetError, AssetResult};
use std::path::{Path, PathBuf};

/// Everything a serializer strategy needs to locate an asset on disk.
#[derive(Debug, Clone, Copy)]
pub struct LoadContext<'a> {
    /// The catalog record of the asset being loaded or saved.
    pub metadata: &'a AssetMetadata,
    /// The asset root the metadata path is relative to.
    pub root: &'a Path,
}

impl<'a> LoadContext<'a> {
    /// Creates a new context.
    pub fn new(metadata: &'a AssetMetadata, root: &'a Path) -> Self {
        Self { metadata, root }
    }

    /// The absolute path of the asset's source file.
    pub fn path(&self) -> PathBuf {
        self.metadata.absolute_path(self.root)
    }

    /// Reads the whole source file.
    pub fn read_bytes(&self) -> AssetResult<Vec<u8>> {
        let path = self.path();
        std::fs::read(&path).map_err(|e| AssetError::io(path, e))
    }
}

/// A load/save strategy for one [`AssetType`].
///
/// Exactly one strategy is registered per type that needs loading. Strategies are
/// free to consult other systems (e.g. a derived-artifact cache) while loading.
///
/// Strategies that only know how to read their format keep the default
/// [`AssetSerializer::save`], which refuses with [`AssetError::Unsupported`].
pub trait AssetSerializer: Send + Sync {
    /// Materializes the asset described by `ctx` into an owned instance.
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset>;

    /// Writes `asset` back to the location described by `ctx`.
    fn save(&self, ctx: &LoadContext<'_>, asset: &LoadedAsset) -> AssetResult<()> {
        let _ = asset;
        Err(AssetError::Unsupported {
            asset_type: ctx.metadata.asset_type,
            operation: "save",
        })
    }

    /// Drops anything the strategy derived for an asset whose file was deleted,
    /// such as cached artifacts. Strategies that derive nothing keep the default.
    fn evict(&self, metadata: &AssetMetadata) -> AssetResult<()> {
        let _ = metadata;
        Ok(())
    }
}

/// Returns the [`AssetError::Decode`] used when a serializer receives an instance
/// of the wrong concrete type.
pub fn mismatched_instance(ctx: &LoadContext<'_>, expected: AssetType) -> AssetError {
    AssetError::decode(
        ctx.path(),
        format!("instance is not a {expected} asset"),
    )
}
