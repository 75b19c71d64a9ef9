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


use super::{Artifact, DerivedArtifactCache};
use quarry_core::{
    asset::{AssetMetadata, AssetType},
    AssetError, AssetResult,
};
use std::path::{Path, PathBuf};

/// Downscaled RGBA previews of textures, regenerated only when the source changes.
#[derive(Debug)]
pub struct ThumbnailCache {
    store: DerivedArtifactCache,
    size: u32,
}

impl ThumbnailCache {
    /// Opens the thumbnail store in `dir`. Thumbnails fit in a `size` x `size` box.
    pub fn open(dir: impl Into<PathBuf>, size: u32) -> AssetResult<Self> {
        Ok(Self {
            store: DerivedArtifactCache::open(dir)?,
            size: size.max(1),
        })
    }

    /// The longest edge of generated thumbnails.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The backing artifact store.
    pub fn store(&mut self) -> &mut DerivedArtifactCache {
        &mut self.store
    }

    /// Returns the thumbnail for a texture, generating and caching it on a miss.
    ///
    /// `root` is the asset root `metadata.path` is relative to. Returns `None` for
    /// anything that is not a texture.
    ///
    /// # Errors
    /// [`AssetError::Decode`] if the source image cannot be decoded, or an I/O
    /// error from the store.
    pub fn get_or_create(
        &mut self,
        metadata: &AssetMetadata,
        root: &Path,
    ) -> AssetResult<Option<Artifact>> {
        if metadata.asset_type != AssetType::Texture {
            return Ok(None);
        }
        if let Some(cached) = self.store.try_get(metadata.handle, metadata.modified_at)? {
            return Ok(Some(cached));
        }

        let path = metadata.absolute_path(root);
        let thumbnail = self.generate(&path)?;
        self.store
            .put(metadata.handle, metadata.modified_at, &thumbnail)?;
        log::debug!(
            "ThumbnailCache: generated {}x{} thumbnail for '{}'",
            thumbnail.width(),
            thumbnail.height(),
            metadata.path
        );
        Ok(Some(thumbnail))
    }

    fn generate(&self, path: &Path) -> AssetResult<Artifact> {
        let image = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => AssetError::io(path, io),
            other => AssetError::decode(path, other),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = fit(rgba.width(), rgba.height(), self.size);
        let scaled = image::imageops::thumbnail(&rgba, width, height);
        let (width, height) = scaled.dimensions();
        Artifact::new(width, height, 4, scaled.into_raw())
            .ok_or_else(|| AssetError::decode(path, "thumbnail buffer size mismatch"))
    }
}

/// Scales `(width, height)` to fit in a `size` box, keeping the aspect ratio and
/// never upscaling.
fn fit(width: u32, height: u32, size: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= size {
        return (width.max(1), height.max(1));
    }
    let scale = |edge: u32| {
        let scaled = u64::from(edge) * u64::from(size) / u64::from(longest);
        scaled.max(1) as u32
    };
    (scale(width), scale(height))
}
