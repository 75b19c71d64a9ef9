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


use super::descriptor::write_ron;
use crate::cache::{Artifact, DerivedArtifactCache};
use quarry_core::{
    asset::{
        mismatched_instance, Asset, AssetMetadata, AssetSerializer, AssetType, LoadContext,
        LoadedAsset,
    },
    vfs::{self, FileSystemProbe},
    AssetError, AssetResult,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    sync::{Mutex, PoisonError},
};

/// Turns a raw font file into a glyph atlas bitmap.
///
/// Rasterization is provided by the host, which owns the font stack.
pub trait GlyphRasterizer: Send + Sync {
    /// Rasterizes `source` (a TrueType/OpenType file) at `size` pixels.
    fn rasterize(&self, source: &[u8], size: u32) -> AssetResult<Artifact>;
}

/// The on-disk `.font` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Root-relative path of the `.ttf`/`.otf` file.
    pub source: String,
    /// Pixel size to rasterize at.
    pub size: u32,
}

/// A loaded font: its descriptor and the rasterized glyph atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAtlas {
    /// What was rasterized.
    pub descriptor: FontDescriptor,
    /// The atlas bitmap.
    pub atlas: Artifact,
}

impl Asset for FontAtlas {}

/// Loads fonts, reusing a cached atlas while neither the descriptor nor the
/// source font changed.
pub struct FontSerializer {
    rasterizer: Box<dyn GlyphRasterizer>,
    cache: Mutex<DerivedArtifactCache>,
}

impl FontSerializer {
    /// Creates the strategy with its rasterizer and atlas store.
    pub fn new(rasterizer: impl GlyphRasterizer + 'static, cache: DerivedArtifactCache) -> Self {
        Self {
            rasterizer: Box::new(rasterizer),
            cache: Mutex::new(cache),
        }
    }
}

impl AssetSerializer for FontSerializer {
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let path = ctx.path();
        let descriptor: FontDescriptor = ron::de::from_bytes(&ctx.read_bytes()?)
            .map_err(|e| AssetError::format(&path, e))?;

        let source_path = FileSystemProbe::new(ctx.root).resolve(&descriptor.source);
        let source_modified = fs::metadata(&source_path)
            .and_then(|m| m.modified())
            .map_err(|e| AssetError::io(&source_path, e))?;
        // The atlas is stale if either the descriptor or the font file changed.
        let stamp = ctx.metadata.modified_at.max(vfs::to_nanos(source_modified));

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let atlas = match cache.try_get(ctx.metadata.handle, stamp)? {
            Some(atlas) => {
                log::trace!("FontSerializer: atlas cache hit for '{}'", ctx.metadata.path);
                atlas
            }
            None => {
                let source =
                    fs::read(&source_path).map_err(|e| AssetError::io(&source_path, e))?;
                let atlas = self.rasterizer.rasterize(&source, descriptor.size)?;
                cache.put(ctx.metadata.handle, stamp, &atlas)?;
                log::debug!(
                    "FontSerializer: rasterized '{}' at {}px",
                    descriptor.source,
                    descriptor.size
                );
                atlas
            }
        };

        Ok(LoadedAsset::new(AssetType::Font, FontAtlas { descriptor, atlas }))
    }

    /// Saves the descriptor only; the atlas is always derived.
    fn save(&self, ctx: &LoadContext<'_>, asset: &LoadedAsset) -> AssetResult<()> {
        let font = asset
            .downcast_ref::<FontAtlas>()
            .ok_or_else(|| mismatched_instance(ctx, AssetType::Font))?;
        write_ron(ctx, &font.descriptor)
    }

    /// Deletes the cached atlas of a removed font.
    fn evict(&self, metadata: &AssetMetadata) -> AssetResult<()> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.remove(metadata.handle)? {
            log::debug!("FontSerializer: evicted atlas of '{}'", metadata.path);
        }
        Ok(())
    }
}
