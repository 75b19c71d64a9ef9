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


use quarry_core::{
    asset::{
        mismatched_instance, Asset, AssetHandle, AssetSerializer, AssetType, LoadContext,
        LoadedAsset,
    },
    AssetError, AssetResult,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::marker::PhantomData;

/// A single sprite cut out of a texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDescriptor {
    /// The texture the sprite is cut from.
    pub texture: AssetHandle,
    /// The source rectangle, in pixels.
    pub frame: SpriteFrame,
    /// Normalized pivot point, `(0.5, 0.5)` being the center.
    #[serde(default = "default_pivot")]
    pub pivot: (f32, f32),
}

impl Asset for SpriteDescriptor {}

/// A named rectangle within a texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteFrame {
    /// Frame name, unique within a sheet.
    #[serde(default)]
    pub name: String,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Several sprites packed into one texture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheetDescriptor {
    /// The packed texture.
    pub texture: AssetHandle,
    /// The frames, in playback order.
    pub frames: Vec<SpriteFrame>,
}

impl Asset for SpriteSheetDescriptor {}

impl SpriteSheetDescriptor {
    /// The frame called `name`.
    pub fn frame(&self, name: &str) -> Option<&SpriteFrame> {
        self.frames.iter().find(|frame| frame.name == name)
    }
}

fn default_pivot() -> (f32, f32) {
    (0.5, 0.5)
}

/// Reads and writes a descriptor type stored as RON.
pub struct RonSerializer<D> {
    asset_type: AssetType,
    _descriptor: PhantomData<fn() -> D>,
}

impl<D> RonSerializer<D> {
    /// A RON strategy tagging its instances with `asset_type`.
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            asset_type,
            _descriptor: PhantomData,
        }
    }
}

impl<D> AssetSerializer for RonSerializer<D>
where
    D: Asset + Serialize + DeserializeOwned,
{
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let bytes = ctx.read_bytes()?;
        let descriptor: D =
            ron::de::from_bytes(&bytes).map_err(|e| AssetError::format(ctx.path(), e))?;
        Ok(LoadedAsset::new(self.asset_type, descriptor))
    }

    fn save(&self, ctx: &LoadContext<'_>, asset: &LoadedAsset) -> AssetResult<()> {
        let descriptor = asset
            .downcast_ref::<D>()
            .ok_or_else(|| mismatched_instance(ctx, self.asset_type))?;
        write_ron(ctx, descriptor)
    }
}

/// Writes `value` as pretty-printed RON at the asset's path.
pub(crate) fn write_ron<T: Serialize>(ctx: &LoadContext<'_>, value: &T) -> AssetResult<()> {
    let path = ctx.path();
    let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
    let text = ron::ser::to_string_pretty(value, pretty_config)
        .map_err(|e| AssetError::format(&path, e))?;
    std::fs::write(&path, text).map_err(|e| AssetError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::asset::AssetMetadata;
    use std::fs;

    fn metadata(path: &str, asset_type: AssetType) -> AssetMetadata {
        AssetMetadata::new(AssetHandle::from_raw(9), path, asset_type, 0)
    }

    #[test]
    fn sprite_loads_with_default_pivot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("coin.sprite"),
            "(texture: 42, frame: (x: 0, y: 16, width: 16, height: 16))",
        )
        .unwrap();
        let metadata = metadata("coin.sprite", AssetType::Sprite);

        let loaded = RonSerializer::<SpriteDescriptor>::new(AssetType::Sprite)
            .load(&LoadContext::new(&metadata, dir.path()))
            .unwrap();
        let sprite = loaded.downcast_ref::<SpriteDescriptor>().unwrap();
        assert_eq!(sprite.texture, AssetHandle::from_raw(42));
        assert_eq!(sprite.frame.y, 16);
        assert_eq!(sprite.pivot, (0.5, 0.5));
    }

    #[test]
    fn sheet_saves_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let metadata = metadata("hero.spritesheet", AssetType::CompositeSpriteSheet);
        let ctx = LoadContext::new(&metadata, dir.path());
        let serializer =
            RonSerializer::<SpriteSheetDescriptor>::new(AssetType::CompositeSpriteSheet);
        let sheet = SpriteSheetDescriptor {
            texture: AssetHandle::from_raw(3),
            frames: vec![
                SpriteFrame {
                    name: "idle".into(),
                    x: 0,
                    y: 0,
                    width: 8,
                    height: 8,
                },
                SpriteFrame {
                    name: "run".into(),
                    x: 8,
                    y: 0,
                    width: 8,
                    height: 8,
                },
            ],
        };

        serializer
            .save(
                &ctx,
                &LoadedAsset::new(AssetType::CompositeSpriteSheet, sheet.clone()),
            )
            .unwrap();
        let loaded = serializer.load(&ctx).unwrap();
        let reloaded = loaded.downcast_ref::<SpriteSheetDescriptor>().unwrap();
        assert_eq!(reloaded, &sheet);
        assert_eq!(reloaded.frame("run").map(|f| f.x), Some(8));
    }

    #[test]
    fn malformed_descriptor_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.sprite"), "(texture: ").unwrap();
        let metadata = metadata("bad.sprite", AssetType::Sprite);
        let result = RonSerializer::<SpriteDescriptor>::new(AssetType::Sprite)
            .load(&LoadContext::new(&metadata, dir.path()));
        assert!(matches!(result, Err(AssetError::Format { .. })));
    }
}
