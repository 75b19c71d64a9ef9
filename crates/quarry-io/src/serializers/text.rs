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
    asset::{mismatched_instance, Asset, AssetSerializer, AssetType, LoadContext, LoadedAsset},
    AssetError, AssetResult,
};

/// A UTF-8 source document: scenes, prefabs, scripts and shaders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAsset {
    /// The full file contents.
    pub contents: String,
}

impl Asset for TextAsset {}

/// An uninterpreted file: audio clips and raw font files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAsset {
    /// The full file contents.
    pub bytes: Vec<u8>,
}

impl Asset for BinaryAsset {}

/// Loads and saves [`TextAsset`]s.
#[derive(Debug, Clone, Copy)]
pub struct TextSerializer {
    asset_type: AssetType,
}

impl TextSerializer {
    /// A text strategy tagging its instances with `asset_type`.
    pub fn new(asset_type: AssetType) -> Self {
        Self { asset_type }
    }
}

impl AssetSerializer for TextSerializer {
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let bytes = ctx.read_bytes()?;
        let contents = String::from_utf8(bytes).map_err(|e| AssetError::decode(ctx.path(), e))?;
        Ok(LoadedAsset::new(self.asset_type, TextAsset { contents }))
    }

    fn save(&self, ctx: &LoadContext<'_>, asset: &LoadedAsset) -> AssetResult<()> {
        let text = asset
            .downcast_ref::<TextAsset>()
            .ok_or_else(|| mismatched_instance(ctx, self.asset_type))?;
        let path = ctx.path();
        std::fs::write(&path, &text.contents).map_err(|e| AssetError::io(path, e))
    }
}

/// Loads [`BinaryAsset`]s. Binary files are read-only.
#[derive(Debug, Clone, Copy)]
pub struct BinarySerializer {
    asset_type: AssetType,
}

impl BinarySerializer {
    /// A binary strategy tagging its instances with `asset_type`.
    pub fn new(asset_type: AssetType) -> Self {
        Self { asset_type }
    }
}

impl AssetSerializer for BinarySerializer {
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let bytes = ctx.read_bytes()?;
        Ok(LoadedAsset::new(self.asset_type, BinaryAsset { bytes }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::asset::{AssetHandle, AssetMetadata};
    use std::fs;

    #[test]
    fn text_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.lua"), "print('a')").unwrap();
        let metadata =
            AssetMetadata::new(AssetHandle::from_raw(1), "main.lua", AssetType::Script, 0);
        let ctx = LoadContext::new(&metadata, dir.path());
        let serializer = TextSerializer::new(AssetType::Script);

        let loaded = serializer.load(&ctx).unwrap();
        assert_eq!(loaded.asset_type(), AssetType::Script);
        assert_eq!(loaded.downcast_ref::<TextAsset>().unwrap().contents, "print('a')");

        let edited = LoadedAsset::new(
            AssetType::Script,
            TextAsset {
                contents: "print('b')".into(),
            },
        );
        serializer.save(&ctx, &edited).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("main.lua")).unwrap(), "print('b')");
    }

    #[test]
    fn saving_a_foreign_instance_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let metadata =
            AssetMetadata::new(AssetHandle::from_raw(1), "a.scene", AssetType::Scene, 0);
        let ctx = LoadContext::new(&metadata, dir.path());
        let foreign = LoadedAsset::new(AssetType::AudioClip, BinaryAsset { bytes: vec![1] });

        assert!(matches!(
            TextSerializer::new(AssetType::Scene).save(&ctx, &foreign),
            Err(AssetError::Decode { .. })
        ));
        assert!(!dir.path().join("a.scene").exists());
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.glsl"), [0xff, 0xfe]).unwrap();
        let metadata =
            AssetMetadata::new(AssetHandle::from_raw(1), "a.glsl", AssetType::Shader, 0);
        let result =
            TextSerializer::new(AssetType::Shader).load(&LoadContext::new(&metadata, dir.path()));
        assert!(matches!(result, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn binary_is_loaded_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hit.wav"), [1, 2, 3]).unwrap();
        let metadata =
            AssetMetadata::new(AssetHandle::from_raw(1), "hit.wav", AssetType::AudioClip, 0);
        let loaded = BinarySerializer::new(AssetType::AudioClip)
            .load(&LoadContext::new(&metadata, dir.path()))
            .unwrap();
        assert_eq!(loaded.downcast_ref::<BinaryAsset>().unwrap().bytes, vec![1, 2, 3]);
    }
}
