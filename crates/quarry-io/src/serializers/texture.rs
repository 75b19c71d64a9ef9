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
    asset::{Asset, AssetSerializer, AssetType, LoadContext, LoadedAsset},
    AssetError, AssetResult,
};

/// A decoded image, always RGBA8 in sRGB space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub pixels: Vec<u8>,
}

impl Asset for Texture {}

/// Decodes any format the `image` crate understands. Textures are read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureSerializer;

impl AssetSerializer for TextureSerializer {
    fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let bytes = ctx.read_bytes()?;
        let rgba = image::load_from_memory(&bytes)
            .map_err(|e| AssetError::decode(ctx.path(), e))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(LoadedAsset::new(
            AssetType::Texture,
            Texture {
                width,
                height,
                pixels: rgba.into_raw(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_core::asset::{AssetHandle, AssetMetadata};

    #[test]
    fn png_decodes_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]))
            .save(dir.path().join("a.png"))
            .unwrap();
        let metadata = AssetMetadata::new(AssetHandle::from_raw(1), "a.png", AssetType::Texture, 0);

        let loaded = TextureSerializer
            .load(&LoadContext::new(&metadata, dir.path()))
            .unwrap();
        let texture = loaded.downcast_ref::<Texture>().unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(&texture.pixels[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error_and_save_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"nope").unwrap();
        let metadata = AssetMetadata::new(AssetHandle::from_raw(1), "a.png", AssetType::Texture, 0);
        let ctx = LoadContext::new(&metadata, dir.path());

        assert!(matches!(TextureSerializer.load(&ctx), Err(AssetError::Decode { .. })));
        let blank = LoadedAsset::new(
            AssetType::Texture,
            Texture {
                width: 0,
                height: 0,
                pixels: Vec::new(),
            },
        );
        assert!(matches!(
            TextureSerializer.save(&ctx, &blank),
            Err(AssetError::Unsupported { operation: "save", .. })
        ));
    }
}
