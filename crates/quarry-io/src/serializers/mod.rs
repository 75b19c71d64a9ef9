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


//! Built-in load/save strategies for the asset types Quarry understands.
//!
//! Hosts call [`register_builtin`] to fill a [`SerializerRegistry`] with every
//! strategy that needs no outside collaborator. Fonts need a
//! [`GlyphRasterizer`] and are registered separately with
//! [`register_fonts`].

mod descriptor;
mod font;
mod text;
mod texture;

pub use self::descriptor::{
    RonSerializer, SpriteDescriptor, SpriteFrame, SpriteSheetDescriptor,
};
pub use self::font::{FontAtlas, FontDescriptor, FontSerializer, GlyphRasterizer};
pub use self::text::{BinaryAsset, BinarySerializer, TextAsset, TextSerializer};
pub use self::texture::{Texture, TextureSerializer};

use crate::cache::DerivedArtifactCache;
use quarry_core::asset::AssetType;
use quarry_data::assets::SerializerRegistry;

/// Registers every built-in strategy except fonts.
pub fn register_builtin(registry: &mut SerializerRegistry) -> &mut SerializerRegistry {
    registry
        .register(AssetType::Texture, TextureSerializer)
        .register(
            AssetType::Sprite,
            RonSerializer::<SpriteDescriptor>::new(AssetType::Sprite),
        )
        .register(
            AssetType::CompositeSpriteSheet,
            RonSerializer::<SpriteSheetDescriptor>::new(AssetType::CompositeSpriteSheet),
        );
    for asset_type in [
        AssetType::Scene,
        AssetType::Prefab,
        AssetType::Script,
        AssetType::Shader,
    ] {
        registry.register(asset_type, TextSerializer::new(asset_type));
    }
    for asset_type in [AssetType::AudioClip, AssetType::FontSource] {
        registry.register(asset_type, BinarySerializer::new(asset_type));
    }
    registry
}

/// Registers the font strategy, caching atlases in `atlas_cache`.
pub fn register_fonts(
    registry: &mut SerializerRegistry,
    rasterizer: impl GlyphRasterizer + 'static,
    atlas_cache: DerivedArtifactCache,
) -> &mut SerializerRegistry {
    registry.register(AssetType::Font, FontSerializer::new(rasterizer, atlas_cache))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_everything_but_fonts_and_folders() {
        let mut registry = SerializerRegistry::new();
        register_builtin(&mut registry);

        for asset_type in AssetType::ALL {
            let expected = !matches!(
                asset_type,
                AssetType::Directory | AssetType::Unknown | AssetType::Font
            );
            assert_eq!(registry.supports(asset_type), expected, "{asset_type}");
        }
    }
}
