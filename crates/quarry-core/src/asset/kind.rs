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


use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of asset kinds the catalog knows about.
///
/// The kind is inferred once, at discovery time, from the directory flag or the
/// file extension. It selects the serializer strategy used to load and save the
/// asset. The variant names are the exact strings written to the registry file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetType {
    /// A folder. Never persisted; re-derived from file paths on every scan.
    Directory,
    /// A raster image.
    Texture,
    /// A single sprite cut from a texture.
    Sprite,
    /// Several sprites packed into one texture.
    CompositeSpriteSheet,
    /// A baked font: a descriptor plus a cached glyph atlas.
    Font,
    /// A raw TrueType/OpenType font file.
    FontSource,
    /// A serialized scene.
    Scene,
    /// A reusable entity template.
    Prefab,
    /// A script source file.
    Script,
    /// A shader source file.
    Shader,
    /// An audio file.
    AudioClip,
    /// Any file whose extension is not recognized.
    Unknown,
}

impl AssetType {
    /// Every variant, in declaration order.
    pub const ALL: [AssetType; 12] = [
        AssetType::Directory,
        AssetType::Texture,
        AssetType::Sprite,
        AssetType::CompositeSpriteSheet,
        AssetType::Font,
        AssetType::FontSource,
        AssetType::Scene,
        AssetType::Prefab,
        AssetType::Script,
        AssetType::Shader,
        AssetType::AudioClip,
        AssetType::Unknown,
    ];

    /// Infers the type of a file from its extension (without the dot).
    ///
    /// Matching is case-insensitive. Unrecognized extensions map to
    /// [`AssetType::Unknown`].
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "bmp" | "tga" => AssetType::Texture,
            "sprite" => AssetType::Sprite,
            "spritesheet" => AssetType::CompositeSpriteSheet,
            "font" => AssetType::Font,
            "ttf" | "otf" => AssetType::FontSource,
            "scene" => AssetType::Scene,
            "prefab" => AssetType::Prefab,
            "lua" => AssetType::Script,
            "glsl" | "wgsl" | "hlsl" => AssetType::Shader,
            "wav" | "ogg" | "mp3" | "flac" => AssetType::AudioClip,
            _ => AssetType::Unknown,
        }
    }

    /// Infers the type of a catalog path. Directories win over any extension.
    pub fn infer(path: &str, is_dir: bool) -> Self {
        if is_dir {
            return AssetType::Directory;
        }
        std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(AssetType::Unknown, AssetType::from_extension)
    }

    /// The name used in the registry file.
    pub fn name(self) -> &'static str {
        match self {
            AssetType::Directory => "Directory",
            AssetType::Texture => "Texture",
            AssetType::Sprite => "Sprite",
            AssetType::CompositeSpriteSheet => "CompositeSpriteSheet",
            AssetType::Font => "Font",
            AssetType::FontSource => "FontSource",
            AssetType::Scene => "Scene",
            AssetType::Prefab => "Prefab",
            AssetType::Script => "Script",
            AssetType::Shader => "Shader",
            AssetType::AudioClip => "AudioClip",
            AssetType::Unknown => "Unknown",
        }
    }

    /// Returns `true` for [`AssetType::Directory`].
    pub fn is_directory(self) -> bool {
        self == AssetType::Directory
    }

    /// Whether an out-of-band modification of this kind triggers a reload.
    pub fn is_reloadable(self) -> bool {
        !self.is_directory()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::ALL
            .into_iter()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| format!("unknown asset type '{s}'"))
    }
}
