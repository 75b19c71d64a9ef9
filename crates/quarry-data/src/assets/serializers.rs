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
    asset::{AssetMetadata, AssetSerializer, AssetType, LoadContext, LoadedAsset},
    AssetError, AssetResult,
};
use std::collections::HashMap;

/// Type-directed dispatch table: one [`AssetSerializer`] per [`AssetType`].
///
/// A missing strategy is a build configuration mistake (the engine catalogs a
/// type it ships no loader for), so [`SerializerRegistry::load`] and
/// [`SerializerRegistry::save`] abort instead of returning an error. Strategies
/// that refuse an operation return [`AssetError::Unsupported`] normally.
#[derive(Default)]
pub struct SerializerRegistry {
    serializers: HashMap<AssetType, Box<dyn AssetSerializer>>,
}

impl SerializerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the strategy for `asset_type`. Last registration wins.
    pub fn register(
        &mut self,
        asset_type: AssetType,
        serializer: impl AssetSerializer + 'static,
    ) -> &mut Self {
        if self
            .serializers
            .insert(asset_type, Box::new(serializer))
            .is_some()
        {
            log::warn!("SerializerRegistry: replacing the serializer for {asset_type}");
        }
        self
    }

    /// Returns `true` if a strategy is registered for `asset_type`.
    pub fn supports(&self, asset_type: AssetType) -> bool {
        self.serializers.contains_key(&asset_type)
    }

    /// Loads the asset described by `ctx` with the strategy for its type.
    ///
    /// # Panics
    /// If no strategy is registered for the asset's type.
    pub fn load(&self, ctx: &LoadContext<'_>) -> AssetResult<LoadedAsset> {
        let asset = self.strategy(ctx.metadata.asset_type).load(ctx)?;
        log::trace!(
            "SerializerRegistry: loaded {} as {}",
            ctx.metadata.path,
            asset.asset_type()
        );
        Ok(asset)
    }

    /// Saves `asset` to the location described by `ctx`.
    ///
    /// # Panics
    /// If no strategy is registered for the asset's type.
    pub fn save(&self, ctx: &LoadContext<'_>, asset: &LoadedAsset) -> AssetResult<()> {
        self.strategy(ctx.metadata.asset_type).save(ctx, asset)
    }

    /// Lets the strategy for `metadata`'s type drop whatever it derived for a
    /// deleted asset. Types without a strategy have nothing to evict.
    pub fn evict(&self, metadata: &AssetMetadata) -> AssetResult<()> {
        match self.serializers.get(&metadata.asset_type) {
            Some(serializer) => serializer.evict(metadata),
            None => Ok(()),
        }
    }

    fn strategy(&self, asset_type: AssetType) -> &dyn AssetSerializer {
        match self.serializers.get(&asset_type) {
            Some(serializer) => serializer.as_ref(),
            None => panic!("{}", AssetError::UnsupportedType(asset_type)),
        }
    }
}
