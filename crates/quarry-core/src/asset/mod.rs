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


//! Provides the foundational traits and primitive types for Quarry's asset system.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be held by the
//!   loaded-asset table.
//! - [`AssetHandle`], [`AssetType`] and [`AssetMetadata`]: the identity card of a
//!   cataloged file.
//! - [`LoadedAsset`]: a type-erased, owned instance produced by a serializer.
//! - The [`AssetSerializer`], [`AssetIndex`] and [`AssetSignals`] contracts that
//!   connect the catalog, the serializer registry and the loaded-asset table.

mod handle;
mod kind;
mod metadata;
mod serializer;
mod signals;

pub use handle::*;
pub use kind::*;
pub use metadata::*;
pub use serializer::*;
pub use signals::*;

use std::any::Any;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce that an asset owns all of its data (`'static`) and can
/// be handed to a host that moves it across threads (`Send + Sync`), even though
/// the catalog itself is driven from a single thread.
///
/// # Examples
///
/// ```
/// use quarry_core::asset::Asset;
///
/// struct Texture {
///     pixels: Vec<u8>,
/// }
///
/// impl Asset for Texture {}
/// ```
pub trait Asset: Send + Sync + 'static {}

/// An owned, type-erased asset instance.
///
/// Serializers return this from `load`; the loaded-asset table stores it inside an
/// indirection slot. The concrete type is recovered with [`LoadedAsset::downcast_ref`].
pub struct LoadedAsset {
    asset_type: AssetType,
    value: Box<dyn Any + Send + Sync>,
}

impl LoadedAsset {
    /// Wraps a concrete asset together with the catalog type it was loaded as.
    pub fn new<A: Asset>(asset_type: AssetType, asset: A) -> Self {
        Self {
            asset_type,
            value: Box::new(asset),
        }
    }

    /// The catalog type this instance was loaded as.
    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Returns the concrete asset if it is of type `A`.
    pub fn downcast_ref<A: Asset>(&self) -> Option<&A> {
        self.value.downcast_ref::<A>()
    }

    /// Returns `true` if the instance is of type `A`.
    pub fn is<A: Asset>(&self) -> bool {
        self.value.is::<A>()
    }
}

impl std::fmt::Debug for LoadedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedAsset")
            .field("asset_type", &self.asset_type)
            .finish_non_exhaustive()
    }
}
