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


use quarry_core::asset::{Asset, LoadedAsset};
use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

/// A stable indirection cell for one asset handle.
///
/// The [`LoadedAssetTable`](super::LoadedAssetTable) owns the instance inside the
/// slot and swaps it on reload; the slot itself is never replaced while its handle
/// stays cataloged. Holders keep a clone of the slot, never the instance, and
/// observe every reload and unload through it.
///
/// Borrows returned by [`AssetSlot::get`] must not be held across a call that
/// reloads or unloads the handle.
#[derive(Clone, Default)]
pub struct AssetSlot(Rc<RefCell<Option<LoadedAsset>>>);

impl AssetSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if an instance is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.0.borrow().is_some()
    }

    /// Borrows the current instance as `A`.
    ///
    /// Returns `None` if the slot is empty or holds another type.
    pub fn get<A: Asset>(&self) -> Option<Ref<'_, A>> {
        Ref::filter_map(self.0.borrow(), |slot| {
            slot.as_ref().and_then(|asset| asset.downcast_ref::<A>())
        })
        .ok()
    }

    /// Borrows the current type-erased instance.
    pub fn get_erased(&self) -> Option<Ref<'_, LoadedAsset>> {
        Ref::filter_map(self.0.borrow(), Option::as_ref).ok()
    }

    /// Returns `true` if both values refer to the same cell.
    pub fn same_slot(&self, other: &AssetSlot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of clones held outside the table.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0).saturating_sub(1)
    }

    /// Installs `asset` and hands back the previous instance, still alive.
    pub(crate) fn replace(&self, asset: LoadedAsset) -> Option<LoadedAsset> {
        self.0.borrow_mut().replace(asset)
    }

    pub(crate) fn take(&self) -> Option<LoadedAsset> {
        self.0.borrow_mut().take()
    }
}

impl std::fmt::Debug for AssetSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AssetSlot").field(&*self.0.borrow()).finish()
    }
}
