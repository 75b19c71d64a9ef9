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


use super::{AssetSlot, SerializerRegistry};
use quarry_core::{
    asset::{AssetHandle, AssetIndex, AssetMetadata, AssetSignals, LoadContext},
    event::{self, AssetEvent},
    AssetError, AssetResult,
};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Lazily materialized asset instances, keyed by handle.
///
/// # Ownership contract
///
/// The table owns every loaded instance. Callers receive an [`AssetSlot`], a
/// stable cell whose content the table swaps on [`force_reload`] and clears on
/// [`force_unload`]. Keep the slot, not a borrow of its content: a slot always
/// shows the latest instance, while a borrowed instance must never be retained
/// across a reload or unload of its handle.
///
/// Unloading never refuses. A holder whose asset was unloaded sees an empty slot
/// until the next [`get_or_load`] refills that same slot.
///
/// [`force_reload`]: LoadedAssetTable::force_reload
/// [`force_unload`]: LoadedAssetTable::force_unload
/// [`get_or_load`]: LoadedAssetTable::get_or_load
pub struct LoadedAssetTable {
    root: PathBuf,
    serializers: SerializerRegistry,
    slots: BTreeMap<AssetHandle, AssetSlot>,
    events: Option<flume::Sender<AssetEvent>>,
}

impl LoadedAssetTable {
    /// Creates an empty table loading from `root` with `serializers`.
    pub fn new(root: impl Into<PathBuf>, serializers: SerializerRegistry) -> Self {
        Self {
            root: root.into(),
            serializers,
            slots: BTreeMap::new(),
            events: None,
        }
    }

    /// Attaches a sender for [`AssetEvent::Reloaded`] and [`AssetEvent::Unloaded`].
    pub fn with_event_sender(mut self, sender: flume::Sender<AssetEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// The asset root instances are loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The dispatch table used to load and save instances.
    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    /// Returns the slot for `handle`, loading the asset first if needed.
    ///
    /// A populated slot is returned as-is. Otherwise the handle is looked up in
    /// `index` and materialized synchronously; the instance goes into the
    /// handle's existing slot if one was handed out before, so earlier holders
    /// see it too.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] if `index` does not know `handle`, or the
    /// serializer's error if the file cannot be read or decoded. A failed load
    /// leaves the table unchanged.
    pub fn get_or_load(
        &mut self,
        index: &dyn AssetIndex,
        handle: AssetHandle,
    ) -> AssetResult<AssetSlot> {
        if let Some(slot) = self.slots.get(&handle).filter(|slot| slot.is_loaded()) {
            return Ok(slot.clone());
        }

        let metadata = index.lookup(handle).ok_or(AssetError::NotFound(handle))?;
        let asset = self
            .serializers
            .load(&LoadContext::new(metadata, &self.root))?;

        let slot = self.slots.entry(handle).or_insert_with(AssetSlot::new);
        slot.replace(asset);
        log::debug!("LoadedAssetTable: loaded '{}' ({handle})", metadata.path);
        Ok(slot.clone())
    }

    /// Returns the slot for `handle` without loading anything.
    pub fn get(&self, handle: AssetHandle) -> Option<AssetSlot> {
        self.slots.get(&handle).cloned()
    }

    /// Whether `handle` can be loaded, i.e. is cataloged. Says nothing about load state.
    pub fn is_valid(&self, index: &dyn AssetIndex, handle: AssetHandle) -> bool {
        index.contains(handle)
    }

    /// Destroys the loaded instance of `handle` and empties its slot.
    ///
    /// Succeeds as a no-op when nothing is loaded, so calling it repeatedly is
    /// safe. Always returns `true`.
    pub fn force_unload(&mut self, handle: AssetHandle) -> bool {
        if let Some(asset) = self.slots.get(&handle).and_then(AssetSlot::take) {
            drop(asset);
            log::debug!("LoadedAssetTable: unloaded {handle}");
            event::emit(self.events.as_ref(), AssetEvent::Unloaded(handle));
        }
        true
    }

    /// Re-reads `handle` from disk into its existing slot.
    ///
    /// Returns `Ok(false)` if nothing was loaded. The previous instance is dropped
    /// only after the new one is installed, so the slot is never observed empty.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] if a loaded handle is no longer in `index`, or the
    /// serializer's error. On error the previous instance stays in place.
    pub fn force_reload(
        &mut self,
        index: &dyn AssetIndex,
        handle: AssetHandle,
    ) -> AssetResult<bool> {
        if !self.contains(handle) {
            return Ok(false);
        }
        let metadata = index.lookup(handle).ok_or(AssetError::NotFound(handle))?;
        self.reload_with(metadata)
    }

    /// Writes the loaded instance of `handle` back to disk.
    ///
    /// Returns `Ok(false)` if nothing is loaded for the handle.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] if `handle` is not in `index`, or the strategy's
    /// error, including [`AssetError::Unsupported`] for load-only types.
    pub fn save(&self, index: &dyn AssetIndex, handle: AssetHandle) -> AssetResult<bool> {
        let metadata = index.lookup(handle).ok_or(AssetError::NotFound(handle))?;
        let Some(slot) = self.slots.get(&handle) else {
            return Ok(false);
        };
        let Some(asset) = slot.get_erased() else {
            return Ok(false);
        };
        self.serializers
            .save(&LoadContext::new(metadata, &self.root), &asset)?;
        log::debug!("LoadedAssetTable: saved '{}' ({handle})", metadata.path);
        Ok(true)
    }

    /// Number of handles with a loaded instance.
    pub fn count(&self) -> usize {
        self.slots.values().filter(|slot| slot.is_loaded()).count()
    }

    /// Returns `true` if `handle` has a loaded instance.
    pub fn contains(&self, handle: AssetHandle) -> bool {
        self.slots.get(&handle).is_some_and(AssetSlot::is_loaded)
    }

    /// Handles with a loaded instance, in handle order.
    pub fn loaded_handles(&self) -> impl Iterator<Item = AssetHandle> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.is_loaded())
            .map(|(handle, _)| *handle)
    }

    fn reload_with(&mut self, metadata: &AssetMetadata) -> AssetResult<bool> {
        let Some(slot) = self.slots.get(&metadata.handle).filter(|s| s.is_loaded()) else {
            return Ok(false);
        };
        let asset = self
            .serializers
            .load(&LoadContext::new(metadata, &self.root))?;
        let previous = slot.replace(asset);
        drop(previous);

        log::debug!(
            "LoadedAssetTable: reloaded '{}' ({})",
            metadata.path,
            metadata.handle
        );
        event::emit(self.events.as_ref(), AssetEvent::Reloaded(metadata.handle));
        Ok(true)
    }
}

impl AssetSignals for LoadedAssetTable {
    fn reload(&mut self, metadata: &AssetMetadata) -> bool {
        match self.reload_with(metadata) {
            Ok(reloaded) => reloaded,
            Err(e) => {
                log::error!(
                    "LoadedAssetTable: keeping the previous instance of '{}': {e}",
                    metadata.path
                );
                false
            }
        }
    }

    fn unload(&mut self, handle: AssetHandle) -> bool {
        self.force_unload(handle)
    }

    fn removed(&mut self, metadata: &AssetMetadata) {
        self.slots.remove(&metadata.handle);
        if let Err(e) = self.serializers.evict(metadata) {
            log::warn!(
                "LoadedAssetTable: could not evict derived data of '{}': {e}",
                metadata.path
            );
        }
    }
}
