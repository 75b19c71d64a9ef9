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


use super::{AssetHandle, AssetMetadata};

/// Read access to the catalog's handle → metadata mapping.
///
/// The loaded-asset table only needs this view of the catalog, which keeps the
/// storage crate independent of how the catalog scans and persists.
pub trait AssetIndex {
    /// Returns the metadata for `handle`, if cataloged.
    fn lookup(&self, handle: AssetHandle) -> Option<&AssetMetadata>;

    /// Returns `true` if `handle` is cataloged.
    fn contains(&self, handle: AssetHandle) -> bool {
        self.lookup(handle).is_some()
    }
}

/// Receiver of the signals the catalog emits while reconciling with the disk.
///
/// The loaded-asset table implements this trait; the catalog drives it
/// synchronously from inside a rescan.
pub trait AssetSignals {
    /// The source of `metadata` changed on disk. `metadata` already carries the new
    /// modification time. Returns `true` if an instance was reloaded.
    fn reload(&mut self, metadata: &AssetMetadata) -> bool;

    /// The file behind `handle` disappeared. The receiver must release any loaded
    /// instance and return `true`; `false` means it refuses, which the catalog
    /// treats as a fatal inconsistency.
    fn unload(&mut self, handle: AssetHandle) -> bool;

    /// The entry described by `metadata` has been deleted from the catalog.
    fn removed(&mut self, metadata: &AssetMetadata) {
        let _ = metadata;
    }
}

/// No receiver: nothing is loaded, so there is nothing to reload and every
/// release trivially succeeds. Used while a catalog is being opened.
impl AssetSignals for () {
    fn reload(&mut self, _metadata: &AssetMetadata) -> bool {
        false
    }

    fn unload(&mut self, _handle: AssetHandle) -> bool {
        true
    }
}
