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


//! Observability hooks for the asset subsystems.
//!
//! The catalog and the loaded-asset table report what they did through
//! [`AssetEvent`]s sent over an [`EventBus`]. UI and log layers drain the bus on
//! their own schedule; no subsystem waits for a consumer.

mod bus;

pub use self::bus::EventBus;

use crate::asset::AssetHandle;

/// Something that happened to a cataloged asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetEvent {
    /// A rescan found a new file and minted a handle for it.
    Discovered(AssetHandle),
    /// A loaded instance was replaced in place after its source changed.
    Reloaded(AssetHandle),
    /// A loaded instance was destroyed; its slot is now empty.
    Unloaded(AssetHandle),
    /// The handle was deleted from the catalog because its file disappeared.
    Removed(AssetHandle),
}

impl AssetEvent {
    /// The handle the event is about.
    pub fn handle(&self) -> AssetHandle {
        match *self {
            AssetEvent::Discovered(handle)
            | AssetEvent::Reloaded(handle)
            | AssetEvent::Unloaded(handle)
            | AssetEvent::Removed(handle) => handle,
        }
    }
}

/// Sends `event` on an optional sender, ignoring a disconnected receiver.
pub fn emit(sender: Option<&flume::Sender<AssetEvent>>, event: AssetEvent) {
    if let Some(sender) = sender {
        if sender.send(event).is_err() {
            log::trace!("Dropping {event:?}: event receiver disconnected.");
        }
    }
}
