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
use std::fmt;
use uuid::Uuid;

/// A stable, opaque identifier for one logical asset.
///
/// Handles are 64-bit random values minted by the catalog when a file is first
/// discovered. They are decoupled from the asset's path, persisted in the registry
/// file, and never reused for another asset within a session. The value `0` is
/// reserved for [`AssetHandle::NONE`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetHandle(u64);

impl AssetHandle {
    /// The reserved "no asset" handle.
    pub const NONE: AssetHandle = AssetHandle(0);

    /// Generates a fresh random handle. Never returns [`AssetHandle::NONE`].
    pub fn generate() -> Self {
        loop {
            let (high, low) = Uuid::new_v4().as_u64_pair();
            let value = high ^ low;
            if value != 0 {
                return Self(value);
            }
        }
    }

    /// Wraps a raw value, e.g. one read back from the registry file.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` for the reserved [`AssetHandle::NONE`] value.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
