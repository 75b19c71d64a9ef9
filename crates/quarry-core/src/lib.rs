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


//! Foundational types and contracts for the Quarry asset catalog.
//!
//! This crate defines the "common language" shared by every other Quarry crate:
//! stable asset identities, the closed set of asset kinds, per-asset metadata,
//! the type-erased container for loaded instances, and the traits that connect
//! the catalog, the loaded-asset table and the serializer strategies.
//!
//! It has no knowledge of how assets are cataloged, stored or decoded. Those
//! concerns live in `quarry-io` and `quarry-data`.

#![warn(missing_docs)]

pub mod asset;
pub mod error;
pub mod event;
pub mod vfs;

pub use error::{AssetError, AssetResult};
