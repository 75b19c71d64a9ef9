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


//! I/O services for Quarry: everything that touches the asset root on disk.
//!
//! - [`catalog::AssetCatalog`]: discovers files, mints handles, reconciles with the
//!   persisted registry file and signals reloads/unloads.
//! - [`cache::DerivedArtifactCache`]: flat-file cache of expensive derived bitmaps
//!   keyed by `(handle, modified_at)`, and the [`cache::ThumbnailCache`] built on it.
//! - [`tree::DirectoryTree`]: the hierarchical projection used by browsers.
//! - [`serializers`]: the built-in load/save strategies.
//! - [`config::ProjectConfig`]: `Assets.toml` project settings.

#![warn(missing_docs)]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod serializers;
pub mod tree;

pub use cache::{Artifact, DerivedArtifactCache, ThumbnailCache};
pub use catalog::{AssetCatalog, RefetchReport};
pub use config::ProjectConfig;
pub use tree::{DirectoryNode, DirectoryTree, NodeId};
