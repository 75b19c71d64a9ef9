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


//! The asset agent: one object owning the whole asset pipeline of a project.
//!
//! The agent keeps the [`AssetCatalog`](quarry_io::AssetCatalog), the
//! [`LoadedAssetTable`](quarry_data::assets::LoadedAssetTable), the
//! [`DirectoryTree`](quarry_io::DirectoryTree) and the thumbnail cache in step.
//! A host calls [`AssetAgent::refetch`] whenever the disk may have changed (on
//! focus regain, or from a menu) and [`AssetAgent::load`] whenever it needs an
//! instance. Everything runs synchronously on the calling thread.

mod agent;

pub use self::agent::AssetAgent;
