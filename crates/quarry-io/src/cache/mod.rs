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


//! Flat-file caches for expensive derived artifacts.
//!
//! Each artifact family (font atlases, thumbnails) lives in its own directory
//! under the reserved `cache` folder of the asset root. Files are named
//! `<handle>_<modified_at>.cache`, so an entry is only valid while the source it
//! was derived from keeps the same modification time.

mod artifact;
mod store;
mod thumbnail;

pub use self::artifact::Artifact;
pub use self::store::DerivedArtifactCache;
pub use self::thumbnail::ThumbnailCache;
