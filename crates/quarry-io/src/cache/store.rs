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


use super::Artifact;
use quarry_core::{asset::AssetHandle, AssetError, AssetResult};
use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

const EXTENSION: &str = ".cache";

/// On-disk cache of derived artifacts keyed by `(handle, modified_at)`.
///
/// At most one file per handle exists at a time. The directory is indexed once on
/// open, and the index is kept in step with every write and delete, so lookups
/// never rescan the directory. Only one writer per directory is supported.
#[derive(Debug)]
pub struct DerivedArtifactCache {
    dir: PathBuf,
    index: HashMap<AssetHandle, (u64, PathBuf)>,
}

impl DerivedArtifactCache {
    /// Opens (creating if needed) the cache directory `dir` and indexes it.
    ///
    /// Files whose names do not follow `<handle>_<modified_at>.cache` are ignored.
    /// If several files exist for one handle, the newest timestamp wins and the
    /// rest are deleted.
    pub fn open(dir: impl Into<PathBuf>) -> AssetResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| AssetError::io(&dir, e))?;

        let mut index: HashMap<AssetHandle, (u64, PathBuf)> = HashMap::new();
        let mut stale = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| AssetError::io(&dir, e))? {
            let entry = entry.map_err(|e| AssetError::io(&dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some((handle, modified_at)) = entry.file_name().to_str().and_then(parse_name)
            else {
                continue;
            };
            match index.get(&handle) {
                Some((existing, _)) if *existing >= modified_at => stale.push(path),
                _ => {
                    if let Some((_, replaced)) = index.insert(handle, (modified_at, path)) {
                        stale.push(replaced);
                    }
                }
            }
        }
        for path in stale {
            log::debug!("DerivedArtifactCache: pruning duplicate '{}'", path.display());
            delete(&path)?;
        }

        log::debug!(
            "DerivedArtifactCache: indexed {} entries in '{}'",
            index.len(),
            dir.display()
        );
        Ok(Self { dir, index })
    }

    /// The cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the artifact cached for `handle` at `modified_at`.
    ///
    /// A cached file with any other timestamp is stale: it is deleted and `None`
    /// is returned so the caller regenerates. A file that no longer decodes is
    /// treated the same way.
    pub fn try_get(
        &mut self,
        handle: AssetHandle,
        modified_at: u64,
    ) -> AssetResult<Option<Artifact>> {
        let Some((cached_at, path)) = self.index.get(&handle) else {
            return Ok(None);
        };
        if *cached_at != modified_at {
            log::debug!(
                "DerivedArtifactCache: evicting stale entry for {handle} ({cached_at} != {modified_at})"
            );
            self.remove(handle)?;
            return Ok(None);
        }

        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.index.remove(&handle);
                return Ok(None);
            }
            Err(e) => return Err(AssetError::io(path, e)),
        };
        match Artifact::from_bytes(path, &bytes) {
            Ok(artifact) => Ok(Some(artifact)),
            Err(e) => {
                log::warn!("DerivedArtifactCache: discarding unreadable entry: {e}");
                self.remove(handle)?;
                Ok(None)
            }
        }
    }

    /// Stores `artifact` for `handle` at `modified_at`, replacing whatever was
    /// cached for that handle before.
    pub fn put(
        &mut self,
        handle: AssetHandle,
        modified_at: u64,
        artifact: &Artifact,
    ) -> AssetResult<()> {
        let path = self.dir.join(file_name(handle, modified_at));
        if let Some((_, previous)) = self.index.remove(&handle) {
            if previous != path {
                delete(&previous)?;
            }
        }
        fs::write(&path, artifact.to_bytes()).map_err(|e| AssetError::io(&path, e))?;
        self.index.insert(handle, (modified_at, path));
        Ok(())
    }

    /// Deletes the entry for `handle`. Returns `true` if one existed.
    pub fn remove(&mut self, handle: AssetHandle) -> AssetResult<bool> {
        match self.index.remove(&handle) {
            Some((_, path)) => {
                delete(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Deletes every entry.
    pub fn clear(&mut self) -> AssetResult<()> {
        for (_, (_, path)) in self.index.drain() {
            delete(&path)?;
        }
        Ok(())
    }
}

fn file_name(handle: AssetHandle, modified_at: u64) -> String {
    format!("{handle}_{modified_at}{EXTENSION}")
}

fn parse_name(name: &str) -> Option<(AssetHandle, u64)> {
    let (handle, rest) = name.split_once('_')?;
    let modified_at = rest.strip_suffix(EXTENSION)?;
    Some((
        AssetHandle::from_raw(handle.parse().ok()?),
        modified_at.parse().ok()?,
    ))
}

fn delete(path: &Path) -> AssetResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssetError::io(path, e)),
    }
}
