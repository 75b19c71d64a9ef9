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


//! Filesystem enumeration for the asset root.
//!
//! [`FileSystemProbe`] is the only place the asset crates walk the disk. It skips
//! the reserved `build` and `cache` directories at any depth, yields paths
//! relative to the root in `/`-separated form, and reports modification times as
//! nanoseconds since the Unix epoch.

use crate::error::{AssetError, AssetResult};
use std::{
    ffi::OsStr,
    path::{Component, Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use walkdir::{DirEntry, WalkDir};

/// Directory names reserved for derived output. Never scanned, at any depth.
pub const RESERVED_DIRECTORIES: [&str; 2] = ["build", "cache"];

/// One filesystem entry found under the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeEntry {
    /// Path relative to the root, `/`-separated.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Modification time in nanoseconds since the Unix epoch.
    pub modified_at: u64,
}

impl ProbeEntry {
    /// The relative path of the containing directory, `""` for top-level entries.
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(parent, _)| parent)
    }
}

/// Directory enumeration and modification-time queries rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileSystemProbe {
    root: PathBuf,
}

impl FileSystemProbe {
    /// Creates a probe for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this probe enumerates.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Recursively enumerates the root.
    ///
    /// Entries come out depth-first with siblings sorted by file name, and every
    /// directory precedes its contents. `exclude` names one absolute file to leave
    /// out (the registry file). Any enumeration error aborts the whole scan.
    pub fn scan(&self, exclude: Option<&Path>) -> AssetResult<Vec<ProbeEntry>> {
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_reserved(entry));

        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&self.root, e))?;
            if exclude.is_some_and(|excluded| entry.path() == excluded) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| AssetError::format(entry.path(), e))?;
            let metadata = entry
                .metadata()
                .map_err(|e| walk_error(entry.path(), e))?;
            let modified = metadata
                .modified()
                .map_err(|e| AssetError::io(entry.path(), e))?;

            entries.push(ProbeEntry {
                path: to_posix(relative),
                is_dir: metadata.is_dir(),
                modified_at: to_nanos(modified),
            });
        }
        Ok(entries)
    }

    /// The modification time of the entry at `relative`.
    pub fn modified_time(&self, relative: &str) -> AssetResult<u64> {
        let path = self.resolve(relative);
        let modified = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .map_err(|e| AssetError::io(path, e))?;
        Ok(to_nanos(modified))
    }

    /// Returns `true` if something exists at `relative`.
    pub fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).exists()
    }

    /// Resolves a `/`-separated relative path against the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

/// Returns `true` if `name` is one of the [`RESERVED_DIRECTORIES`].
pub fn is_reserved_name(name: &OsStr) -> bool {
    RESERVED_DIRECTORIES.iter().any(|reserved| name == *reserved)
}

fn is_reserved(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && is_reserved_name(entry.file_name())
}

/// Renders a relative path with `/` separators regardless of platform.
pub fn to_posix(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Converts a timestamp to nanoseconds since the Unix epoch, clamping pre-epoch
/// times to zero.
pub fn to_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}

fn walk_error(fallback: &Path, error: walkdir::Error) -> AssetError {
    let path = error.path().unwrap_or(fallback).to_path_buf();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    AssetError::io(path, source)
}
