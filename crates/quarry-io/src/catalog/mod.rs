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


//! The authoritative catalog of assets under one asset root.

mod registry_file;

use quarry_core::{
    asset::{AssetHandle, AssetIndex, AssetMetadata, AssetSignals, AssetType},
    event::{self, AssetEvent},
    vfs::FileSystemProbe,
    AssetError, AssetResult,
};
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

/// What a [`AssetCatalog::refetch`] pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefetchReport {
    /// Handles minted for newly discovered entries, in scan order.
    pub added: Vec<AssetHandle>,
    /// Handles whose source changed on disk, in scan order.
    pub modified: Vec<AssetHandle>,
    /// Entries deleted because their path was not observed, in path order.
    pub removed: Vec<AssetMetadata>,
}

impl RefetchReport {
    /// Returns `true` if the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }
}

/// The single source of truth for which assets exist and when they last changed.
///
/// Entries are kept in handle order so persisted output and enumeration are
/// deterministic. A second index by path backs reconciliation: files are matched
/// against the previous snapshot by path, since a file seen for the first time
/// has no handle yet.
///
/// The catalog is driven from one thread. A rescan is a non-atomic
/// read-reconcile-write over both indices and must not race with other access.
///
/// Dropping the catalog persists it to the registry file.
pub struct AssetCatalog {
    probe: FileSystemProbe,
    registry_file: PathBuf,
    assets: BTreeMap<AssetHandle, AssetMetadata>,
    paths: HashMap<String, AssetHandle>,
    retired: HashSet<AssetHandle>,
    events: Option<flume::Sender<AssetEvent>>,
    opened: bool,
}

impl AssetCatalog {
    /// Opens the catalog for `root`, backed by `registry_file`.
    ///
    /// Creates the registry file if it is absent, loads its records (dropping
    /// any whose file no longer exists), then runs one [`refetch`] to merge in the
    /// current state of the disk.
    ///
    /// # Errors
    /// [`AssetError::Io`] if the root cannot be resolved or the registry file
    /// cannot be created, read or scanned; [`AssetError::Format`] if the registry
    /// file is malformed.
    ///
    /// [`refetch`]: AssetCatalog::refetch
    pub fn open(root: impl AsRef<Path>, registry_file: impl AsRef<Path>) -> AssetResult<Self> {
        Self::open_inner(root.as_ref(), registry_file.as_ref(), None)
    }

    /// Like [`AssetCatalog::open`], reporting discoveries and removals on `sender`
    /// from the initial scan onwards.
    pub fn open_with_events(
        root: impl AsRef<Path>,
        registry_file: impl AsRef<Path>,
        sender: flume::Sender<AssetEvent>,
    ) -> AssetResult<Self> {
        Self::open_inner(root.as_ref(), registry_file.as_ref(), Some(sender))
    }

    fn open_inner(
        root: &Path,
        registry_file: &Path,
        events: Option<flume::Sender<AssetEvent>>,
    ) -> AssetResult<Self> {
        let root = fs::canonicalize(root).map_err(|e| AssetError::io(root, e))?;

        if !registry_file.exists() {
            if let Some(parent) = registry_file.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| AssetError::io(parent, e))?;
            }
            fs::File::create(registry_file).map_err(|e| AssetError::io(registry_file, e))?;
            log::info!(
                "AssetCatalog: created registry file '{}'",
                registry_file.display()
            );
        }
        let registry_file =
            fs::canonicalize(registry_file).map_err(|e| AssetError::io(registry_file, e))?;

        let mut catalog = Self {
            probe: FileSystemProbe::new(root),
            registry_file,
            assets: BTreeMap::new(),
            paths: HashMap::new(),
            retired: HashSet::new(),
            events,
            opened: false,
        };
        catalog.load_registry()?;
        let report = catalog.refetch(&mut ())?;
        catalog.opened = true;

        log::info!(
            "AssetCatalog: opened '{}' with {} entries ({} new, {} removed)",
            catalog.root().display(),
            catalog.len(),
            report.added.len(),
            report.removed.len()
        );
        Ok(catalog)
    }

    fn load_registry(&mut self) -> AssetResult<()> {
        for record in registry_file::read(&self.registry_file)? {
            let usable = !record.handle.is_none()
                && !record.asset_type.is_directory()
                && !self.assets.contains_key(&record.handle)
                && !self.paths.contains_key(&record.path)
                && self.probe.exists(&record.path);
            if !usable {
                log::debug!(
                    "AssetCatalog: dropping registry record {} '{}'",
                    record.handle,
                    record.path
                );
                continue;
            }
            self.insert(record);
        }
        Ok(())
    }

    /// Reconciles the catalog with the asset root.
    ///
    /// Walks the root (skipping `build`/`cache` directories and the registry
    /// file). Known paths whose modification time changed get their timestamp
    /// updated and a reload signal; unknown paths get a fresh handle. Paths that
    /// were not observed receive an unload signal and are then deleted.
    ///
    /// The scan completes before anything is modified, so a scan error leaves the
    /// catalog exactly as it was.
    ///
    /// # Panics
    /// If `signals` refuses to release a handle whose file disappeared: the
    /// catalog and the loaded-asset table have drifted out of sync.
    pub fn refetch(&mut self, signals: &mut dyn AssetSignals) -> AssetResult<RefetchReport> {
        let scanned = self.probe.scan(Some(&self.registry_file))?;

        let mut unseen: BTreeMap<String, AssetHandle> = self
            .paths
            .iter()
            .map(|(path, handle)| (path.clone(), *handle))
            .collect();
        let mut report = RefetchReport::default();

        for entry in scanned {
            match unseen.remove(&entry.path) {
                Some(handle) => {
                    if let Some(metadata) = self.assets.get_mut(&handle) {
                        if metadata.asset_type.is_reloadable()
                            && metadata.modified_at != entry.modified_at
                        {
                            metadata.modified_at = entry.modified_at;
                            report.modified.push(handle);
                        }
                    }
                }
                None => {
                    let handle = self.mint_handle();
                    let asset_type = AssetType::infer(&entry.path, entry.is_dir);
                    log::debug!(
                        "AssetCatalog: discovered '{}' as {asset_type} ({handle})",
                        entry.path
                    );
                    self.insert(AssetMetadata::new(
                        handle,
                        entry.path,
                        asset_type,
                        entry.modified_at,
                    ));
                    event::emit(self.events.as_ref(), AssetEvent::Discovered(handle));
                    report.added.push(handle);
                }
            }
        }

        for handle in &report.modified {
            if let Some(metadata) = self.assets.get(handle) {
                log::debug!("AssetCatalog: '{}' changed on disk", metadata.path);
                signals.reload(metadata);
            }
        }

        for (path, handle) in unseen {
            if !signals.unload(handle) {
                panic!("{}", AssetError::ConsistencyViolation { handle });
            }
            if let Some(metadata) = self.remove(handle) {
                log::debug!("AssetCatalog: '{path}' disappeared ({handle})");
                signals.removed(&metadata);
                event::emit(self.events.as_ref(), AssetEvent::Removed(handle));
                report.removed.push(metadata);
            }
        }

        if !report.is_empty() {
            log::info!(
                "AssetCatalog: refetch added {}, modified {}, removed {}",
                report.added.len(),
                report.modified.len(),
                report.removed.len()
            );
        }
        Ok(report)
    }

    /// Writes every non-directory entry to the registry file, in handle order.
    pub fn persist(&self) -> AssetResult<()> {
        registry_file::write(
            &self.registry_file,
            self.assets
                .values()
                .filter(|metadata| !metadata.asset_type.is_directory()),
        )?;
        log::debug!(
            "AssetCatalog: persisted registry to '{}'",
            self.registry_file.display()
        );
        Ok(())
    }

    /// Returns the metadata for `handle`.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] if the handle is unknown. Check
    /// [`AssetCatalog::contains`] first.
    pub fn lookup(&self, handle: AssetHandle) -> AssetResult<&AssetMetadata> {
        self.assets.get(&handle).ok_or(AssetError::NotFound(handle))
    }

    /// Returns the metadata for `handle`, if cataloged.
    pub fn get(&self, handle: AssetHandle) -> Option<&AssetMetadata> {
        self.assets.get(&handle)
    }

    /// Returns `true` if `handle` is cataloged.
    pub fn contains(&self, handle: AssetHandle) -> bool {
        self.assets.contains_key(&handle)
    }

    /// The handle cataloged for a root-relative, `/`-separated path.
    pub fn handle_for_path(&self, path: &str) -> Option<AssetHandle> {
        self.paths.get(path).copied()
    }

    /// Every entry, directories included, in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetMetadata> {
        self.assets.values()
    }

    /// Number of entries, directories included.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if nothing is cataloged.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// The canonical asset root.
    pub fn root(&self) -> &Path {
        self.probe.root()
    }

    /// The canonical registry file path.
    pub fn registry_file(&self) -> &Path {
        &self.registry_file
    }

    /// The probe used to scan the root.
    pub fn probe(&self) -> &FileSystemProbe {
        &self.probe
    }

    fn mint_handle(&self) -> AssetHandle {
        loop {
            let handle = AssetHandle::generate();
            if !self.assets.contains_key(&handle) && !self.retired.contains(&handle) {
                return handle;
            }
        }
    }

    fn insert(&mut self, metadata: AssetMetadata) {
        self.paths.insert(metadata.path.clone(), metadata.handle);
        self.assets.insert(metadata.handle, metadata);
    }

    fn remove(&mut self, handle: AssetHandle) -> Option<AssetMetadata> {
        let metadata = self.assets.remove(&handle)?;
        self.paths.remove(&metadata.path);
        self.retired.insert(handle);
        Some(metadata)
    }
}

impl AssetIndex for AssetCatalog {
    fn lookup(&self, handle: AssetHandle) -> Option<&AssetMetadata> {
        self.assets.get(&handle)
    }
}

impl Drop for AssetCatalog {
    fn drop(&mut self) {
        // A catalog that failed to open never overwrites the registry it could not read.
        if !self.opened {
            return;
        }
        if let Err(e) = self.persist() {
            log::error!("AssetCatalog: failed to persist on close: {e}");
        }
    }
}

impl std::fmt::Debug for AssetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCatalog")
            .field("root", &self.root())
            .field("registry_file", &self.registry_file)
            .field("entries", &self.assets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    const REGISTRY: &str = "AssetRegistry.yaml";

    #[derive(Default)]
    struct RecordingSignals {
        calls: Vec<String>,
        refuse_unload: bool,
    }

    impl AssetSignals for RecordingSignals {
        fn reload(&mut self, metadata: &AssetMetadata) -> bool {
            self.calls
                .push(format!("reload {} {}", metadata.handle, metadata.modified_at));
            true
        }

        fn unload(&mut self, handle: AssetHandle) -> bool {
            self.calls.push(format!("unload {handle}"));
            !self.refuse_unload
        }

        fn removed(&mut self, metadata: &AssetMetadata) {
            self.calls.push(format!("removed {}", metadata.handle));
        }
    }

    fn write(root: &Path, relative: &str, contents: &[u8]) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn set_mtime(root: &Path, relative: &str, secs: u64) {
        let file = fs::File::options()
            .write(true)
            .open(root.join(relative))
            .unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn open(root: &Path) -> AssetCatalog {
        AssetCatalog::open(root, root.join(REGISTRY)).unwrap()
    }

    fn snapshot(catalog: &AssetCatalog) -> Vec<AssetMetadata> {
        catalog.iter().cloned().collect()
    }

    #[test]
    fn open_creates_missing_registry_file() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = open(dir.path());
        assert!(catalog.is_empty());
        assert!(dir.path().join(REGISTRY).exists());
    }

    #[test]
    fn open_fails_when_registry_cannot_be_created() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blocker", b"not a directory");
        let result = AssetCatalog::open(dir.path(), dir.path().join("blocker/AssetRegistry.yaml"));
        assert!(matches!(result, Err(AssetError::Io { .. })));
    }

    #[test]
    fn new_file_is_discovered_as_texture() {
        let dir = tempfile::tempdir().unwrap();
        let mut catalog = open(dir.path());

        write(dir.path(), "foo.png", b"png");
        let report = catalog.refetch(&mut ()).unwrap();

        assert_eq!(report.added.len(), 1);
        assert_eq!(catalog.len(), 1);
        let metadata = catalog.lookup(report.added[0]).unwrap();
        assert!(!metadata.handle.is_none());
        assert_eq!(metadata.asset_type, AssetType::Texture);
        assert_eq!(metadata.path, "foo.png");
        assert_eq!(catalog.handle_for_path("foo.png"), Some(metadata.handle));
    }

    #[test]
    fn directories_are_cataloged_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "textures/ui/button.png", b"png");
        let catalog = open(dir.path());

        let textures = catalog.handle_for_path("textures").unwrap();
        assert_eq!(catalog.lookup(textures).unwrap().asset_type, AssetType::Directory);
        assert!(catalog.handle_for_path("textures/ui").is_some());
        assert!(catalog.handle_for_path("textures/ui/button.png").is_some());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn second_refetch_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.lua", b"a");
        write(dir.path(), "levels/one.scene", b"scene");
        let mut catalog = open(dir.path());
        let before = snapshot(&catalog);

        let mut signals = RecordingSignals::default();
        let report = catalog.refetch(&mut signals).unwrap();
        assert!(report.is_empty());
        assert!(signals.calls.is_empty());
        assert_eq!(snapshot(&catalog), before);
    }

    #[test]
    fn modification_updates_timestamp_and_signals_reload() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.lua", b"a");
        set_mtime(dir.path(), "a.lua", 1_000);
        let mut catalog = open(dir.path());
        let handle = catalog.handle_for_path("a.lua").unwrap();

        set_mtime(dir.path(), "a.lua", 2_000);
        let mut signals = RecordingSignals::default();
        let report = catalog.refetch(&mut signals).unwrap();

        let expected = 2_000 * 1_000_000_000;
        assert_eq!(report.modified, vec![handle]);
        assert_eq!(catalog.lookup(handle).unwrap().modified_at, expected);
        assert_eq!(signals.calls, vec![format!("reload {handle} {expected}")]);
    }

    #[test]
    fn deletion_signals_unload_before_removal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.png", b"png");
        let mut catalog = open(dir.path());
        let handle = catalog.handle_for_path("foo.png").unwrap();

        fs::remove_file(dir.path().join("foo.png")).unwrap();
        let mut signals = RecordingSignals::default();
        let report = catalog.refetch(&mut signals).unwrap();

        assert_eq!(
            signals.calls,
            vec![format!("unload {handle}"), format!("removed {handle}")]
        );
        assert_eq!(report.removed.len(), 1);
        assert!(!catalog.contains(handle));
        assert!(matches!(catalog.lookup(handle), Err(AssetError::NotFound(_))));
        assert_eq!(catalog.handle_for_path("foo.png"), None);
    }

    #[test]
    #[should_panic(expected = "still held")]
    fn refused_unload_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.png", b"png");
        let mut catalog = open(dir.path());

        fs::remove_file(dir.path().join("foo.png")).unwrap();
        let mut signals = RecordingSignals {
            refuse_unload: true,
            ..Default::default()
        };
        let _ = catalog.refetch(&mut signals);
    }

    #[test]
    fn reserved_directories_are_never_cataloged() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cache/fonts/1_2.cache", b"x");
        write(dir.path(), "build/game.pak", b"x");
        write(dir.path(), "deep/nested/cache/thumb.png", b"x");
        write(dir.path(), "deep/build/out.png", b"x");
        let catalog = open(dir.path());

        assert!(catalog
            .iter()
            .all(|m| !m.path.split('/').any(|part| part == "cache" || part == "build")));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn registry_file_is_not_cataloged() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = open(dir.path());
        assert_eq!(catalog.handle_for_path(REGISTRY), None);
    }

    #[test]
    fn persist_and_reopen_round_trips_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.png", b"png");
        write(dir.path(), "scripts/main.lua", b"print()");
        write(dir.path(), "audio/theme.ogg", b"ogg");

        let files = |catalog: &AssetCatalog| -> Vec<AssetMetadata> {
            catalog
                .iter()
                .filter(|m| !m.asset_type.is_directory())
                .cloned()
                .collect()
        };

        let before = {
            let catalog = open(dir.path());
            catalog.persist().unwrap();
            files(&catalog)
        };
        let reopened = open(dir.path());

        assert_eq!(files(&reopened), before);
        let text = fs::read_to_string(dir.path().join(REGISTRY)).unwrap();
        assert!(!text.contains("Directory"));
    }

    #[test]
    fn stale_registry_records_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "keep.lua", b"k");
        fs::write(
            dir.path().join(REGISTRY),
            "Assets:\n\
             - Handle: 11\n  Path: keep.lua\n  Type: Script\n  ModificationTime: 1\n\
             - Handle: 12\n  Path: gone.lua\n  Type: Script\n  ModificationTime: 1\n",
        )
        .unwrap();

        let catalog = open(dir.path());
        assert_eq!(catalog.handle_for_path("keep.lua"), Some(AssetHandle::from_raw(11)));
        assert!(!catalog.contains(AssetHandle::from_raw(12)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn malformed_registry_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(REGISTRY), "Assets: [oops").unwrap();
        let result = AssetCatalog::open(dir.path(), dir.path().join(REGISTRY));
        assert!(matches!(result, Err(AssetError::Format { .. })));
    }

    #[test]
    fn failed_open_leaves_registry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.lua", b"print()");
        let original = "Assets:\n\
                        - Handle: 11\n  Path: main.lua\n  Type: Scrpt\n  ModificationTime: 1\n";
        fs::write(dir.path().join(REGISTRY), original).unwrap();

        let result = AssetCatalog::open(dir.path(), dir.path().join(REGISTRY));
        assert!(matches!(result, Err(AssetError::Format { .. })));
        drop(result);

        let after = fs::read_to_string(dir.path().join(REGISTRY)).unwrap();
        assert_eq!(after, original);
    }

    #[cfg(unix)]
    #[test]
    fn failed_initial_scan_leaves_registry_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.lua", b"print()");
        let original = "Assets:\n\
                        - Handle: 11\n  Path: main.lua\n  Type: Script\n  ModificationTime: 1\n";
        fs::write(dir.path().join(REGISTRY), original).unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Permissions are not enforced for this user (e.g. root).
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = AssetCatalog::open(dir.path(), dir.path().join(REGISTRY));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(matches!(result, Err(AssetError::Io { .. })));
        drop(result);

        let after = fs::read_to_string(dir.path().join(REGISTRY)).unwrap();
        assert_eq!(after, original);
    }

    #[test]
    fn failed_scan_leaves_catalog_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("assets");
        write(&root, "foo.png", b"png");
        let mut catalog =
            AssetCatalog::open(&root, dir.path().join(REGISTRY)).unwrap();
        let before = snapshot(&catalog);

        fs::remove_dir_all(&root).unwrap();
        assert!(matches!(catalog.refetch(&mut ()), Err(AssetError::Io { .. })));
        assert_eq!(snapshot(&catalog), before);
    }

    #[test]
    fn drop_persists_registry() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.png", b"png");
        let handle = {
            let catalog = open(dir.path());
            catalog.handle_for_path("foo.png").unwrap()
        };
        let text = fs::read_to_string(dir.path().join(REGISTRY)).unwrap();
        assert!(text.contains(&format!("Handle: {handle}")));
    }

    #[test]
    fn discoveries_and_removals_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "foo.png", b"png");
        let (sender, receiver) = flume::unbounded();
        let mut catalog =
            AssetCatalog::open_with_events(dir.path(), dir.path().join(REGISTRY), sender)
                .unwrap();
        let handle = catalog.handle_for_path("foo.png").unwrap();

        fs::remove_file(dir.path().join("foo.png")).unwrap();
        catalog.refetch(&mut ()).unwrap();

        let events: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            events,
            vec![AssetEvent::Discovered(handle), AssetEvent::Removed(handle)]
        );
    }
}
