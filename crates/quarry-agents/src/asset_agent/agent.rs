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


use std::{fs, path::Path};

use anyhow::{Context, Result};
use quarry_core::{
    asset::AssetHandle,
    event::{AssetEvent, EventBus},
};
use quarry_data::assets::{AssetSlot, LoadedAssetTable, SerializerRegistry};
use quarry_io::{
    Artifact, AssetCatalog, DirectoryTree, ProjectConfig, RefetchReport, ThumbnailCache,
};

/// Owns the catalog, the loaded-asset table, the browser tree and the
/// thumbnail cache of one project, and drives them together.
pub struct AssetAgent {
    config: ProjectConfig,
    events: EventBus<AssetEvent>,
    catalog: AssetCatalog,
    table: LoadedAssetTable,
    tree: DirectoryTree,
    thumbnails: ThumbnailCache,
}

impl AssetAgent {
    /// Opens the project described by `config`, loading with `serializers`.
    ///
    /// The asset root is created if it does not exist yet. The catalog is
    /// reconciled with the disk and the tree built before this returns.
    pub fn open(config: ProjectConfig, serializers: SerializerRegistry) -> Result<Self> {
        fs::create_dir_all(&config.asset_root).with_context(|| {
            format!(
                "Failed to create asset root '{}'",
                config.asset_root.display()
            )
        })?;

        let events = EventBus::new();
        let catalog = AssetCatalog::open_with_events(
            &config.asset_root,
            &config.registry_file,
            events.sender(),
        )
        .with_context(|| format!("Failed to open catalog at '{}'", config.asset_root.display()))?;
        let table = LoadedAssetTable::new(catalog.root(), serializers)
            .with_event_sender(events.sender());
        let tree = DirectoryTree::new(&catalog).context("Failed to build directory tree")?;
        let thumbnails = ThumbnailCache::open(config.thumbnail_cache_dir(), config.thumbnail_size)
            .context("Failed to open thumbnail cache")?;

        log::info!(
            "AssetAgent: opened '{}' ({} cataloged entries)",
            catalog.root().display(),
            catalog.len()
        );

        Ok(Self {
            config,
            events,
            catalog,
            table,
            tree,
            thumbnails,
        })
    }

    /// Opens the project in `dir`, reading its `Assets.toml` if present.
    pub fn open_project(dir: impl AsRef<Path>, serializers: SerializerRegistry) -> Result<Self> {
        let config = ProjectConfig::from_project_dir(dir.as_ref())
            .context("Failed to read project configuration")?;
        Self::open(config, serializers)
    }

    /// Reconciles the catalog with the disk, reloading or unloading affected
    /// instances, then rebuilds the tree and persists the registry.
    pub fn refetch(&mut self) -> Result<RefetchReport> {
        let report = self
            .catalog
            .refetch(&mut self.table)
            .context("Failed to rescan asset root")?;
        for metadata in &report.removed {
            self.thumbnails
                .store()
                .remove(metadata.handle)
                .context("Failed to evict thumbnail")?;
        }
        self.tree
            .rebuild(&self.catalog)
            .context("Failed to rebuild directory tree")?;
        self.catalog.persist().context("Failed to persist registry")?;
        Ok(report)
    }

    /// Returns the slot for `handle`, loading it on first use.
    pub fn load(&mut self, handle: AssetHandle) -> Result<AssetSlot> {
        self.table
            .get_or_load(&self.catalog, handle)
            .with_context(|| format!("Failed to load asset {handle}"))
    }

    /// Reloads `handle` from disk if it is loaded. Returns whether it was.
    pub fn force_reload(&mut self, handle: AssetHandle) -> Result<bool> {
        self.table
            .force_reload(&self.catalog, handle)
            .with_context(|| format!("Failed to reload asset {handle}"))
    }

    /// Empties the slot of `handle`. Never refuses.
    pub fn force_unload(&mut self, handle: AssetHandle) -> bool {
        self.table.force_unload(handle)
    }

    /// Writes the loaded instance of `handle` back to disk. Returns `false` if
    /// it is not loaded.
    pub fn save(&mut self, handle: AssetHandle) -> Result<bool> {
        self.table
            .save(&self.catalog, handle)
            .with_context(|| format!("Failed to save asset {handle}"))
    }

    /// The thumbnail of a texture, generated on first request. `None` for other
    /// asset types.
    pub fn thumbnail(&mut self, handle: AssetHandle) -> Result<Option<Artifact>> {
        let metadata = self.catalog.lookup(handle)?;
        self.thumbnails
            .get_or_create(metadata, self.catalog.root())
            .with_context(|| format!("Failed to build thumbnail for '{}'", metadata.path))
    }

    /// A receiver for the events of every subsystem.
    ///
    /// The channel has one queue: each event is delivered to exactly one
    /// receiver, so hosts should subscribe once or use
    /// [`AssetAgent::drain_events`].
    pub fn subscribe(&self) -> flume::Receiver<AssetEvent> {
        self.events.receiver().clone()
    }

    /// Takes every event published since the last drain.
    pub fn drain_events(&self) -> Vec<AssetEvent> {
        self.events.drain()
    }

    /// The resolved project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The catalog.
    pub fn catalog(&self) -> &AssetCatalog {
        &self.catalog
    }

    /// The loaded-asset table.
    pub fn table(&self) -> &LoadedAssetTable {
        &self.table
    }

    /// The browser tree, as of the last refetch.
    pub fn tree(&self) -> &DirectoryTree {
        &self.tree
    }

    /// Persists the registry and shuts the agent down, surfacing any write error
    /// that dropping would only log.
    pub fn close(self) -> Result<()> {
        self.catalog
            .persist()
            .context("Failed to persist registry on close")?;
        log::info!("AssetAgent: closed '{}'", self.catalog.root().display());
        Ok(())
    }
}
