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


//! Hierarchical projection of the catalog for browsing.

use crate::catalog::AssetCatalog;
use quarry_core::{
    asset::{AssetHandle, AssetType},
    AssetResult,
};
use std::collections::HashMap;

/// Index of a node inside a [`DirectoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The synthetic root of every tree.
    pub const ROOT: NodeId = NodeId(0);
}

/// One folder or file in the tree.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// File or folder name; empty for the root.
    pub name: String,
    /// Root-relative `/`-separated path; empty for the root.
    pub path: String,
    /// The catalog handle. `None` only for the root, which is not an asset.
    pub handle: Option<AssetHandle>,
    /// The cataloged type. The root is a [`AssetType::Directory`].
    pub asset_type: AssetType,
    /// The cataloged modification time in nanoseconds since the Unix epoch; `0`
    /// for the root.
    pub modified_at: u64,
    /// The containing folder, `None` for the root.
    pub parent: Option<NodeId>,
    /// Direct children, folders and files, in name order.
    pub children: Vec<NodeId>,
}

/// Folder tree over the asset root, rebuilt from disk on demand.
///
/// Nodes live in a flat arena and refer to each other by [`NodeId`]; ids are only
/// meaningful until the next [`DirectoryTree::rebuild`].
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
}

impl Default for DirectoryTree {
    fn default() -> Self {
        Self {
            nodes: vec![DirectoryNode {
                name: String::new(),
                path: String::new(),
                handle: None,
                asset_type: AssetType::Directory,
                modified_at: 0,
                parent: None,
                children: Vec::new(),
            }],
        }
    }
}

impl DirectoryTree {
    /// Builds the tree for `catalog`'s root.
    pub fn new(catalog: &AssetCatalog) -> AssetResult<Self> {
        let mut tree = Self::default();
        tree.rebuild(catalog)?;
        Ok(tree)
    }

    /// Discards the current tree and walks the asset root again.
    ///
    /// The walk skips exactly what the catalog skips, so every entry must already
    /// be cataloged. On error the previous tree is kept.
    ///
    /// # Panics
    /// If an entry has no catalog handle: the catalog was not refetched after the
    /// disk changed.
    pub fn rebuild(&mut self, catalog: &AssetCatalog) -> AssetResult<()> {
        let entries = catalog.probe().scan(Some(catalog.registry_file()))?;

        let mut tree = Self::default();
        let mut folders: HashMap<String, NodeId> = HashMap::new();
        folders.insert(String::new(), NodeId::ROOT);

        for entry in entries {
            let Some(handle) = catalog.handle_for_path(&entry.path) else {
                panic!(
                    "DirectoryTree: '{}' is on disk but not in the catalog; refetch before rebuilding",
                    entry.path
                );
            };
            let parent = folders.get(entry.parent()).copied().unwrap_or(NodeId::ROOT);
            let (asset_type, modified_at) = catalog.get(handle).map_or_else(
                || (AssetType::infer(&entry.path, entry.is_dir), entry.modified_at),
                |m| (m.asset_type, m.modified_at),
            );
            let name = entry
                .path
                .rsplit_once('/')
                .map_or(entry.path.as_str(), |(_, name)| name)
                .to_owned();

            let id = NodeId(tree.nodes.len());
            tree.nodes.push(DirectoryNode {
                name,
                path: entry.path.clone(),
                handle: Some(handle),
                asset_type,
                modified_at,
                parent: Some(parent),
                children: Vec::new(),
            });
            tree.nodes[parent.0].children.push(id);
            if entry.is_dir {
                folders.insert(entry.path, id);
            }
        }

        log::debug!("DirectoryTree: rebuilt with {} nodes", tree.nodes.len());
        *self = tree;
        Ok(())
    }

    /// The synthetic root node.
    pub fn root(&self) -> &DirectoryNode {
        &self.nodes[NodeId::ROOT.0]
    }

    /// The node for `id`, if it belongs to this tree.
    pub fn node(&self, id: NodeId) -> Option<&DirectoryNode> {
        self.nodes.get(id.0)
    }

    /// The direct children of `id`.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Depth-first search below (and including) `from` for the node at `path`.
    pub fn find_by_path(&self, from: NodeId, path: &str) -> Option<NodeId> {
        self.depth_first(from).find(|id| self.nodes[id.0].path == path)
    }

    /// The node carrying `handle`, if any.
    pub fn find_by_handle(&self, handle: AssetHandle) -> Option<NodeId> {
        self.depth_first(NodeId::ROOT)
            .find(|id| self.nodes[id.0].handle == Some(handle))
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Node ids below (and including) `from`, parents before children.
    pub fn depth_first(&self, from: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack: Vec<NodeId> = if self.node(from).is_some() {
            vec![from]
        } else {
            Vec::new()
        };
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
            Some(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::Path};

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn project() -> (tempfile::TempDir, AssetCatalog) {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "textures/ui/button.png");
        touch(dir.path(), "textures/hero.png");
        touch(dir.path(), "scripts/main.lua");
        touch(dir.path(), "cache/thumbnails/1_1.cache");
        let catalog =
            AssetCatalog::open(dir.path(), dir.path().join("AssetRegistry.yaml")).unwrap();
        (dir, catalog)
    }

    #[test]
    fn rebuild_mirrors_the_folder_structure() {
        let (_dir, catalog) = project();
        let tree = DirectoryTree::new(&catalog).unwrap();

        let names: Vec<&str> = tree
            .children(NodeId::ROOT)
            .iter()
            .map(|id| tree.node(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["scripts", "textures"]);
        assert_eq!(tree.len(), 1 + 6);
        assert!(tree.root().handle.is_none());
        assert_eq!(tree.root().asset_type, AssetType::Directory);
    }

    #[test]
    fn nodes_carry_catalog_handles() {
        let (_dir, catalog) = project();
        let tree = DirectoryTree::new(&catalog).unwrap();

        let button = tree
            .find_by_path(NodeId::ROOT, "textures/ui/button.png")
            .unwrap();
        let node = tree.node(button).unwrap();
        assert_eq!(node.handle, catalog.handle_for_path("textures/ui/button.png"));
        assert_eq!(node.asset_type, AssetType::Texture);
        let cataloged = catalog.get(node.handle.unwrap()).unwrap();
        assert_eq!(node.modified_at, cataloged.modified_at);
        assert_ne!(node.modified_at, 0);
        assert_eq!(tree.find_by_handle(node.handle.unwrap()), Some(button));
    }

    #[test]
    fn find_by_path_searches_below_the_start_node() {
        let (_dir, catalog) = project();
        let tree = DirectoryTree::new(&catalog).unwrap();
        let scripts = tree.find_by_path(NodeId::ROOT, "scripts").unwrap();

        assert!(tree.find_by_path(scripts, "scripts/main.lua").is_some());
        assert!(tree.find_by_path(scripts, "textures/hero.png").is_none());
        assert!(tree.find_by_path(NodeId::ROOT, "cache").is_none());
    }

    #[test]
    fn ancestry_follows_parent_links() {
        let (_dir, catalog) = project();
        let tree = DirectoryTree::new(&catalog).unwrap();
        let textures = tree.find_by_path(NodeId::ROOT, "textures").unwrap();
        let button = tree
            .find_by_path(NodeId::ROOT, "textures/ui/button.png")
            .unwrap();
        let scripts = tree.find_by_path(NodeId::ROOT, "scripts").unwrap();

        assert!(tree.is_ancestor_of(NodeId::ROOT, button));
        assert!(tree.is_ancestor_of(textures, button));
        assert!(!tree.is_ancestor_of(scripts, button));
        assert!(!tree.is_ancestor_of(button, textures));
        assert!(!tree.is_ancestor_of(button, button));
    }

    #[test]
    #[should_panic(expected = "not in the catalog")]
    fn uncataloged_entry_is_fatal() {
        let (dir, catalog) = project();
        touch(dir.path(), "late.lua");
        let _ = DirectoryTree::new(&catalog);
    }
}
