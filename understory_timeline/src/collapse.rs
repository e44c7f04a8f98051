// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collapsed-group tracking by path.

use hashbrown::HashSet;
use understory_event_tree::{FlatNode, NodeKind, Path};

/// The set of collapsed groups.
///
/// A group's whole subtree is hidden from layout when the group itself or any
/// strict ancestor is collapsed. The root (the document) cannot be collapsed.
///
/// Every mutation that changes membership bumps [`CollapseSet::revision`], so
/// layout caches can tell when they are stale.
///
/// ```
/// use understory_event_tree::Path;
/// use understory_timeline::CollapseSet;
///
/// let mut collapse = CollapseSet::new();
/// collapse.collapse(Path::from([0]));
/// collapse.collapse(Path::from([0, 2]));
///
/// let leaf = Path::from([0, 2, 1]);
/// assert!(collapse.is_collapsed_child(&leaf));
/// // The shallowest collapsed ancestor wins.
/// assert_eq!(collapse.collapsed_ancestor_of(&leaf), Some(Path::from([0])));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CollapseSet {
    collapsed: HashSet<Path>,
    revision: u64,
}

impl CollapseSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic counter bumped whenever membership changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Number of collapsed paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    /// Returns `true` if nothing is collapsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }

    /// Iterates collapsed paths in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> + '_ {
        self.collapsed.iter()
    }

    /// Collapses `path`. Returns `true` if the set changed.
    pub fn collapse(&mut self, path: Path) -> bool {
        self.set_collapsed(path, true)
    }

    /// Expands `path`. Returns `true` if the set changed.
    pub fn expand(&mut self, path: &Path) -> bool {
        let changed = self.collapsed.remove(path);
        if changed {
            self.bump_revision();
        }
        changed
    }

    /// Flips the collapsed state of `path`. Returns the new state.
    pub fn toggle(&mut self, path: Path) -> bool {
        let collapse = !self.is_collapsed(&path) && !path.is_root();
        self.set_collapsed(path, collapse);
        collapse
    }

    /// Sets the collapsed state of `path`. Returns `true` if the set changed.
    pub fn set_collapsed(&mut self, path: Path, collapsed: bool) -> bool {
        if !collapsed {
            return self.expand(&path);
        }
        if path.is_root() {
            return false;
        }
        let changed = self.collapsed.insert(path);
        if changed {
            self.bump_revision();
        }
        changed
    }

    /// Returns `true` if `path` itself is collapsed.
    #[must_use]
    pub fn is_collapsed(&self, path: &Path) -> bool {
        self.collapsed.contains(path)
    }

    fn is_collapsed_slice(&self, path: &[usize]) -> bool {
        self.collapsed.contains(path)
    }

    /// Returns `true` if some strict ancestor of `path` is collapsed.
    #[must_use]
    pub fn is_collapsed_child(&self, path: &Path) -> bool {
        !self.collapsed.is_empty() && path.ancestors().any(|a| self.is_collapsed_slice(a))
    }

    /// Shallowest collapsed strict ancestor of `path`, if any.
    ///
    /// Layout redirects hidden nodes to this ancestor's row.
    #[must_use]
    pub fn collapsed_ancestor_of(&self, path: &Path) -> Option<Path> {
        if self.collapsed.is_empty() {
            return None;
        }
        path.ancestors()
            .find(|a| self.is_collapsed_slice(a))
            .map(Path::from_slice)
    }

    /// Collapses every group in `nodes` except the root, in one revision.
    pub fn collapse_all(&mut self, nodes: &[FlatNode]) {
        let mut changed = false;
        for node in groups(nodes) {
            changed |= self.collapsed.insert(node.path.clone());
        }
        if changed {
            self.bump_revision();
        }
    }

    /// Expands every group in `nodes`, in one revision.
    pub fn expand_all(&mut self, nodes: &[FlatNode]) {
        let mut changed = false;
        for node in groups(nodes) {
            changed |= self.collapsed.remove(&node.path);
        }
        if changed {
            self.bump_revision();
        }
    }

    /// Replaces the set with the default state for a freshly loaded tree:
    /// exactly the groups whose default-expanded flag is off.
    pub fn reset_for(&mut self, nodes: &[FlatNode]) {
        self.collapsed.clear();
        for node in groups(nodes) {
            if !node.expanded {
                self.collapsed.insert(node.path.clone());
            }
        }
        self.bump_revision();
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        if !self.collapsed.is_empty() {
            self.collapsed.clear();
            self.bump_revision();
        }
    }
}

fn groups(nodes: &[FlatNode]) -> impl Iterator<Item = &FlatNode> + '_ {
    nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Group && !n.path.is_root())
}
