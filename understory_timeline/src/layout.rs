// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row assignment from predecessor and visible-descendant counts.

use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use understory_event_tree::{FlatNode, NodeKind, Path};

use crate::collapse::CollapseSet;
use crate::config::LayoutConfig;

/// Vertical placement of a node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Slot {
    /// Row index (the predecessor count of the node, or of its shallowest
    /// collapsed ancestor).
    pub row: usize,
    /// Pixel offset of the row's top edge.
    pub top: f64,
    /// Pixel height: one row plus one per visible descendant row.
    pub height: f64,
}

/// Predecessor and visible-descendant counts for every node of a tree.
///
/// - `children_count(p)` is `0` for leaves and collapsed groups, otherwise the
///   sum over children of `1 + children_count(child)`: the number of visible
///   rows below `p`.
/// - `predecessor_count(p)` is `0` for the root; for a first child it is
///   `1 + predecessor_count(parent)`; otherwise it is
///   `1 + predecessor_count(prev) + children_count(prev)` for the previous
///   sibling `prev`.
///
/// Both are computed in two linear passes over the pre-order list: a reverse
/// pass for children counts (children follow their parent) and a forward pass
/// for predecessor counts (parents and previous siblings precede a node). The
/// index is rebuilt from scratch whenever the tree or the collapse set changes.
#[derive(Clone, Debug, Default)]
pub struct LayoutIndex {
    index: HashMap<Path, usize>,
    predecessors: Vec<usize>,
    children: Vec<usize>,
    rows: usize,
}

impl LayoutIndex {
    /// Builds the index for a flattened tree under `collapse`.
    #[must_use]
    pub fn build(nodes: &[FlatNode], collapse: &CollapseSet) -> Self {
        let n = nodes.len();
        let mut children = vec![0_usize; n];
        let mut below = vec![0_usize; n];
        for i in (0..n).rev() {
            let node = &nodes[i];
            let hidden = node.kind == NodeKind::Event || collapse.is_collapsed(&node.path);
            children[i] = if hidden { 0 } else { below[i] };
            if let Some(parent) = node.parent {
                below[parent] += 1 + children[i];
            }
        }

        let mut predecessors = vec![0_usize; n];
        for (i, node) in nodes.iter().enumerate() {
            predecessors[i] = match (node.prev_sibling, node.parent) {
                (Some(prev), _) => 1 + predecessors[prev] + children[prev],
                (None, Some(parent)) => 1 + predecessors[parent],
                (None, None) => 0,
            };
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.path.clone(), i))
            .collect();
        // Entry 0 is the root; its visible descendants are the document's rows.
        let rows = children.first().copied().unwrap_or(0);
        Self {
            index,
            predecessors,
            children,
            rows,
        }
    }

    /// Number of indexed nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// Position of `path` in the flattened list.
    #[must_use]
    pub fn position(&self, path: &[usize]) -> Option<usize> {
        self.index.get(path).copied()
    }

    /// Rows above `path` in document order; `0` for unknown paths.
    #[must_use]
    pub fn predecessor_count(&self, path: &[usize]) -> usize {
        self.position(path).map_or(0, |i| self.predecessors[i])
    }

    /// Visible rows below `path`; `0` for unknown paths.
    #[must_use]
    pub fn children_count(&self, path: &[usize]) -> usize {
        self.position(path).map_or(0, |i| self.children[i])
    }

    /// Predecessor count by flattened position.
    #[must_use]
    pub fn predecessor_at(&self, position: usize) -> usize {
        self.predecessors.get(position).copied().unwrap_or(0)
    }

    /// Children count by flattened position.
    #[must_use]
    pub fn children_at(&self, position: usize) -> usize {
        self.children.get(position).copied().unwrap_or(0)
    }

    /// Number of visible rows below the root.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Height of the scrollable content.
    #[must_use]
    pub fn content_height(&self, config: &LayoutConfig) -> f64 {
        rows_to_px(self.rows, config.row_height) + config.bottom_padding
    }

    /// Slot of the node at flattened `position`, drawn at the row of
    /// `redirect` (a collapsed ancestor's position) when given.
    pub(crate) fn slot_at(
        &self,
        position: usize,
        redirect: Option<usize>,
        config: &LayoutConfig,
    ) -> Slot {
        let row = self.predecessor_at(redirect.unwrap_or(position));
        Slot {
            row,
            top: config.top_offset + rows_to_px(row, config.row_height),
            height: rows_to_px(1 + self.children_at(position), config.row_height),
        }
    }

    /// Slot of `path`; nodes hidden under a collapsed group sit on the row of
    /// the shallowest collapsed ancestor.
    ///
    /// Returns `None` for unknown paths.
    #[must_use]
    pub fn slot(&self, path: &Path, collapse: &CollapseSet, config: &LayoutConfig) -> Option<Slot> {
        let position = self.position(path.as_slice())?;
        let redirect = collapse
            .collapsed_ancestor_of(path)
            .and_then(|ancestor| self.position(ancestor.as_slice()));
        Some(self.slot_at(position, redirect, config))
    }
}

fn rows_to_px(rows: usize, row_height: f64) -> f64 {
    rows as f64 * row_height
}
