// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-key recycling for virtualized nodes.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use understory_event_tree::Path;

/// Hands out small integer keys to visible paths, reusing keys freed by paths
/// that left the visible set.
///
/// Keys of paths that are no longer visible are released first and handed to
/// newly visible paths before any new key is minted, so the key space stays
/// close to the largest number of simultaneously visible nodes. Paths that stay
/// visible keep their key.
#[derive(Clone, Debug, Default)]
pub struct KeyRecycler {
    assigned: HashMap<Path, u32>,
    free: Vec<u32>,
    next: u32,
}

impl KeyRecycler {
    /// Creates an empty recycler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns keys for the new visible set and returns them in `visible`
    /// order.
    pub fn assign<'a>(&mut self, visible: impl IntoIterator<Item = &'a Path> + Clone) -> Vec<u32> {
        let still: HashSet<&Path> = visible.clone().into_iter().collect();
        let free = &mut self.free;
        self.assigned.retain(|path, key| {
            let keep = still.contains(path);
            if !keep {
                free.push(*key);
            }
            keep
        });
        visible
            .into_iter()
            .map(|path| {
                if let Some(&key) = self.assigned.get(path) {
                    return key;
                }
                let key = match self.free.pop() {
                    Some(key) => key,
                    None => {
                        let key = self.next;
                        self.next = self.next.wrapping_add(1);
                        key
                    }
                };
                self.assigned.insert(path.clone(), key);
                key
            })
            .collect()
    }

    /// Key currently held by `path`.
    #[must_use]
    pub fn key_of(&self, path: &Path) -> Option<u32> {
        self.assigned.get(path).copied()
    }

    /// Number of keys ever minted.
    #[must_use]
    pub fn minted(&self) -> u32 {
        self.next
    }

    /// Keys released and not yet handed out again.
    #[must_use]
    pub fn free_keys(&self) -> usize {
        self.free.len()
    }

    /// Forgets every assignment.
    pub fn clear(&mut self) {
        self.assigned.clear();
        self.free.clear();
        self.next = 0;
    }
}
