// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event tree nodes and the immutable tree snapshot.

use alloc::string::String;
use alloc::vec::Vec;

use understory_timescale::DateRange;

use crate::path::Path;
use crate::recurrence::Recurrence;

/// Preferred day/month ordering when a collaborator prints a date back into
/// the source text.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `MM/DD/YYYY`.
    #[default]
    MonthFirst,
    /// `DD/MM/YYYY`.
    DayFirst,
}

/// Free-form per-event data carried through from the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventMeta {
    /// Display text of the event.
    pub text: String,
    /// Tags in source order.
    pub tags: Vec<String>,
    /// Completion percentage, `0..=100`.
    pub completion: Option<u8>,
    /// Date format the event was written in, if recognizable.
    pub date_format: Option<DateFormat>,
}

/// A leaf: a dated, optionally recurring event.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Span of the (first) occurrence.
    pub range: DateRange,
    /// Repetition rule, if any.
    pub recurrence: Option<Recurrence>,
    /// Parser-provided metadata.
    pub meta: EventMeta,
}

impl Event {
    /// Creates an event with no recurrence and empty metadata.
    #[must_use]
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            recurrence: None,
            meta: EventMeta::default(),
        }
    }

    /// Sets the recurrence rule.
    #[must_use]
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = Some(recurrence);
        self
    }

    /// Sets the display text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.meta.text = text.into();
        self
    }

    /// Sets the completion percentage, clamped to `100`.
    #[must_use]
    pub fn with_completion(mut self, completion: u8) -> Self {
        self.meta.completion = Some(completion.min(100));
        self
    }
}

/// An ordered collection of child nodes under a title.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Section title.
    pub title: String,
    /// Children in document order.
    pub children: Vec<Node>,
    /// Whether the group starts expanded when a tree is loaded.
    pub expanded: bool,
}

impl Group {
    /// Creates an expanded group.
    #[must_use]
    pub fn new(title: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            title: title.into(),
            children,
            expanded: true,
        }
    }

    /// Sets the default-expanded flag.
    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }
}

/// A node of the event tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A dated leaf.
    Event(Event),
    /// A container of further nodes.
    Group(Group),
}

impl Node {
    /// Returns the node's kind without its payload.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Event(_) => NodeKind::Event,
            Self::Group(_) => NodeKind::Group,
        }
    }

    /// Children of a group; leaves have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Event(_) => &[],
            Self::Group(group) => &group.children,
        }
    }

    /// Returns the event payload of a leaf.
    #[must_use]
    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(event) => Some(event),
            Self::Group(_) => None,
        }
    }

    /// Returns the group payload of a container.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Event(_) => None,
            Self::Group(group) => Some(group),
        }
    }
}

impl From<Event> for Node {
    fn from(event: Event) -> Self {
        Self::Event(event)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

/// Payload-free discriminant of a [`Node`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A leaf.
    Event,
    /// A container.
    Group,
}

/// One entry of a flattened tree.
///
/// Indices refer to positions in the same flattened list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatNode {
    /// Address of the node.
    pub path: Path,
    /// Kind of the node.
    pub kind: NodeKind,
    /// Default-expanded flag for groups; always `true` for leaves.
    pub expanded: bool,
    /// Index of the parent entry, `None` for the root.
    pub parent: Option<usize>,
    /// Index of the previous sibling entry, if any.
    pub prev_sibling: Option<usize>,
}

/// An immutable event tree snapshot.
///
/// The root is always a group (the document) at the empty path. The tree is
/// produced once per parse and never mutated; derived state lives beside it
/// keyed by [`Path`].
#[derive(Clone, Debug, PartialEq)]
pub struct EventTree {
    root: Node,
}

impl Default for EventTree {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EventTree {
    /// Creates a tree whose root group holds `children`.
    #[must_use]
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::Group(Group::new(String::new(), children)),
        }
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Looks up the node at `path`.
    ///
    /// Returns `None` if any index runs past its parent's children.
    #[must_use]
    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        let mut node = &self.root;
        for &index in path {
            node = node.children().get(index)?;
        }
        Some(node)
    }

    /// Returns `true` if `path` addresses an existing node.
    #[must_use]
    pub fn contains(&self, path: &[usize]) -> bool {
        self.get(path).is_some()
    }

    /// Pre-order (document order) traversal including the root.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: alloc::vec![(Path::root(), &self.root)],
        }
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` if the root has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Flattens the tree in pre-order with parent and previous-sibling links.
    ///
    /// Entry `0` is always the root.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatNode> {
        let mut out = Vec::new();
        let mut stack: Vec<(&Node, Path, Option<usize>)> =
            alloc::vec![(&self.root, Path::root(), None)];
        while let Some((node, path, parent)) = stack.pop() {
            let index = out.len();
            let children = node.children();
            for i in (0..children.len()).rev() {
                stack.push((&children[i], path.child(i), Some(index)));
            }
            out.push(FlatNode {
                path,
                kind: node.kind(),
                expanded: node.as_group().is_none_or(|g| g.expanded),
                parent,
                prev_sibling: None,
            });
        }
        link_siblings(&mut out);
        out
    }
}

fn link_siblings(nodes: &mut [FlatNode]) {
    // Pre-order guarantees a parent precedes its children, and siblings appear
    // in index order, so the last seen child of each parent is the previous
    // sibling of the next one.
    let mut last_child: Vec<Option<usize>> = alloc::vec![None; nodes.len()];
    for i in 0..nodes.len() {
        if let Some(parent) = nodes[i].parent {
            nodes[i].prev_sibling = last_child[parent];
            last_child[parent] = Some(i);
        }
    }
}

/// Pre-order iterator over `(path, node)` pairs of an [`EventTree`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<(Path, &'a Node)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Path, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.stack.pop()?;
        for (i, child) in node.children().iter().enumerate().rev() {
            self.stack.push((path.child(i), child));
        }
        Some((path, node))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn leaf(day: u32) -> Node {
        let d = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        Event::new(DateRange::instant(d)).into()
    }

    fn sample() -> EventTree {
        EventTree::new(alloc::vec![
            Group::new("a", alloc::vec![leaf(1), leaf(2)]).into(),
            leaf(3),
            Group::new("b", alloc::vec![Group::new("c", alloc::vec![leaf(4)]).into()])
                .with_expanded(false)
                .into(),
        ])
    }

    #[test]
    fn get_by_path() {
        let tree = sample();
        assert!(matches!(tree.get(&[]), Some(Node::Group(_))));
        assert!(matches!(tree.get(&[0, 1]), Some(Node::Event(_))));
        assert!(tree.get(&[2, 0, 0]).is_some());
        assert!(tree.get(&[0, 2]).is_none());
        assert!(tree.get(&[1, 0]).is_none(), "leaves have no children");
    }

    #[test]
    fn iter_is_pre_order() {
        let tree = sample();
        let paths: Vec<String> = tree
            .iter()
            .map(|(p, _)| alloc::format!("[{p}]"))
            .collect();
        assert_eq!(
            paths,
            ["[]", "[0]", "[0,0]", "[0,1]", "[1]", "[2]", "[2,0]", "[2,0,0]"]
        );
        assert_eq!(tree.len(), 8);
    }

    #[test]
    fn flatten_links_parents_and_siblings() {
        let tree = sample();
        let flat = tree.flatten();
        assert_eq!(flat.len(), 8);
        assert_eq!(flat[0].path, Path::root());
        assert_eq!(flat[0].parent, None);
        // [0,1] follows [0,0]
        assert_eq!(flat[3].path, Path::from([0, 1]));
        assert_eq!(flat[3].parent, Some(1));
        assert_eq!(flat[3].prev_sibling, Some(2));
        // [1] follows [0]
        assert_eq!(flat[4].prev_sibling, Some(1));
        // [2] follows [1]
        assert_eq!(flat[5].prev_sibling, Some(4));
        assert!(!flat[5].expanded);
        assert_eq!(flat[2].prev_sibling, None);
    }

    #[test]
    fn empty_tree() {
        let tree = EventTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.flatten().len(), 1);
    }
}
