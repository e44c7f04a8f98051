// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positional node addresses.

use core::borrow::Borrow;
use core::fmt;
use core::str::FromStr;

use smallvec::SmallVec;

/// Address of a node by its child index in each ancestor, root first.
///
/// The root is the empty path. Paths are the stable identity used for caching,
/// collapse tracking, and cross-component references; node objects are
/// replaced wholesale on every re-parse, paths survive as long as the shape
/// around them does.
///
/// Paths display as comma-joined indices (`"0,2,1"`, root is `""`) and parse
/// back from the same form.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(SmallVec<[usize; 8]>);

impl Path {
    /// The root path.
    #[must_use]
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    /// Builds a path from child indices.
    #[must_use]
    pub fn from_slice(indices: &[usize]) -> Self {
        Self(SmallVec::from_slice(indices))
    }

    /// Child indices, root first.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of indices; the root has depth `0`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the empty path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of this node in its parent's child list.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Path of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut next = self.0.clone();
        next.push(index);
        Self(next)
    }

    /// Path of the parent, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(Self::from_slice(head))
    }

    /// Path of the previous sibling at the same depth, if any.
    #[must_use]
    pub fn prev_sibling(&self) -> Option<Self> {
        let (&last, head) = self.0.split_last()?;
        let prev = last.checked_sub(1)?;
        let mut path = Self::from_slice(head);
        path.0.push(prev);
        Some(path)
    }

    /// Returns `true` if `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.depth() < other.depth() && other.0.starts_with(&self.0)
    }

    /// Strict ancestors of this path, shallowest (the root) first.
    pub fn ancestors(&self) -> impl Iterator<Item = &[usize]> + '_ {
        (0..self.depth()).map(move |len| &self.0[..len])
    }
}

impl Borrow<[usize]> for Path {
    fn borrow(&self) -> &[usize] {
        &self.0
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self::from_slice(indices)
    }
}

impl<const N: usize> From<[usize; N]> for Path {
    fn from(indices: [usize; N]) -> Self {
        Self::from_slice(&indices)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Error returned when a comma-joined path string is malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePathError {
    /// Byte offset of the offending segment.
    pub position: usize,
}

impl fmt::Display for ParsePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid path segment at byte {}", self.position)
    }
}

impl core::error::Error for ParsePathError {}

impl FromStr for Path {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let mut path = Self::root();
        let mut position = 0;
        for segment in s.split(',') {
            let index = segment
                .trim()
                .parse::<usize>()
                .map_err(|_| ParsePathError { position })?;
            path.0.push(index);
            position += segment.len() + 1;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn display_and_parse_roundtrip() {
        let p = Path::from([0, 12, 3]);
        assert_eq!(p.to_string(), "0,12,3");
        assert_eq!("0,12,3".parse::<Path>(), Ok(p));
        assert_eq!("".parse::<Path>(), Ok(Path::root()));
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn parse_reports_bad_segment() {
        assert_eq!(
            "0,x,2".parse::<Path>(),
            Err(ParsePathError { position: 2 })
        );
        assert!("1,,2".parse::<Path>().is_err());
    }

    #[test]
    fn parent_and_prev_sibling() {
        let p = Path::from([1, 2]);
        assert_eq!(p.parent(), Some(Path::from([1])));
        assert_eq!(p.prev_sibling(), Some(Path::from([1, 1])));
        assert_eq!(Path::from([1, 0]).prev_sibling(), None);
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::root().prev_sibling(), None);
    }

    #[test]
    fn ancestry_is_strict() {
        let a = Path::from([0]);
        let b = Path::from([0, 1, 2]);
        assert!(a.is_ancestor_of(&b));
        assert!(Path::root().is_ancestor_of(&a));
        assert!(!b.is_ancestor_of(&b));
        assert!(!Path::from([1]).is_ancestor_of(&b));
        // Prefixes compare by index, not by string prefix.
        assert!(!Path::from([1]).is_ancestor_of(&Path::from([10, 0])));
    }

    #[test]
    fn ancestors_shallowest_first() {
        let p = Path::from([3, 1, 4]);
        let all: Vec<&[usize]> = p.ancestors().collect();
        assert_eq!(all, [&[][..], &[3][..], &[3, 1][..]]);
    }

    #[test]
    fn borrowed_lookup_matches_owned_hash() {
        let mut set = hashbrown::HashSet::new();
        set.insert(Path::from([2, 5]));
        assert!(set.contains(&[2_usize, 5][..]));
    }
}
