// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pull-based memoization keyed by input generations.

/// A cached value tagged with the generations of the inputs it was derived
/// from. Reads with a different stamp recompute.
#[derive(Clone, Debug)]
pub(crate) struct Memo<K, T> {
    stamp: Option<K>,
    value: Option<T>,
}

impl<K, T> Default for Memo<K, T> {
    fn default() -> Self {
        Self {
            stamp: None,
            value: None,
        }
    }
}

impl<K: Copy + PartialEq, T> Memo<K, T> {
    /// Returns `true` if the cached value was derived from `stamp`.
    pub(crate) fn is_fresh(&self, stamp: K) -> bool {
        self.value.is_some() && self.stamp == Some(stamp)
    }

    /// Returns the value for `stamp`, recomputing it with `f` if stale.
    pub(crate) fn get_or_update(&mut self, stamp: K, f: impl FnOnce() -> T) -> &T {
        if !self.is_fresh(stamp) {
            self.value = None;
            self.stamp = Some(stamp);
        }
        self.value.get_or_insert_with(f)
    }

    /// Drops the cached value.
    pub(crate) fn clear(&mut self) {
        self.stamp = None;
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recomputes_only_on_new_stamp() {
        let mut memo = Memo::<(u64, u64), u32>::default();
        let mut calls = 0;
        let mut read = |memo: &mut Memo<(u64, u64), u32>, stamp| {
            *memo.get_or_update(stamp, || {
                calls += 1;
                calls
            })
        };
        assert_eq!(read(&mut memo, (1, 1)), 1);
        assert_eq!(read(&mut memo, (1, 1)), 1);
        assert_eq!(read(&mut memo, (1, 2)), 2);
        memo.clear();
        assert!(!memo.is_fresh((1, 2)));
        assert_eq!(read(&mut memo, (1, 2)), 3);
    }
}
