// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-actor dirty flags for lazily cached derived state.
//!
//! Each actor caches values derived from its ancestor chain: the world
//! transform, its inverse, the displayed opacity, and the effective
//! visibility. A [`DirtyFlags`] bitset records which of those caches are
//! stale.
//!
//! # Propagation semantics
//!
//! Invalidation is lazy in both directions:
//!
//! - **On mutation** only the mutated actor is marked. Setting a position
//!   never walks the subtree, so property churn on a deep tree stays O(1).
//! - **On access** a cached query walks up the ancestor chain, finds the
//!   topmost stale ancestor, and recomputes top-down along that chain only
//!   (O(depth)). Recomputing an actor marks its direct children, which is
//!   how staleness reaches descendants the moment their inherited inputs
//!   actually change.
//!
//! Consumers are the cached queries on
//! [`ActorStore`](crate::actor::ActorStore): `world_transform`,
//! `world_inverse`, `displayed_opacity`, and `effective_visible`.

use core::fmt;

/// Bitset of stale per-actor caches.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    /// Nothing stale.
    pub const CLEAN: Self = Self(0);
    /// The cached world transform is stale.
    pub const TRANSFORM: Self = Self(1 << 0);
    /// The cached inverse world transform is stale.
    pub const TRANSFORM_INVERSE: Self = Self(1 << 1);
    /// The cached displayed opacity is stale.
    pub const OPACITY: Self = Self(1 << 2);
    /// The cached effective visibility is stale.
    pub const VISIBILITY: Self = Self(1 << 3);
    /// Both transform caches. Any transform-affecting mutation sets this;
    /// the inverse is only recomputed when someone asks for it.
    pub const TRANSFORM_ALL: Self = Self(Self::TRANSFORM.0 | Self::TRANSFORM_INVERSE.0);
    /// Every cache stale. The state of a freshly created or reparented actor.
    pub const ALL: Self =
        Self(Self::TRANSFORM_ALL.0 | Self::OPACITY.0 | Self::VISIBILITY.0);

    /// Marks the given flags as stale.
    #[inline]
    pub fn insert(&mut self, flags: Self) {
        self.0 |= flags.0;
    }

    /// Clears the given flags.
    #[inline]
    pub fn remove(&mut self, flags: Self) {
        self.0 &= !flags.0;
    }

    /// Whether all of the given flags are set.
    #[inline]
    #[must_use]
    pub const fn contains(self, flags: Self) -> bool {
        self.0 & flags.0 == flags.0
    }

    /// Whether nothing is stale.
    #[inline]
    #[must_use]
    pub const fn is_clean(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "DirtyFlags(CLEAN)");
        }
        write!(f, "DirtyFlags(")?;
        let mut first = true;
        for (bit, name) in [
            (Self::TRANSFORM, "TRANSFORM"),
            (Self::TRANSFORM_INVERSE, "TRANSFORM_INVERSE"),
            (Self::OPACITY, "OPACITY"),
            (Self::VISIBILITY, "VISIBILITY"),
        ] {
            if self.contains(bit) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_contains() {
        let mut flags = DirtyFlags::CLEAN;
        assert!(flags.is_clean());

        flags.insert(DirtyFlags::TRANSFORM_ALL);
        assert!(flags.contains(DirtyFlags::TRANSFORM));
        assert!(flags.contains(DirtyFlags::TRANSFORM_INVERSE));
        assert!(!flags.contains(DirtyFlags::OPACITY));

        flags.remove(DirtyFlags::TRANSFORM);
        assert!(!flags.contains(DirtyFlags::TRANSFORM));
        assert!(flags.contains(DirtyFlags::TRANSFORM_INVERSE));
    }

    #[test]
    fn all_covers_every_cache() {
        let mut flags = DirtyFlags::ALL;
        flags.remove(DirtyFlags::TRANSFORM_ALL);
        flags.remove(DirtyFlags::OPACITY);
        flags.remove(DirtyFlags::VISIBILITY);
        assert!(flags.is_clean());
    }

    #[test]
    fn debug_lists_set_bits() {
        let mut flags = DirtyFlags::CLEAN;
        flags.insert(DirtyFlags::TRANSFORM);
        flags.insert(DirtyFlags::OPACITY);
        let s = alloc::format!("{flags:?}");
        assert_eq!(s, "DirtyFlags(TRANSFORM|OPACITY)");
    }
}
