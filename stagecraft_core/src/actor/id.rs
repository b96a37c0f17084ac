// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational actor handles.

use core::fmt;

/// Handle to an actor slot in an [`ActorStore`](super::ActorStore).
///
/// The generation counter detects stale handles: destroying an actor bumps
/// the slot's generation, so handles to the old occupant no longer
/// validate even after the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId {
    pub(super) idx: u32,
    pub(super) generation: u32,
}

impl ActorId {
    /// A handle that never validates.
    pub const INVALID: Self = Self {
        idx: u32::MAX,
        generation: u32::MAX,
    };

    /// The slot index. Only meaningful within the store that issued the
    /// handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// The generation this handle was issued under.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({}@gen{})", self.idx, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_is_distinct_from_real_handles() {
        let id = ActorId { idx: 0, generation: 0 };
        assert_ne!(id, ActorId::INVALID);
        assert_eq!(ActorId::INVALID.index(), u32::MAX);
    }

    #[test]
    fn debug_format_shows_slot_and_generation() {
        let id = ActorId { idx: 7, generation: 2 };
        assert_eq!(alloc::format!("{id:?}"), "ActorId(7@gen2)");
    }
}
