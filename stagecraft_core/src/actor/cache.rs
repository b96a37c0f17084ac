// Copyright 2026 the Stagecraft Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily revalidated derived state.
//!
//! Each query here walks the full ancestor chain of the queried actor,
//! finds the topmost entry whose cache is stale, and recomputes top-down
//! from there along the chain only. Recomputing an actor marks its direct
//! children stale, which is how an ancestor change reaches descendants
//! without any subtree walk at mutation time. Off-chain siblings are
//! marked but not recomputed until someone asks.
//!
//! The cost of any query is O(depth); a clean chain is a read.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect};

use super::id::ActorId;
use super::store::{ActorFlags, ActorStore, NONE};
use crate::dirty::DirtyFlags;

impl ActorStore {
    /// The actor's world transform, revalidating stale ancestors first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn world_transform(&mut self, id: ActorId) -> Affine {
        self.validate(id);
        self.revalidate_chain(id.index(), DirtyFlags::TRANSFORM);
        self.world[id.index() as usize]
    }

    /// The inverse of the actor's world transform, cached separately.
    ///
    /// Singular transforms (a zero scale axis) produce non-finite
    /// coefficients, matching [`Affine::inverse`].
    #[must_use]
    pub fn world_inverse(&mut self, id: ActorId) -> Affine {
        self.validate(id);
        self.revalidate_chain(id.index(), DirtyFlags::TRANSFORM);
        let idx = id.index() as usize;
        if self.dirty[idx].contains(DirtyFlags::TRANSFORM_INVERSE) {
            self.world_inverse[idx] = self.world[idx].inverse();
            self.dirty[idx].remove(DirtyFlags::TRANSFORM_INVERSE);
        }
        self.world_inverse[idx]
    }

    /// The opacity the actor renders with: its own opacity, multiplied by
    /// the parent's displayed opacity when the parent cascades.
    #[must_use]
    pub fn displayed_opacity(&mut self, id: ActorId) -> f64 {
        self.validate(id);
        self.revalidate_chain(id.index(), DirtyFlags::OPACITY);
        self.displayed_opacity[id.index() as usize]
    }

    /// Whether the actor and every ancestor are visible.
    #[must_use]
    pub fn effective_visible(&mut self, id: ActorId) -> bool {
        self.validate(id);
        self.revalidate_chain(id.index(), DirtyFlags::VISIBILITY);
        self.effective_visible[id.index() as usize]
    }

    /// Maps a point from the actor's local space to world space.
    #[must_use]
    pub fn convert_to_world(&mut self, id: ActorId, local: Point) -> Point {
        self.world_transform(id) * local
    }

    /// Maps a world-space point into the actor's local space.
    #[must_use]
    pub fn convert_to_local(&mut self, id: ActorId, world: Point) -> Point {
        self.world_inverse(id) * world
    }

    /// The actor's untransformed bounds: origin to size.
    #[must_use]
    pub fn bounds(&self, id: ActorId) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size(id))
    }

    /// Axis-aligned world-space bounding box of the actor's bounds.
    #[must_use]
    pub fn bounding_box(&mut self, id: ActorId) -> Rect {
        let bounds = self.bounds(id);
        self.world_transform(id).transform_rect_bbox(bounds)
    }

    /// Whether a world-space point falls inside the actor's bounds.
    #[must_use]
    pub fn contains_point(&mut self, id: ActorId, world: Point) -> bool {
        let local = self.convert_to_local(id, world);
        self.bounds(id).contains(local)
    }

    /// Recomputes the stale portion of the ancestor chain ending at `idx`.
    ///
    /// `channel` is [`DirtyFlags::TRANSFORM`], [`DirtyFlags::OPACITY`], or
    /// [`DirtyFlags::VISIBILITY`]. The chain is scanned all the way to the
    /// root: a clean node can still sit below a stale ancestor whose
    /// recompute has not yet reached it.
    fn revalidate_chain(&mut self, idx: u32, channel: DirtyFlags) {
        let mut chain: Vec<u32> = Vec::new();
        let mut cursor = idx;
        loop {
            chain.push(cursor);
            let parent = self.parent[cursor as usize];
            if parent == NONE {
                break;
            }
            cursor = parent;
        }
        let Some(topmost) = chain
            .iter()
            .rposition(|&n| self.dirty[n as usize].contains(channel))
        else {
            return;
        };
        // chain[0] is the queried actor; walk ancestors-first.
        for i in (0..=topmost).rev() {
            self.recompute(chain[i], channel);
        }
    }

    /// Recomputes one cache entry from the (valid) parent entry and marks
    /// the children stale on the same channel.
    fn recompute(&mut self, idx: u32, channel: DirtyFlags) {
        let i = idx as usize;
        let parent = self.parent[i];
        if channel.contains(DirtyFlags::TRANSFORM) {
            let local = self.transform[i].to_matrix(self.anchor[i], self.size[i]);
            self.world[i] = match parent {
                NONE => local,
                p => self.world[p as usize] * local,
            };
            self.dirty[i].remove(DirtyFlags::TRANSFORM);
            self.dirty[i].insert(DirtyFlags::TRANSFORM_INVERSE);
        } else if channel.contains(DirtyFlags::OPACITY) {
            let inherited = match parent {
                NONE => 1.0,
                p if self.flags[p as usize]
                    .contains(ActorFlags::CASCADE_OPACITY) =>
                {
                    self.displayed_opacity[p as usize]
                }
                _ => 1.0,
            };
            self.displayed_opacity[i] = self.opacity[i] * inherited;
            self.dirty[i].remove(DirtyFlags::OPACITY);
        } else {
            let inherited = match parent {
                NONE => true,
                p => self.effective_visible[p as usize],
            };
            self.effective_visible[i] =
                inherited && self.flags[i].contains(ActorFlags::VISIBLE);
            self.dirty[i].remove(DirtyFlags::VISIBILITY);
        }
        for c in 0..self.children[i].len() {
            let child = self.children[i][c] as usize;
            self.dirty[child].insert(channel);
        }
    }
}
